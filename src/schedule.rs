//! Gantt geometry for a set of tasks.
//!
//! All positions are percentages of one shared timeline that runs from the earliest
//! target start to the latest target end of the tasks being drawn. Day offsets are
//! counted from that earliest start, so every value in one `Timeline` shares a base.

use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

use crate::fields::Status;
use crate::task::Task;

/// Default minimum bar width, in percent of the timeline.
pub const MIN_VISIBLE_WIDTH: f64 = 10.0;

/// Soft/solid color pairs assigned to developers.
const PALETTE: [DeveloperColors; 8] = [
    DeveloperColors { soft: "#BFDBFE", solid: "#1E3A8A" },
    DeveloperColors { soft: "#BBF7D0", solid: "#059669" },
    DeveloperColors { soft: "#FDE68A", solid: "#D97706" },
    DeveloperColors { soft: "#FECACA", solid: "#DC2626" },
    DeveloperColors { soft: "#DDD6FE", solid: "#7C3AED" },
    DeveloperColors { soft: "#A5F3FC", solid: "#0891B2" },
    DeveloperColors { soft: "#FBCFE8", solid: "#DB2777" },
    DeveloperColors { soft: "#E5E7EB", solid: "#4B5563" },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeveloperColors {
    pub soft: &'static str,
    pub solid: &'static str,
}

/// Options that change how bars are drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionOptions {
    /// Floor applied to bar widths so very short tasks stay visible.
    pub min_visible_width: f64,
    /// Fill the whole bar for tasks whose status is `Completed`, whatever their completion.
    pub completed_fills_bar: bool,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        ProjectionOptions {
            min_visible_width: MIN_VISIBLE_WIDTH,
            completed_fills_bar: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MarkerKind {
    #[serde(rename = "TS")]
    TargetStart,
    #[serde(rename = "AS")]
    ActualStart,
    #[serde(rename = "TE")]
    TargetEnd,
}

impl MarkerKind {
    pub fn code(self) -> &'static str {
        match self {
            MarkerKind::TargetStart => "TS",
            MarkerKind::ActualStart => "AS",
            MarkerKind::TargetEnd => "TE",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MarkerKind::TargetStart => "Target Start",
            MarkerKind::ActualStart => "Actual Start",
            MarkerKind::TargetEnd => "Target End",
        }
    }
}

/// A point on a task row, clamped to the visible timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub kind: MarkerKind,
    pub date: NaiveDate,
    pub percent: f64,
    pub tooltip: String,
}

/// Geometry for one task row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskBar {
    pub task_id: String,
    pub project: String,
    pub developer: String,
    /// Left edge; negative when the actual start precedes the timeline.
    pub left_percent: f64,
    pub width_percent: f64,
    pub bar_days: i64,
    pub fill_percent: f64,
    pub colors: DeveloperColors,
    pub markers: Vec<Marker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_start_tooltip: Option<String>,
}

/// One column of the month ruler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthHeader {
    pub month: NaiveDate,
    pub label: String,
}

/// Everything needed to draw a Gantt chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub min_offset: i64,
    pub max_offset: i64,
    pub total_days: i64,
    pub months: Vec<MonthHeader>,
    pub bars: Vec<TaskBar>,
}

/// Whole days from `base` to `date`, negative when `date` is earlier.
pub fn day_offset(date: NaiveDate, base: NaiveDate) -> i64 {
    (date - base).num_days()
}

pub fn clamp_percent(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// Project tasks onto a shared timeline. Returns `None` for an empty task set.
pub fn project_timeline<'a, I>(tasks: I, options: ProjectionOptions) -> Option<Timeline>
where
    I: IntoIterator<Item = &'a Task>,
{
    let tasks: Vec<&Task> = tasks.into_iter().collect();
    let base = tasks.iter().map(|t| t.start_date()).min()?;
    let min_offset = tasks
        .iter()
        .map(|t| day_offset(t.start_date(), base))
        .min()
        .unwrap_or(0);
    let max_offset = tasks
        .iter()
        .map(|t| day_offset(t.end_date(), base))
        .max()
        .unwrap_or(0);
    let total_days = (max_offset - min_offset).max(1);
    let end = tasks.iter().map(|t| t.end_date()).max().unwrap_or(base);

    let bars = tasks
        .iter()
        .map(|task| project_bar(task, base, min_offset, total_days, options))
        .collect();

    Some(Timeline {
        start: base,
        end,
        min_offset,
        max_offset,
        total_days,
        months: month_headers(base, end),
        bars,
    })
}

fn project_bar(
    task: &Task,
    base: NaiveDate,
    min_offset: i64,
    total_days: i64,
    options: ProjectionOptions,
) -> TaskBar {
    let total = total_days as f64;
    let target_start = day_offset(task.start_date(), base) - min_offset;
    let target_end = day_offset(task.end_date(), base) - min_offset;
    let actual_start = task
        .actual_start_date
        .map(|date| day_offset(date, base) - min_offset);

    let bar_start = actual_start.unwrap_or(target_start);
    let bar_days = (target_end - bar_start).max(1);
    let left_percent = bar_start as f64 / total * 100.0;
    let width_percent = (bar_days as f64 / total * 100.0).max(options.min_visible_width);

    let fill_percent = if options.completed_fills_bar && task.status == Status::Completed {
        100.0
    } else {
        clamp_percent(f64::from(task.completion))
    };

    let marker = |kind: MarkerKind, date: NaiveDate, offset: i64| Marker {
        kind,
        date,
        percent: clamp_percent(offset as f64 / total * 100.0),
        tooltip: marker_tooltip(kind, date),
    };

    let mut markers = vec![marker(MarkerKind::TargetStart, task.start_date(), target_start)];
    if let (Some(date), Some(offset)) = (task.actual_start_date, actual_start) {
        markers.push(marker(MarkerKind::ActualStart, date, offset));
    }
    markers.push(marker(MarkerKind::TargetEnd, task.end_date(), target_end));

    TaskBar {
        task_id: task.id.clone(),
        project: task.project.clone(),
        developer: task.developer.clone(),
        left_percent,
        width_percent,
        bar_days,
        fill_percent,
        colors: developer_colors(&task.developer),
        markers,
        actual_start_tooltip: task
            .actual_start_date
            .map(|date| marker_tooltip(MarkerKind::ActualStart, date)),
    }
}

/// Tooltip text such as `Target Start: Thu, Jan 1, 2026`.
pub fn marker_tooltip(kind: MarkerKind, date: NaiveDate) -> String {
    format!("{}: {}", kind.label(), date.format("%a, %b %-d, %Y"))
}

/// Deterministic palette entry for a developer name.
pub fn developer_colors(developer: &str) -> DeveloperColors {
    let hash = developer
        .chars()
        .fold(0u32, |h, c| h.wrapping_mul(31).wrapping_add(c as u32));
    PALETTE[hash as usize % PALETTE.len()]
}

/// Every calendar month from the month of `start` through the month of `end`.
pub fn month_headers(start: NaiveDate, end: NaiveDate) -> Vec<MonthHeader> {
    let first = start_of_month(start);
    let last = start_of_month(end).max(first);
    let mut months = Vec::new();
    let mut month = first;
    while month <= last {
        months.push(MonthHeader {
            month,
            label: month.format("%b %Y").to_string(),
        });
        match month.checked_add_months(Months::new(1)) {
            Some(next) => month = next,
            None => break,
        }
    }
    months
}

fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
