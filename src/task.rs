//! Task data structure and related functionality.
//!
//! This module defines the core `Task` struct: one normalized row of the portfolio
//! sheet, with its target schedule window, optional actual start, and progress.

use chrono::NaiveDate;
use serde::Serialize;

use crate::fields::Status;
use crate::normalize::duration_days;

/// A normalized portfolio work item.
///
/// The target window is private so that `duration` is always derived from it;
/// use [`Task::reschedule`] to move a task.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub name: String,
    pub project: String,
    /// Assigned PM name(s), possibly several joined by commas.
    pub owner: String,
    pub developer: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_start_date: Option<NaiveDate>,
    pub completion: u8,
    pub status: Status,
    duration: i64,
}

/// Everything needed to create a task except the derived duration.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub id: String,
    pub name: String,
    pub project: String,
    pub owner: String,
    pub developer: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub actual_start_date: Option<NaiveDate>,
    pub completion: u8,
    pub status: Status,
}

impl Task {
    pub fn new(draft: TaskDraft) -> Self {
        Task {
            id: draft.id,
            name: draft.name,
            project: draft.project,
            owner: draft.owner,
            developer: draft.developer,
            start_date: draft.start_date,
            end_date: draft.end_date,
            actual_start_date: draft.actual_start_date,
            completion: draft.completion.min(100),
            status: draft.status,
            duration: duration_days(draft.start_date, draft.end_date),
        }
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Whole days in the target window.
    pub fn duration(&self) -> i64 {
        self.duration
    }

    /// Replace the target window and recompute the duration.
    pub fn reschedule(&mut self, start_date: NaiveDate, end_date: NaiveDate) {
        self.start_date = start_date;
        self.end_date = end_date;
        self.duration = duration_days(start_date, end_date);
    }

    /// Whether the owner cell names the given PM. Owner cells may list several
    /// comma-separated names; the whole cell also matches.
    pub fn has_owner(&self, owner: &str) -> bool {
        let owner = owner.trim();
        self.owner.trim() == owner || self.owner.split(',').any(|name| name.trim() == owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn draft() -> TaskDraft {
        TaskDraft {
            id: "1".into(),
            name: "Ledger import".into(),
            project: "Collection System v3".into(),
            owner: "Karen Borsal, Rocel Estafia".into(),
            developer: "Gerald Ballares".into(),
            start_date: date(2026, 1, 1),
            end_date: date(2026, 1, 31),
            actual_start_date: None,
            completion: 40,
            status: Status::OnTrack,
        }
    }

    #[test]
    fn test_duration_follows_reschedule() {
        let mut task = Task::new(draft());
        assert_eq!(task.duration(), 30);
        task.reschedule(date(2026, 2, 1), date(2026, 2, 11));
        assert_eq!(task.duration(), 10);
        assert_eq!(task.start_date(), date(2026, 2, 1));
    }

    #[test]
    fn test_serialized_shape_omits_missing_actual_start() {
        let task = Task::new(draft());
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["startDate"], "2026-01-01");
        assert_eq!(value["endDate"], "2026-01-31");
        assert_eq!(value["status"], "On Track");
        assert_eq!(value["duration"], 30);
        assert!(value.get("actualStartDate").is_none());

        let mut with_actual = draft();
        with_actual.actual_start_date = Some(date(2026, 1, 5));
        let value = serde_json::to_value(Task::new(with_actual)).unwrap();
        assert_eq!(value["actualStartDate"], "2026-01-05");
    }

    #[test]
    fn test_has_owner_matches_joined_names() {
        let task = Task::new(draft());
        assert!(task.has_owner("Rocel Estafia"));
        assert!(task.has_owner("Karen Borsal"));
        assert!(!task.has_owner("Jelly Jane Tejano"));
        assert!(task.has_owner(" Karen Borsal, Rocel Estafia "));
    }

    #[test]
    fn test_has_owner_needs_whole_name() {
        let task = Task::new(TaskDraft {
            owner: "Karenina Cruz".into(),
            ..draft()
        });
        assert!(!task.has_owner("Karen"));
        assert!(task.has_owner("Karenina Cruz"));
    }
}
