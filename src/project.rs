//! Project rollups derived from the task collection.
//!
//! A project has no identity beyond its name: rollups are recomputed from the tasks
//! every time the collection changes and are never edited directly. Projects appear
//! in order of their first task.

use serde::Serialize;

use crate::fields::Status;
use crate::task::Task;

/// Aggregate health of all tasks sharing a project name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub status: Status,
    /// Mean task completion, rounded.
    pub completion: u8,
    /// Number of tasks not yet completed.
    pub risk_exposure: usize,
    pub task_count: usize,
    /// Schedule performance index. Not tracked by the sheet, reported as 1.
    pub spi: f64,
    /// Cost performance index. Not tracked by the sheet, reported as 1.
    pub cpi: f64,
}

/// Build one rollup per distinct project name.
pub fn rollup_projects(tasks: &[Task]) -> Vec<Project> {
    let mut names: Vec<&str> = Vec::new();
    for task in tasks {
        if !names.contains(&task.project.as_str()) {
            names.push(&task.project);
        }
    }

    names
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            let members: Vec<&Task> = tasks.iter().filter(|t| t.project == name).collect();
            rollup(i + 1, name, &members)
        })
        .collect()
}

fn rollup(index: usize, name: &str, tasks: &[&Task]) -> Project {
    let count = tasks.len();
    let total: u32 = tasks.iter().map(|t| u32::from(t.completion)).sum();
    let completion = if count == 0 {
        0
    } else {
        (f64::from(total) / count as f64).round() as u8
    };

    Project {
        id: index.to_string(),
        name: name.to_string(),
        status: rollup_status(tasks.iter().map(|t| t.status)),
        completion,
        risk_exposure: tasks.iter().filter(|t| t.status != Status::Completed).count(),
        task_count: count,
        spi: 1.0,
        cpi: 1.0,
    }
}

/// Worst status among the tasks: Delayed, then At Risk, then Completed only if every
/// task is, else On Track.
pub fn rollup_status<I>(statuses: I) -> Status
where
    I: IntoIterator<Item = Status>,
{
    let mut any = false;
    let mut all_completed = true;
    let mut has_at_risk = false;
    for status in statuses {
        any = true;
        match status {
            Status::Delayed => return Status::Delayed,
            Status::AtRisk => has_at_risk = true,
            Status::Completed => {}
            Status::OnTrack => {}
        }
        if status != Status::Completed {
            all_completed = false;
        }
    }

    if has_at_risk {
        Status::AtRisk
    } else if any && all_completed {
        Status::Completed
    } else {
        Status::OnTrack
    }
}
