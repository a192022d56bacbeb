//! Portfolio summary figures: KPIs, status distribution, workload and trend.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::fields::Status;
use crate::task::Task;

/// Headline numbers for the filtered task set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpis {
    pub total_projects: usize,
    pub total_tasks: usize,
    pub portfolio_completion: u8,
    pub delayed_tasks: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthCompletion {
    /// `YYYY-MM`
    pub month: String,
    pub completion: u8,
}

/// All summary figures for one filtered view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub kpis: Kpis,
    pub status_distribution: Vec<(Status, usize)>,
    pub tasks_by_owner: Vec<(String, usize)>,
    pub completion_trend: Vec<MonthCompletion>,
}

pub fn summarize(tasks: &[&Task]) -> PortfolioSummary {
    PortfolioSummary {
        kpis: kpis(tasks),
        status_distribution: status_distribution(tasks),
        tasks_by_owner: tasks_by_owner(tasks),
        completion_trend: completion_trend(tasks),
    }
}

pub fn kpis(tasks: &[&Task]) -> Kpis {
    let mut projects: Vec<&str> = Vec::new();
    for task in tasks {
        if !projects.contains(&task.project.as_str()) {
            projects.push(&task.project);
        }
    }

    Kpis {
        total_projects: projects.len(),
        total_tasks: tasks.len(),
        portfolio_completion: mean_completion(tasks.iter().map(|t| t.completion)),
        delayed_tasks: tasks.iter().filter(|t| t.status == Status::Delayed).count(),
    }
}

/// Task counts for every status, including zero counts.
pub fn status_distribution(tasks: &[&Task]) -> Vec<(Status, usize)> {
    Status::ALL
        .into_iter()
        .map(|status| (status, tasks.iter().filter(|t| t.status == status).count()))
        .collect()
}

/// Task counts per owner cell, in order of first appearance.
pub fn tasks_by_owner(tasks: &[&Task]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for task in tasks {
        match counts.iter_mut().find(|(owner, _)| *owner == task.owner) {
            Some((_, n)) => *n += 1,
            None => counts.push((task.owner.clone(), 1)),
        }
    }
    counts
}

/// Mean completion of tasks grouped by target start month.
pub fn completion_trend(tasks: &[&Task]) -> Vec<MonthCompletion> {
    let mut by_month: BTreeMap<String, Vec<u8>> = BTreeMap::new();
    for task in tasks {
        by_month
            .entry(task.start_date().format("%Y-%m").to_string())
            .or_default()
            .push(task.completion);
    }
    by_month
        .into_iter()
        .map(|(month, values)| MonthCompletion {
            month,
            completion: mean_completion(values),
        })
        .collect()
}

fn mean_completion<I>(values: I) -> u8
where
    I: IntoIterator<Item = u8>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0u32, 0u32), |(s, c), v| (s + u32::from(v), c + 1));
    if count == 0 {
        0
    } else {
        (f64::from(sum) / f64::from(count)).round() as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskDraft;
    use chrono::NaiveDate;

    fn task(project: &str, owner: &str, month: u32, completion: u8, status: Status) -> Task {
        let start = NaiveDate::from_ymd_opt(2026, month, 1).unwrap();
        Task::new(TaskDraft {
            id: format!("{project}-{month}-{completion}"),
            name: "Work item".into(),
            project: project.into(),
            owner: owner.into(),
            developer: "Gerald Ballares".into(),
            start_date: start,
            end_date: start,
            actual_start_date: None,
            completion,
            status,
        })
    }

    fn sample() -> Vec<Task> {
        vec![
            task("Core Banking", "Karen Borsal", 2, 30, Status::Delayed),
            task("Core Banking", "Rocel Estafia", 1, 100, Status::Completed),
            task("Collections", "Karen Borsal", 1, 45, Status::AtRisk),
        ]
    }

    #[test]
    fn test_kpis() {
        let tasks = sample();
        let refs: Vec<&Task> = tasks.iter().collect();
        let kpis = kpis(&refs);
        assert_eq!(
            kpis,
            Kpis { total_projects: 2, total_tasks: 3, portfolio_completion: 58, delayed_tasks: 1 }
        );
    }

    #[test]
    fn test_kpis_empty() {
        let kpis = kpis(&[]);
        assert_eq!(kpis.total_tasks, 0);
        assert_eq!(kpis.portfolio_completion, 0);
    }

    #[test]
    fn test_status_distribution_order() {
        let tasks = sample();
        let refs: Vec<&Task> = tasks.iter().collect();
        assert_eq!(
            status_distribution(&refs),
            vec![
                (Status::Completed, 1),
                (Status::OnTrack, 0),
                (Status::AtRisk, 1),
                (Status::Delayed, 1),
            ]
        );
    }

    #[test]
    fn test_owner_counts_and_trend() {
        let tasks = sample();
        let refs: Vec<&Task> = tasks.iter().collect();
        assert_eq!(
            tasks_by_owner(&refs),
            vec![("Karen Borsal".to_string(), 2), ("Rocel Estafia".to_string(), 1)]
        );
        let trend = completion_trend(&refs);
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0], MonthCompletion { month: "2026-01".into(), completion: 73 });
        assert_eq!(trend[1], MonthCompletion { month: "2026-02".into(), completion: 30 });
    }
}
