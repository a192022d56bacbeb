//! Dashboard state: the current task collection and its project rollups.
//!
//! Each refresh replaces the collection in one step. Refreshes are numbered; a result
//! is only applied if it belongs to the newest refresh started. A failed refresh leaves
//! the last good collection in place; a successful load with no rows clears it.

use tracing::{info, warn};

use crate::builder::{BuildReport, SkippedRow};
use crate::project::{rollup_projects, Project};
use crate::source::{SourceError, TaskSource};
use crate::task::Task;

/// Identifies one refresh attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshToken(u64);

/// What happened to a finished refresh.
#[derive(Debug)]
pub enum RefreshOutcome {
    Applied { admitted: usize, skipped: usize },
    /// A newer refresh was started after this one; the result was discarded.
    Stale,
    /// The source loaded but had no admissible rows; the collection is now empty.
    Empty { skipped: usize },
    /// Loading failed; the previous collection was kept.
    Failed(SourceError),
}

#[derive(Debug, Default)]
pub struct Dashboard {
    tasks: Vec<Task>,
    projects: Vec<Project>,
    skipped: Vec<SkippedRow>,
    issued: u64,
}

impl Dashboard {
    pub fn new() -> Self {
        Dashboard::default()
    }

    /// Start a refresh; any earlier outstanding refresh becomes stale.
    pub fn begin_refresh(&mut self) -> RefreshToken {
        self.issued += 1;
        RefreshToken(self.issued)
    }

    /// Apply the result of the refresh identified by `token`.
    pub fn finish_refresh(
        &mut self,
        token: RefreshToken,
        result: Result<BuildReport, SourceError>,
    ) -> RefreshOutcome {
        if token.0 != self.issued {
            warn!(refresh = token.0, newest = self.issued, "discarding stale refresh");
            return RefreshOutcome::Stale;
        }

        match result {
            Ok(report) => {
                let admitted = report.tasks.len();
                let skipped = report.skipped.len();
                self.replace(report);
                if admitted == 0 {
                    warn!(skipped, "no valid rows found");
                    RefreshOutcome::Empty { skipped }
                } else {
                    RefreshOutcome::Applied { admitted, skipped }
                }
            }
            Err(e) => {
                warn!(error = %e, "refresh failed, keeping previous tasks");
                RefreshOutcome::Failed(e)
            }
        }
    }

    /// Load from `source` and apply the result.
    pub fn refresh(&mut self, source: &dyn TaskSource) -> RefreshOutcome {
        let token = self.begin_refresh();
        info!(source = %source.describe(), "refreshing tasks");
        let result = source.load_tasks();
        self.finish_refresh(token, result)
    }

    fn replace(&mut self, report: BuildReport) {
        self.projects = rollup_projects(&report.tasks);
        self.tasks = report.tasks;
        self.skipped = report.skipped;
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Rows rejected by the most recently applied refresh.
    pub fn skipped(&self) -> &[SkippedRow] {
        &self.skipped
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_from_csv;
    use crate::source::FixtureSource;

    const ONE_ROW: &str = "Name,Project,Owner,Developer,Start Date,End Date\n\
        Audit,Core Banking,Karen Borsal,Gerald Ballares,2026-01-01,2026-01-10\n";

    #[test]
    fn test_refresh_applies_and_rolls_up() {
        let mut dashboard = Dashboard::new();
        let outcome = dashboard.refresh(&FixtureSource);
        assert!(matches!(outcome, RefreshOutcome::Applied { admitted: 7, skipped: 1 }));
        assert_eq!(dashboard.tasks().len(), 7);
        assert_eq!(dashboard.projects().len(), 3);
        assert_eq!(dashboard.skipped().len(), 1);
        assert!(dashboard.get("CS-1").is_some());
    }

    #[test]
    fn test_stale_result_does_not_overwrite_newer() {
        let mut dashboard = Dashboard::new();
        let older = dashboard.begin_refresh();
        let newer = dashboard.begin_refresh();

        let outcome = dashboard.finish_refresh(newer, Ok(build_from_csv(ONE_ROW)));
        assert!(matches!(outcome, RefreshOutcome::Applied { admitted: 1, .. }));

        let late = FixtureSource.load_tasks();
        let outcome = dashboard.finish_refresh(older, late);
        assert!(matches!(outcome, RefreshOutcome::Stale));
        assert_eq!(dashboard.tasks().len(), 1);
    }

    #[test]
    fn test_failure_keeps_previous_collection() {
        let mut dashboard = Dashboard::new();
        dashboard.refresh(&FixtureSource);

        let token = dashboard.begin_refresh();
        let err = SourceError::Http { status: 404, url: "https://example.com".into() };
        let outcome = dashboard.finish_refresh(token, Err(err));
        assert!(matches!(outcome, RefreshOutcome::Failed(SourceError::Http { status: 404, .. })));
        assert_eq!(dashboard.tasks().len(), 7);
    }

    #[test]
    fn test_empty_source_clears_previous_collection() {
        let mut dashboard = Dashboard::new();
        dashboard.refresh(&FixtureSource);

        let token = dashboard.begin_refresh();
        let header_only = "Name,Project,Owner,Developer,Start Date,End Date\n";
        let outcome = dashboard.finish_refresh(token, Ok(build_from_csv(header_only)));
        assert!(matches!(outcome, RefreshOutcome::Empty { skipped: 0 }));
        assert!(dashboard.tasks().is_empty());
        assert!(dashboard.projects().is_empty());
        assert!(dashboard.skipped().is_empty());
    }

    #[test]
    fn test_all_rows_rejected_clears_and_reports_skips() {
        let mut dashboard = Dashboard::new();
        dashboard.refresh(&FixtureSource);

        let token = dashboard.begin_refresh();
        let rejected = "Name,Project,Owner,Developer,Start Date,End Date\n\
            Audit,Core Banking,Karen Borsal,,2026-01-01,2026-01-10\n";
        let outcome = dashboard.finish_refresh(token, Ok(build_from_csv(rejected)));
        assert!(matches!(outcome, RefreshOutcome::Empty { skipped: 1 }));
        assert!(dashboard.tasks().is_empty());
        assert_eq!(dashboard.skipped().len(), 1);
    }
}
