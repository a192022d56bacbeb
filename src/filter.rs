//! Task selection by project and assigned PM.

use crate::fields::SortKey;
use crate::task::Task;

/// Current filter selection; `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub project: Option<String>,
    pub owner: Option<String>,
}

impl TaskFilter {
    pub fn new(project: Option<String>, owner: Option<String>) -> Self {
        let all = |v: Option<String>| {
            v.filter(|s| !s.trim().is_empty() && !s.trim().eq_ignore_ascii_case("all"))
        };
        TaskFilter {
            project: all(project),
            owner: all(owner),
        }
    }

    /// Exact project match; the owner matches any name within a joined owner cell.
    pub fn matches(&self, task: &Task) -> bool {
        let project_match = self.project.as_ref().map_or(true, |p| task.project == *p);
        let owner_match = self.owner.as_ref().map_or(true, |o| task.has_owner(o));
        project_match && owner_match
    }

    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|t| self.matches(t)).collect()
    }
}

/// Sort tasks in place; ties fall back to target start, then id.
pub fn sort_tasks(tasks: &mut [&Task], key: SortKey) {
    tasks.sort_by(|a, b| {
        let primary = match key {
            SortKey::Start => a.start_date().cmp(&b.start_date()),
            SortKey::End => a.end_date().cmp(&b.end_date()),
            SortKey::Completion => b.completion.cmp(&a.completion),
            SortKey::Project => a.project.cmp(&b.project),
        };
        primary
            .then_with(|| a.start_date().cmp(&b.start_date()))
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Distinct values in order of first appearance.
pub fn distinct<'a, F>(tasks: &'a [Task], field: F) -> Vec<&'a str>
where
    F: Fn(&'a Task) -> &'a str,
{
    let mut out: Vec<&str> = Vec::new();
    for task in tasks {
        let value = field(task);
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}
