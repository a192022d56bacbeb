//! Task record builder.
//!
//! Turns tokenized sheet rows into admitted `Task`s. Admission is strict: a row is
//! dropped unless it has a name, project, owner, developer, and parseable target start
//! and end dates. Dropped rows are reported in the `BuildReport`, never raised as errors.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::headers::{CanonicalField, ColumnMap};
use crate::normalize::{normalize_completion, normalize_date, normalize_status};
use crate::task::{Task, TaskDraft};
use crate::tokenizer::tokenize;

/// Why a data row was left out of the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RejectReason {
    MissingName,
    MissingProject,
    MissingOwner,
    MissingDeveloper,
    InvalidStartDate,
    InvalidEndDate,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RejectReason::MissingName => "missing task name",
            RejectReason::MissingProject => "missing project",
            RejectReason::MissingOwner => "missing assigned PM",
            RejectReason::MissingDeveloper => "missing developer",
            RejectReason::InvalidStartDate => "missing or unparseable target start date",
            RejectReason::InvalidEndDate => "missing or unparseable target end date",
        };
        f.write_str(s)
    }
}

/// A rejected data row, numbered from 1 after the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    pub row: usize,
    pub reason: RejectReason,
}

/// Result of building a task collection from one sheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    pub tasks: Vec<Task>,
    pub skipped: Vec<SkippedRow>,
}

/// Parse CSV text all the way to admitted tasks.
pub fn build_from_csv(text: &str) -> BuildReport {
    let rows = tokenize(text);
    let Some((header, data)) = rows.split_first() else {
        return BuildReport::default();
    };
    build_tasks(header, data)
}

/// Build tasks from a header row and its data rows.
pub fn build_tasks(header: &[String], rows: &[Vec<String>]) -> BuildReport {
    let columns = ColumnMap::resolve(header);
    let missing = columns.missing();
    if !missing.is_empty() {
        debug!(?missing, "sheet has no column for some fields");
    }

    let mut report = BuildReport::default();
    let mut seen_ids: HashSet<String> = HashSet::new();

    for (i, row) in rows.iter().enumerate() {
        let position = i + 1;
        match build_row(&columns, row, position, &mut seen_ids) {
            Ok(task) => report.tasks.push(task),
            Err(reason) => {
                debug!(row = position, %reason, "skipping sheet row");
                report.skipped.push(SkippedRow { row: position, reason });
            }
        }
    }

    report
}

fn build_row(
    columns: &ColumnMap,
    row: &[String],
    position: usize,
    seen_ids: &mut HashSet<String>,
) -> Result<Task, RejectReason> {
    let cell = |field| columns.cell(row, field);

    let name = required(cell(CanonicalField::Name), RejectReason::MissingName)?;
    let project = required(cell(CanonicalField::Project), RejectReason::MissingProject)?;
    let owner = required(cell(CanonicalField::Owner), RejectReason::MissingOwner)?;
    let developer = required(cell(CanonicalField::Developer), RejectReason::MissingDeveloper)?;
    let start_date =
        normalize_date(cell(CanonicalField::StartDate)).ok_or(RejectReason::InvalidStartDate)?;
    let end_date =
        normalize_date(cell(CanonicalField::EndDate)).ok_or(RejectReason::InvalidEndDate)?;

    let completion = normalize_completion(cell(CanonicalField::Completion));
    let status = normalize_status(cell(CanonicalField::Status), completion);
    let actual_start_date = normalize_date(cell(CanonicalField::ActualStartDate));
    let id = unique_id(cell(CanonicalField::Id), position, seen_ids);

    Ok(Task::new(TaskDraft {
        id,
        name,
        project,
        owner,
        developer,
        start_date,
        end_date,
        actual_start_date,
        completion,
        status,
    }))
}

fn required(value: &str, reason: RejectReason) -> Result<String, RejectReason> {
    let value = value.trim();
    if value.is_empty() {
        Err(reason)
    } else {
        Ok(value.to_string())
    }
}

/// Prefer the sheet's id; fall back to, or disambiguate with, the row position.
fn unique_id(source: &str, position: usize, seen_ids: &mut HashSet<String>) -> String {
    let source = source.trim();
    let mut id = if source.is_empty() {
        position.to_string()
    } else {
        source.to_string()
    };
    while seen_ids.contains(&id) {
        id = format!("{}-{}", id, position);
    }
    seen_ids.insert(id.clone());
    id
}
