//! Header matching: maps human-authored column headers to canonical task fields.
//!
//! Header cells and aliases are compared after normalization (trim, lowercase,
//! underscores/hyphens to spaces, collapsed whitespace). Matching is exact after
//! normalization and the first matching column wins.

/// The task fields a sheet column can feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    Id,
    Name,
    Project,
    Owner,
    Developer,
    StartDate,
    ActualStartDate,
    EndDate,
    Completion,
    Status,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 10] = [
        CanonicalField::Id,
        CanonicalField::Name,
        CanonicalField::Project,
        CanonicalField::Owner,
        CanonicalField::Developer,
        CanonicalField::StartDate,
        CanonicalField::ActualStartDate,
        CanonicalField::EndDate,
        CanonicalField::Completion,
        CanonicalField::Status,
    ];

    /// Accepted header spellings for this field.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            CanonicalField::Id => &["id", "task id", "taskid"],
            CanonicalField::Name => &[
                "name",
                "task",
                "task name",
                "title",
                "modules/features/improvements",
            ],
            CanonicalField::Project => &["project", "project name", "system"],
            CanonicalField::Owner => &["assigned pm", "owner", "pm"],
            CanonicalField::Developer => &["developer", "assignee", "resource"],
            CanonicalField::StartDate => &["start date", "target start", "planned start", "start"],
            CanonicalField::ActualStartDate => &["actual start", "actual start date"],
            CanonicalField::EndDate => &[
                "end date",
                "target end",
                "planned end",
                "finish date",
                "end",
            ],
            CanonicalField::Completion => &["completion", "progress", "percent complete", "% complete"],
            CanonicalField::Status => &["status"],
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// Normalize a header cell or alias for comparison.
pub fn normalize_header(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Column position of each canonical field in one sheet's header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    columns: [Option<usize>; CanonicalField::ALL.len()],
}

impl ColumnMap {
    /// Resolve every canonical field against the header row.
    pub fn resolve(header: &[String]) -> Self {
        let normalized: Vec<String> = header.iter().map(|h| normalize_header(h)).collect();
        let mut columns = [None; CanonicalField::ALL.len()];
        for field in CanonicalField::ALL {
            let aliases: Vec<String> = field.aliases().iter().map(|a| normalize_header(a)).collect();
            columns[field.slot()] = normalized.iter().position(|h| aliases.contains(h));
        }
        ColumnMap { columns }
    }

    /// Column index of a field, or `None` when the sheet has no such column.
    pub fn index(&self, field: CanonicalField) -> Option<usize> {
        self.columns[field.slot()]
    }

    /// The raw cell for a field in a data row; empty when the column is absent or the row is short.
    pub fn cell<'a>(&self, row: &'a [String], field: CanonicalField) -> &'a str {
        self.index(field)
            .and_then(|i| row.get(i))
            .map(|s| s.as_str())
            .unwrap_or("")
    }

    /// Fields with no matching column.
    pub fn missing(&self) -> Vec<CanonicalField> {
        CanonicalField::ALL
            .into_iter()
            .filter(|f| self.index(*f).is_none())
            .collect()
    }
}
