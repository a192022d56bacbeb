//! Enumerations and field types for portfolio tasks.
//!
//! This module defines the closed value sets used across the dashboard: task status,
//! risk levels, and the sort keys accepted by the task list.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Schedule health of a task or project.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Status {
    #[serde(rename = "On Track")]
    OnTrack,
    #[serde(rename = "At Risk")]
    AtRisk,
    #[serde(rename = "Delayed")]
    Delayed,
    #[serde(rename = "Completed")]
    Completed,
}

impl Status {
    /// Every status, in the order the status distribution reports them.
    pub const ALL: [Status; 4] = [
        Status::Completed,
        Status::OnTrack,
        Status::AtRisk,
        Status::Delayed,
    ];

    /// Display label as it appears in source sheets.
    pub fn label(self) -> &'static str {
        match self {
            Status::OnTrack => "On Track",
            Status::AtRisk => "At Risk",
            Status::Delayed => "Delayed",
            Status::Completed => "Completed",
        }
    }

    /// Case-insensitive exact match against the display labels.
    pub fn from_label(s: &str) -> Option<Status> {
        let s = s.trim();
        Status::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Impact or probability grade of a risk item.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl RiskLevel {
    /// Numeric weight used when ranking risks (High=3, Medium=2, Low=1).
    pub fn score(self) -> u32 {
        match self {
            RiskLevel::High => 3,
            RiskLevel::Medium => 2,
            RiskLevel::Low => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::High => "High",
            RiskLevel::Medium => "Medium",
            RiskLevel::Low => "Low",
        }
    }
}

/// Available sorting options for task lists.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SortKey {
    Start,
    End,
    Completion,
    Project,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_label_is_case_insensitive() {
        assert_eq!(Status::from_label("on track"), Some(Status::OnTrack));
        assert_eq!(Status::from_label("AT RISK"), Some(Status::AtRisk));
        assert_eq!(Status::from_label(" Delayed "), Some(Status::Delayed));
        assert_eq!(Status::from_label("completed"), Some(Status::Completed));
        assert_eq!(Status::from_label("done"), None);
        assert_eq!(Status::from_label("on-track"), None);
    }

    #[test]
    fn test_status_serializes_as_label() {
        let json = serde_json::to_string(&Status::AtRisk).unwrap();
        assert_eq!(json, "\"At Risk\"");
        let back: Status = serde_json::from_str("\"On Track\"").unwrap();
        assert_eq!(back, Status::OnTrack);
    }
}
