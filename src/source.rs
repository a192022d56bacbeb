//! Task sources.
//!
//! A `TaskSource` produces a freshly built task collection on every call. The fixture,
//! local-file, and live-sheet sources are interchangeable and chosen by configuration.

use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use reqwest::blocking::Client;
use thiserror::Error;
use tracing::{debug, info};

use crate::builder::{build_from_csv, BuildReport};

const SAMPLE_TASKS_CSV: &str = include_str!("../data/sample_tasks.csv");

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("invalid sheet locator '{0}': expected a .../spreadsheets/d/<id>/... URL or a bare sheet id")]
    InvalidLocator(String),
    #[error("invalid sheet gid '{0}': expected digits")]
    InvalidGid(String),
    #[error("sheet request to {url} failed with HTTP status {status}")]
    Http { status: u16, url: String },
    #[error("sheet request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Anything that can produce a task collection.
pub trait TaskSource {
    /// Load and normalize the full collection from scratch.
    fn load_tasks(&self) -> Result<BuildReport, SourceError>;

    /// Short human-readable description for logs.
    fn describe(&self) -> String;
}

fn sheet_url_re() -> &'static Regex {
    static SHEET_URL_RE: OnceLock<Regex> = OnceLock::new();
    SHEET_URL_RE.get_or_init(|| {
        Regex::new(r"/spreadsheets/d/([a-zA-Z0-9_-]+)").expect("valid sheet url regex")
    })
}

fn sheet_id_re() -> &'static Regex {
    static SHEET_ID_RE: OnceLock<Regex> = OnceLock::new();
    SHEET_ID_RE.get_or_init(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("valid sheet id regex"))
}

fn gid_param_re() -> &'static Regex {
    static GID_RE: OnceLock<Regex> = OnceLock::new();
    GID_RE.get_or_init(|| Regex::new(r"[?&#]gid=(\d+)").expect("valid gid regex"))
}

/// A resolved spreadsheet and optional tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetLocator {
    pub sheet_id: String,
    pub gid: Option<String>,
}

impl SheetLocator {
    /// Resolve a sharing URL or bare id. An explicit `gid` overrides one found in the URL.
    pub fn parse(input: &str, gid: Option<&str>) -> Result<Self, SourceError> {
        let input = input.trim();
        let sheet_id = if let Some(caps) = sheet_url_re().captures(input) {
            caps[1].to_string()
        } else if sheet_id_re().is_match(input) {
            input.to_string()
        } else {
            return Err(SourceError::InvalidLocator(input.to_string()));
        };

        let gid = match gid.map(str::trim).filter(|g| !g.is_empty()) {
            Some(g) if g.chars().all(|c| c.is_ascii_digit()) => Some(g.to_string()),
            Some(g) => return Err(SourceError::InvalidGid(g.to_string())),
            None => gid_param_re().captures(input).map(|caps| caps[1].to_string()),
        };

        Ok(SheetLocator { sheet_id, gid })
    }

    /// CSV export endpoint for this sheet.
    pub fn export_url(&self) -> String {
        let mut url = format!(
            "https://docs.google.com/spreadsheets/d/{}/export?format=csv",
            self.sheet_id
        );
        if let Some(gid) = &self.gid {
            url.push_str("&gid=");
            url.push_str(gid);
        }
        url
    }
}

/// Built-in sample data, parsed through the same pipeline as live data.
#[derive(Debug, Default)]
pub struct FixtureSource;

impl TaskSource for FixtureSource {
    fn load_tasks(&self) -> Result<BuildReport, SourceError> {
        Ok(build_from_csv(SAMPLE_TASKS_CSV))
    }

    fn describe(&self) -> String {
        "built-in sample data".into()
    }
}

/// A CSV export saved on disk.
#[derive(Debug)]
pub struct FileSource {
    pub path: PathBuf,
}

impl TaskSource for FileSource {
    fn load_tasks(&self) -> Result<BuildReport, SourceError> {
        let text = fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(build_from_csv(&text))
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

/// A published spreadsheet fetched over HTTP.
#[derive(Debug)]
pub struct SheetSource {
    locator: SheetLocator,
    client: Client,
}

impl SheetSource {
    pub fn new(locator: SheetLocator, timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(SheetSource { locator, client })
    }

    fn fetch_csv(&self) -> Result<String, SourceError> {
        let url = self.locator.export_url();
        debug!(%url, "fetching sheet export");
        let resp = self.client.get(&url).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Http {
                status: status.as_u16(),
                url,
            });
        }
        Ok(resp.text()?)
    }
}

impl TaskSource for SheetSource {
    fn load_tasks(&self) -> Result<BuildReport, SourceError> {
        let text = self.fetch_csv()?;
        let report = build_from_csv(&text);
        info!(
            sheet = %self.locator.sheet_id,
            admitted = report.tasks.len(),
            skipped = report.skipped.len(),
            "loaded sheet"
        );
        Ok(report)
    }

    fn describe(&self) -> String {
        match &self.locator.gid {
            Some(gid) => format!("sheet {} (gid {})", self.locator.sheet_id, gid),
            None => format!("sheet {}", self.locator.sheet_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locator_from_sharing_url() {
        let url = "https://docs.google.com/spreadsheets/d/1ird1GflQtFKbc_kVr2_RhqMmOyaRwoQd/edit?usp=sharing";
        let locator = SheetLocator::parse(url, None).unwrap();
        assert_eq!(locator.sheet_id, "1ird1GflQtFKbc_kVr2_RhqMmOyaRwoQd");
        assert_eq!(locator.gid, None);
        assert_eq!(
            locator.export_url(),
            "https://docs.google.com/spreadsheets/d/1ird1GflQtFKbc_kVr2_RhqMmOyaRwoQd/export?format=csv"
        );
    }

    #[test]
    fn test_locator_gid_from_url_and_override() {
        let url = "https://docs.google.com/spreadsheets/d/abc-123_X/edit#gid=42";
        let locator = SheetLocator::parse(url, None).unwrap();
        assert_eq!(locator.gid.as_deref(), Some("42"));
        assert!(locator.export_url().ends_with("/abc-123_X/export?format=csv&gid=42"));

        let overridden = SheetLocator::parse(url, Some("7")).unwrap();
        assert_eq!(overridden.gid.as_deref(), Some("7"));

        let blank = SheetLocator::parse(url, Some("  ")).unwrap();
        assert_eq!(blank.gid.as_deref(), Some("42"));
    }

    #[test]
    fn test_locator_bare_id() {
        let locator = SheetLocator::parse(" abc-123_X ", Some("0")).unwrap();
        assert_eq!(locator.sheet_id, "abc-123_X");
        assert_eq!(locator.gid.as_deref(), Some("0"));
    }

    #[test]
    fn test_malformed_locators_are_rejected() {
        assert!(matches!(
            SheetLocator::parse("https://example.com/not/a/sheet", None),
            Err(SourceError::InvalidLocator(_))
        ));
        assert!(matches!(SheetLocator::parse("", None), Err(SourceError::InvalidLocator(_))));
        assert!(matches!(
            SheetLocator::parse("abc", Some("tab1")),
            Err(SourceError::InvalidGid(_))
        ));
    }

    #[test]
    fn test_fixture_source_admits_sample_rows() {
        let report = FixtureSource.load_tasks().unwrap();
        assert!(!report.tasks.is_empty());
        assert_eq!(report.skipped.len(), 1);
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let source = FileSource { path: PathBuf::from("/nonexistent/pmo/tasks.csv") };
        assert!(matches!(source.load_tasks(), Err(SourceError::Io { .. })));
    }
}
