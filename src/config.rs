//! Source configuration resolved from CLI flags and `PMO_*` environment variables.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;

use crate::source::{FileSource, FixtureSource, SheetLocator, SheetSource, SourceError, TaskSource};

/// Sample sheet used when nothing else is configured.
pub const DEFAULT_SHEET_URL: &str =
    "https://docs.google.com/spreadsheets/d/1ird1GflQtFKbc_kVr2_RhqMmOyaRwoQd/edit?usp=sharing";

/// Where task data comes from.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Read tasks from a local CSV file instead of a sheet.
    #[arg(long, global = true)]
    pub csv: Option<PathBuf>,

    /// Use the built-in sample tasks.
    #[arg(long, global = true)]
    pub fixture: bool,

    /// Sheet sharing URL or bare sheet id.
    #[arg(long, global = true, env = "PMO_SHEET_URL")]
    pub sheet: Option<String>,

    /// Sheet id, used when no sheet URL is given.
    #[arg(long, global = true, env = "PMO_SHEET_ID")]
    pub sheet_id: Option<String>,

    /// Sheet tab id; defaults to the tab named in the URL, else the first tab.
    #[arg(long, global = true, env = "PMO_SHEET_GID")]
    pub gid: Option<String>,

    /// Seconds to wait for the sheet export before giving up.
    #[arg(long, global = true, env = "PMO_FETCH_TIMEOUT_SECS", default_value_t = 15)]
    pub timeout_secs: u64,
}

/// Which source to load from, after precedence rules are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceConfig {
    File(PathBuf),
    Fixture,
    Sheet {
        locator: String,
        gid: Option<String>,
        timeout: Duration,
    },
}

impl SourceConfig {
    /// `--csv` beats `--fixture`, which beats a sheet URL, then a sheet id, then the sample sheet.
    pub fn from_args(args: &SourceArgs) -> Self {
        if let Some(path) = &args.csv {
            return SourceConfig::File(path.clone());
        }
        if args.fixture {
            return SourceConfig::Fixture;
        }
        let non_empty = |v: &Option<String>| v.as_ref().filter(|s| !s.trim().is_empty()).cloned();
        let locator = non_empty(&args.sheet)
            .or_else(|| non_empty(&args.sheet_id))
            .unwrap_or_else(|| DEFAULT_SHEET_URL.to_string());
        SourceConfig::Sheet {
            locator,
            gid: non_empty(&args.gid),
            timeout: Duration::from_secs(args.timeout_secs.max(1)),
        }
    }

    /// Build the configured source. Locator errors surface here, before any request.
    pub fn into_source(self) -> Result<Box<dyn TaskSource>, SourceError> {
        match self {
            SourceConfig::File(path) => Ok(Box::new(FileSource { path })),
            SourceConfig::Fixture => Ok(Box::new(FixtureSource)),
            SourceConfig::Sheet { locator, gid, timeout } => {
                let locator = SheetLocator::parse(&locator, gid.as_deref())?;
                Ok(Box::new(SheetSource::new(locator, timeout)?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_sample_sheet() {
        let config = SourceConfig::from_args(&SourceArgs { timeout_secs: 15, ..Default::default() });
        assert_eq!(
            config,
            SourceConfig::Sheet {
                locator: DEFAULT_SHEET_URL.to_string(),
                gid: None,
                timeout: Duration::from_secs(15),
            }
        );
    }

    #[test]
    fn test_precedence() {
        let args = SourceArgs {
            csv: Some(PathBuf::from("tasks.csv")),
            fixture: true,
            sheet: Some("abc".into()),
            ..Default::default()
        };
        assert_eq!(SourceConfig::from_args(&args), SourceConfig::File(PathBuf::from("tasks.csv")));

        let args = SourceArgs { fixture: true, sheet: Some("abc".into()), ..Default::default() };
        assert_eq!(SourceConfig::from_args(&args), SourceConfig::Fixture);

        let args = SourceArgs {
            sheet: Some(" ".into()),
            sheet_id: Some("sheet-id".into()),
            gid: Some("9".into()),
            timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(
            SourceConfig::from_args(&args),
            SourceConfig::Sheet {
                locator: "sheet-id".into(),
                gid: Some("9".into()),
                timeout: Duration::from_secs(1),
            }
        );
    }

    #[test]
    fn test_bad_locator_fails_before_fetch() {
        let config = SourceConfig::Sheet {
            locator: "https://example.com/x".into(),
            gid: None,
            timeout: Duration::from_secs(1),
        };
        assert!(matches!(config.into_source(), Err(SourceError::InvalidLocator(_))));
    }
}
