//! # PMO - Portfolio Dashboard CLI
//!
//! Reads a portfolio of tasks from a spreadsheet CSV export and turns it into
//! validated task records, project rollups and Gantt geometry.
//!
//! ## Pipeline
//!
//! - **Tokenizer**: quoted CSV with embedded commas, newlines and `""` escapes
//! - **Header matching**: free-form column headers mapped to canonical fields via aliases
//! - **Normalizers**: spreadsheet serial dates, ISO and `M/D/YYYY` dates, percentages, status
//! - **Builder**: strict row admission, unique ids, derived durations
//! - **Schedule**: shared timeline, bar geometry, markers, developer colors, month ruler
//!
//! ## Quick Start
//!
//! ```bash
//! # Built-in sample data
//! pmo --fixture list
//!
//! # A published sheet (URL or bare id), optionally a specific tab
//! PMO_SHEET_URL="https://docs.google.com/spreadsheets/d/<id>/edit#gid=0" pmo summary
//!
//! # A local export
//! pmo --csv tasks.csv gantt --project "Collection System v3"
//!
//! # Normalized data for another tool
//! pmo export --output portfolio.json
//! ```
//!
//! With no source flags the documented sample sheet is fetched. Set `RUST_LOG` or pass
//! `--verbose` to see skipped rows and source details on stderr.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pmo_dashboard::config::SourceConfig;
use pmo_dashboard::dashboard::{Dashboard, RefreshOutcome};

pub mod cli;
pub mod cmd;

use cli::Cli;
use cmd::*;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Commands that don't need task data
    match &cli.command {
        Commands::Completions { shell } => {
            cmd_completions(*shell);
            return;
        }
        Commands::Risks => {
            cmd_risks();
            return;
        }
        _ => {}
    }

    let source = match SourceConfig::from_args(&cli.source).into_source() {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Invalid source configuration: {}", e);
            std::process::exit(1);
        }
    };

    let mut dashboard = Dashboard::new();
    match dashboard.refresh(source.as_ref()) {
        RefreshOutcome::Applied { skipped, .. } => {
            if skipped > 0 {
                eprintln!("Note: {} row(s) skipped; run `pmo skipped` for details.", skipped);
            }
        }
        RefreshOutcome::Empty { skipped } => {
            eprintln!("No valid rows found in {} ({} skipped).", source.describe(), skipped);
        }
        RefreshOutcome::Failed(e) => {
            eprintln!("Failed to load tasks from {}: {}", source.describe(), e);
            std::process::exit(1);
        }
        RefreshOutcome::Stale => {
            eprintln!("Load from {} was superseded; no tasks applied.", source.describe());
            std::process::exit(1);
        }
    }

    match cli.command {
        Commands::Completions { .. } | Commands::Risks => unreachable!("handled above"),

        Commands::List { project, owner, sort, limit } =>
            cmd_list(&dashboard, project, owner, sort, limit),

        Commands::View { id } => cmd_view(&dashboard, id),

        Commands::Projects => cmd_projects(&dashboard),

        Commands::Gantt { project, owner, completed_fill, json } =>
            cmd_gantt(&dashboard, project, owner, completed_fill, json),

        Commands::Summary { project, owner, json } =>
            cmd_summary(&dashboard, project, owner, json),

        Commands::Export { output } => cmd_export(&dashboard, output),

        Commands::Skipped => cmd_skipped(&dashboard),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
