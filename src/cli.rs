use clap::Parser;
use pmo_dashboard::config::SourceArgs;

use crate::cmd::Commands;

/// PMO portfolio dashboard.
/// Tasks are read from a published spreadsheet, a local CSV export, or built-in sample data.
#[derive(Parser)]
#[command(name = "pmo", version, about = "PMO portfolio dashboard CLI")]
pub struct Cli {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Log debug output (skipped rows, source details) to stderr.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}
