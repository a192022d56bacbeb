//! Command implementations for the CLI interface.
//!
//! Every command works on a `Dashboard` that has already been loaded from the
//! configured source. Tables go to stdout; failures go to stderr with exit status 1.

use std::fs;

use clap::Subcommand;
use clap_complete::{generate, Shell};
use serde::Serialize;

use pmo_dashboard::builder::SkippedRow;
use pmo_dashboard::dashboard::Dashboard;
use pmo_dashboard::fields::SortKey;
use pmo_dashboard::filter::{distinct, sort_tasks, TaskFilter};
use pmo_dashboard::project::Project;
use pmo_dashboard::risk::{fixture_risks, rank_risks, risk_heatmap, total_risk_exposure};
use pmo_dashboard::schedule::{project_timeline, ProjectionOptions, Timeline};
use pmo_dashboard::summary::summarize;
use pmo_dashboard::task::Task;

/// Width of the text rendering of a Gantt track.
const TRACK_WIDTH: usize = 40;

#[derive(Subcommand)]
pub enum Commands {
    /// List tasks with optional filters.
    List {
        /// Filter by project ("all" for every project).
        #[arg(long)]
        project: Option<String>,
        /// Filter by assigned PM (matches any name in the owner cell).
        #[arg(long)]
        owner: Option<String>,
        /// Sort key.
        #[arg(long, value_enum, default_value_t = SortKey::Start)]
        sort: SortKey,
        /// Limit number of rows printed.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// View a single task by ID.
    View {
        /// Task ID as shown by `list`.
        id: String,
    },

    /// Show project rollups.
    Projects,

    /// Show timeline geometry for the Gantt chart.
    Gantt {
        #[arg(long)]
        project: Option<String>,
        #[arg(long)]
        owner: Option<String>,
        /// Fill the whole bar for Completed tasks regardless of completion.
        #[arg(long)]
        completed_fill: bool,
        /// Print the geometry as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show portfolio KPIs, status distribution, workload, trend and top risks.
    Summary {
        #[arg(long)]
        project: Option<String>,
        #[arg(long)]
        owner: Option<String>,
        /// Print the summary as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the ranked risk register and per-owner impact counts.
    Risks,

    /// Export normalized tasks and project rollups as JSON.
    Export {
        /// Output file path (default: stdout).
        #[arg(long)]
        output: Option<String>,
    },

    /// List sheet rows that were rejected, with the reason.
    Skipped,

    /// Generate shell completions.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// List tasks in a table.
pub fn cmd_list(
    dashboard: &Dashboard,
    project: Option<String>,
    owner: Option<String>,
    sort: SortKey,
    limit: Option<usize>,
) {
    let filter = TaskFilter::new(project, owner);
    let mut tasks = filter.apply(dashboard.tasks());
    sort_tasks(&mut tasks, sort);
    if let Some(n) = limit {
        tasks.truncate(n);
    }
    if tasks.is_empty() {
        let projects = distinct(dashboard.tasks(), |t| t.project.as_str());
        println!("No tasks match. Projects: {}", projects.join(", "));
        return;
    }
    print_table(&tasks);
}

/// Show one task and its bar on the full timeline.
pub fn cmd_view(dashboard: &Dashboard, id: String) {
    let Some(task) = dashboard.get(&id) else {
        eprintln!("Task {} not found.", id);
        std::process::exit(1);
    };

    println!("ID:           {}", task.id);
    println!("Name:         {}", task.name);
    println!("Project:      {}", task.project);
    println!("Assigned PM:  {}", task.owner);
    println!("Developer:    {}", task.developer);
    println!("Target:       {} -> {} ({}d)", task.start_date(), task.end_date(), task.duration());
    println!(
        "Actual start: {}",
        task.actual_start_date.map(|d| d.to_string()).unwrap_or_else(|| "-".into())
    );
    println!("Completion:   {}%", task.completion);
    println!("Status:       {}", task.status);

    let Some(timeline) = project_timeline(dashboard.tasks(), ProjectionOptions::default()) else {
        return;
    };
    if let Some(bar) = timeline.bars.iter().find(|b| b.task_id == task.id) {
        println!();
        println!("Timeline:     {} -> {}", timeline.start, timeline.end);
        println!("Bar:          left {:.1}%  width {:.1}%", bar.left_percent, bar.width_percent);
        for marker in &bar.markers {
            println!("  {:<3} {:>5.1}%  {}", marker.kind.code(), marker.percent, marker.tooltip);
        }
    }
}

/// Print project rollups.
pub fn cmd_projects(dashboard: &Dashboard) {
    print_projects(dashboard.projects());
}

/// Print Gantt geometry as a text chart or JSON.
pub fn cmd_gantt(
    dashboard: &Dashboard,
    project: Option<String>,
    owner: Option<String>,
    completed_fill: bool,
    json: bool,
) {
    let filter = TaskFilter::new(project, owner);
    let tasks = filter.apply(dashboard.tasks());
    let options = ProjectionOptions {
        completed_fills_bar: completed_fill,
        ..Default::default()
    };
    let timeline = project_timeline(tasks.iter().copied(), options);

    if json {
        print_json(&timeline);
        return;
    }
    match timeline {
        Some(timeline) => print_gantt(&timeline),
        None => println!("No tasks match."),
    }
}

/// Print the portfolio summary.
pub fn cmd_summary(dashboard: &Dashboard, project: Option<String>, owner: Option<String>, json: bool) {
    let filter = TaskFilter::new(project, owner);
    let tasks = filter.apply(dashboard.tasks());
    let summary = summarize(&tasks);
    let risks = fixture_risks();

    if json {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct SummaryView<'a> {
            #[serde(flatten)]
            summary: &'a pmo_dashboard::summary::PortfolioSummary,
            top_risks: Vec<&'a pmo_dashboard::risk::RiskItem>,
            total_risk_exposure: usize,
        }
        print_json(&SummaryView {
            summary: &summary,
            top_risks: rank_risks(&risks).into_iter().take(5).collect(),
            total_risk_exposure: total_risk_exposure(dashboard.projects()),
        });
        return;
    }

    let k = &summary.kpis;
    println!("Total projects:        {}", k.total_projects);
    println!("Total tasks:           {}", k.total_tasks);
    println!("Portfolio completion:  {}%", k.portfolio_completion);
    println!("Delayed tasks:         {}", k.delayed_tasks);
    println!("Total risk exposure:   {}", total_risk_exposure(dashboard.projects()));

    println!("\n{:<12} {}", "Status", "Tasks");
    for (status, count) in &summary.status_distribution {
        println!("{:<12} {}", status.label(), count);
    }

    println!("\n{:<28} {}", "Assigned PM", "Tasks");
    for (owner, count) in &summary.tasks_by_owner {
        println!("{:<28} {}", truncate(owner, 28), count);
    }

    println!("\n{:<8} {}", "Month", "Completion");
    for point in &summary.completion_trend {
        println!("{:<8} {}%", point.month, point.completion);
    }

    println!("\nTop risks:");
    for risk in rank_risks(&risks).into_iter().take(5) {
        println!(
            "  [{}/{}] {} - {} ({})",
            risk.impact.label(),
            risk.probability.label(),
            risk.project,
            risk.risk,
            risk.owner
        );
    }
}

/// Print the risk register.
pub fn cmd_risks() {
    let risks = fixture_risks();
    println!(
        "{:<32} {:<36} {:<20} {:<7} {:<7} {}",
        "Project", "Risk", "Owner", "Impact", "Prob", "Mitigation"
    );
    for risk in rank_risks(&risks) {
        println!(
            "{:<32} {:<36} {:<20} {:<7} {:<7} {}",
            truncate(&risk.project, 32),
            truncate(&risk.risk, 36),
            truncate(&risk.owner, 20),
            risk.impact.label(),
            risk.probability.label(),
            risk.mitigation
        );
    }

    println!("\n{:<20} {:>4} {:>6} {:>4}", "Owner", "High", "Medium", "Low");
    for (owner, counts) in risk_heatmap(&risks) {
        println!(
            "{:<20} {:>4} {:>6} {:>4}",
            truncate(&owner, 20),
            counts.high,
            counts.medium,
            counts.low
        );
    }
}

/// Write the normalized collection to a file or stdout.
pub fn cmd_export(dashboard: &Dashboard, output: Option<String>) {
    #[derive(Serialize)]
    struct Export<'a> {
        tasks: &'a [Task],
        projects: &'a [Project],
        skipped: &'a [SkippedRow],
    }

    let export = Export {
        tasks: dashboard.tasks(),
        projects: dashboard.projects(),
        skipped: dashboard.skipped(),
    };
    let data = match serde_json::to_string_pretty(&export) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Failed to serialize tasks: {}", e);
            std::process::exit(1);
        }
    };

    match output {
        Some(path) => match fs::write(&path, data) {
            Ok(_) => println!("Exported {} task(s) to {}", export.tasks.len(), path),
            Err(e) => {
                eprintln!("Failed to write {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => println!("{}", data),
    }
}

/// Print rows rejected by the last load.
pub fn cmd_skipped(dashboard: &Dashboard) {
    let skipped = dashboard.skipped();
    if skipped.is_empty() {
        println!("No rows were skipped.");
        return;
    }
    println!("{:<6} {}", "Row", "Reason");
    for row in skipped {
        println!("{:<6} {}", row.row, row.reason);
    }
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(data) => println!("{}", data),
        Err(e) => {
            eprintln!("Failed to serialize output: {}", e);
            std::process::exit(1);
        }
    }
}

/// Print tasks in a formatted table.
pub fn print_table(tasks: &[&Task]) {
    println!(
        "{:<8} {:<11} {:>4} {:<10} {:<10} {:<20} {:<18} {}",
        "ID", "Status", "Done", "Start", "End", "Project", "Developer", "Name"
    );
    for t in tasks {
        println!(
            "{:<8} {:<11} {:>3}% {:<10} {:<10} {:<20} {:<18} {}",
            truncate(&t.id, 8),
            t.status.label(),
            t.completion,
            t.start_date(),
            t.end_date(),
            truncate(&t.project, 20),
            truncate(&t.developer, 18),
            t.name
        );
    }
}

fn print_projects(projects: &[Project]) {
    if projects.is_empty() {
        println!("No projects loaded.");
        return;
    }
    println!(
        "{:<4} {:<32} {:<11} {:>5} {:>6} {:>5}",
        "ID", "Project", "Status", "Done", "Tasks", "Open"
    );
    for p in projects {
        println!(
            "{:<4} {:<32} {:<11} {:>4}% {:>6} {:>5}",
            p.id,
            truncate(&p.name, 32),
            p.status.label(),
            p.completion,
            p.task_count,
            p.risk_exposure
        );
    }
}

fn print_gantt(timeline: &Timeline) {
    let months: Vec<&str> = timeline.months.iter().map(|m| m.label.as_str()).collect();
    println!(
        "Timeline {} -> {} ({} days): {}",
        timeline.start,
        timeline.end,
        timeline.total_days,
        months.join(" | ")
    );
    for bar in &timeline.bars {
        println!(
            "{:<8} {:<20} |{}| {:<18} {:>5.1}% +{:>5.1}%",
            truncate(&bar.task_id, 8),
            truncate(&bar.project, 20),
            render_track(bar.left_percent, bar.width_percent, bar.fill_percent),
            truncate(&bar.developer, 18),
            bar.left_percent,
            bar.width_percent
        );
    }
}

/// Text track: `#` for the completed part of the bar, `=` for the rest.
fn render_track(left: f64, width: f64, fill: f64) -> String {
    let cell = |percent: f64| ((percent.clamp(0.0, 100.0) / 100.0) * TRACK_WIDTH as f64).round() as usize;
    let start = cell(left);
    let end = cell(left + width).max(start + 1).min(TRACK_WIDTH);
    let start = start.min(end.saturating_sub(1));
    let filled = start + ((end - start) as f64 * fill / 100.0).round() as usize;

    (0..TRACK_WIDTH)
        .map(|i| {
            if i < start || i >= end {
                ' '
            } else if i < filled {
                '#'
            } else {
                '='
            }
        })
        .collect()
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}
