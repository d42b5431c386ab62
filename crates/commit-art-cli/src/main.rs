//! commit-art - paint a contribution heatmap with dated empty commits
//!
//! ```text
//! commit-art <COORDINATES_FILE> <NEW_DIRECTORY> [REMOTE_URL]
//! ```
//!
//! Reads `column,row` pairs, creates a fresh git repository at
//! `NEW_DIRECTORY` with one empty commit per unique cell, renames the branch
//! and optionally pushes it to `REMOTE_URL`.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use tracing::{info, Level};

use commit_art_core::{
    ingest_file, plan_commits, run_pipeline, FailurePolicy, GitCli, GridConfig, LineDiagnostic,
    PlannedCommit, SynthConfig, DEFAULT_BRANCH_NAME, DEFAULT_COMMIT_MESSAGE, DEFAULT_GRID_WIDTH,
    DEFAULT_REMOTE_NAME,
};

#[derive(Parser, Debug)]
#[command(name = "commit-art")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Draw on a contribution heatmap with dated empty commits", long_about = None)]
struct Cli {
    /// File with one `column,row` coordinate per line
    coordinates_file: PathBuf,

    /// Directory for the new repository (must not exist)
    new_directory: PathBuf,

    /// Remote URL to push the finished branch to
    remote_url: Option<String>,

    /// Number of week columns on the grid
    #[arg(long, default_value_t = DEFAULT_GRID_WIDTH)]
    width: u32,

    /// Name given to the branch holding the generated history
    #[arg(long, default_value = DEFAULT_BRANCH_NAME)]
    branch: String,

    /// Alias registered for REMOTE_URL
    #[arg(long, default_value = DEFAULT_REMOTE_NAME)]
    remote_name: String,

    /// Commit message for every generated commit
    #[arg(short, long, default_value = DEFAULT_COMMIT_MESSAGE)]
    message: String,

    /// Stop at the first failed git command
    #[arg(long)]
    strict: bool,

    /// Print the commit plan without creating anything
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines (and a JSON plan with --dry-run)
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn synth_config(&self) -> Result<SynthConfig> {
        Ok(SynthConfig {
            grid: GridConfig::new(self.width)?,
            branch_name: self.branch.clone(),
            remote_name: self.remote_name.clone(),
            message: self.message.clone(),
            policy: if self.strict {
                FailurePolicy::Abort
            } else {
                FailurePolicy::Continue
            },
        })
    }
}

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            // Usage errors exit 1, not clap's default 2.
            let _ = e.print();
            std::process::exit(1);
        }
    };

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    commit_art_core::init_tracing(cli.json, level);

    cmd_run(&cli)
}

fn cmd_run(cli: &Cli) -> Result<()> {
    let config = cli.synth_config()?;

    println!(
        "Retrieving coordinates from file: {}",
        cli.coordinates_file.display()
    );
    let ingestion = ingest_file(&cli.coordinates_file, &config.grid).with_context(|| {
        format!(
            "Failed to read coordinates file: {}",
            cli.coordinates_file.display()
        )
    })?;
    if !ingestion.diagnostics.is_empty() {
        // Shown regardless of RUST_LOG.
        eprint!("{}", render_diagnostics(&ingestion.diagnostics));
        info!(skipped = ingestion.diagnostics.len(), "invalid lines skipped");
    }

    // One clock reading for the whole run.
    let now = chrono::Local::now().naive_local();

    if cli.dry_run {
        let planned = plan_commits(&ingestion.plan, now, &config.grid);
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&planned)?);
        } else {
            print!("{}", render_plan_text(&planned));
        }
        return Ok(());
    }

    println!("Creating git directory at: {}", cli.new_directory.display());
    println!("Creating {} commits", ingestion.plan.len());
    if let Some(url) = &cli.remote_url {
        println!("Pushing to remote: {url}");
    }

    let report = run_pipeline(
        &GitCli::new(),
        &config,
        &ingestion.plan,
        &cli.new_directory,
        cli.remote_url.as_deref(),
        now,
    )?;

    if !report.is_clean() {
        for failure in &report.failures {
            eprintln!("  - {}: {}", failure.step, failure.reason);
        }
        bail!(
            "{} git step(s) failed; {} of {} commits created",
            report.failures.len(),
            report.commits_created,
            ingestion.plan.len()
        );
    }

    println!("Done");
    Ok(())
}

fn render_diagnostics(diagnostics: &[LineDiagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| format!("Skipping {d}\n"))
        .collect()
}

fn render_plan_text(planned: &[PlannedCommit]) -> String {
    planned
        .iter()
        .map(|p| format!("{} -> {}\n", p.coordinate, p.date))
        .collect()
}
