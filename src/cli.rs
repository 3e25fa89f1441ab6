//! Command-line interface module for magicsort.
//!
//! This module handles:
//! - Argument parsing
//! - Merging command-line flags over the loaded configuration
//! - Driving a background run while rendering its progress
//! - Printing the summary and writing the JSON report

use crate::config::Config;
use crate::file_organizer::{OrganizeRequest, OrganizeResult, OrganizingPipeline, RunStatistics};
use crate::job::{OrganizeProgress, Organizer};
use crate::output::OutputFormatter;
use crate::report;
use clap::{ArgAction, Parser};
use indicatif::ProgressBar;
use std::path::PathBuf;
use tracing::debug;

/// Sort files into category folders by their content, not their extension.
#[derive(Debug, Clone, Parser)]
#[command(name = "magicsort", version, about, long_about = None)]
pub struct Cli {
    /// Directory to read files from (searched recursively)
    pub source: PathBuf,

    /// Directory to copy organized files into
    pub destination: PathBuf,

    /// Copy everything into the destination root instead of category folders
    #[arg(long)]
    pub flat: bool,

    /// Keep original file names without metadata tokens
    #[arg(long)]
    pub no_metadata: bool,

    /// Show what would be copied without creating or copying anything
    #[arg(long)]
    pub dry_run: bool,

    /// Configuration file (defaults to .magicsortrc.toml, then ~/.config/magicsort/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write a JSON summary of the run to this file
    #[arg(long, value_name = "PATH")]
    pub summary: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Builds the run request; flags win over configuration defaults.
    pub fn request(&self, config: &Config) -> OrganizeRequest {
        let mut request = OrganizeRequest::new(&self.source, &self.destination);
        request.organize_by_type = config.organize.organize_by_type && !self.flat;
        request.add_metadata = config.organize.add_metadata && !self.no_metadata;
        request.dry_run = self.dry_run;
        request
    }
}

/// Runs one organize pass as described by `cli`.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use magicsort::cli::{Cli, run_cli};
///
/// let cli = Cli::parse_from(["magicsort", "/home/me/Downloads", "/home/me/Sorted", "--dry-run"]);
/// match run_cli(&cli) {
///     Ok(stats) => println!("{} files planned", stats.processed),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(cli: &Cli) -> OrganizeResult<RunStatistics> {
    let config = Config::load(cli.config.as_deref())?;
    let request = cli.request(&config);
    debug!(?request, "resolved run request");
    let pipeline = OrganizingPipeline::from_config(&config)?;

    if request.dry_run {
        OutputFormatter::dry_run_notice("No directories will be created and no files copied");
    }
    OutputFormatter::info(&format!(
        "Organizing {} into {}",
        request.source_root.display(),
        request.dest_root.display()
    ));

    let organizer = Organizer::new();
    let handle = organizer.start(pipeline, request)?;

    let mut progress_bar: Option<ProgressBar> = None;
    for event in handle.progress_rx.iter() {
        match event {
            OrganizeProgress::Scanned {
                total_files,
                folders,
            } => {
                OutputFormatter::info(&format!(
                    "Found {} files in {} folders",
                    total_files, folders
                ));
                progress_bar = Some(OutputFormatter::create_progress_bar(total_files as u64));
            }
            OrganizeProgress::File { index, name, .. } => {
                if let Some(pb) = &progress_bar {
                    pb.set_position(index as u64);
                    pb.set_message(name);
                }
            }
            OrganizeProgress::FileFailed { path, message } => {
                let line = format!("{}: {}", path.display(), message);
                match &progress_bar {
                    Some(pb) => pb.suspend(|| OutputFormatter::error(&line)),
                    None => OutputFormatter::error(&line),
                }
            }
            OrganizeProgress::Finished { .. } => {
                if let Some(pb) = &progress_bar {
                    pb.finish_and_clear();
                }
            }
        }
    }

    let stats = handle.join()?;

    OutputFormatter::summary_table(&stats);
    OutputFormatter::error_list(&stats);
    if stats.errors.is_empty() {
        let verb = if stats.dry_run { "planned" } else { "organized" };
        OutputFormatter::success(&format!("{} files {}", stats.processed, verb));
    } else {
        OutputFormatter::warning("Some files could not be organized. Please review errors above.");
    }

    if let Some(path) = &cli.summary {
        match report::write_summary(&stats, path) {
            Ok(()) => OutputFormatter::info(&format!("Summary written to {}", path.display())),
            Err(e) => OutputFormatter::warning(&e.to_string()),
        }
    }

    Ok(stats)
}
