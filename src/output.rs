//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output, including colored output,
//! progress tracking, and the end-of-run summary table. Log records go to
//! stderr through `tracing`; everything here is user-facing console output.

use crate::file_category::Category;
use crate::file_organizer::{RunState, RunStatistics};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Errors listed in full before the rest are summarized as a count.
const MAX_LISTED_ERRORS: usize = 10;

/// Manages all CLI output with consistent styling and formatting.
///
/// This struct provides methods for:
/// - Success messages (green with ✓)
/// - Error messages (red with ✗)
/// - Warning messages (yellow with ⚠)
/// - Info messages (cyan)
/// - Progress bars for organize runs
/// - Summary tables with run statistics
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use magicsort::output::OutputFormatter;
    /// OutputFormatter::success("All files organized");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Creates and returns a progress bar for an organize run.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use magicsort::output::OutputFormatter;
    /// let pb = OutputFormatter::create_progress_bar(100);
    /// pb.inc(1);
    /// pb.finish_with_message("Completed!");
    /// ```
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("█▓░"),
        );
        pb
    }

    /// Prints the per-category summary of a finished run, followed by
    /// folder and error counts.
    pub fn summary_table(stats: &RunStatistics) {
        Self::header("SUMMARY");

        let rows: Vec<(Category, usize)> = Category::ALL
            .iter()
            .map(|category| (*category, stats.category_count(*category)))
            .filter(|(_, count)| *count > 0)
            .collect();

        let width = rows
            .iter()
            .map(|(category, _)| category.dir_name().len())
            .max()
            .unwrap_or(0)
            .max("Category".len());

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = width
        );
        println!("{}", "-".repeat(width + 10));

        for (category, count) in &rows {
            println!(
                "{:<width$} | {} {}",
                category.dir_name(),
                count.to_string().green(),
                file_word(*count),
                width = width
            );
        }

        println!("{}", "-".repeat(width + 10));
        println!(
            "{:<width$} | {} of {} {}",
            "Total".bold(),
            stats.processed.to_string().green().bold(),
            stats.total_files,
            file_word(stats.total_files),
            width = width
        );
        println!(
            "{:<width$} | {}",
            "Folders",
            stats.folders_scanned,
            width = width
        );

        let error_count = stats.errors.len();
        let errors = if error_count == 0 {
            "0".green()
        } else {
            error_count.to_string().red()
        };
        println!("{:<width$} | {}", "Errors", errors, width = width);

        if stats.state == RunState::Stopped {
            Self::warning("Run was stopped before all files were processed");
        }
    }

    /// Lists per-file errors, capped at a fixed number of entries.
    pub fn error_list(stats: &RunStatistics) {
        if stats.errors.is_empty() {
            return;
        }

        Self::header("ERRORS");
        for failure in stats.errors.iter().take(MAX_LISTED_ERRORS) {
            eprintln!(
                "{} {}: {}",
                "✗".red(),
                failure.path.display(),
                failure.message
            );
        }
        if stats.errors.len() > MAX_LISTED_ERRORS {
            eprintln!(
                "  ... and {} more",
                stats.errors.len() - MAX_LISTED_ERRORS
            );
        }
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }
}

fn file_word(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}
