//! JSON run summary.

use crate::file_organizer::RunStatistics;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to serialize run summary: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to write run summary to {}: {source}", path.display())]
    Write {
        path: std::path::PathBuf,
        source: io::Error,
    },
}

/// Serializes finished run statistics as pretty JSON.
pub fn render_summary(stats: &RunStatistics) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(stats)?)
}

/// Writes the run summary to `path`, replacing any previous file.
pub fn write_summary(stats: &RunStatistics, path: &Path) -> Result<(), ReportError> {
    let json = render_summary(stats)?;
    fs::write(path, json).map_err(|e| ReportError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    info!(path = %path.display(), "wrote run summary");
    Ok(())
}
