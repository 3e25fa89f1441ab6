//! Organizing pipeline: walk, classify, probe, plan and copy.
//!
//! This module drives one organize run over a source tree. Files are copied
//! into the destination, never moved or deleted. Every per-file failure is
//! recorded in [`RunStatistics`] and the run continues; only problems with
//! the run itself (bad roots, bad configuration) surface as [`OrganizeError`].

use crate::classifier::Classifier;
use crate::config::{CompiledFilters, Config, ConfigError};
use crate::file_category::{Category, DetectionMethod};
use crate::job::{CancellationToken, OrganizeProgress};
use crate::metadata::{ContentProbe, MetadataProbe};
use crate::path_builder::PathBuilder;
use chrono::{DateTime, Utc};
use filetime::FileTime;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Errors that stop a run before any file is touched.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// The source root is missing, not a directory, or unreadable.
    #[error("Invalid source directory {}: {reason}", path.display())]
    InvalidSourceRoot { path: PathBuf, reason: String },
    /// The destination root cannot be created.
    #[error("Cannot create destination directory {}: {source}", path.display())]
    DestinationNotCreatable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Configuration could not be loaded or compiled.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Another run is still active on this organizer.
    #[error("An organize run is already in progress")]
    AlreadyRunning,
    /// The background worker could not be started or died.
    #[error("Organizer worker failed: {0}")]
    Worker(String),
}

/// Result type for organize runs.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Failures affecting a single file. Recorded, never fatal.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("Failed to create directory {}: {source}", path.display())]
    DirectoryCreation { path: PathBuf, source: io::Error },
    #[error("Failed to copy {} to {}: {source}", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
    #[error("Failed to preserve timestamps on {}: {source}", path.display())]
    Timestamps { path: PathBuf, source: io::Error },
}

/// What to organize and how.
#[derive(Debug, Clone)]
pub struct OrganizeRequest {
    pub source_root: PathBuf,
    pub dest_root: PathBuf,
    /// Place files in per-category subfolders.
    pub organize_by_type: bool,
    /// Append a metadata token to destination names.
    pub add_metadata: bool,
    /// Plan every destination but create and copy nothing.
    pub dry_run: bool,
}

impl OrganizeRequest {
    /// A request with the default options: category folders and metadata on.
    pub fn new(source_root: impl Into<PathBuf>, dest_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            dest_root: dest_root.into(),
            organize_by_type: true,
            add_metadata: true,
            dry_run: false,
        }
    }
}

/// Where a run is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Idle,
    Scanning,
    Processing { index: usize, total: usize },
    Completed,
    Stopped,
}

/// A file that could not be organized.
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// One processed (or, in a dry run, planned) file.
#[derive(Debug, Clone, Serialize)]
pub struct CopyRecord {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub category: Category,
    pub format: String,
    pub method: DetectionMethod,
    /// A `_{n}` suffix was added to avoid a collision.
    pub suffixed: bool,
}

/// Everything a run produced. Owned by the run, handed over when it ends.
#[derive(Debug, Clone, Serialize)]
pub struct RunStatistics {
    pub source_root: PathBuf,
    pub dest_root: PathBuf,
    pub dry_run: bool,
    pub total_files: usize,
    pub processed: usize,
    pub folders_scanned: usize,
    pub categories: BTreeMap<Category, usize>,
    pub errors: Vec<FileFailure>,
    pub copies: Vec<CopyRecord>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub state: RunState,
}

impl RunStatistics {
    fn new(request: &OrganizeRequest) -> Self {
        Self {
            source_root: request.source_root.clone(),
            dest_root: request.dest_root.clone(),
            dry_run: request.dry_run,
            total_files: 0,
            processed: 0,
            folders_scanned: 0,
            categories: BTreeMap::new(),
            errors: Vec::new(),
            copies: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
            state: RunState::Idle,
        }
    }

    /// Number of processed files in `category`.
    pub fn category_count(&self, category: Category) -> usize {
        self.categories.get(&category).copied().unwrap_or(0)
    }

    fn record_failure(&mut self, path: &Path, message: String) {
        self.errors.push(FileFailure {
            path: path.to_path_buf(),
            message,
            timestamp: Utc::now(),
        });
    }

    fn finish(&mut self, state: RunState) {
        self.state = state;
        self.finished_at = Some(Utc::now());
    }
}

/// Result of walking the source tree.
#[derive(Debug, Default)]
struct ScanOutcome {
    files: Vec<PathBuf>,
    folders: usize,
    failures: Vec<(PathBuf, String)>,
}

/// Classifier, metadata probe and filters wired together for runs.
pub struct OrganizingPipeline {
    classifier: Classifier,
    probe: Box<dyn MetadataProbe>,
    filters: CompiledFilters,
}

impl OrganizingPipeline {
    pub fn new(
        classifier: Classifier,
        probe: Box<dyn MetadataProbe>,
        filters: CompiledFilters,
    ) -> Self {
        Self {
            classifier,
            probe,
            filters,
        }
    }

    /// Builds a pipeline with the configured extension table and filters.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::new(
            Classifier::new(config.build_mapper()?),
            Box::new(ContentProbe),
            config.compile_filters()?,
        ))
    }

    /// Runs one organize pass.
    ///
    /// `progress` receives a `Scanned` event once the tree is walked, a
    /// `File` event after each file (1-based index) and a `FileFailed` event
    /// for each recorded failure. `cancel` is polled before every file.
    ///
    /// # Errors
    ///
    /// Returns an error only when the source or destination root is unusable;
    /// in that case nothing has been read or written.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use magicsort::file_organizer::{OrganizeRequest, OrganizingPipeline};
    /// use magicsort::job::CancellationToken;
    ///
    /// let pipeline = OrganizingPipeline::default();
    /// let request = OrganizeRequest::new("/home/me/Downloads", "/home/me/Sorted");
    /// let stats = pipeline
    ///     .run(&request, &CancellationToken::new(), &mut |_| {})
    ///     .unwrap();
    /// println!("{} of {} files organized", stats.processed, stats.total_files);
    /// ```
    pub fn run(
        &self,
        request: &OrganizeRequest,
        cancel: &CancellationToken,
        progress: &mut dyn FnMut(OrganizeProgress),
    ) -> OrganizeResult<RunStatistics> {
        let mut stats = RunStatistics::new(request);
        validate_roots(request)?;

        info!(
            source = %request.source_root.display(),
            destination = %request.dest_root.display(),
            organize_by_type = request.organize_by_type,
            add_metadata = request.add_metadata,
            dry_run = request.dry_run,
            "starting organize run"
        );

        stats.state = RunState::Scanning;
        let scan = self.scan(request);
        stats.total_files = scan.files.len();
        stats.folders_scanned = scan.folders;
        for (path, message) in scan.failures {
            warn!(path = %path.display(), "scan error: {}", message);
            progress(OrganizeProgress::FileFailed {
                path: path.clone(),
                message: message.clone(),
            });
            stats.record_failure(&path, message);
        }
        info!(
            files = stats.total_files,
            folders = stats.folders_scanned,
            "scan complete"
        );
        progress(OrganizeProgress::Scanned {
            total_files: stats.total_files,
            folders: stats.folders_scanned,
        });

        let mut builder = if request.dry_run {
            PathBuilder::planning_only()
        } else {
            PathBuilder::new()
        };
        let total = scan.files.len();

        for (position, path) in scan.files.iter().enumerate() {
            if cancel.is_cancelled() {
                info!(
                    processed = stats.processed,
                    total, "organize run stopped"
                );
                stats.finish(RunState::Stopped);
                return Ok(stats);
            }

            let index = position + 1;
            stats.state = RunState::Processing { index, total };

            match self.process_file(path, request, &mut builder) {
                Ok(record) => {
                    stats.processed += 1;
                    *stats.categories.entry(record.category).or_insert(0) += 1;
                    stats.copies.push(record);
                }
                Err(e) => {
                    let message = e.to_string();
                    warn!(file = %path.display(), "{}", message);
                    progress(OrganizeProgress::FileFailed {
                        path: path.clone(),
                        message: message.clone(),
                    });
                    stats.record_failure(path, message);
                }
            }

            progress(OrganizeProgress::File {
                index,
                total,
                name: display_name(path),
            });
        }

        stats.finish(RunState::Completed);
        info!(
            processed = stats.processed,
            total = stats.total_files,
            errors = stats.errors.len(),
            "organize run complete"
        );
        Ok(stats)
    }

    /// Enumerates regular files under the source root in a stable order.
    ///
    /// Symlinks are not followed. When the destination lies inside the
    /// source tree it is skipped so earlier output is never re-organized.
    fn scan(&self, request: &OrganizeRequest) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();
        let mut folders = BTreeSet::new();
        let dest_canonical = fs::canonicalize(&request.dest_root).ok();

        let walker = WalkDir::new(&request.source_root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !entry.file_type().is_dir()
                    || dest_canonical.as_deref().is_none_or(|dest| {
                        fs::canonicalize(entry.path()).map_or(true, |dir| dir.as_path() != dest)
                    })
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| request.source_root.clone());
                    outcome.failures.push((path, e.to_string()));
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(&request.source_root)
                .unwrap_or(entry.path());
            if !self.filters.should_include(relative) {
                debug!(file = %relative.display(), "excluded by filters");
                continue;
            }

            if let Some(parent) = entry.path().parent() {
                folders.insert(parent.to_path_buf());
            }
            outcome.files.push(entry.into_path());
        }

        outcome.folders = folders.len();
        outcome
    }

    fn process_file(
        &self,
        path: &Path,
        request: &OrganizeRequest,
        builder: &mut PathBuilder,
    ) -> Result<CopyRecord, FileError> {
        let classification = self.classifier.classify(path);

        let token = request
            .add_metadata
            .then(|| self.probe.probe(path, &classification));

        let plan = builder.build(
            path,
            &classification,
            token.as_deref(),
            &request.dest_root,
            request.organize_by_type,
        )?;
        debug!(
            file = %path.display(),
            destination = %plan.path.display(),
            suffixed = plan.suffixed,
            "generated destination"
        );

        if !request.dry_run {
            copy_file(path, &plan.path)?;
        }

        Ok(CopyRecord {
            source: path.to_path_buf(),
            destination: plan.path,
            category: classification.category,
            format: classification.format,
            method: classification.method,
            suffixed: plan.suffixed,
        })
    }
}

impl Default for OrganizingPipeline {
    fn default() -> Self {
        Self::new(
            Classifier::default(),
            Box::new(ContentProbe),
            CompiledFilters::default(),
        )
    }
}

fn validate_roots(request: &OrganizeRequest) -> OrganizeResult<()> {
    let source = &request.source_root;
    let invalid = |reason: String| OrganizeError::InvalidSourceRoot {
        path: source.clone(),
        reason,
    };

    let metadata = fs::metadata(source).map_err(|e| invalid(e.to_string()))?;
    if !metadata.is_dir() {
        return Err(invalid("not a directory".to_string()));
    }
    fs::read_dir(source).map_err(|e| invalid(e.to_string()))?;

    let dest = &request.dest_root;
    let result = if request.dry_run {
        check_creatable(dest)
    } else {
        fs::create_dir_all(dest)
    };
    result.map_err(|e| OrganizeError::DestinationNotCreatable {
        path: dest.clone(),
        source: e,
    })
}

/// Succeeds if `create_dir_all(dest)` could: the nearest existing ancestor
/// of `dest` must be a directory.
fn check_creatable(dest: &Path) -> io::Result<()> {
    for ancestor in dest.ancestors() {
        let ancestor = if ancestor.as_os_str().is_empty() {
            Path::new(".")
        } else {
            ancestor
        };
        match fs::metadata(ancestor) {
            Ok(metadata) if metadata.is_dir() => return Ok(()),
            Ok(_) => {
                return Err(io::Error::new(
                    io::ErrorKind::NotADirectory,
                    format!("{} is not a directory", ancestor.display()),
                ));
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Copies `from` to `to` byte for byte, keeping permissions and timestamps.
///
/// `to` must not exist. On failure nothing is left behind at `to`.
pub fn copy_file(from: &Path, to: &Path) -> Result<u64, FileError> {
    let copy_error = |source: io::Error| FileError::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    let mut reader = File::open(from).map_err(copy_error)?;
    let metadata = reader.metadata().map_err(copy_error)?;
    let mut writer = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(to)
        .map_err(copy_error)?;

    let copied = io::copy(&mut reader, &mut writer).and_then(|bytes| {
        writer.sync_all()?;
        Ok(bytes)
    });
    drop(writer);

    let bytes = match copied {
        Ok(bytes) => bytes,
        Err(e) => {
            let _ = fs::remove_file(to);
            return Err(copy_error(e));
        }
    };

    if let Err(e) = preserve_metadata(&metadata, to) {
        let _ = fs::remove_file(to);
        return Err(FileError::Timestamps {
            path: to.to_path_buf(),
            source: e,
        });
    }

    Ok(bytes)
}

fn preserve_metadata(metadata: &fs::Metadata, to: &Path) -> io::Result<()> {
    let atime = FileTime::from_last_access_time(metadata);
    let mtime = FileTime::from_last_modification_time(metadata);
    filetime::set_file_times(to, atime, mtime)?;
    fs::set_permissions(to, metadata.permissions())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const PNG_HEADER: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    fn run(request: &OrganizeRequest) -> RunStatistics {
        OrganizingPipeline::default()
            .run(request, &CancellationToken::new(), &mut |_| {})
            .expect("Run failed")
    }

    #[test]
    fn test_copy_file_preserves_content_and_mtime() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let from = temp_dir.path().join("from.bin");
        let to = temp_dir.path().join("to.bin");
        fs::write(&from, b"payload").expect("Failed to write test file");
        let mtime = FileTime::from_unix_time(1_600_000_000, 0);
        filetime::set_file_mtime(&from, mtime).expect("Failed to set mtime");

        let bytes = copy_file(&from, &to).expect("Copy failed");

        assert_eq!(bytes, 7);
        assert_eq!(fs::read(&to).unwrap(), b"payload");
        let copied = fs::metadata(&to).unwrap();
        assert_eq!(FileTime::from_last_modification_time(&copied), mtime);
        assert!(from.exists());
    }

    #[test]
    fn test_copy_file_never_overwrites() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let from = temp_dir.path().join("from.txt");
        let to = temp_dir.path().join("to.txt");
        fs::write(&from, "new").expect("Failed to write test file");
        fs::write(&to, "old").expect("Failed to write test file");

        let result = copy_file(&from, &to);

        assert!(matches!(result, Err(FileError::Copy { .. })));
        assert_eq!(fs::read_to_string(&to).unwrap(), "old");
    }

    #[test]
    fn test_run_copies_and_counts() {
        let source = TempDir::new().expect("Failed to create temp directory");
        let dest = TempDir::new().expect("Failed to create temp directory");
        fs::create_dir(source.path().join("nested")).unwrap();
        fs::write(source.path().join("notes.txt"), "a\nb\n").unwrap();
        fs::write(source.path().join("nested").join("pic"), PNG_HEADER).unwrap();
        fs::write(source.path().join("nested").join("script.rs"), "fn main() {}").unwrap();

        let mut request = OrganizeRequest::new(source.path(), dest.path());
        request.add_metadata = false;
        let stats = run(&request);

        assert_eq!(stats.state, RunState::Completed);
        assert_eq!(stats.total_files, 3);
        assert_eq!(stats.processed, 3);
        assert_eq!(stats.folders_scanned, 2);
        assert_eq!(stats.category_count(Category::Documents), 1);
        assert_eq!(stats.category_count(Category::Images), 1);
        assert_eq!(stats.category_count(Category::Other), 1);
        assert!(stats.errors.is_empty());
        assert!(stats.finished_at.is_some());

        assert!(dest.path().join("Documents").join("notes.txt").exists());
        assert!(dest.path().join("Images").join("pic.png").exists());
        assert!(dest.path().join("Other").join("script.rs").exists());
        assert!(source.path().join("notes.txt").exists());
    }

    #[test]
    fn test_invalid_source_is_fatal() {
        let dest = TempDir::new().expect("Failed to create temp directory");
        let request = OrganizeRequest::new(dest.path().join("missing"), dest.path().join("out"));

        let result =
            OrganizingPipeline::default().run(&request, &CancellationToken::new(), &mut |_| {});

        assert!(matches!(
            result,
            Err(OrganizeError::InvalidSourceRoot { .. })
        ));
        assert!(!dest.path().join("out").exists());
    }

    #[test]
    fn test_source_file_is_not_a_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file = temp_dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        let request = OrganizeRequest::new(&file, temp_dir.path().join("out"));
        let result =
            OrganizingPipeline::default().run(&request, &CancellationToken::new(), &mut |_| {});
        assert!(matches!(
            result,
            Err(OrganizeError::InvalidSourceRoot { .. })
        ));
    }

    #[test]
    fn test_destination_not_creatable() {
        let source = TempDir::new().expect("Failed to create temp directory");
        let blocker = source.path().join("blocker");
        fs::write(&blocker, "x").unwrap();

        let request = OrganizeRequest::new(source.path(), blocker.join("out"));
        let result =
            OrganizingPipeline::default().run(&request, &CancellationToken::new(), &mut |_| {});
        assert!(matches!(
            result,
            Err(OrganizeError::DestinationNotCreatable { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_file_name_is_copied_verbatim() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let source = TempDir::new().expect("Failed to create temp directory");
        let dest = TempDir::new().expect("Failed to create temp directory");
        fs::write(source.path().join(OsStr::from_bytes(b"caf\xE9.txt")), "one\n").unwrap();

        let stats = run(&OrganizeRequest::new(source.path(), dest.path()));

        assert_eq!(stats.processed, 1);
        let copied = dest
            .path()
            .join("Documents")
            .join(OsStr::from_bytes(b"caf\xE9_1lines.txt"));
        assert_eq!(fs::read_to_string(copied).unwrap(), "one\n");
    }

    #[test]
    fn test_dry_run_rejects_destination_under_a_file() {
        let source = TempDir::new().expect("Failed to create temp directory");
        let blocker = source.path().join("blocker");
        fs::write(&blocker, "x").unwrap();

        for dest in [blocker.clone(), blocker.join("out"), blocker.join("a").join("b")] {
            let mut request = OrganizeRequest::new(source.path(), &dest);
            request.dry_run = true;
            let result =
                OrganizingPipeline::default().run(&request, &CancellationToken::new(), &mut |_| {});
            assert!(
                matches!(result, Err(OrganizeError::DestinationNotCreatable { .. })),
                "dry run accepted {}",
                dest.display()
            );
        }
    }

    #[test]
    fn test_dry_run_accepts_missing_nested_destination() {
        let source = TempDir::new().expect("Failed to create temp directory");
        let dest_parent = TempDir::new().expect("Failed to create temp directory");
        let dest = dest_parent.path().join("a").join("b").join("sorted");
        fs::write(source.path().join("x.txt"), "one").unwrap();

        let mut request = OrganizeRequest::new(source.path(), &dest);
        request.dry_run = true;
        let stats = run(&request);

        assert_eq!(stats.processed, 1);
        assert!(!dest_parent.path().join("a").exists());
    }

    #[test]
    fn test_per_file_failure_is_recorded_and_run_continues() {
        let source = TempDir::new().expect("Failed to create temp directory");
        let dest = TempDir::new().expect("Failed to create temp directory");
        fs::write(source.path().join("a.txt"), "text").unwrap();
        fs::write(source.path().join("b.png"), PNG_HEADER).unwrap();
        // A file squatting on the category folder name.
        fs::write(dest.path().join("Images"), "not a folder").unwrap();

        let mut request = OrganizeRequest::new(source.path(), dest.path());
        request.add_metadata = false;
        let mut failures = 0;
        let stats = OrganizingPipeline::default()
            .run(&request, &CancellationToken::new(), &mut |event| {
                if matches!(event, OrganizeProgress::FileFailed { .. }) {
                    failures += 1;
                }
            })
            .expect("Run failed");

        assert_eq!(stats.state, RunState::Completed);
        assert_eq!(stats.total_files, 2);
        assert_eq!(stats.processed, 1);
        assert_eq!(stats.errors.len(), 1);
        assert!(stats.errors[0].path.ends_with("b.png"));
        assert_eq!(failures, 1);
        assert!(dest.path().join("Documents").join("a.txt").exists());
    }

    #[test]
    fn test_progress_reports_every_file_in_order() {
        let source = TempDir::new().expect("Failed to create temp directory");
        let dest = TempDir::new().expect("Failed to create temp directory");
        for name in ["c.txt", "a.txt", "b.txt"] {
            fs::write(source.path().join(name), name).unwrap();
        }

        let mut seen = Vec::new();
        OrganizingPipeline::default()
            .run(
                &OrganizeRequest::new(source.path(), dest.path()),
                &CancellationToken::new(),
                &mut |event| {
                    if let OrganizeProgress::File { index, total, name } = event {
                        seen.push((index, total, name));
                    }
                },
            )
            .expect("Run failed");

        assert_eq!(
            seen,
            vec![
                (1, 3, "a.txt".to_string()),
                (2, 3, "b.txt".to_string()),
                (3, 3, "c.txt".to_string()),
            ]
        );
    }

    #[test]
    fn test_cancelled_before_start_processes_nothing() {
        let source = TempDir::new().expect("Failed to create temp directory");
        let dest = TempDir::new().expect("Failed to create temp directory");
        fs::write(source.path().join("a.txt"), "a").unwrap();

        let cancel = CancellationToken::new();
        cancel.cancel();
        let stats = OrganizingPipeline::default()
            .run(
                &OrganizeRequest::new(source.path(), dest.path()),
                &cancel,
                &mut |_| {},
            )
            .expect("Run failed");

        assert_eq!(stats.state, RunState::Stopped);
        assert_eq!(stats.total_files, 1);
        assert_eq!(stats.processed, 0);
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let source = TempDir::new().expect("Failed to create temp directory");
        let dest_parent = TempDir::new().expect("Failed to create temp directory");
        let dest = dest_parent.path().join("sorted");
        fs::write(source.path().join("x.txt"), "one").unwrap();
        fs::create_dir(source.path().join("sub")).unwrap();
        fs::write(source.path().join("sub").join("x.txt"), "two").unwrap();

        let mut request = OrganizeRequest::new(source.path(), &dest);
        request.dry_run = true;
        request.add_metadata = false;
        let stats = run(&request);

        assert_eq!(stats.processed, 2);
        assert!(!dest.exists());
        let names: Vec<_> = stats
            .copies
            .iter()
            .map(|c| c.destination.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        // sub/x.txt is visited first.
        assert_eq!(names, vec!["x.txt", "x_1.txt"]);
    }

    #[test]
    fn test_destination_inside_source_is_skipped() {
        let source = TempDir::new().expect("Failed to create temp directory");
        fs::write(source.path().join("a.txt"), "a").unwrap();
        let dest = source.path().join("sorted");

        let mut request = OrganizeRequest::new(source.path(), &dest);
        request.add_metadata = false;
        let first = run(&request);
        let second = run(&request);

        assert_eq!(first.total_files, 1);
        assert_eq!(second.total_files, 1);
        assert!(dest.join("Documents").join("a_1.txt").exists());
    }
}
