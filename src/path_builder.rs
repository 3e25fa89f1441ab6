//! Destination path construction.
//!
//! This module turns an original file name, its classification and an
//! optional metadata token into a destination path that is free both on disk
//! and among the paths already handed out during the current run.

use crate::file_category::ClassificationResult;
use crate::file_organizer::FileError;
use crate::metadata::UNKNOWN_TOKEN;
use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

/// Where a file will be copied to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationPlan {
    /// The final destination path.
    pub path: PathBuf,
    /// Whether a `_{n}` suffix was needed to avoid a collision.
    pub suffixed: bool,
}

/// Computes collision-free destination paths for one run.
///
/// A path is considered taken if anything exists there on disk or if this
/// builder already returned it. The filesystem check is not atomic against
/// other processes; the copy step opens destinations with `create_new`.
#[derive(Debug)]
pub struct PathBuilder {
    reserved: HashSet<PathBuf>,
    create_dirs: bool,
}

impl PathBuilder {
    /// Creates a builder that creates destination directories as needed.
    pub fn new() -> Self {
        Self {
            reserved: HashSet::new(),
            create_dirs: true,
        }
    }

    /// Creates a builder that only plans: no directory is ever created.
    pub fn planning_only() -> Self {
        Self {
            reserved: HashSet::new(),
            create_dirs: false,
        }
    }

    /// Builds the destination for `original`.
    ///
    /// # Arguments
    ///
    /// * `original` - Path (or bare name) of the source file
    /// * `classification` - Result of classifying the source file
    /// * `token` - Metadata token, or `None` when enrichment is off
    /// * `dest_root` - Destination root directory
    /// * `organize_by_type` - Whether to place the file in a category subfolder
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use magicsort::classifier::Classifier;
    /// use magicsort::path_builder::PathBuilder;
    /// use std::path::Path;
    ///
    /// let source = Path::new("/photos/beach.jpg");
    /// let classification = Classifier::default().classify(source);
    /// let plan = PathBuilder::new()
    ///     .build(source, &classification, Some("4000x3000_JPEG"), Path::new("/sorted"), true)
    ///     .unwrap();
    /// assert_eq!(plan.path, Path::new("/sorted/Images/beach_4000x3000_JPEG.jpg"));
    /// ```
    pub fn build(
        &mut self,
        original: &Path,
        classification: &ClassificationResult,
        token: Option<&str>,
        dest_root: &Path,
        organize_by_type: bool,
    ) -> Result<DestinationPlan, FileError> {
        let dest_dir = if organize_by_type {
            dest_root.join(classification.category.dir_name())
        } else {
            dest_root.to_path_buf()
        };

        if self.create_dirs {
            fs::create_dir_all(&dest_dir).map_err(|e| FileError::DirectoryCreation {
                path: dest_dir.clone(),
                source: e,
            })?;
        }

        let (base, extension) = name_parts(original, classification, token);

        let mut candidate = dest_dir.join(join_name(&base, None, &extension));
        let mut counter = 1u32;
        while self.is_taken(&candidate) {
            candidate = dest_dir.join(join_name(&base, Some(counter), &extension));
            counter += 1;
        }

        self.reserved.insert(candidate.clone());
        Ok(DestinationPlan {
            path: candidate,
            suffixed: counter > 1,
        })
    }

    fn is_taken(&self, candidate: &Path) -> bool {
        self.reserved.contains(candidate) || candidate.symlink_metadata().is_ok()
    }
}

impl Default for PathBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the un-suffixed file name for `original`.
///
/// The extension is always present: the original one (case kept), else one
/// implied by the classification, else `.unknown`. The original stem and
/// extension are kept byte for byte, even when they are not valid UTF-8.
pub fn file_name(
    original: &Path,
    classification: &ClassificationResult,
    token: Option<&str>,
) -> OsString {
    let (base, extension) = name_parts(original, classification, token);
    join_name(&base, None, &extension)
}

fn join_name(base: &OsStr, counter: Option<u32>, extension: &OsStr) -> OsString {
    let mut name = base.to_os_string();
    if let Some(counter) = counter {
        name.push(format!("_{}", counter));
    }
    name.push(extension);
    name
}

fn name_parts(
    original: &Path,
    classification: &ClassificationResult,
    token: Option<&str>,
) -> (OsString, OsString) {
    let mut base = original
        .file_stem()
        .map(OsStr::to_os_string)
        .unwrap_or_else(|| OsString::from("unnamed"));

    let extension = match original.extension() {
        Some(ext) => {
            let mut dotted = OsString::from(".");
            dotted.push(ext);
            dotted
        }
        None => OsString::from(
            classification
                .implied_extension()
                .unwrap_or_else(|| ".unknown".to_string()),
        ),
    };

    if let Some(token) = token
        && !token.is_empty()
        && token != UNKNOWN_TOKEN
    {
        base.push("_");
        base.push(token);
    }

    (base, extension)
}
