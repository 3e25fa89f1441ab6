//! Content-first file classification.
//!
//! The classifier reads at most [`HEADER_LEN`] bytes of a file and resolves it
//! to a [`ClassificationResult`]: signature table first, extension table
//! second, `Other` last. Read failures become an `Error` classification; the
//! classifier itself never fails.

use crate::file_category::{ClassificationResult, DetectionMethod, FileMapper};
use crate::signature::{self, HEADER_LEN};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::debug;

/// Classifies files by their leading bytes, falling back to the extension.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    mapper: FileMapper,
}

impl Classifier {
    /// Creates a classifier with the given extension fallback table.
    pub fn new(mapper: FileMapper) -> Self {
        Self { mapper }
    }

    /// Classifies the file at `path`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use magicsort::classifier::Classifier;
    /// use std::path::Path;
    ///
    /// let result = Classifier::default().classify(Path::new("holiday.jpg"));
    /// println!("{} / {} via {}", result.category, result.format, result.method);
    /// ```
    pub fn classify(&self, path: &Path) -> ClassificationResult {
        let (result, size) = match read_header(path) {
            Ok((header, size)) => (self.classify_header(path, &header), size),
            Err(e) => (ClassificationResult::error(e.to_string()), 0),
        };

        debug!(
            target: "detection",
            file = %path.display(),
            category = %result.category,
            format = %result.format,
            method = %result.method,
            size,
            "classified"
        );
        result
    }

    /// Classifies an already-read header. `path` is used only for its extension.
    pub fn classify_header(&self, path: &Path, header: &[u8]) -> ClassificationResult {
        if let Some(hit) = signature::match_prefix(header) {
            return ClassificationResult::new(hit.category, hit.format, DetectionMethod::MagicBytes);
        }

        if let Some(ext) = path.extension().map(|e| e.to_string_lossy().to_lowercase())
            && let Some(category) = self.mapper.extension_to_category(&ext)
        {
            return ClassificationResult::new(category, ext, DetectionMethod::FileExtension);
        }

        ClassificationResult::unknown()
    }
}

/// Reads up to `HEADER_LEN` bytes and the file size. A short file is not an error.
fn read_header(path: &Path) -> io::Result<(Vec<u8>, u64)> {
    let file = File::open(path)?;
    let size = file.metadata()?.len();
    let mut header = Vec::with_capacity(HEADER_LEN);
    file.take(HEADER_LEN as u64).read_to_end(&mut header)?;
    Ok((header, size))
}
