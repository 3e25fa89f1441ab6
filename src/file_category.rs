//! File categorization primitives shared by the classifier and the organizer.
//!
//! This module defines the closed set of destination categories, the way a
//! classification was reached, and the extension fallback table used when a
//! file's leading bytes match no known signature.
//!
//! # Examples
//!
//! ```
//! use magicsort::file_category::{Category, FileMapper};
//!
//! let mapper = FileMapper::default();
//! assert_eq!(mapper.extension_to_category("png"), Some(Category::Images));
//! assert_eq!(mapper.extension_to_category("MP3"), Some(Category::Audio));
//! assert_eq!(mapper.extension_to_category("rs"), None);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Represents a broad file category.
///
/// The variant name doubles as the destination subfolder name.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Category {
    /// Image files (JPEG, PNG, GIF, etc.)
    Images,
    /// Document files (PDF, DOCX, TXT, etc.)
    Documents,
    /// Video files (MP4, MKV, AVI, etc.)
    Videos,
    /// Audio files (MP3, FLAC, OGG, etc.)
    Audio,
    /// Archive files (ZIP, RAR, 7Z, etc.)
    Archives,
    /// Executables and installer packages
    Executables,
    /// Files nothing recognized
    Other,
    /// Files whose header could not be read
    Error,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 8] = [
        Category::Images,
        Category::Documents,
        Category::Videos,
        Category::Audio,
        Category::Archives,
        Category::Executables,
        Category::Other,
        Category::Error,
    ];

    /// Returns the directory name for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use magicsort::file_category::Category;
    ///
    /// assert_eq!(Category::Images.dir_name(), "Images");
    /// assert_eq!(Category::Other.dir_name(), "Other");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Images => "Images",
            Category::Documents => "Documents",
            Category::Videos => "Videos",
            Category::Audio => "Audio",
            Category::Archives => "Archives",
            Category::Executables => "Executables",
            Category::Other => "Other",
            Category::Error => "Error",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl FromStr for Category {
    type Err = String;

    /// Parses a category name case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|category| category.dir_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown category '{}'", s))
    }
}

/// How a classification was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    /// The leading bytes matched a signature.
    MagicBytes,
    /// No signature matched; the extension table did.
    FileExtension,
    /// Neither bytes nor extension were recognized.
    Unknown,
    /// The header could not be read.
    Error,
}

impl DetectionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionMethod::MagicBytes => "magic_bytes",
            DetectionMethod::FileExtension => "file_extension",
            DetectionMethod::Unknown => "unknown",
            DetectionMethod::Error => "error",
        }
    }
}

impl fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome of classifying one file. Produced once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    pub category: Category,
    /// Lowercase format label, or the error text when `method` is `Error`.
    pub format: String,
    pub method: DetectionMethod,
}

impl ClassificationResult {
    pub fn new(category: Category, format: impl Into<String>, method: DetectionMethod) -> Self {
        Self {
            category,
            format: format.into(),
            method,
        }
    }

    /// The `(Other, "unknown", unknown)` result.
    pub fn unknown() -> Self {
        Self::new(Category::Other, "unknown", DetectionMethod::Unknown)
    }

    /// Wraps an I/O failure as an `Error` classification.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Category::Error, message, DetectionMethod::Error)
    }

    /// The extension implied by the format tag, used when a file has none.
    ///
    /// Only tags reached through bytes or the extension table qualify; an
    /// error text is never turned into an extension.
    pub fn implied_extension(&self) -> Option<String> {
        match self.method {
            DetectionMethod::MagicBytes | DetectionMethod::FileExtension
                if !self.format.is_empty()
                    && self.format != "unknown"
                    && self.format.chars().all(|c| c.is_ascii_alphanumeric()) =>
            {
                Some(format!(".{}", self.format))
            }
            _ => None,
        }
    }
}

/// Built-in extension table used as the classifier's fallback.
const STANDARD_EXTENSIONS: &[(Category, &[&str])] = &[
    (
        Category::Images,
        &["jpg", "jpeg", "png", "bmp", "tiff", "gif", "webp", "heic"],
    ),
    (
        Category::Documents,
        &["pdf", "docx", "doc", "txt", "pptx", "ppt"],
    ),
    (
        Category::Videos,
        &["mp4", "avi", "mkv", "mov", "wmv", "flv", "webm"],
    ),
    (Category::Audio, &["mp3", "flac", "wav", "ogg", "m4a", "aac"]),
    (Category::Archives, &["zip", "rar", "7z", "tar", "gz"]),
    (Category::Executables, &["exe", "msi", "dmg", "deb", "rpm"]),
];

/// Maps file extensions to categories.
///
/// Lookups are case-insensitive. The standard table can be extended at
/// runtime from configuration.
#[derive(Debug, Clone)]
pub struct FileMapper {
    extension_map: HashMap<String, Category>,
}

impl FileMapper {
    /// Creates a new `FileMapper` with all standard mappings.
    pub fn new() -> Self {
        let mut mapper = Self {
            extension_map: HashMap::new(),
        };
        mapper.populate_standard_mappings();
        mapper
    }

    fn populate_standard_mappings(&mut self) {
        for (category, extensions) in STANDARD_EXTENSIONS {
            for ext in *extensions {
                self.add_extension_mapping(ext, *category);
            }
        }
    }

    /// Adds a file extension to category mapping. A leading dot is ignored.
    pub fn add_extension_mapping(&mut self, ext: &str, category: Category) {
        let ext = ext.trim_start_matches('.').to_lowercase();
        if !ext.is_empty() {
            self.extension_map.insert(ext, category);
        }
    }

    /// Maps a file extension (without the dot) to a category.
    ///
    /// # Examples
    ///
    /// ```
    /// use magicsort::file_category::{Category, FileMapper};
    ///
    /// let mapper = FileMapper::default();
    /// assert_eq!(mapper.extension_to_category("pdf"), Some(Category::Documents));
    /// assert_eq!(mapper.extension_to_category("PNG"), Some(Category::Images));
    /// ```
    pub fn extension_to_category(&self, ext: &str) -> Option<Category> {
        self.extension_map.get(&ext.to_lowercase()).copied()
    }
}

impl Default for FileMapper {
    fn default() -> Self {
        Self::new()
    }
}
