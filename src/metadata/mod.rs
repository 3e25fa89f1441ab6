//! Best-effort metadata tokens for destination file names.
//!
//! Each probed category has one decoder adapter that turns a file into a
//! short token such as `1920x1080_PNG` or `42pages`. Adapters may fail for any
//! reason (corrupt data, unsupported sub-format); [`ContentProbe`] absorbs every
//! failure into the [`UNKNOWN_TOKEN`] sentinel so enrichment never blocks
//! organization.

pub mod audio;
pub mod document;
pub mod image;
pub mod video;

use crate::file_category::{Category, ClassificationResult};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// Token returned when no metadata could be derived.
pub const UNKNOWN_TOKEN: &str = "unknown";

/// Failures raised by the decoder adapters.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image decoder: {0}")]
    Image(#[from] ::image::ImageError),
    #[error("audio decoder: {0}")]
    Audio(#[from] symphonia::core::errors::Error),
    #[error("PDF reader: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("ZIP reader: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("decoder error: {0}")]
    Decode(String),
    #[error("unsupported: {0}")]
    Unsupported(String),
}

/// Something that can turn a classified file into a metadata token.
///
/// Implementations must not fail: any problem is reported as
/// [`UNKNOWN_TOKEN`].
pub trait MetadataProbe: Send + Sync {
    fn probe(&self, path: &Path, classification: &ClassificationResult) -> String;
}

/// The decoder selected for a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoder {
    Image,
    Video,
    Audio,
    Document,
}

impl Decoder {
    /// Returns the decoder for `category`, or `None` for categories that are
    /// never probed.
    pub fn for_category(category: Category) -> Option<Self> {
        match category {
            Category::Images => Some(Decoder::Image),
            Category::Videos => Some(Decoder::Video),
            Category::Audio => Some(Decoder::Audio),
            Category::Documents => Some(Decoder::Document),
            Category::Archives | Category::Executables | Category::Other | Category::Error => {
                None
            }
        }
    }

    /// Runs the decoder. `format` is the classifier's format tag.
    pub fn describe(self, path: &Path, format: &str) -> Result<String, ProbeError> {
        match self {
            Decoder::Image => image::describe(path),
            Decoder::Video => video::describe(path),
            Decoder::Audio => audio::describe(path),
            Decoder::Document => document::describe(path, format),
        }
    }
}

/// The default probe: real decoders, failures folded into `"unknown"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentProbe;

impl MetadataProbe for ContentProbe {
    fn probe(&self, path: &Path, classification: &ClassificationResult) -> String {
        let Some(decoder) = Decoder::for_category(classification.category) else {
            return UNKNOWN_TOKEN.to_string();
        };

        match decoder.describe(path, &classification.format) {
            Ok(raw) => {
                let token = sanitize_token(&raw);
                if token.is_empty() {
                    return UNKNOWN_TOKEN.to_string();
                }
                debug!(file = %path.display(), token = %token, "metadata extracted");
                token
            }
            Err(e) => {
                warn!(
                    file = %path.display(),
                    decoder = ?decoder,
                    "could not extract metadata: {}",
                    e
                );
                UNKNOWN_TOKEN.to_string()
            }
        }
    }
}

/// Restricts a token to characters that are safe in a file name on every
/// platform: ASCII letters, digits, `.`, `_` and `-`.
pub fn sanitize_token(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
