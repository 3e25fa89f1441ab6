//! Ordered magic-byte signature table.
//!
//! Entries are tested top to bottom and the first prefix that matches wins.
//! Several prefixes overlap (`PK\x03\x04` and `PK`, `RIFF` for both WebP and
//! WAV), so the declaration order is part of the contract.

use crate::file_category::Category;

/// Number of leading bytes the classifier reads.
pub const HEADER_LEN: usize = 32;

/// One byte-prefix record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub prefix: &'static [u8],
    pub category: Category,
    pub format: &'static str,
}

const fn sig(prefix: &'static [u8], category: Category, format: &'static str) -> Signature {
    Signature {
        prefix,
        category,
        format,
    }
}

/// The signature table, in match order.
pub const SIGNATURES: &[Signature] = &[
    sig(b"\xFF\xD8\xFF", Category::Images, "jpeg"),
    sig(b"\x89PNG\r\n\x1a\n", Category::Images, "png"),
    sig(b"GIF87a", Category::Images, "gif"),
    sig(b"GIF89a", Category::Images, "gif"),
    sig(b"BM", Category::Images, "bmp"),
    sig(b"ftypheic", Category::Images, "heic"),
    sig(b"ftypheix", Category::Images, "heic"),
    sig(b"ftypmif1", Category::Images, "heic"),
    sig(b"ftypmsf1", Category::Images, "heic"),
    // Shared with WAV; the first match wins.
    sig(b"RIFF", Category::Videos, "webp"),
    sig(b"\x00\x00\x00\x18ftypmp4", Category::Videos, "mp4"),
    sig(b"\x00\x00\x00\x20ftypM4V", Category::Videos, "mp4"),
    sig(b"%PDF", Category::Documents, "pdf"),
    // ZIP local file header: docx, pptx and friends.
    sig(b"PK\x03\x04", Category::Documents, "office"),
    sig(b"ID3", Category::Audio, "mp3"),
    sig(b"\xFF\xFB", Category::Audio, "mp3"),
    sig(b"\xFF\xF3", Category::Audio, "mp3"),
    sig(b"fLaC", Category::Audio, "flac"),
    sig(b"OggS", Category::Audio, "ogg"),
    sig(b"PK", Category::Archives, "zip"),
    sig(b"Rar!", Category::Archives, "rar"),
    sig(b"7z\xBC\xAF\x27\x1C", Category::Archives, "7z"),
    sig(b"MZ", Category::Executables, "exe"),
];

/// Returns the first signature whose prefix starts `header`.
pub fn match_prefix(header: &[u8]) -> Option<&'static Signature> {
    SIGNATURES
        .iter()
        .find(|signature| header.starts_with(signature.prefix))
}
