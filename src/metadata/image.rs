//! Image adapter: `{width}x{height}_{FORMAT}` read from the image header.

use super::ProbeError;
use image::{ImageFormat, ImageReader};
use std::path::Path;

/// Reads the image dimensions without decoding pixel data.
pub fn describe(path: &Path) -> Result<String, ProbeError> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    let format = reader
        .format()
        .ok_or_else(|| ProbeError::Unsupported("unrecognized image format".to_string()))?;
    let (width, height) = reader.into_dimensions()?;
    Ok(format!("{}x{}_{}", width, height, format_name(format)))
}

fn format_name(format: ImageFormat) -> String {
    match format {
        ImageFormat::Jpeg => "JPEG".to_string(),
        ImageFormat::Png => "PNG".to_string(),
        ImageFormat::Gif => "GIF".to_string(),
        ImageFormat::Bmp => "BMP".to_string(),
        ImageFormat::Tiff => "TIFF".to_string(),
        ImageFormat::WebP => "WEBP".to_string(),
        other => format!("{:?}", other).to_uppercase(),
    }
}
