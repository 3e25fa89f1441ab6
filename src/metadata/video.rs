//! Video adapter: `{width}x{height}_{fps}fps` for ISO base media files
//! (mp4, m4v, mov). Other containers report `Unsupported`.

use super::ProbeError;
use mp4parse::{Track, TrackType};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub fn describe(path: &Path) -> Result<String, ProbeError> {
    let mut reader = BufReader::new(File::open(path)?);
    let context = mp4parse::read_mp4(&mut reader)
        .map_err(|e| ProbeError::Decode(format!("mp4: {:?}", e)))?;

    let track = context
        .tracks
        .iter()
        .find(|track| matches!(track.track_type, TrackType::Video))
        .ok_or_else(|| ProbeError::Unsupported("no video track".to_string()))?;

    let header = track
        .tkhd
        .as_ref()
        .ok_or_else(|| ProbeError::Unsupported("video track has no header".to_string()))?;

    // Track header dimensions are 16.16 fixed point.
    let width = header.width >> 16;
    let height = header.height >> 16;
    let fps = frame_rate(track).unwrap_or(0);

    Ok(format!("{}x{}_{}fps", width, height, fps))
}

/// Whole frames per second: sample count over track duration, truncated.
fn frame_rate(track: &Track) -> Option<u64> {
    let timescale = track.timescale.as_ref()?.0;
    let duration = track.duration.as_ref()?.0;
    if timescale == 0 || duration == 0 {
        return None;
    }

    let frames: u64 = track
        .stts
        .as_ref()?
        .samples
        .iter()
        .map(|sample| u64::from(sample.sample_count))
        .sum();

    let seconds = duration as f64 / timescale as f64;
    Some((frames as f64 / seconds) as u64)
}
