//! Audio adapter: `{seconds}s_{kbps}kbps`.
//!
//! Duration comes from the stream's frame count; bitrate is the file's
//! average (size over duration), which is what a listener would expect for
//! both constant and variable bitrate files.

use super::ProbeError;
use std::fs::File;
use std::path::Path;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

pub fn describe(path: &Path) -> Result<String, ProbeError> {
    let file = File::open(path)?;
    let size = file.metadata()?.len();
    let stream = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe().format(
        &hint,
        stream,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;

    let track = probed
        .format
        .default_track()
        .ok_or_else(|| ProbeError::Unsupported("no audio track".to_string()))?;
    let params = &track.codec_params;

    let (frames, rate) = params
        .n_frames
        .zip(params.sample_rate)
        .filter(|&(frames, rate)| frames > 0 && rate > 0)
        .ok_or_else(|| ProbeError::Unsupported("stream length not reported".to_string()))?;

    let seconds = frames as f64 / f64::from(rate);
    let kbps = (size as f64 * 8.0 / seconds / 1000.0) as u64;

    Ok(format!("{}s_{}kbps", seconds as u64, kbps))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// One second of 8 kHz mono unsigned 8-bit PCM.
    fn one_second_wav() -> Vec<u8> {
        let samples = 8_000u32;
        let mut wav = Vec::new();
        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&(36 + samples).to_le_bytes());
        wav.extend_from_slice(b"WAVE");
        wav.extend_from_slice(b"fmt ");
        wav.extend_from_slice(&16u32.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
        wav.extend_from_slice(&1u16.to_le_bytes()); // mono
        wav.extend_from_slice(&8_000u32.to_le_bytes()); // sample rate
        wav.extend_from_slice(&8_000u32.to_le_bytes()); // byte rate
        wav.extend_from_slice(&1u16.to_le_bytes()); // block align
        wav.extend_from_slice(&8u16.to_le_bytes()); // bits per sample
        wav.extend_from_slice(b"data");
        wav.extend_from_slice(&samples.to_le_bytes());
        wav.extend(std::iter::repeat_n(0x80u8, samples as usize));
        wav
    }

    #[test]
    fn test_describe_wav() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("tone.wav");
        std::fs::write(&path, one_second_wav()).expect("Failed to write file");

        // 8044 bytes over one second.
        assert_eq!(describe(&path).unwrap(), "1s_64kbps");
    }

    /// MPEG-1 Layer III, 128 kbps, 44.1 kHz, no padding: 417-byte frames of
    /// 1152 samples each.
    fn cbr_mp3(frames: usize) -> Vec<u8> {
        let mut frame = vec![0u8; 417];
        frame[..4].copy_from_slice(&[0xFF, 0xFB, 0x90, 0x64]);
        frame.repeat(frames)
    }

    #[test]
    fn test_describe_constant_bitrate_mp3() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("song.mp3");
        std::fs::write(&path, cbr_mp3(383)).expect("Failed to write file");

        // 383 * 1152 samples is just over 10 s; 159711 bytes over that is
        // 127.7 kbps, truncated.
        assert_eq!(describe(&path).unwrap(), "10s_127kbps");
    }

    #[test]
    fn test_describe_rejects_garbage() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("noise.mp3");
        std::fs::write(&path, b"ID3 this is not an mp3").expect("Failed to write file");

        assert!(describe(&path).is_err());
    }
}
