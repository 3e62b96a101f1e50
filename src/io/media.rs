// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Media file loading.
//!
//! This module decodes animated GIFs into RGBA frames for display and
//! asks the external encoder for stream metadata.

use anyhow::{anyhow, bail, Context, Result};
use image::{codecs::gif::GifDecoder, AnimationDecoder};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::process::{Command, Stdio};

use super::encoder::parse_frame_rate;

/// Delay used for frames that declare none, as browsers do.
pub const DEFAULT_FRAME_DELAY_MS: u32 = 100;

/// Rate assumed when the probe reports an unusable `r_frame_rate`.
pub const FALLBACK_FRAME_RATE: f64 = 30.0;

/// One decoded animation frame.
pub struct LoadedFrame {
    /// RGBA8 pixels, row major.
    pub pixels: Vec<u8>,
    pub delay_ms: u32,
}

/// A fully decoded animation.
pub struct LoadedMedia {
    pub width: u32,
    pub height: u32,
    pub frames: Vec<LoadedFrame>,
}

impl LoadedMedia {
    pub fn frame_count(&self) -> u32 {
        self.frames.len() as u32
    }
}

/// Decode every frame of an animated GIF.
pub fn load_gif(path: &Path) -> Result<LoadedMedia> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let decoder = GifDecoder::new(BufReader::new(file))
        .with_context(|| format!("Not a readable GIF: {}", path.display()))?;
    let frames = decoder
        .into_frames()
        .collect_frames()
        .with_context(|| format!("Failed to decode frames of {}", path.display()))?;

    let first = frames
        .first()
        .ok_or_else(|| anyhow!("{} contains no frames", path.display()))?;
    let (width, height) = first.buffer().dimensions();

    let frames = frames
        .into_iter()
        .map(|frame| {
            let (numer, denom) = frame.delay().numer_denom_ms();
            let delay_ms = if denom == 0 { 0 } else { numer / denom };
            LoadedFrame {
                pixels: frame.into_buffer().into_raw(),
                delay_ms: if delay_ms == 0 { DEFAULT_FRAME_DELAY_MS } else { delay_ms },
            }
        })
        .collect();

    Ok(LoadedMedia {
        width,
        height,
        frames,
    })
}

/// Metadata of the first video stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamInfo {
    pub width: u32,
    pub height: u32,
    pub frame_rate: f64,
}

#[derive(Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
}

/// Parse the JSON the probe tool prints for `-show_entries stream=...`.
pub fn parse_probe_json(json: &str) -> Result<StreamInfo> {
    let output: ProbeOutput = serde_json::from_str(json)?;
    let stream = output
        .streams
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("No video stream found"))?;
    match (stream.width, stream.height) {
        (Some(width), Some(height)) if width > 0 && height > 0 => Ok(StreamInfo {
            width,
            height,
            frame_rate: stream
                .r_frame_rate
                .as_deref()
                .and_then(parse_frame_rate)
                .unwrap_or(FALLBACK_FRAME_RATE),
        }),
        _ => bail!("Video stream has no dimensions"),
    }
}

/// Query width, height and frame rate of the first video stream.
pub fn probe_stream(ffprobe: &Path, path: &Path) -> Result<StreamInfo> {
    let output = Command::new(ffprobe)
        .args(["-v", "error", "-select_streams", "v:0"])
        .args(["-show_entries", "stream=width,height,r_frame_rate"])
        .args(["-of", "json"])
        .arg(path)
        .stdin(Stdio::null())
        .output()
        .with_context(|| format!("Failed to run {}", ffprobe.display()))?;

    if !output.status.success() {
        bail!(
            "{} failed with status {}: {}",
            ffprobe.display(),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    parse_probe_json(&String::from_utf8_lossy(&output.stdout))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{codecs::gif::GifEncoder, Delay, Frame, Rgba, RgbaImage};

    fn write_test_gif(path: &Path, delays_ms: &[u32]) {
        let file = File::create(path).unwrap();
        let mut encoder = GifEncoder::new(file);
        let frames = delays_ms.iter().enumerate().map(|(i, delay)| {
            let shade = (i * 60) as u8;
            let buffer = RgbaImage::from_pixel(8, 6, Rgba([shade, 0, 255 - shade, 255]));
            Frame::from_parts(buffer, 0, 0, Delay::from_numer_denom_ms(*delay, 1))
        });
        encoder.encode_frames(frames).unwrap();
    }

    #[test]
    fn test_load_gif_frames() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.gif");
        write_test_gif(&path, &[40, 80, 0]);

        let media = load_gif(&path).unwrap();

        assert_eq!((media.width, media.height), (8, 6));
        assert_eq!(media.frame_count(), 3);
        assert_eq!(media.frames[0].pixels.len(), 8 * 6 * 4);
        assert_eq!(media.frames[0].delay_ms, 40);
        assert_eq!(media.frames[1].delay_ms, 80);
        assert_eq!(media.frames[2].delay_ms, DEFAULT_FRAME_DELAY_MS);
    }

    #[test]
    fn test_load_gif_rejects_other_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.gif");
        std::fs::write(&path, b"not a gif").unwrap();
        assert!(load_gif(&path).is_err());
    }

    #[test]
    fn test_parse_probe_json() {
        let json = r#"{
            "programs": [],
            "streams": [{ "width": 480, "height": 270, "r_frame_rate": "50/1" }]
        }"#;
        let info = parse_probe_json(json).unwrap();
        assert_eq!(info.width, 480);
        assert_eq!(info.height, 270);
        assert_eq!(info.frame_rate, 50.0);
    }

    #[test]
    fn test_parse_probe_json_without_stream() {
        assert!(parse_probe_json(r#"{"streams": []}"#).is_err());
        assert!(parse_probe_json(r#"{"streams": [{"r_frame_rate": "0/0"}]}"#).is_err());
        let info = parse_probe_json(r#"{"streams": [{"width": 2, "height": 2, "r_frame_rate": "0/0"}]}"#)
            .unwrap();
        assert_eq!(info.frame_rate, FALLBACK_FRAME_RATE);
    }
}
