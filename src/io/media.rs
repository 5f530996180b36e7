// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Media file loading (videos).
//!
//! This module extracts still frames from video files and probes their
//! dimensions. The default backend shells out to the ffmpeg command line
//! tools; the `video-opencv` feature adds an OpenCV backend.

use crate::models::video::VideoReference;
use image::{ImageFormat, RgbaImage};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while reading frames or metadata from a video.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("video file not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{tool} failed: {message}")]
    ToolFailed { tool: String, message: String },
    #[error("no frame could be decoded")]
    NoFrame,
    #[error("could not decode frame: {0}")]
    Decode(#[from] image::ImageError),
    #[error("unexpected probe output: {0:?}")]
    Probe(String),
    #[cfg(feature = "video-opencv")]
    #[error("opencv: {0}")]
    OpenCv(#[from] opencv::Error),
}

/// Captures still frames from videos.
pub trait FrameExtractor {
    /// Copy the frame shown at `at` as an RGBA image. Blocks until done.
    fn copy_frame(&self, video: &VideoReference, at: Duration) -> Result<RgbaImage, MediaError>;
}

/// Frame extraction through the `ffmpeg` executable.
#[derive(Debug, Clone)]
pub struct FfmpegFrameExtractor {
    ffmpeg: PathBuf,
}

impl FfmpegFrameExtractor {
    pub fn new(ffmpeg: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
        }
    }
}

impl Default for FfmpegFrameExtractor {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl FrameExtractor for FfmpegFrameExtractor {
    fn copy_frame(&self, video: &VideoReference, at: Duration) -> Result<RgbaImage, MediaError> {
        let path = video.path();
        if !path.is_file() {
            return Err(MediaError::NotFound(path.to_path_buf()));
        }

        log::debug!("Extracting frame at {:.3}s from {}", at.as_secs_f64(), path.display());
        let output = Command::new(&self.ffmpeg)
            .args(["-v", "error", "-nostdin"])
            .arg("-ss")
            .arg(format!("{:.3}", at.as_secs_f64()))
            .arg("-i")
            .arg(path)
            .args(["-frames:v", "1", "-f", "image2pipe", "-c:v", "png", "-"])
            .stdin(Stdio::null())
            .output()
            .map_err(|source| MediaError::Spawn {
                tool: self.ffmpeg.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(MediaError::ToolFailed {
                tool: "ffmpeg".to_string(),
                message: stderr_message(&output.stderr, output.status),
            });
        }
        if output.stdout.is_empty() {
            return Err(MediaError::NoFrame);
        }

        let frame = image::load_from_memory_with_format(&output.stdout, ImageFormat::Png)?;
        Ok(frame.to_rgba8())
    }
}

/// Read the display dimensions of the first video stream with `ffprobe`.
///
/// These are the dimensions ffmpeg's output has after auto-rotation, with
/// non-square pixels stretched to square ones.
pub fn probe_dimensions(ffprobe: &Path, video: &Path) -> Result<(u32, u32), MediaError> {
    if !video.is_file() {
        return Err(MediaError::NotFound(video.to_path_buf()));
    }

    let output = Command::new(ffprobe)
        .args(["-v", "error", "-select_streams", "v:0"])
        .args([
            "-show_entries",
            concat!(
                "stream=width,height,sample_aspect_ratio",
                ":stream_tags=rotate:stream_side_data=rotation"
            ),
            "-of",
            "json",
        ])
        .arg(video)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| MediaError::Spawn {
            tool: ffprobe.display().to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(MediaError::ToolFailed {
            tool: "ffprobe".to_string(),
            message: stderr_message(&output.stderr, output.status),
        });
    }
    parse_dimensions(&String::from_utf8_lossy(&output.stdout))
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
    sample_aspect_ratio: Option<String>,
    #[serde(default)]
    tags: ProbeTags,
    #[serde(default)]
    side_data_list: Vec<ProbeSideData>,
}

#[derive(Debug, Default, Deserialize)]
struct ProbeTags {
    rotate: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeSideData {
    rotation: Option<f64>,
}

impl ProbeStream {
    /// Rotation in degrees, from the display matrix or the legacy tag.
    fn rotation(&self) -> f64 {
        self.side_data_list
            .iter()
            .find_map(|data| data.rotation)
            .or_else(|| self.tags.rotate.as_deref().and_then(|r| r.trim().parse().ok()))
            .unwrap_or(0.0)
    }

    /// Pixel aspect ratio; `0:1`, `N/A` and missing values count as square.
    fn sample_aspect(&self) -> f64 {
        self.sample_aspect_ratio
            .as_deref()
            .and_then(|sar| sar.split_once(':'))
            .and_then(|(num, den)| Some((num.parse::<f64>().ok()?, den.parse::<f64>().ok()?)))
            .filter(|&(num, den)| num > 0.0 && den > 0.0)
            .map_or(1.0, |(num, den)| num / den)
    }
}

/// Turn ffprobe's JSON into display dimensions.
fn parse_dimensions(output: &str) -> Result<(u32, u32), MediaError> {
    let probe = || MediaError::Probe(output.to_string());
    let parsed: ProbeOutput = serde_json::from_str(output).map_err(|_| probe())?;
    let stream = parsed.streams.first().ok_or_else(probe)?;
    let (width, height) = match (stream.width, stream.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        _ => return Err(probe()),
    };

    let width = ((width as f64 * stream.sample_aspect()).round() as u32).max(1);
    let quarter_turns = (stream.rotation() / 90.0).round() as i64;
    if quarter_turns.rem_euclid(2) == 1 {
        Ok((height, width))
    } else {
        Ok((width, height))
    }
}

fn stderr_message(stderr: &[u8], status: std::process::ExitStatus) -> String {
    let text = String::from_utf8_lossy(stderr);
    let text = text.trim();
    if text.is_empty() {
        format!("exited with {}", status)
    } else {
        text.to_string()
    }
}

/// Frame extraction through OpenCV's `VideoCapture`.
#[cfg(feature = "video-opencv")]
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenCvFrameExtractor;

#[cfg(feature = "video-opencv")]
impl FrameExtractor for OpenCvFrameExtractor {
    fn copy_frame(&self, video: &VideoReference, at: Duration) -> Result<RgbaImage, MediaError> {
        use opencv::{core, imgproc, prelude::*, videoio};

        let path = video.path();
        if !path.is_file() {
            return Err(MediaError::NotFound(path.to_path_buf()));
        }

        let mut capture =
            videoio::VideoCapture::from_file(&path.to_string_lossy(), videoio::CAP_ANY)?;
        if !capture.is_opened()? {
            return Err(MediaError::NoFrame);
        }
        capture.set(videoio::CAP_PROP_POS_MSEC, at.as_secs_f64() * 1000.0)?;

        let mut frame = core::Mat::default();
        if !capture.read(&mut frame)? || frame.empty() {
            return Err(MediaError::NoFrame);
        }

        // OpenCV decodes to BGR
        let mut rgba = core::Mat::default();
        imgproc::cvt_color(&frame, &mut rgba, imgproc::COLOR_BGR2RGBA, 0)?;

        let size = rgba.size()?;
        let pixels = rgba.data_bytes()?.to_vec();
        RgbaImage::from_raw(size.width as u32, size.height as u32, pixels)
            .ok_or(MediaError::NoFrame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// ffprobe's JSON for a single stream with the given extra fields.
    fn stream_json(width: u32, height: u32, extra: &str) -> String {
        format!(r#"{{"streams": [{{"width": {}, "height": {}{}}}]}}"#, width, height, extra)
    }

    #[test]
    fn test_parse_dimensions() {
        let json = stream_json(1920, 1080, r#", "sample_aspect_ratio": "1:1""#);
        assert_eq!(parse_dimensions(&json).unwrap(), (1920, 1080));
    }

    #[test]
    fn test_rotated_stream_swaps_dimensions() {
        let json = r#"{
            "streams": [{
                "width": 1920,
                "height": 1080,
                "side_data_list": [{"side_data_type": "Display Matrix", "rotation": -90}]
            }]
        }"#;
        assert_eq!(parse_dimensions(json).unwrap(), (1080, 1920));

        let legacy = stream_json(1920, 1080, r#", "tags": {"rotate": "270"}"#);
        assert_eq!(parse_dimensions(&legacy).unwrap(), (1080, 1920));

        let upside_down = stream_json(1920, 1080, r#", "tags": {"rotate": "180"}"#);
        assert_eq!(parse_dimensions(&upside_down).unwrap(), (1920, 1080));
    }

    #[test]
    fn test_anamorphic_stream_is_widened() {
        // DVD-style 720x480 with 32:27 pixels displays as 16:9
        let json = stream_json(720, 480, r#", "sample_aspect_ratio": "32:27""#);
        assert_eq!(parse_dimensions(&json).unwrap(), (853, 480));

        let unknown = stream_json(640, 360, r#", "sample_aspect_ratio": "0:1""#);
        assert_eq!(parse_dimensions(&unknown).unwrap(), (640, 360));
    }

    #[test]
    fn test_rotation_applies_after_pixel_aspect() {
        let json = r#"{
            "streams": [{
                "width": 720,
                "height": 480,
                "sample_aspect_ratio": "32:27",
                "side_data_list": [{"rotation": 90}]
            }]
        }"#;
        assert_eq!(parse_dimensions(json).unwrap(), (480, 853));
    }

    #[test]
    fn test_parse_dimensions_rejects_garbage() {
        assert!(matches!(parse_dimensions(""), Err(MediaError::Probe(_))));
        assert!(matches!(parse_dimensions(r#"{"streams": []}"#), Err(MediaError::Probe(_))));
        let zero = stream_json(0, 0, "");
        assert!(matches!(parse_dimensions(&zero), Err(MediaError::Probe(_))));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let extractor = FfmpegFrameExtractor::default();
        let video = VideoReference::new("/definitely/not/here.mp4");

        let result = extractor.copy_frame(&video, Duration::ZERO);
        assert!(matches!(result, Err(MediaError::NotFound(_))));
    }

    #[test]
    fn test_missing_tool_is_a_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let video_path = dir.path().join("clip.mp4");
        std::fs::write(&video_path, b"not really a video").unwrap();

        let extractor = FfmpegFrameExtractor::new(dir.path().join("no-such-ffmpeg"));
        let result = extractor.copy_frame(&VideoReference::new(&video_path), Duration::ZERO);
        assert!(matches!(result, Err(MediaError::Spawn { .. })));
    }
}
