// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Preview player backed by the ffmpeg command line tools.
//!
//! `start` spawns a decoder thread that streams raw RGBA frames from
//! `ffmpeg` at the video's native rate and publishes them to the player
//! handle. Audio is never decoded, so the player can only run muted.

use super::{LoopMode, PlaybackError, PlaybackManager, PlayerHandle};
use crate::config::AppConfig;
use crate::io::media::{probe_dimensions, MediaError};
use crate::models::video::VideoReference;
use crate::util::geometry::fit_within_width;
use image::RgbaImage;
use std::io::{ErrorKind, Read};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Looping, muted preview player.
pub struct FfmpegPlayer {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
    max_width: u32,
    items: Vec<VideoReference>,
    loop_mode: LoopMode,
    handle: PlayerHandle,
    /// Stop flag of the running decoder thread
    worker: Option<Arc<AtomicBool>>,
}

impl FfmpegPlayer {
    pub fn new(ffmpeg: impl Into<PathBuf>, ffprobe: impl Into<PathBuf>, max_width: u32) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
            max_width: max_width.max(1),
            items: Vec::new(),
            loop_mode: LoopMode::Off,
            handle: PlayerHandle::new(),
            worker: None,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.ffmpeg_path.clone(),
            config.ffprobe_path.clone(),
            config.preview_max_width,
        )
    }

    /// Signal the decoder thread to exit. It is not joined; it notices the
    /// flag at its next frame boundary and kills its ffmpeg child.
    fn stop_worker(&mut self) {
        if let Some(stop) = self.worker.take() {
            stop.store(true, Ordering::Release);
            log::debug!("Stopped preview decoder");
        }
    }
}

impl PlaybackManager for FfmpegPlayer {
    fn set(&mut self, items: Vec<VideoReference>) -> PlayerHandle {
        self.stop_worker();
        self.items = items;
        self.loop_mode = LoopMode::Off;
        self.handle = PlayerHandle::new();
        self.handle.clone()
    }

    fn mute(&mut self, muted: bool) -> Result<(), PlaybackError> {
        if muted {
            Ok(())
        } else {
            Err(PlaybackError::AudioUnsupported)
        }
    }

    fn set_loop(&mut self, mode: LoopMode) -> Result<(), PlaybackError> {
        if self.items.is_empty() {
            return Err(PlaybackError::NoItems);
        }
        self.loop_mode = mode;
        Ok(())
    }

    fn start(&mut self) -> Result<(), PlaybackError> {
        if self.items.is_empty() {
            return Err(PlaybackError::NoItems);
        }
        if let Some(missing) = self.items.iter().find(|item| !item.exists()) {
            return Err(PlaybackError::MissingFile(missing.path().to_path_buf()));
        }

        self.stop_worker();
        let stop = Arc::new(AtomicBool::new(false));
        let job = DecodeJob {
            ffmpeg: self.ffmpeg.clone(),
            ffprobe: self.ffprobe.clone(),
            max_width: self.max_width,
            items: self.items.clone(),
            loop_mode: self.loop_mode,
            handle: self.handle.clone(),
            stop: Arc::clone(&stop),
        };
        std::thread::Builder::new()
            .name("preview-decoder".to_string())
            .spawn(move || job.run())?;

        self.worker = Some(stop);
        log::info!("Started preview of {} item(s), {:?}", self.items.len(), self.loop_mode);
        Ok(())
    }

    fn clear(&mut self) {
        self.stop_worker();
        self.items.clear();
        self.handle = PlayerHandle::new();
    }

    fn items(&self) -> &[VideoReference] {
        &self.items
    }
}

impl Drop for FfmpegPlayer {
    fn drop(&mut self) {
        self.stop_worker();
    }
}

/// Everything the decoder thread needs, moved onto it.
struct DecodeJob {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
    max_width: u32,
    items: Vec<VideoReference>,
    loop_mode: LoopMode,
    handle: PlayerHandle,
    stop: Arc<AtomicBool>,
}

impl DecodeJob {
    fn stopped(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    fn run(self) {
        let mut index = 0;
        while !self.stopped() {
            let item = &self.items[index];
            match self.stream(item) {
                Ok(0) if !self.stopped() => {
                    log::warn!("No frames decoded from {}", item);
                    break;
                }
                Ok(frames) => log::debug!("Streamed {} frames from {}", frames, item),
                Err(e) => {
                    log::warn!("Preview of {} stopped: {}", item, e);
                    break;
                }
            }

            match self.loop_mode.next_index(index, self.items.len()) {
                Some(next) => index = next,
                None => break,
            }
        }
    }

    /// Decode `item` once from start to end. Returns the number of frames
    /// published.
    fn stream(&self, item: &VideoReference) -> Result<u64, MediaError> {
        let (width, height) = probe_dimensions(&self.ffprobe, item.path())?;
        let (width, height) = fit_within_width(width, height, self.max_width);
        let frame_len = width as usize * height as usize * 4;

        log::debug!("Decoding {} at {}x{}", item, width, height);
        let mut child = Command::new(&self.ffmpeg)
            .args(["-v", "error", "-nostdin", "-re", "-i"])
            .arg(item.path())
            .arg("-an")
            .arg("-vf")
            .arg(format!("scale={}:{},setsar=1", width, height))
            .args(["-f", "rawvideo", "-pix_fmt", "rgba", "-"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| MediaError::Spawn {
                tool: self.ffmpeg.display().to_string(),
                source,
            })?;

        let Some(mut stdout) = child.stdout.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(MediaError::NoFrame);
        };

        let mut frames = 0;
        let mut result = Ok(());
        while !self.stopped() {
            let mut pixels = vec![0u8; frame_len];
            match stdout.read_exact(&mut pixels) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => break,
                Err(e) => {
                    result = Err(MediaError::ToolFailed {
                        tool: "ffmpeg".to_string(),
                        message: e.to_string(),
                    });
                    break;
                }
            }
            match RgbaImage::from_raw(width, height, pixels) {
                Some(frame) => self.handle.publish(frame),
                None => {
                    result = Err(MediaError::NoFrame);
                    break;
                }
            }
            frames += 1;
        }

        if self.stopped() || result.is_err() {
            let _ = child.kill();
        }
        let _ = child.wait();
        result.map(|()| frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> FfmpegPlayer {
        FfmpegPlayer::new("ffmpeg", "ffprobe", 1280)
    }

    #[test]
    fn test_set_replaces_playlist_and_handle() {
        let mut player = player();
        let first = player.set(vec![VideoReference::new("/videos/a.mp4")]);
        let second = player.set(vec![VideoReference::new("/videos/b.mp4")]);

        assert!(!first.same_player(&second));
        assert_eq!(player.items(), &[VideoReference::new("/videos/b.mp4")]);
    }

    #[test]
    fn test_unmuting_is_unsupported() {
        let mut player = player();
        assert!(player.mute(true).is_ok());
        assert!(matches!(player.mute(false), Err(PlaybackError::AudioUnsupported)));
    }

    #[test]
    fn test_loop_and_start_need_items() {
        let mut player = player();
        assert!(matches!(player.set_loop(LoopMode::RepeatOne), Err(PlaybackError::NoItems)));
        assert!(matches!(player.start(), Err(PlaybackError::NoItems)));
        assert!(player.worker.is_none());
    }

    #[test]
    fn test_start_rejects_missing_file() {
        let mut player = player();
        player.set(vec![VideoReference::new("/definitely/not/here.mp4")]);
        player.set_loop(LoopMode::RepeatOne).unwrap();

        assert_eq!(player.loop_mode, LoopMode::RepeatOne);
        assert!(matches!(player.start(), Err(PlaybackError::MissingFile(_))));
        assert!(player.worker.is_none());
    }

    #[test]
    fn test_clear_on_idle_player() {
        let mut player = player();
        player.clear();
        player.clear();
        assert!(player.items().is_empty());
    }

    #[test]
    fn test_worker_exits_when_tools_are_missing() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("clip.mp4");
        std::fs::write(&video, b"not really a video").unwrap();

        let mut player = FfmpegPlayer::new(
            dir.path().join("no-ffmpeg"),
            dir.path().join("no-ffprobe"),
            640,
        );
        let handle = player.set(vec![VideoReference::new(&video)]);
        player.set_loop(LoopMode::RepeatOne).unwrap();

        // Sequencing succeeds; the decode failure only shows up in the log
        assert!(player.start().is_ok());
        assert!(player.worker.is_some());
        player.clear();
        assert!(player.worker.is_none());
        assert_eq!(handle.serial(), 0);
    }
}
