// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Video playback for the inline preview.
//!
//! A [`PlaybackManager`] owns the playlist and the decoding work. It hands
//! out a [`PlayerHandle`] that render layers poll for the latest frame.

pub mod ffmpeg;

use crate::models::video::VideoReference;
use image::RgbaImage;
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

/// Errors from the playback setup calls.
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("no video has been loaded")]
    NoItems,
    #[error("video file not found: {0}")]
    MissingFile(PathBuf),
    #[error("audio output is not supported, the preview can only play muted")]
    AudioUnsupported,
    #[error("could not start the decoder thread: {0}")]
    Worker(#[from] std::io::Error),
}

/// What happens when the current item reaches its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopMode {
    /// Play the playlist once
    #[default]
    Off,
    /// Repeat the current item forever
    RepeatOne,
    /// Wrap around to the first item after the last
    RepeatAll,
}

impl LoopMode {
    /// Index of the item that follows `current` in a playlist of `len`
    /// items, or `None` when playback should stop.
    pub fn next_index(self, current: usize, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        match self {
            LoopMode::RepeatOne => Some(current.min(len - 1)),
            LoopMode::RepeatAll => Some((current + 1) % len),
            LoopMode::Off => (current + 1 < len).then_some(current + 1),
        }
    }
}

/// Controls playback of a playlist of local videos.
pub trait PlaybackManager {
    /// Replace the playlist with `items` and return the handle frames will
    /// be published to. Any running playback is stopped.
    fn set(&mut self, items: Vec<VideoReference>) -> PlayerHandle;

    fn mute(&mut self, muted: bool) -> Result<(), PlaybackError>;

    fn set_loop(&mut self, mode: LoopMode) -> Result<(), PlaybackError>;

    /// Begin playback. Returns once playback has been started; decoding
    /// problems after that point are not reported here.
    fn start(&mut self) -> Result<(), PlaybackError>;

    /// Stop playback and release the playlist.
    fn clear(&mut self);

    /// The current playlist.
    fn items(&self) -> &[VideoReference];
}

#[derive(Default)]
struct FrameSlot {
    serial: AtomicU64,
    latest: Mutex<Option<Arc<RgbaImage>>>,
}

/// Shared output of one player. Cloning yields another view of the same
/// player.
#[derive(Clone, Default)]
pub struct PlayerHandle {
    slot: Arc<FrameSlot>,
}

impl PlayerHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `frame` the player's current frame.
    pub fn publish(&self, frame: RgbaImage) {
        let mut latest = self.slot.latest.lock().unwrap_or_else(PoisonError::into_inner);
        *latest = Some(Arc::new(frame));
        self.slot.serial.fetch_add(1, Ordering::Release);
    }

    /// Serial of the most recently published frame (0 before the first).
    pub fn serial(&self) -> u64 {
        self.slot.serial.load(Ordering::Acquire)
    }

    /// The current frame, if one newer than `seen` has been published.
    pub fn frame_since(&self, seen: u64) -> Option<(u64, Arc<RgbaImage>)> {
        let latest = self.slot.latest.lock().unwrap_or_else(PoisonError::into_inner);
        let serial = self.serial();
        if serial <= seen {
            return None;
        }
        latest.as_ref().map(|frame| (serial, Arc::clone(frame)))
    }

    /// Whether both handles refer to the same player.
    pub fn same_player(&self, other: &PlayerHandle) -> bool {
        Arc::ptr_eq(&self.slot, &other.slot)
    }
}

impl fmt::Debug for PlayerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerHandle")
            .field("serial", &self.serial())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeat_one_stays_on_item() {
        assert_eq!(LoopMode::RepeatOne.next_index(0, 1), Some(0));
        assert_eq!(LoopMode::RepeatOne.next_index(2, 3), Some(2));
    }

    #[test]
    fn test_repeat_all_wraps() {
        assert_eq!(LoopMode::RepeatAll.next_index(0, 3), Some(1));
        assert_eq!(LoopMode::RepeatAll.next_index(2, 3), Some(0));
    }

    #[test]
    fn test_off_stops_after_last() {
        assert_eq!(LoopMode::Off.next_index(0, 2), Some(1));
        assert_eq!(LoopMode::Off.next_index(1, 2), None);
        assert_eq!(LoopMode::Off.next_index(0, 0), None);
    }

    #[test]
    fn test_handle_reports_only_new_frames() {
        let handle = PlayerHandle::new();
        assert!(handle.frame_since(0).is_none());

        handle.publish(RgbaImage::new(4, 2));
        let (serial, frame) = handle.frame_since(0).unwrap();
        assert_eq!(serial, 1);
        assert_eq!(frame.dimensions(), (4, 2));
        assert!(handle.frame_since(serial).is_none());

        // Clones observe the same player
        let other = handle.clone();
        other.publish(RgbaImage::new(8, 8));
        assert!(handle.same_player(&other));
        assert_eq!(handle.frame_since(serial).unwrap().1.dimensions(), (8, 8));
        assert!(!handle.same_player(&PlayerHandle::new()));
    }
}
