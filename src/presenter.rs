// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Presenter for the local video selection screen.
//!
//! The presenter turns a picked video into a cached thumbnail, a muted
//! looping preview and a recorded selection. Its collaborators are passed
//! in at construction; the host view is passed to each operation.
//! Failures are returned to the caller, which decides how to surface them.

use crate::error::SelectionError;
use crate::io::directories::{DirectoryKind, DirectoryResolver};
use crate::io::media::FrameExtractor;
use crate::io::thumbnail;
use crate::models::video::VideoReference;
use crate::playback::{LoopMode, PlaybackError, PlaybackManager, PlayerHandle};
use crate::ui::alert::AlertService;
use crate::ui::selection::SelectionView;
use crate::ui::video_view::{PlayerLayer, VideoGravity, VideoView};
use std::time::Duration;

/// Position of the frame used as the thumbnail.
pub const THUMBNAIL_TIME: Duration = Duration::ZERO;

pub struct VideoSelectionPresenter {
    player: Box<dyn PlaybackManager>,
    alerts: Box<dyn AlertService>,
    frames: Box<dyn FrameExtractor>,
    directories: Box<dyn DirectoryResolver>,
}

impl VideoSelectionPresenter {
    pub fn new(
        player: Box<dyn PlaybackManager>,
        alerts: Box<dyn AlertService>,
        frames: Box<dyn FrameExtractor>,
        directories: Box<dyn DirectoryResolver>,
    ) -> Self {
        Self {
            player,
            alerts,
            frames,
            directories,
        }
    }

    pub fn playback(&self) -> &dyn PlaybackManager {
        self.player.as_ref()
    }

    /// Create the video view, sized to and tracking its wrapping container.
    /// Meant to be called once when the screen loads.
    pub fn init_views(&self, view: &mut SelectionView) {
        let mut video_view = VideoView::new(view.video_wrapping_frame);
        video_view.set_fills_parent(true);
        view.video_view = Some(video_view);
    }

    /// Capture the first frame of `video`, cache it as `latest.png` and
    /// display it. On error nothing visible changes.
    pub fn set_thumbnail(
        &self,
        view: &mut SelectionView,
        video: &VideoReference,
    ) -> Result<(), SelectionError> {
        let frame = self
            .frames
            .copy_frame(video, THUMBNAIL_TIME)
            .map_err(|source| SelectionError::FrameExtractionFailed {
                video: video.clone(),
                source,
            })?;

        let dir = self
            .directories
            .get_directory(DirectoryKind::LatestThumb)
            .ok_or(SelectionError::DirectoryUnavailable)?;
        thumbnail::write_latest(&dir, &frame).map_err(SelectionError::EncodeFailed)?;

        view.thumbnail.set_image(frame);
        Ok(())
    }

    /// Play `video` muted and looping in the video view, replacing any
    /// current preview. If the player cannot be set up, the preview is
    /// torn down again and the view is left empty.
    pub fn set_preview(
        &mut self,
        view: &mut SelectionView,
        video: &VideoReference,
    ) -> Result<(), SelectionError> {
        let video_view = view
            .video_view
            .as_mut()
            .ok_or(SelectionError::ViewNotLoaded)?;

        let player = self.player.set(vec![video.clone()]);
        Self::set_up_video_view(video_view, player);

        if let Err(e) = self.start_muted_loop() {
            log::warn!("Could not preview {}: {}", video, e);
            self.player.clear();
            video_view.remove_all_sublayers();
            return Err(e.into());
        }
        log::info!("Previewing {}", video);
        Ok(())
    }

    /// Stop the preview and clear the video view. Safe when idle.
    pub fn remove_preview(&mut self, view: &mut SelectionView) {
        self.player.clear();
        if let Some(ref mut video_view) = view.video_view {
            video_view.remove_all_sublayers();
        }
    }

    /// Record `video` as the selected file.
    pub fn set_file_path(&self, view: &mut SelectionView, video: &VideoReference) {
        view.state.set_video_file(video.clone());
        log::info!("Selected {}", video);
    }

    pub fn show_error(&self, message: &str) {
        self.alerts.warning(message, Box::new(|| {}));
    }

    fn start_muted_loop(&mut self) -> Result<(), PlaybackError> {
        self.player.mute(true)?;
        self.player.set_loop(LoopMode::RepeatOne)?;
        self.player.start()
    }

    // Old layers go before the new one is attached
    fn set_up_video_view(video_view: &mut VideoView, player: PlayerHandle) {
        video_view.remove_all_sublayers();
        let layer = PlayerLayer::new(player).with_gravity(VideoGravity::ResizeAspect);
        video_view.set_player_layer(layer);
    }
}
