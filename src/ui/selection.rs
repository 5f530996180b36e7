// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Host view for the video selection screen.
//!
//! The presenter writes into this structure; the app lays it out.

use super::thumbnail_view::ThumbnailView;
use super::video_view::VideoView;
use crate::models::selection::SelectionState;

/// Widgets and state owned by the selection screen.
pub struct SelectionView {
    /// Frame of the container the video view fills
    pub video_wrapping_frame: egui::Rect,
    /// Render surface, created by `init_views`
    pub video_view: Option<VideoView>,
    pub thumbnail: ThumbnailView,
    pub state: SelectionState,
}

impl SelectionView {
    pub fn new(video_wrapping_frame: egui::Rect, state: SelectionState) -> Self {
        Self {
            video_wrapping_frame,
            video_view: None,
            thumbnail: ThumbnailView::new(),
            state,
        }
    }

    /// Whether a preview layer is currently attached.
    pub fn is_previewing(&self) -> bool {
        self.video_view
            .as_ref()
            .is_some_and(|view| !view.sublayers().is_empty())
    }
}
