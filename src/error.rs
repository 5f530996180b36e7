// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Errors reported by the selection presenter.

use crate::io::{media::MediaError, thumbnail::ThumbnailError};
use crate::models::video::VideoReference;
use crate::playback::PlaybackError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("could not read the first frame of {video}: {source}")]
    FrameExtractionFailed {
        video: VideoReference,
        #[source]
        source: MediaError,
    },
    #[error("could not save the thumbnail: {0}")]
    EncodeFailed(#[source] ThumbnailError),
    #[error("the thumbnail cache directory is unavailable")]
    DirectoryUnavailable,
    #[error("could not start the preview: {0}")]
    PlaybackSetupFailed(#[from] PlaybackError),
    #[error("the video view has not been created yet")]
    ViewNotLoaded,
}

impl SelectionError {
    /// Title for the alert shown to the user.
    pub fn title(&self) -> &'static str {
        match self {
            SelectionError::FrameExtractionFailed { .. }
            | SelectionError::EncodeFailed(_)
            | SelectionError::DirectoryUnavailable => "Thumbnail unavailable",
            SelectionError::PlaybackSetupFailed(_) | SelectionError::ViewNotLoaded => {
                "Preview unavailable"
            }
        }
    }

    /// Text for the alert shown to the user.
    pub fn user_message(&self) -> String {
        format!("{}: {}", self.title(), self)
    }
}
