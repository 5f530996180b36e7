// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Persisted selection state.
//!
//! The selection screen records the chosen video here; the record is saved
//! as JSON so the choice survives restarts.

use super::video::VideoReference;
use serde::{Deserialize, Serialize};

/// The user's current wallpaper selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    pub video_file: Option<VideoReference>,
}

impl SelectionState {
    /// Record `video` as the selected file.
    pub fn set_video_file(&mut self, video: VideoReference) {
        self.video_file = Some(video);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_selection() {
        assert_eq!(SelectionState::default().video_file, None);
    }

    #[test]
    fn test_missing_field_deserializes_to_none() {
        let state: SelectionState = serde_json::from_str("{}").unwrap();
        assert_eq!(state, SelectionState::default());
    }
}
