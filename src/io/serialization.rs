// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Settings and state serialization.
//!
//! The selection state is stored as JSON, the user configuration as YAML.

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;

/// Export a value to pretty JSON, creating the parent directory if needed.
pub fn export_json<T: Serialize>(data: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Import a value from JSON.
pub fn import_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let data = serde_json::from_str(&json)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(data)
}

/// Import a value from YAML.
pub fn import_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let yaml = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let data = serde_yaml::from_str(&yaml)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{selection::SelectionState, video::VideoReference};

    #[test]
    fn test_selection_state_survives_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("selection.json");

        let mut state = SelectionState::default();
        state.set_video_file(VideoReference::new("/videos/waves.mp4"));
        export_json(&state, &path).unwrap();

        let loaded: SelectionState = import_json(&path).unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn test_import_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result: Result<SelectionState> = import_json(&dir.path().join("absent.json"));
        assert!(result.is_err());
    }
}
