// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application configuration.
//!
//! Settings are read from `config.yaml` in the platform config directory
//! (or from the file named by `WALLPAPER_PLAY_CONFIG`). Every key is
//! optional; a missing file yields the defaults.

use crate::io::serialization;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Directory name used under the platform cache/config roots.
pub const APP_NAME: &str = "wallpaper-play";

/// Environment variable that points at an alternative config file.
pub const CONFIG_ENV_VAR: &str = "WALLPAPER_PLAY_CONFIG";

const CONFIG_FILE_NAME: &str = "config.yaml";

/// User-tunable settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root for cached thumbnails (defaults to the platform cache dir)
    pub cache_dir: Option<PathBuf>,
    /// Root for the persisted selection (defaults to the platform config dir)
    pub state_dir: Option<PathBuf>,
    pub ffmpeg_path: PathBuf,
    pub ffprobe_path: PathBuf,
    /// Preview frames wider than this are scaled down
    pub preview_max_width: u32,
    /// Panic on reported errors in debug builds
    pub fail_fast: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            state_dir: None,
            ffmpeg_path: PathBuf::from("ffmpeg"),
            ffprobe_path: PathBuf::from("ffprobe"),
            preview_max_width: 1280,
            fail_fast: false,
        }
    }
}

impl AppConfig {
    /// Location of the config file, if one can be determined.
    pub fn default_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join(APP_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load the configuration, falling back to defaults when no file exists.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.is_file() => {
                let config = serialization::import_yaml(&path)?;
                log::info!("Loaded configuration from {}", path.display());
                Ok(config)
            }
            _ => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: AppConfig =
            serde_yaml::from_str("preview_max_width: 640\nfail_fast: true\n").unwrap();

        assert_eq!(config.preview_max_width, 640);
        assert!(config.fail_fast);
        assert_eq!(config.ffmpeg_path, PathBuf::from("ffmpeg"));
        assert_eq!(config.cache_dir, None);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "cache_dir: /tmp/wallpaper-cache\n").unwrap();

        let config: AppConfig = serialization::import_yaml(&path).unwrap();
        assert_eq!(config.cache_dir, Some(PathBuf::from("/tmp/wallpaper-cache")));
        assert_eq!(config.preview_max_width, 1280);
    }

    #[test]
    fn test_malformed_yaml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "preview_max_width: [not, a, number]\n").unwrap();

        let result: Result<AppConfig> = serialization::import_yaml(&path);
        assert!(result.is_err());
    }
}
