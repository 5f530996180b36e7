// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application directory resolution.

use crate::config::{AppConfig, APP_NAME};
use std::fs;
use std::path::PathBuf;

/// Well-known application directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryKind {
    /// Holds the cached `latest.png` thumbnail
    LatestThumb,
    /// Holds the persisted selection state
    State,
}

/// Resolves (and creates) application directories.
pub trait DirectoryResolver {
    /// Path of the directory for `kind`, or `None` when it cannot be provided.
    fn get_directory(&self, kind: DirectoryKind) -> Option<PathBuf>;
}

/// Directories under the platform cache/config roots.
///
/// On Linux the thumbnail lands in `~/.cache/wallpaper-play/thumbnail`.
#[derive(Debug, Clone)]
pub struct AppDirectories {
    cache_root: Option<PathBuf>,
    state_root: Option<PathBuf>,
}

impl AppDirectories {
    pub fn new(cache_root: Option<PathBuf>, state_root: Option<PathBuf>) -> Self {
        Self {
            cache_root,
            state_root,
        }
    }

    /// Use the configured overrides, else the platform defaults.
    pub fn from_config(config: &AppConfig) -> Self {
        let cache_root = config
            .cache_dir
            .clone()
            .or_else(|| dirs::cache_dir().map(|dir| dir.join(APP_NAME)));
        let state_root = config
            .state_dir
            .clone()
            .or_else(|| dirs::config_dir().map(|dir| dir.join(APP_NAME)));
        Self::new(cache_root, state_root)
    }
}

impl DirectoryResolver for AppDirectories {
    fn get_directory(&self, kind: DirectoryKind) -> Option<PathBuf> {
        let path = match kind {
            DirectoryKind::LatestThumb => self.cache_root.as_ref()?.join("thumbnail"),
            DirectoryKind::State => self.state_root.clone()?,
        };

        // Ensure the directory exists
        if let Err(e) = fs::create_dir_all(&path) {
            log::error!("Could not create {}: {}", path.display(), e);
            return None;
        }
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_thumbnail_directory() {
        let root = tempfile::tempdir().unwrap();
        let dirs = AppDirectories::new(Some(root.path().to_path_buf()), None);

        let thumb = dirs.get_directory(DirectoryKind::LatestThumb).unwrap();
        assert_eq!(thumb, root.path().join("thumbnail"));
        assert!(thumb.is_dir());
    }

    #[test]
    fn test_missing_root_resolves_to_none() {
        let dirs = AppDirectories::new(None, None);
        assert_eq!(dirs.get_directory(DirectoryKind::LatestThumb), None);
        assert_eq!(dirs.get_directory(DirectoryKind::State), None);
    }

    #[test]
    fn test_uncreatable_directory_resolves_to_none() {
        let root = tempfile::tempdir().unwrap();
        // A regular file where the cache root should be
        let blocker = root.path().join("blocker");
        std::fs::write(&blocker, b"x").unwrap();

        let dirs = AppDirectories::new(Some(blocker), None);
        assert_eq!(dirs.get_directory(DirectoryKind::LatestThumb), None);
    }
}
