// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Thumbnail cache.
//!
//! Only the most recent thumbnail is kept, as `latest.png` in the
//! thumbnail cache directory. Each write replaces the previous file.

use image::{ImageFormat, RgbaImage};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the cached thumbnail.
pub const LATEST_THUMBNAIL_FILE: &str = "latest.png";

#[derive(Debug, Error)]
pub enum ThumbnailError {
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Path of the cached thumbnail inside `dir`.
pub fn latest_path(dir: &Path) -> PathBuf {
    dir.join(LATEST_THUMBNAIL_FILE)
}

/// Encode `image` as PNG and store it as `dir/latest.png`.
///
/// The PNG is encoded in memory and written to a sibling temp file that is
/// renamed over `latest.png`, so a failure leaves any previous file intact.
pub fn write_latest(dir: &Path, image: &RgbaImage) -> Result<PathBuf, ThumbnailError> {
    let mut png = Vec::new();
    image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

    let target = latest_path(dir);
    let staging = dir.join(format!("{}.tmp", LATEST_THUMBNAIL_FILE));
    fs::write(&staging, &png).map_err(|source| ThumbnailError::Write {
        path: staging.clone(),
        source,
    })?;
    if let Err(source) = fs::rename(&staging, &target) {
        let _ = fs::remove_file(&staging);
        return Err(ThumbnailError::Write {
            path: target,
            source,
        });
    }

    log::info!(
        "Cached thumbnail {}x{} at {}",
        image.width(),
        image.height(),
        target.display()
    );
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_write_latest_creates_png() {
        let dir = tempfile::tempdir().unwrap();
        let frame = RgbaImage::from_pixel(32, 18, Rgba([10, 20, 30, 255]));

        let path = write_latest(dir.path(), &frame).unwrap();
        assert_eq!(path, dir.path().join("latest.png"));

        let decoded = image::open(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (32, 18));
        assert!(!dir.path().join("latest.png.tmp").exists());
    }

    #[test]
    fn test_write_latest_overwrites_previous() {
        let dir = tempfile::tempdir().unwrap();
        write_latest(dir.path(), &RgbaImage::new(8, 8)).unwrap();
        write_latest(dir.path(), &RgbaImage::new(16, 4)).unwrap();

        let decoded = image::open(latest_path(dir.path())).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 4));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone");

        let result = write_latest(&missing, &RgbaImage::new(4, 4));
        assert!(matches!(result, Err(ThumbnailError::Write { .. })));
    }

    #[test]
    fn test_failed_staging_write_keeps_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        write_latest(dir.path(), &RgbaImage::new(8, 8)).unwrap();
        let before = std::fs::read(latest_path(dir.path())).unwrap();
        std::fs::create_dir(dir.path().join("latest.png.tmp")).unwrap();

        let result = write_latest(dir.path(), &RgbaImage::new(16, 4));
        assert!(matches!(result, Err(ThumbnailError::Write { .. })));
        assert_eq!(std::fs::read(latest_path(dir.path())).unwrap(), before);
    }
}
