// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations for media, cached thumbnails and settings files.

pub mod directories;
pub mod media;
pub mod serialization;
pub mod thumbnail;
