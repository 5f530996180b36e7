// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the selection screen.

pub mod alert;
pub mod selection;
pub mod thumbnail_view;
pub mod video_view;
