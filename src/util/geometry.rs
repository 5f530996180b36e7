// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides the aspect-preserving fits used when drawing video
//! frames and when choosing preview decode sizes.

/// Largest rect with the aspect ratio of `content` that fits inside
/// `bounds`, centered. Nothing is cropped or stretched.
pub fn fit_aspect(content: egui::Vec2, bounds: egui::Rect) -> egui::Rect {
    if content.x <= 0.0 || content.y <= 0.0 || bounds.width() <= 0.0 || bounds.height() <= 0.0 {
        return egui::Rect::from_center_size(bounds.center(), egui::Vec2::ZERO);
    }

    let content_aspect = content.x / content.y;
    let bounds_aspect = bounds.width() / bounds.height();

    let size = if content_aspect > bounds_aspect {
        // Content is wider - fit to width
        egui::vec2(bounds.width(), bounds.width() / content_aspect)
    } else {
        // Content is taller - fit to height
        egui::vec2(bounds.height() * content_aspect, bounds.height())
    };

    egui::Rect::from_center_size(bounds.center(), size)
}

/// Scale `width` x `height` down so the width is at most `max_width`,
/// keeping the aspect ratio. Sizes already within the limit are unchanged.
pub fn fit_within_width(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if width <= max_width || width == 0 {
        return (width, height);
    }
    let scaled = (height as f64 * max_width as f64 / width as f64).round() as u32;
    (max_width, scaled.max(1))
}
