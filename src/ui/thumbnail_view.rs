// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Thumbnail display widget.

use crate::util::geometry::fit_aspect;
use image::RgbaImage;
use std::sync::Arc;

/// Shows the thumbnail of the selected video, if any.
#[derive(Default)]
pub struct ThumbnailView {
    image: Option<Arc<RgbaImage>>,
    texture: Option<egui::TextureHandle>,
}

impl ThumbnailView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the displayed image. The texture is rebuilt on the next draw.
    pub fn set_image(&mut self, image: RgbaImage) {
        self.image = Some(Arc::new(image));
        self.texture = None;
    }

    pub fn image(&self) -> Option<&RgbaImage> {
        self.image.as_deref()
    }

    /// Draw the thumbnail fitted into a box of `size`.
    pub fn show(&mut self, ui: &mut egui::Ui, size: egui::Vec2) {
        let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 4.0, egui::Color32::from_gray(30));

        let Some(ref image) = self.image else {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "No video selected",
                egui::FontId::proportional(14.0),
                egui::Color32::from_gray(160),
            );
            return;
        };

        let texture = self.texture.get_or_insert_with(|| {
            let size = [image.width() as usize, image.height() as usize];
            let color_image = egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw());
            ui.ctx()
                .load_texture("thumbnail", color_image, egui::TextureOptions::LINEAR)
        });

        painter.image(
            texture.id(),
            fit_aspect(texture.size_vec2(), rect),
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        assert!(ThumbnailView::new().image().is_none());
    }

    #[test]
    fn test_set_image_replaces_previous() {
        let mut view = ThumbnailView::new();
        view.set_image(RgbaImage::new(4, 4));
        view.set_image(RgbaImage::new(16, 9));
        assert_eq!(view.image().map(|i| i.dimensions()), Some((16, 9)));
    }
}
