// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Video render surface.
//!
//! A [`VideoView`] holds a stack of [`PlayerLayer`]s. Each layer draws the
//! latest frame of its player, uploaded to a texture only when the player
//! publishes a new one.

use crate::playback::PlayerHandle;
use crate::util::geometry::fit_aspect;
use std::time::Duration;

/// How a layer's video is placed inside the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoGravity {
    /// Fit inside the view, preserving aspect ratio
    #[default]
    ResizeAspect,
    /// Stretch to the view's bounds
    Resize,
}

impl VideoGravity {
    /// Where content of `content` size lands inside `bounds`.
    pub fn place(self, content: egui::Vec2, bounds: egui::Rect) -> egui::Rect {
        match self {
            VideoGravity::ResizeAspect => fit_aspect(content, bounds),
            VideoGravity::Resize => bounds,
        }
    }
}

/// Render layer bound to one player.
pub struct PlayerLayer {
    player: PlayerHandle,
    gravity: VideoGravity,
    texture: Option<egui::TextureHandle>,
    shown_serial: u64,
}

impl PlayerLayer {
    pub fn new(player: PlayerHandle) -> Self {
        Self {
            player,
            gravity: VideoGravity::default(),
            texture: None,
            shown_serial: 0,
        }
    }

    pub fn with_gravity(mut self, gravity: VideoGravity) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn gravity(&self) -> VideoGravity {
        self.gravity
    }

    /// Upload the player's newest frame, if it changed since the last call.
    fn sync_texture(&mut self, ctx: &egui::Context) {
        let Some((serial, frame)) = self.player.frame_since(self.shown_serial) else {
            return;
        };

        let size = [frame.width() as usize, frame.height() as usize];
        let image = egui::ColorImage::from_rgba_unmultiplied(size, frame.as_raw());
        match self.texture {
            Some(ref mut texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.texture =
                    Some(ctx.load_texture("preview_frame", image, egui::TextureOptions::LINEAR));
            }
        }
        self.shown_serial = serial;
    }

    fn paint(&self, painter: &egui::Painter, bounds: egui::Rect) {
        if let Some(ref texture) = self.texture {
            let rect = self.gravity.place(texture.size_vec2(), bounds);
            painter.image(
                texture.id(),
                rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }
    }
}

/// Surface the preview is rendered on.
pub struct VideoView {
    frame: egui::Rect,
    fills_parent: bool,
    sublayers: Vec<PlayerLayer>,
}

impl VideoView {
    /// Create a view occupying `frame`.
    pub fn new(frame: egui::Rect) -> Self {
        Self {
            frame,
            fills_parent: false,
            sublayers: Vec::new(),
        }
    }

    pub fn frame(&self) -> egui::Rect {
        self.frame
    }

    /// Track the parent's bounds on every layout pass.
    pub fn set_fills_parent(&mut self, fills: bool) {
        self.fills_parent = fills;
    }

    pub fn fills_parent(&self) -> bool {
        self.fills_parent
    }

    pub fn sublayers(&self) -> &[PlayerLayer] {
        &self.sublayers
    }

    /// Add a player layer on top of the stack.
    pub fn set_player_layer(&mut self, layer: PlayerLayer) {
        self.sublayers.push(layer);
    }

    pub fn remove_all_sublayers(&mut self) {
        self.sublayers.clear();
    }

    /// Lay out and draw the view inside `ui`.
    pub fn show(&mut self, ui: &mut egui::Ui) {
        if self.fills_parent {
            self.frame = ui.available_rect_before_wrap();
        }
        ui.allocate_rect(self.frame, egui::Sense::hover());

        let painter = ui.painter_at(self.frame);
        painter.rect_filled(self.frame, 0.0, egui::Color32::BLACK);
        for layer in &mut self.sublayers {
            layer.sync_texture(ui.ctx());
            layer.paint(&painter, self.frame);
        }

        if !self.sublayers.is_empty() {
            // Keep polling for decoded frames
            ui.ctx().request_repaint_after(Duration::from_millis(15));
        }
    }
}
