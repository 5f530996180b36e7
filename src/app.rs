// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! `WallpaperApp` hosts the selection screen: it owns the view the presenter
//! writes into, turns user input into presenter calls, decides how failures
//! are surfaced and persists the selection.

use crate::config::AppConfig;
use crate::error::SelectionError;
use crate::io::directories::{AppDirectories, DirectoryKind, DirectoryResolver};
use crate::io::media::FrameExtractor;
use crate::io::serialization;
use crate::models::{
    selection::SelectionState,
    video::{VideoReference, VIDEO_EXTENSIONS},
};
use crate::playback::ffmpeg::FfmpegPlayer;
use crate::presenter::VideoSelectionPresenter;
use crate::ui::alert::AlertQueue;
use crate::ui::selection::SelectionView;
use std::path::{Path, PathBuf};

/// File name of the persisted selection.
const STATE_FILE_NAME: &str = "selection.json";

/// Size of the thumbnail box in the side panel.
const THUMBNAIL_SIZE: egui::Vec2 = egui::vec2(240.0, 135.0);

/// Requests raised by the UI during a frame, handled after drawing.
enum UiAction {
    None,
    PickVideo,
    RestartPreview,
    RemovePreview,
}

/// Main application state.
pub struct WallpaperApp {
    presenter: VideoSelectionPresenter,
    view: SelectionView,
    alerts: AlertQueue,
    config: AppConfig,
    /// Where the selection is saved (if a state directory exists)
    state_path: Option<PathBuf>,
}

impl WallpaperApp {
    /// Create the application with production collaborators.
    pub fn new(config: AppConfig) -> Self {
        let directories = AppDirectories::from_config(&config);
        let state_path = directories
            .get_directory(DirectoryKind::State)
            .map(|dir| dir.join(STATE_FILE_NAME));
        let state = state_path.as_deref().map(load_state).unwrap_or_default();

        let alerts = AlertQueue::new();
        let presenter = VideoSelectionPresenter::new(
            Box::new(FfmpegPlayer::from_config(&config)),
            Box::new(alerts.clone()),
            frame_extractor(&config),
            Box::new(directories),
        );

        let wrapping_frame =
            egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(640.0, 360.0));
        let mut view = SelectionView::new(wrapping_frame, state);
        presenter.init_views(&mut view);

        let mut app = Self {
            presenter,
            view,
            alerts,
            config,
            state_path,
        };
        app.restore_selection();
        app
    }

    /// Select `path` as the wallpaper video: record it, then show its
    /// thumbnail and preview.
    pub fn select_video(&mut self, path: PathBuf) {
        let video = VideoReference::from(path);

        self.presenter.set_file_path(&mut self.view, &video);
        self.save_state();

        if let Err(e) = self.presenter.set_thumbnail(&mut self.view, &video) {
            self.report(e);
        }
        if let Err(e) = self.presenter.set_preview(&mut self.view, &video) {
            self.report(e);
        }
    }

    /// Show the saved selection again, if its file is still there.
    fn restore_selection(&mut self) {
        let Some(video) = self.view.state.video_file.clone() else {
            return;
        };
        if !video.exists() {
            log::warn!("Saved video {} no longer exists", video);
            return;
        }

        log::info!("Restoring selection {}", video);
        if let Err(e) = self.presenter.set_thumbnail(&mut self.view, &video) {
            self.report(e);
        }
        self.restart_preview();
    }

    fn restart_preview(&mut self) {
        if let Some(video) = self.view.state.video_file.clone() {
            if let Err(e) = self.presenter.set_preview(&mut self.view, &video) {
                self.report(e);
            }
        }
    }

    /// Log a failure and tell the user about it.
    fn report(&self, error: SelectionError) {
        log::error!("{}", error);
        if self.config.fail_fast && cfg!(debug_assertions) {
            panic!("{}", error);
        }
        self.presenter.show_error(&error.user_message());
    }

    fn save_state(&self) {
        if let Some(ref path) = self.state_path {
            match serialization::export_json(&self.view.state, path) {
                Ok(()) => log::info!("Saved selection to {}", path.display()),
                Err(e) => log::error!("Failed to save selection: {:#}", e),
            }
        }
    }

    fn pick_video() -> Option<PathBuf> {
        rfd::FileDialog::new()
            .add_filter("Videos", VIDEO_EXTENSIONS)
            .pick_file()
    }

    fn show_side_panel(&mut self, ui: &mut egui::Ui) -> UiAction {
        let mut action = UiAction::None;

        ui.heading("Thumbnail");
        ui.add_space(4.0);
        self.view.thumbnail.show(ui, THUMBNAIL_SIZE);
        ui.add_space(8.0);

        let selected = self
            .view
            .state
            .video_file
            .as_ref()
            .map(VideoReference::display_name)
            .unwrap_or_else(|| "None".to_string());
        ui.label(egui::RichText::new(format!("Selected: {}", selected)).strong());
        if let Some(ref video) = self.view.state.video_file {
            ui.label(egui::RichText::new(video.to_string()).small().weak());
        }

        ui.add_space(8.0);
        if ui.button("Select Video...").clicked() {
            action = UiAction::PickVideo;
        }
        ui.horizontal(|ui| {
            let can_restart = self.view.state.video_file.is_some();
            if ui
                .add_enabled(can_restart, egui::Button::new("▶ Preview"))
                .clicked()
            {
                action = UiAction::RestartPreview;
            }
            if ui
                .add_enabled(self.view.is_previewing(), egui::Button::new("■ Stop"))
                .clicked()
            {
                action = UiAction::RemovePreview;
            }
        });

        action
    }
}

impl eframe::App for WallpaperApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut action = UiAction::None;

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Select Video...").clicked() {
                        action = UiAction::PickVideo;
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("Preview", |ui| {
                    if ui.button("Restart Preview").clicked() {
                        action = UiAction::RestartPreview;
                        ui.close_menu();
                    }
                    if ui.button("Remove Preview").clicked() {
                        action = UiAction::RemovePreview;
                        ui.close_menu();
                    }
                });
            });
        });

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            let status = match self.presenter.playback().items().first() {
                Some(video) if self.view.is_previewing() => {
                    format!("Previewing {}", video.display_name())
                }
                _ => "No preview".to_string(),
            };
            ui.label(egui::RichText::new(status).weak());
        });

        // Selection panel (left side)
        let panel_action = egui::SidePanel::left("selection")
            .default_width(260.0)
            .show(ctx, |ui| self.show_side_panel(ui))
            .inner;
        if !matches!(panel_action, UiAction::None) {
            action = panel_action;
        }

        // Preview (center)
        egui::CentralPanel::default().show(ctx, |ui| {
            self.view.video_wrapping_frame = ui.available_rect_before_wrap();
            if let Some(ref mut video_view) = self.view.video_view {
                video_view.show(ui);
            }
        });

        self.alerts.show(ctx);

        match action {
            UiAction::PickVideo => {
                if let Some(path) = Self::pick_video() {
                    self.select_video(path);
                }
            }
            UiAction::RestartPreview => self.restart_preview(),
            UiAction::RemovePreview => {
                self.presenter.remove_preview(&mut self.view);
                log::info!("Preview removed");
            }
            UiAction::None => {}
        }
    }
}

/// Load the saved selection, falling back to an empty one.
fn load_state(path: &Path) -> SelectionState {
    if !path.is_file() {
        return SelectionState::default();
    }
    match serialization::import_json(path) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Ignoring saved selection: {:#}", e);
            SelectionState::default()
        }
    }
}

#[cfg(feature = "video-opencv")]
fn frame_extractor(_config: &AppConfig) -> Box<dyn FrameExtractor> {
    Box::new(crate::io::media::OpenCvFrameExtractor)
}

#[cfg(not(feature = "video-opencv"))]
fn frame_extractor(config: &AppConfig) -> Box<dyn FrameExtractor> {
    Box::new(crate::io::media::FfmpegFrameExtractor::new(
        config.ffmpeg_path.clone(),
    ))
}
