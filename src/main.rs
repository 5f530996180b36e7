// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! wallpaper-play - video wallpaper selector
//!
//! A cross-platform desktop application for choosing a local video as a
//! wallpaper: it shows the video's thumbnail and a muted looping preview,
//! and remembers the selection.

mod app;
mod config;
mod error;
mod io;
mod models;
mod playback;
mod presenter;
mod ui;
mod util;

use anyhow::Result;
use app::WallpaperApp;
use config::AppConfig;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load().unwrap_or_else(|e| {
        log::error!("Using default configuration: {:#}", e);
        AppConfig::default()
    });

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 600.0])
            .with_min_inner_size([720.0, 420.0])
            .with_title("Wallpaper Play - Select Video"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "wallpaper-play",
        options,
        Box::new(|_cc| Ok(Box::new(WallpaperApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
