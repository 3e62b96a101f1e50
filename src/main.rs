// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! KeyCrop - Keyframe GIF Cropper
//!
//! A cross-platform desktop application for animated crop-and-pan of GIFs.
//! Crop rectangles are keyframed on a timeline, interpolated with easing,
//! and rendered by compiling the timeline into an encoder filter graph.

mod app;
mod editor;
mod error;
mod io;
mod models;
mod render;
mod ui;
mod util;

use anyhow::Result;
use app::KeyCropApp;

fn main() -> Result<()> {
    // Initialize logging (RUST_LOG overrides the default level)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = io::config::load_or_default();

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("KeyCrop - Keyframe GIF Cropper"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "KeyCrop",
        options,
        Box::new(|_cc| Ok(Box::new(KeyCropApp::new(settings)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
