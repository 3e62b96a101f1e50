// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Playback and view toolbar.
//!
//! This module provides the transport buttons for stepping through the
//! animation and the zoom control for the canvas.

use crate::io::config::ViewSettings;

/// Actions triggered from the toolbar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToolbarAction {
    None,
    TogglePlay,
    Stop,
    Step(i64),
    JumpToStart,
    JumpToEnd,
    SetZoom(f64),
    ShowShortcuts,
}

/// Display the toolbar.
pub fn show(ui: &mut egui::Ui, playing: bool, zoom: f64, view: &ViewSettings) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        if ui.button("⏮").on_hover_text("First frame (Ctrl+←)").clicked() {
            action = ToolbarAction::JumpToStart;
        }
        if ui.button("⏪").on_hover_text("Previous frame (←)").clicked() {
            action = ToolbarAction::Step(-1);
        }
        let play_label = if playing { "⏸ Pause" } else { "▶ Play" };
        if ui.button(play_label).on_hover_text("Play / pause (Space)").clicked() {
            action = ToolbarAction::TogglePlay;
        }
        if ui.button("⏹ Stop").clicked() {
            action = ToolbarAction::Stop;
        }
        if ui.button("⏩").on_hover_text("Next frame (→)").clicked() {
            action = ToolbarAction::Step(1);
        }
        if ui.button("⏭").on_hover_text("Last frame (Ctrl+→)").clicked() {
            action = ToolbarAction::JumpToEnd;
        }

        ui.separator();

        ui.label("Zoom:");
        if ui.button("−").on_hover_text("Zoom out").clicked() {
            action = ToolbarAction::SetZoom(view.step_zoom(zoom, -1));
        }
        let min = (view.min_zoom * 100.0).round() as u32;
        let max = (view.max_zoom * 100.0).round().max(min as f64) as u32;
        let mut percent = (zoom * 100.0).round() as u32;
        if ui
            .add(
                egui::Slider::new(&mut percent, min..=max)
                    .step_by((view.zoom_step * 100.0).max(1.0))
                    .suffix("%"),
            )
            .changed()
        {
            action = ToolbarAction::SetZoom(percent as f64 / 100.0);
        }
        if ui.button("+").on_hover_text("Zoom in").clicked() {
            action = ToolbarAction::SetZoom(view.step_zoom(zoom, 1));
        }
        if ui.button("100%").clicked() {
            action = ToolbarAction::SetZoom(1.0);
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("⌨ Shortcuts").clicked() {
                action = ToolbarAction::ShowShortcuts;
            }
            ui.label(
                egui::RichText::new("Drag to select, Ctrl+scroll to zoom")
                    .italics()
                    .weak(),
            );
        });
    });

    action
}
