// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Frame timeline scrubber.
//!
//! This module provides the scrubber for navigating through the frames of
//! the animation, with a marker drawn at every keyframe.

use crate::models::project::Project;

pub const KEYFRAME_COLOR: egui::Color32 = egui::Color32::from_rgb(0xf3, 0x8b, 0xa8);

/// Display the scrubber and return the frame to seek to, if it moved.
pub fn show(ui: &mut egui::Ui, project: &Project) -> Option<u32> {
    let last = project.last_frame();
    let mut frame = project.current_frame();
    let mut seek = None;

    ui.horizontal(|ui| {
        ui.label(
            egui::RichText::new(format!("Frame {:>4} / {}", frame, last))
                .monospace(),
        );
        if let Some(fps) = project.source.frame_rate {
            ui.label(egui::RichText::new(format!("{:.2} fps", fps)).weak());
        }

        ui.spacing_mut().slider_width = (ui.available_width() - 16.0).max(100.0);
        let response = ui.add_enabled(
            last > 0,
            egui::Slider::new(&mut frame, 0..=last).show_value(false),
        );
        if response.changed() {
            seek = Some(frame);
        }

        draw_markers(ui, response.rect, project, last);
    });

    seek
}

fn draw_markers(ui: &egui::Ui, slider: egui::Rect, project: &Project, last: u32) {
    if last == 0 {
        return;
    }

    // The rail is inset by the handle radius on both ends.
    let inset = slider.height() / 2.5;
    let left = slider.left() + inset;
    let span = (slider.width() - 2.0 * inset).max(1.0);
    let y = slider.center().y;
    let half = 5.0;

    let painter = ui.painter();
    for frame in project.timeline.frames() {
        let x = left + span * frame as f32 / last as f32;
        let diamond = vec![
            egui::pos2(x, y - half),
            egui::pos2(x + half, y),
            egui::pos2(x, y + half),
            egui::pos2(x - half, y),
        ];
        painter.add(egui::Shape::convex_polygon(
            diamond,
            KEYFRAME_COLOR,
            egui::Stroke::new(1.0, egui::Color32::BLACK),
        ));
    }
}
