// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Crop properties panel.
//!
//! This module provides the side panel for locking the output resolution,
//! managing keyframes, editing the crop numerically and exporting.

use crate::models::{
    crop::CropRect,
    project::Project,
    timeline::{Direction, InterpolationKind, KeyframeStatus},
};

/// Actions triggered from the properties panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertiesAction {
    None,
    LockOutput { width: u32, height: u32 },
    UnlockOutput,
    AddKeyframe,
    RemoveKeyframe,
    JumpToKeyframe(Direction),
    SetInterpolation(InterpolationKind),
    SetSelection(CropRect),
    Export,
    CancelRender,
}

/// Progress of a running render, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderProgress {
    pub frame: u32,
    pub total: u32,
}

/// Display the properties panel.
///
/// `output_size` holds the width and height being typed into the lock
/// fields. `render` is set while an export is running; keyframe edits are
/// disabled for its duration.
pub fn show(
    ui: &mut egui::Ui,
    project: &Project,
    output_size: &mut (u32, u32),
    render: Option<RenderProgress>,
) -> PropertiesAction {
    let mut action = PropertiesAction::None;
    let editable = render.is_none();

    ui.heading("Crop");
    ui.separator();

    egui::ScrollArea::vertical().show(ui, |ui| {
        ui.add_enabled_ui(editable, |ui| {
            output_group(ui, project, output_size, &mut action);
            ui.add_space(8.0);
            keyframe_group(ui, project, &mut action);
        });
        ui.add_space(8.0);
        selection_group(ui, project, &mut action);
        ui.add_space(8.0);
        export_group(ui, project, render, &mut action);
    });

    action
}

fn output_group(
    ui: &mut egui::Ui,
    project: &Project,
    output_size: &mut (u32, u32),
    action: &mut PropertiesAction,
) {
    ui.group(|ui| {
        ui.label(egui::RichText::new("Output Resolution").strong());
        let locked = project.lock();

        egui::Grid::new("output_grid").num_columns(2).show(ui, |ui| {
            ui.label("Width:");
            ui.add_enabled(
                locked.is_none(),
                egui::DragValue::new(&mut output_size.0)
                    .range(1..=16384)
                    .suffix(" px"),
            );
            ui.end_row();

            ui.label("Height:");
            ui.add_enabled(
                locked.is_none(),
                egui::DragValue::new(&mut output_size.1)
                    .range(1..=16384)
                    .suffix(" px"),
            );
            ui.end_row();
        });

        match locked {
            Some(lock) => {
                ui.label(
                    egui::RichText::new(format!("🔒 {} × {}", lock.width, lock.height))
                        .color(egui::Color32::from_rgb(0xa6, 0xe3, 0xa1)),
                );
                if ui.button("Unlock").clicked() {
                    *action = PropertiesAction::UnlockOutput;
                }
            }
            None => {
                if ui.button("Lock Ratio & Resolution").clicked() {
                    *action = PropertiesAction::LockOutput {
                        width: output_size.0,
                        height: output_size.1,
                    };
                }
            }
        }
    });
}

fn keyframe_group(ui: &mut egui::Ui, project: &Project, action: &mut PropertiesAction) {
    ui.group(|ui| {
        ui.label(egui::RichText::new("Keyframes").strong());
        let locked = project.is_locked();
        let has_keyframes = !project.timeline.is_empty();
        let on_keyframe = project.timeline.get(project.current_frame()).is_some();

        ui.horizontal(|ui| {
            if ui
                .add_enabled(has_keyframes, egui::Button::new("◀"))
                .on_hover_text("Previous keyframe (Shift+←)")
                .clicked()
            {
                *action = PropertiesAction::JumpToKeyframe(Direction::Prev);
            }
            if ui
                .add_enabled(locked, egui::Button::new("◆ Add"))
                .on_hover_text("Add or replace keyframe")
                .clicked()
            {
                *action = PropertiesAction::AddKeyframe;
            }
            if ui
                .add_enabled(on_keyframe, egui::Button::new("✖ Del"))
                .on_hover_text("Remove keyframe")
                .clicked()
            {
                *action = PropertiesAction::RemoveKeyframe;
            }
            if ui
                .add_enabled(has_keyframes, egui::Button::new("▶"))
                .on_hover_text("Next keyframe (Shift+→)")
                .clicked()
            {
                *action = PropertiesAction::JumpToKeyframe(Direction::Next);
            }
        });

        ui.label(status_text(project.timeline.status(project.current_frame())));

        let current = project.timeline.interpolation();
        let mut selected = current;
        egui::ComboBox::from_id_source("interpolation")
            .selected_text(current.label())
            .show_ui(ui, |ui| {
                for kind in InterpolationKind::ALL {
                    ui.selectable_value(&mut selected, kind, kind.label());
                }
            });
        if selected != current {
            *action = PropertiesAction::SetInterpolation(selected);
        }
    });
}

fn selection_group(ui: &mut egui::Ui, project: &Project, action: &mut PropertiesAction) {
    ui.group(|ui| {
        ui.label(egui::RichText::new("Selection").strong());
        let Some(rect) = project.editor.selection() else {
            ui.label(egui::RichText::new("No selection").italics().weak());
            return;
        };

        let image = project.source.size;
        let mut edited = rect;
        egui::Grid::new("selection_grid").num_columns(2).show(ui, |ui| {
            ui.label("X:");
            ui.add(
                egui::DragValue::new(&mut edited.x)
                    .range(0.0..=image.w())
                    .max_decimals(1),
            );
            ui.end_row();

            ui.label("Y:");
            ui.add(
                egui::DragValue::new(&mut edited.y)
                    .range(0.0..=image.h())
                    .max_decimals(1),
            );
            ui.end_row();

            ui.label("W:");
            ui.add(
                egui::DragValue::new(&mut edited.width)
                    .range(1.0..=image.w())
                    .max_decimals(1),
            );
            ui.end_row();

            ui.label("H:");
            ui.add_enabled(
                project.editor.aspect_ratio().is_none(),
                egui::DragValue::new(&mut edited.height)
                    .range(1.0..=image.h())
                    .max_decimals(1),
            );
            ui.end_row();
        });

        if edited != rect {
            *action = PropertiesAction::SetSelection(edited);
        }
    });
}

fn export_group(
    ui: &mut egui::Ui,
    project: &Project,
    render: Option<RenderProgress>,
    action: &mut PropertiesAction,
) {
    ui.group(|ui| {
        ui.label(egui::RichText::new("Export").strong());
        match render {
            Some(progress) => {
                let fraction = if progress.total == 0 {
                    0.0
                } else {
                    progress.frame as f32 / progress.total as f32
                };
                ui.add(
                    egui::ProgressBar::new(fraction)
                        .show_percentage()
                        .text(format!("{} / {} frames", progress.frame, progress.total)),
                );
                if ui.button("Cancel").clicked() {
                    *action = PropertiesAction::CancelRender;
                }
            }
            None => {
                let ready = project.is_locked() && !project.timeline.is_empty();
                if ui
                    .add_enabled(ready, egui::Button::new("💾 Export GIF..."))
                    .clicked()
                {
                    *action = PropertiesAction::Export;
                }
                if !ready {
                    ui.label(
                        egui::RichText::new("Lock the output and add a keyframe to export")
                            .italics()
                            .weak(),
                    );
                }
            }
        }
    });
}

/// Human-readable keyframe status for the current frame.
pub fn status_text(status: KeyframeStatus) -> String {
    match status {
        KeyframeStatus::Empty => "No keyframes".to_string(),
        KeyframeStatus::OnKeyframe { index, total } => {
            format!("On keyframe {} of {}", index, total)
        }
        KeyframeStatus::HoldingStart => "Holding first keyframe".to_string(),
        KeyframeStatus::HoldingEnd => "Holding last keyframe".to_string(),
        KeyframeStatus::Interpolating => "Interpolating".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_text() {
        assert_eq!(status_text(KeyframeStatus::Empty), "No keyframes");
        assert_eq!(
            status_text(KeyframeStatus::OnKeyframe { index: 2, total: 3 }),
            "On keyframe 2 of 3"
        );
        assert_eq!(status_text(KeyframeStatus::Interpolating), "Interpolating");
    }
}
