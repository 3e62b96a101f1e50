// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Crop canvas for frame display and selection editing.
//!
//! This module draws the current frame at the editor's zoom, dims the
//! area outside the crop, draws the resize handles and turns pointer
//! drags into editor events.

use crate::editor::{
    handles::{Handle, HandleGeometry},
    EditMode, EditSession, HoverTarget, PointerEvent,
};
use crate::util::geometry::{canvas_to_local, rect_to_canvas};

pub const BORDER_COLOR: egui::Color32 = egui::Color32::from_rgb(0xcb, 0xa6, 0xf7);
pub const HANDLE_COLOR: egui::Color32 = egui::Color32::WHITE;
const OVERLAY_ALPHA: u8 = 180;

/// Display the frame and collect pointer events for the editor.
pub fn show(
    ui: &mut egui::Ui,
    editor: &EditSession,
    texture: &egui::TextureHandle,
) -> Vec<PointerEvent> {
    let mut events = Vec::new();
    let zoom = editor.zoom();
    let image = editor.image();
    let display_size = egui::vec2(
        (image.w() * zoom).round() as f32,
        (image.h() * zoom).round() as f32,
    );

    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_rgb(0x11, 0x11, 0x1b);

    egui::ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let (image_rect, response) =
                ui.allocate_exact_size(display_size, egui::Sense::click_and_drag());
            let origin = image_rect.min;

            let painter = ui.painter_at(image_rect);
            painter.image(
                texture.id(),
                image_rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );

            if response.drag_started() {
                let press = ui
                    .input(|i| i.pointer.press_origin())
                    .or(response.interact_pointer_pos());
                if let Some(pos) = press {
                    events.push(PointerEvent::Press(canvas_to_local(pos, origin)));
                }
            }
            if response.dragged() {
                if let Some(pos) = response.interact_pointer_pos() {
                    events.push(PointerEvent::Move(canvas_to_local(pos, origin)));
                }
            }
            if response.drag_stopped() {
                events.push(PointerEvent::Release);
            }

            let cursor = match editor.mode() {
                EditMode::Idle => response
                    .hover_pos()
                    .map(|pos| hover_cursor(editor.hover_target(canvas_to_local(pos, origin)))),
                EditMode::Creating { .. } => Some(egui::CursorIcon::Crosshair),
                EditMode::Moving { .. } => Some(egui::CursorIcon::Move),
                EditMode::Resizing { handle, .. } => Some(handle_cursor(handle)),
            };
            if let Some(icon) = cursor {
                ui.ctx().set_cursor_icon(icon);
            }

            draw_selection(&painter, editor, image_rect);
        });

    events
}

fn draw_selection(painter: &egui::Painter, editor: &EditSession, image_rect: egui::Rect) {
    let raw = editor.raw_rect();
    if raw.width <= 0.0 && raw.height <= 0.0 {
        return;
    }

    let zoom = editor.zoom();
    let crop = rect_to_canvas(&raw, zoom, image_rect.min);
    let overlay = egui::Color32::from_black_alpha(OVERLAY_ALPHA);

    // Dim everything outside the crop.
    let bands = [
        egui::Rect::from_min_max(image_rect.min, egui::pos2(image_rect.max.x, crop.min.y)),
        egui::Rect::from_min_max(egui::pos2(image_rect.min.x, crop.max.y), image_rect.max),
        egui::Rect::from_min_max(
            egui::pos2(image_rect.min.x, crop.min.y),
            egui::pos2(crop.min.x, crop.max.y),
        ),
        egui::Rect::from_min_max(
            egui::pos2(crop.max.x, crop.min.y),
            egui::pos2(image_rect.max.x, crop.max.y),
        ),
    ];
    for band in bands {
        if band.is_positive() {
            painter.rect_filled(band, 0.0, overlay);
        }
    }

    painter.rect_stroke(crop, 0.0, egui::Stroke::new(2.0, BORDER_COLOR));

    let Some(screen_rect) = editor.screen_rect() else {
        return;
    };
    let geometry = editor.handles();
    for handle in HandleGeometry::active(editor.aspect_ratio().is_some()) {
        let r = geometry.visual_rect(*handle, &screen_rect);
        let rect = egui::Rect::from_min_size(
            image_rect.min + egui::vec2(r.x as f32, r.y as f32),
            egui::vec2(r.width as f32, r.height as f32),
        );
        painter.rect_filled(rect, 0.0, HANDLE_COLOR);
        painter.rect_stroke(rect, 0.0, egui::Stroke::new(1.0, BORDER_COLOR));
    }
}

fn hover_cursor(target: HoverTarget) -> egui::CursorIcon {
    match target {
        HoverTarget::Handle(handle) => handle_cursor(handle),
        HoverTarget::Inside => egui::CursorIcon::Move,
        HoverTarget::Outside => egui::CursorIcon::Crosshair,
    }
}

fn handle_cursor(handle: Handle) -> egui::CursorIcon {
    match handle {
        Handle::TopLeft | Handle::BottomRight => egui::CursorIcon::ResizeNwSe,
        Handle::TopRight | Handle::BottomLeft => egui::CursorIcon::ResizeNeSw,
        Handle::Top | Handle::Bottom => egui::CursorIcon::ResizeVertical,
        Handle::Left | Handle::Right => egui::CursorIcon::ResizeHorizontal,
    }
}

/// Welcome message shown when nothing is loaded.
pub fn show_welcome(ui: &mut egui::Ui) {
    ui.centered_and_justified(|ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            ui.heading(
                egui::RichText::new("KeyCrop")
                    .size(32.0)
                    .color(egui::Color32::from_gray(200)),
            );
            ui.label(
                egui::RichText::new("Keyframed crop and pan for animated GIFs")
                    .size(14.0)
                    .color(egui::Color32::from_gray(150)),
            );
            ui.add_space(20.0);
            ui.label(
                egui::RichText::new("Open a GIF to begin cropping")
                    .color(egui::Color32::from_gray(180)),
            );
            ui.add_space(10.0);
            ui.label(
                egui::RichText::new("File → Open GIF...")
                    .weak()
                    .color(egui::Color32::from_gray(130)),
            );
        });
    });
}

/// Spinner with a message while media is loading.
pub fn show_loading(ui: &mut egui::Ui, message: &str) {
    ui.centered_and_justified(|ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            ui.spinner();
            ui.add_space(10.0);
            ui.label(
                egui::RichText::new(message)
                    .size(16.0)
                    .color(egui::Color32::from_gray(200)),
            );
        });
    });
}
