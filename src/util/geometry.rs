// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides utilities for coordinate transformations between
//! screen (display) coordinates and source image pixel coordinates.

use crate::models::crop::{CropRect, Point};

/// Convert a screen point, relative to the displayed image's top-left, to image pixels.
pub fn screen_to_image(screen: Point, zoom: f64) -> Point {
    Point::new(screen.x / zoom, screen.y / zoom)
}

/// Project an image-space rectangle onto the screen.
pub fn rect_to_screen(rect: &CropRect, zoom: f64) -> CropRect {
    rect.scaled(zoom)
}

/// Convert an absolute canvas position to a point relative to the image origin.
pub fn canvas_to_local(pos: egui::Pos2, image_origin: egui::Pos2) -> Point {
    Point::new((pos.x - image_origin.x) as f64, (pos.y - image_origin.y) as f64)
}

/// Convert an image-space rectangle to an absolute egui rectangle on the canvas.
pub fn rect_to_canvas(rect: &CropRect, zoom: f64, image_origin: egui::Pos2) -> egui::Rect {
    let screen = rect_to_screen(rect, zoom);
    egui::Rect::from_min_size(
        image_origin + egui::vec2(screen.x as f32, screen.y as f32),
        egui::vec2(screen.width as f32, screen.height as f32),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_to_image_undoes_zoom() {
        let zoom = 1.75;
        let image = screen_to_image(Point::new(350.0, 175.0), zoom);
        assert!((image.x - 200.0).abs() < 0.0001);
        assert!((image.y - 100.0).abs() < 0.0001);

        let screen = rect_to_screen(&CropRect::new(image.x, image.y, 10.0, 10.0), zoom);
        assert!((screen.x - 350.0).abs() < 0.0001);
        assert!((screen.y - 175.0).abs() < 0.0001);
    }

    #[test]
    fn test_canvas_projection() {
        let origin = egui::pos2(10.0, 20.0);
        let rect = CropRect::new(4.0, 8.0, 100.0, 50.0);

        let on_canvas = rect_to_canvas(&rect, 0.5, origin);
        assert_eq!(on_canvas.min, egui::pos2(12.0, 24.0));
        assert_eq!(on_canvas.size(), egui::vec2(50.0, 25.0));

        let local = canvas_to_local(egui::pos2(12.0, 24.0), origin);
        assert_eq!(local, Point::new(2.0, 4.0));
    }
}
