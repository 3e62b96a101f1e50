// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Crop geometry data structures.
//!
//! This module defines the value types shared by the editor, the
//! keyframe timeline and the render compiler. All coordinates are in
//! source image pixels and may be fractional.

/// A 2D point in image (or screen) pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Pixel dimensions of the loaded animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn w(&self) -> f64 {
        self.width as f64
    }

    pub fn h(&self) -> f64 {
        self.height as f64
    }

    /// Clamp a point into `[0, width] x [0, height]`.
    pub fn clamp_point(&self, p: Point) -> Point {
        Point::new(p.x.clamp(0.0, self.w()), p.y.clamp(0.0, self.h()))
    }

    /// The full-image rectangle.
    pub fn bounds(&self) -> CropRect {
        CropRect::new(0.0, 0.0, self.w(), self.h())
    }
}

/// An axis-aligned crop region.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle spanning two arbitrary corners, with non-negative size.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let left = a.x.min(b.x);
        let top = a.y.min(b.y);
        Self::new(left, top, (a.x - b.x).abs(), (a.y - b.y).abs())
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// A rectangle with no area is treated as "no selection".
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(
            self.x * factor,
            self.y * factor,
            self.width * factor,
            self.height * factor,
        )
    }

    /// Overlap with `other`; `None` when the result is degenerate.
    pub fn intersect(&self, other: &CropRect) -> Option<CropRect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        let rect = CropRect::new(left, top, right - left, bottom - top);
        (!rect.is_empty()).then_some(rect)
    }

    /// Componentwise linear interpolation towards `to`.
    pub fn lerp(&self, to: &CropRect, t: f64) -> CropRect {
        CropRect::new(
            self.x + (to.x - self.x) * t,
            self.y + (to.y - self.y) * t,
            self.width + (to.width - self.width) * t,
            self.height + (to.height - self.height) * t,
        )
    }

    /// Whether the rectangle satisfies the positional invariants inside `image`.
    pub fn fits_within(&self, image: ImageSize) -> bool {
        const EPS: f64 = 1e-9;
        !self.is_empty()
            && self.x >= -EPS
            && self.y >= -EPS
            && self.right() <= image.w() + EPS
            && self.bottom() <= image.h() + EPS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners_normalizes() {
        let r = CropRect::from_corners(Point::new(50.0, 40.0), Point::new(10.0, 60.0));
        assert_eq!(r, CropRect::new(10.0, 40.0, 40.0, 20.0));
    }

    #[test]
    fn test_intersect_clips_to_bounds() {
        let image = ImageSize::new(100, 80);
        let r = CropRect::new(-10.0, 70.0, 50.0, 30.0);
        let clipped = r.intersect(&image.bounds()).unwrap();
        assert_eq!(clipped, CropRect::new(0.0, 70.0, 40.0, 10.0));
        assert!(clipped.fits_within(image));
    }

    #[test]
    fn test_intersect_degenerate_is_none() {
        let image = ImageSize::new(100, 80);
        let outside = CropRect::new(120.0, 10.0, 20.0, 20.0);
        assert!(outside.intersect(&image.bounds()).is_none());
        let flat = CropRect::new(10.0, 10.0, 20.0, 0.0);
        assert!(flat.intersect(&image.bounds()).is_none());
    }

    #[test]
    fn test_lerp_midpoint() {
        let a = CropRect::new(0.0, 0.0, 400.0, 300.0);
        let b = CropRect::new(100.0, 50.0, 200.0, 150.0);
        assert_eq!(a.lerp(&b, 0.5), CropRect::new(50.0, 25.0, 300.0, 225.0));
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
    }
}
