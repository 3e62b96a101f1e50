// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Interactive crop rectangle editing.
//!
//! The editor turns pointer input in screen coordinates into crop
//! rectangle changes in image coordinates. It knows about the display
//! zoom, the eight resize handles and the optional aspect-ratio lock,
//! but nothing about egui: every transition is an explicit call, so the
//! whole interaction can be driven from tests.

pub mod handles;

use crate::models::crop::{CropRect, ImageSize, Point};
use crate::util::geometry::{rect_to_screen, screen_to_image};
use handles::{Handle, HandleGeometry};

/// What a pointer drag is currently doing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditMode {
    Idle,
    /// Drawing a new rectangle from `anchor` (image coordinates).
    Creating { anchor: Point },
    /// Dragging the whole rectangle; `start_pointer` is in screen coordinates.
    Moving {
        start_rect: CropRect,
        start_pointer: Point,
    },
    /// Dragging one of the handles of `start_rect`.
    Resizing { handle: Handle, start_rect: CropRect },
}

/// Pointer input for [`EditSession::apply`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Press(Point),
    Move(Point),
    Release,
}

/// What lies under the pointer while no drag is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverTarget {
    Handle(Handle),
    Inside,
    Outside,
}

/// Live selection state for the displayed frame.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    image: ImageSize,
    rect: CropRect,
    zoom: f64,
    mode: EditMode,
    aspect_ratio: Option<f64>,
    handles: HandleGeometry,
}

impl EditSession {
    /// Create an editor for an image of the given size, with no selection.
    pub fn new(image: ImageSize) -> Self {
        Self {
            image,
            rect: CropRect::default(),
            zoom: 1.0,
            mode: EditMode::Idle,
            aspect_ratio: None,
            handles: HandleGeometry::default(),
        }
    }

    pub fn with_handles(mut self, handles: HandleGeometry) -> Self {
        self.handles = handles;
        self
    }

    pub fn image(&self) -> ImageSize {
        self.image
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn is_idle(&self) -> bool {
        self.mode == EditMode::Idle
    }

    pub fn aspect_ratio(&self) -> Option<f64> {
        self.aspect_ratio
    }

    pub fn handles(&self) -> &HandleGeometry {
        &self.handles
    }

    /// The raw rectangle, possibly zero-sized while a drag is starting.
    pub fn raw_rect(&self) -> CropRect {
        self.rect
    }

    /// The current selection, or `None` when it is degenerate.
    pub fn selection(&self) -> Option<CropRect> {
        (!self.rect.is_empty()).then_some(self.rect)
    }

    /// The selection projected onto the screen.
    pub fn screen_rect(&self) -> Option<CropRect> {
        self.selection().map(|r| rect_to_screen(&r, self.zoom))
    }

    /// Change the screen/image mapping. The image-space rectangle is untouched.
    pub fn set_zoom(&mut self, factor: f64) {
        if factor.is_finite() && factor > 0.0 {
            self.zoom = factor;
        }
    }

    /// Clear the selection.
    pub fn clear_selection(&mut self) {
        self.rect = CropRect::default();
    }

    /// Route a pointer event to the matching transition.
    pub fn apply(&mut self, event: PointerEvent) -> Option<CropRect> {
        match event {
            PointerEvent::Press(p) => {
                self.begin_interaction(p);
            }
            PointerEvent::Move(p) => self.update_interaction(p),
            PointerEvent::Release => return self.end_interaction(),
        }
        self.selection()
    }

    /// Classify what a press at `screen` would grab.
    pub fn hover_target(&self, screen: Point) -> HoverTarget {
        let Some(screen_rect) = self.screen_rect() else {
            return HoverTarget::Outside;
        };
        if let Some(handle) =
            self.handles
                .hit_test(&screen_rect, screen, self.aspect_ratio.is_some())
        {
            HoverTarget::Handle(handle)
        } else if screen_rect.contains(screen) {
            HoverTarget::Inside
        } else {
            HoverTarget::Outside
        }
    }

    /// Start a drag at `screen`: resize, move, or create in that priority.
    pub fn begin_interaction(&mut self, screen: Point) -> EditMode {
        self.mode = match self.hover_target(screen) {
            HoverTarget::Handle(handle) => EditMode::Resizing {
                handle,
                start_rect: self.rect,
            },
            HoverTarget::Inside => EditMode::Moving {
                start_rect: self.rect,
                start_pointer: screen,
            },
            HoverTarget::Outside => {
                let anchor = self.image.clamp_point(screen_to_image(screen, self.zoom));
                self.rect = CropRect::new(anchor.x, anchor.y, 0.0, 0.0);
                EditMode::Creating { anchor }
            }
        };
        self.mode
    }

    /// Continue the active drag with the pointer at `screen`.
    pub fn update_interaction(&mut self, screen: Point) {
        let image_point = screen_to_image(screen, self.zoom);
        match self.mode {
            EditMode::Idle => {}
            EditMode::Creating { anchor } => {
                self.rect = self.create_rect(anchor, image_point);
            }
            EditMode::Moving {
                start_rect,
                start_pointer,
            } => {
                let dx = (screen.x - start_pointer.x) / self.zoom;
                let dy = (screen.y - start_pointer.y) / self.zoom;
                self.rect = self.clamp_position(start_rect.translated(dx, dy));
            }
            EditMode::Resizing { handle, start_rect } => {
                self.rect = self.resize_rect(handle, start_rect, image_point);
            }
        }
    }

    /// Finish the drag and report the resulting selection.
    pub fn end_interaction(&mut self) -> Option<CropRect> {
        self.mode = EditMode::Idle;
        if self.rect.is_empty() {
            self.rect = CropRect::default();
        }
        self.selection()
    }

    /// Enable or disable the aspect-ratio lock.
    ///
    /// Enabling reshapes a non-empty selection right away: the width is
    /// kept and the height recomputed, unless that height would run past
    /// the bottom of the image, in which case the height is clamped and
    /// the width derived from it.
    pub fn set_aspect_lock(&mut self, enabled: bool, ratio: f64) {
        if !enabled || !(ratio.is_finite() && ratio > 0.0) {
            self.aspect_ratio = None;
            return;
        }
        self.aspect_ratio = Some(ratio);

        if let Some(rect) = self.selection() {
            let mut width = rect.width;
            let mut height = width / ratio;
            if rect.y + height > self.image.h() {
                height = self.image.h() - rect.y;
                width = height * ratio;
            }
            self.rect = CropRect::new(rect.x, rect.y, width, height);
            log::debug!(
                "Snapped selection to ratio {:.4}: {:.1}x{:.1}",
                ratio,
                width,
                height
            );
        }
    }

    /// Set the selection programmatically, fitting it into the image.
    ///
    /// Size is clamped to `[1, image]`; under a lock the height follows the
    /// width, and the origin is pulled back so the rectangle fits.
    pub fn set_selection(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let mut w = width.clamp(1.0, self.image.w().max(1.0));
        let mut h = height.clamp(1.0, self.image.h().max(1.0));

        if let Some(ratio) = self.aspect_ratio {
            h = w / ratio;
            if h > self.image.h() {
                h = self.image.h();
                w = h * ratio;
            }
        }

        let x = x.clamp(0.0, (self.image.w() - w).max(0.0));
        let y = y.clamp(0.0, (self.image.h() - h).max(0.0));
        self.rect = CropRect::new(x, y, w, h);
    }

    pub fn set_selection_rect(&mut self, rect: &CropRect) {
        self.set_selection(rect.x, rect.y, rect.width, rect.height);
    }

    fn create_rect(&self, anchor: Point, current: Point) -> CropRect {
        let current = self.image.clamp_point(current);
        match self.aspect_ratio {
            None => CropRect::from_corners(anchor, current)
                .intersect(&self.image.bounds())
                .unwrap_or(CropRect::new(anchor.x, anchor.y, 0.0, 0.0)),
            Some(ratio) => {
                let dx = current.x - anchor.x;
                let dy = current.y - anchor.y;
                let sx = if dx < 0.0 { -1.0 } else { 1.0 };
                let sy = if dy < 0.0 { -1.0 } else { 1.0 };
                self.locked_rect(anchor, sx, sy, dx.abs(), ratio)
            }
        }
    }

    fn resize_rect(&self, handle: Handle, start: CropRect, pointer: Point) -> CropRect {
        let p = self.image.clamp_point(pointer);

        match self.aspect_ratio {
            None => {
                let mut left = start.x;
                let mut top = start.y;
                let mut right = start.right();
                let mut bottom = start.bottom();
                if handle.moves_left() {
                    left = p.x;
                }
                if handle.moves_right() {
                    right = p.x;
                }
                if handle.moves_top() {
                    top = p.y;
                }
                if handle.moves_bottom() {
                    bottom = p.y;
                }
                CropRect::from_corners(Point::new(left, top), Point::new(right, bottom))
            }
            Some(ratio) if handle.is_corner() => {
                let anchor = handle.opposite_corner(&start);
                let (sx0, sy0) = handle.corner_direction();
                let dx = p.x - anchor.x;
                let sx = if dx == 0.0 { sx0 } else { dx.signum() };
                // Crossing the anchor horizontally flips the vertical side too.
                let sy = sy0 * sx * sx0;
                self.locked_rect(anchor, sx, sy, dx.abs(), ratio)
            }
            // Edge handles are not hit-tested while locked.
            Some(_) => start,
        }
    }

    /// Rectangle growing from `anchor` in direction `(sx, sy)` with the locked
    /// ratio, shrunk as a whole until it fits inside the image.
    fn locked_rect(&self, anchor: Point, sx: f64, sy: f64, width: f64, ratio: f64) -> CropRect {
        let room_x = if sx > 0.0 { self.image.w() - anchor.x } else { anchor.x };
        let room_y = if sy > 0.0 { self.image.h() - anchor.y } else { anchor.y };
        let w = width.min(room_x).min(room_y * ratio).max(0.0);
        let h = w / ratio;
        CropRect::from_corners(anchor, Point::new(anchor.x + sx * w, anchor.y + sy * h))
    }

    /// Translate `rect` back inside the image without resizing it.
    fn clamp_position(&self, rect: CropRect) -> CropRect {
        let x = rect.x.clamp(0.0, (self.image.w() - rect.width).max(0.0));
        let y = rect.y.clamp(0.0, (self.image.h() - rect.height).max(0.0));
        CropRect::new(x, y, rect.width, rect.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    fn session() -> EditSession {
        EditSession::new(ImageSize::new(800, 600))
    }

    fn drag(session: &mut EditSession, from: (f64, f64), to: (f64, f64)) -> Option<CropRect> {
        session.apply(PointerEvent::Press(Point::new(from.0, from.1)));
        session.apply(PointerEvent::Move(Point::new(to.0, to.1)));
        session.apply(PointerEvent::Release)
    }

    fn assert_invariants(session: &EditSession) {
        if let Some(rect) = session.selection() {
            assert!(rect.fits_within(session.image()), "{rect:?} escapes the image");
            if let Some(ratio) = session.aspect_ratio() {
                assert!(
                    (rect.aspect_ratio() - ratio).abs() < 1e-6,
                    "{rect:?} breaks ratio {ratio}"
                );
            }
        }
    }

    #[test]
    fn test_create_normalizes_reverse_drag() {
        let mut s = session();
        let rect = drag(&mut s, (300.0, 200.0), (100.0, 50.0)).unwrap();
        assert_eq!(rect, CropRect::new(100.0, 50.0, 200.0, 150.0));
        assert_eq!(s.mode(), EditMode::Idle);
    }

    #[test]
    fn test_create_respects_zoom() {
        let mut s = session();
        s.set_zoom(2.0);
        let rect = drag(&mut s, (100.0, 100.0), (300.0, 200.0)).unwrap();
        assert_eq!(rect, CropRect::new(50.0, 50.0, 100.0, 50.0));
    }

    #[test]
    fn test_create_clips_to_image() {
        let mut s = session();
        let rect = drag(&mut s, (700.0, 500.0), (1000.0, 900.0)).unwrap();
        assert_eq!(rect, CropRect::new(700.0, 500.0, 100.0, 100.0));
        assert_invariants(&s);
    }

    #[test]
    fn test_click_without_drag_is_no_selection() {
        let mut s = session();
        s.apply(PointerEvent::Press(Point::new(10.0, 10.0)));
        assert!(matches!(s.mode(), EditMode::Creating { .. }));
        assert_eq!(s.apply(PointerEvent::Release), None);
        assert!(s.selection().is_none());
    }

    #[test]
    fn test_create_locked_derives_height() {
        let mut s = session();
        s.set_aspect_lock(true, 2.0);
        let rect = drag(&mut s, (100.0, 100.0), (300.0, 120.0)).unwrap();
        assert_eq!(rect, CropRect::new(100.0, 100.0, 200.0, 100.0));

        // Growing upward keeps the anchor at the bottom.
        let rect = drag(&mut s, (500.0, 400.0), (700.0, 390.0)).unwrap();
        assert_eq!(rect, CropRect::new(500.0, 300.0, 200.0, 100.0));
    }

    #[test]
    fn test_create_locked_stays_inside() {
        let mut s = session();
        s.set_aspect_lock(true, 4.0 / 3.0);
        drag(&mut s, (500.0, 500.0), (800.0, 600.0));
        let rect = s.selection().unwrap();
        assert!(approx(rect.height, 100.0));
        assert!(approx(rect.width, 400.0 / 3.0));
        assert_invariants(&s);
    }

    #[test]
    fn test_move_translates_and_clamps() {
        let mut s = session();
        s.set_selection(100.0, 100.0, 200.0, 100.0);

        let moved = drag(&mut s, (150.0, 150.0), (180.0, 130.0)).unwrap();
        assert_eq!(moved, CropRect::new(130.0, 80.0, 200.0, 100.0));

        let pinned = drag(&mut s, (200.0, 120.0), (2000.0, -500.0)).unwrap();
        assert_eq!(pinned, CropRect::new(600.0, 0.0, 200.0, 100.0));
    }

    #[test]
    fn test_move_at_zoom_uses_image_delta() {
        let mut s = session();
        s.set_selection(100.0, 100.0, 100.0, 100.0);
        s.set_zoom(0.5);
        // Rect on screen is (50,50)-(100,100); drag by 10 screen px.
        let moved = drag(&mut s, (75.0, 75.0), (85.0, 75.0)).unwrap();
        assert_eq!(moved, CropRect::new(120.0, 100.0, 100.0, 100.0));
    }

    #[test]
    fn test_resize_right_edge_only() {
        let mut s = session();
        s.set_selection(100.0, 100.0, 200.0, 100.0);
        let rect = drag(&mut s, (300.0, 150.0), (350.0, 400.0)).unwrap();
        assert_eq!(rect, CropRect::new(100.0, 100.0, 250.0, 100.0));
    }

    #[test]
    fn test_resize_corner_past_anchor_flips() {
        let mut s = session();
        s.set_selection(100.0, 100.0, 200.0, 100.0);
        let rect = drag(&mut s, (100.0, 100.0), (400.0, 250.0)).unwrap();
        assert_eq!(rect, CropRect::new(300.0, 200.0, 100.0, 50.0));
    }

    #[test]
    fn test_resize_clamps_pointer_to_image() {
        let mut s = session();
        s.set_selection(100.0, 100.0, 200.0, 100.0);
        let rect = drag(&mut s, (300.0, 200.0), (5000.0, 5000.0)).unwrap();
        assert_eq!(rect, CropRect::new(100.0, 100.0, 700.0, 500.0));
        assert_invariants(&s);
    }

    #[test]
    fn test_locked_resize_keeps_opposite_corner() {
        let mut s = session();
        s.set_aspect_lock(true, 2.0);
        s.set_selection(200.0, 200.0, 200.0, 100.0);

        // Drag the top-left corner; bottom-right (400, 300) stays put.
        let rect = drag(&mut s, (200.0, 200.0), (100.0, 260.0)).unwrap();
        assert!(approx(rect.right(), 400.0));
        assert!(approx(rect.bottom(), 300.0));
        assert!(approx(rect.width, 300.0));
        assert!(approx(rect.height, 150.0));
        assert_invariants(&s);
    }

    #[test]
    fn test_locked_resize_limited_by_image() {
        let mut s = session();
        s.set_aspect_lock(true, 1.0);
        s.set_selection(500.0, 400.0, 100.0, 100.0);
        let rect = drag(&mut s, (600.0, 500.0), (800.0, 600.0)).unwrap();
        assert_eq!(rect, CropRect::new(500.0, 400.0, 200.0, 200.0));
        assert_invariants(&s);
    }

    #[test]
    fn test_locked_edge_press_moves_instead() {
        let mut s = session();
        s.set_aspect_lock(true, 2.0);
        s.set_selection(100.0, 100.0, 200.0, 100.0);
        let mode = s.begin_interaction(Point::new(296.0, 150.0));
        assert!(matches!(mode, EditMode::Moving { .. }));
    }

    #[test]
    fn test_aspect_lock_snaps_existing_selection() {
        let mut s = session();
        s.set_selection(0.0, 0.0, 400.0, 100.0);
        s.set_aspect_lock(true, 4.0 / 3.0);
        let rect = s.selection().unwrap();
        assert_eq!((rect.x, rect.y, rect.width), (0.0, 0.0, 400.0));
        assert!(approx(rect.height, 300.0));

        let mut s = session();
        s.set_selection(0.0, 500.0, 400.0, 50.0);
        s.set_aspect_lock(true, 4.0);
        let rect = s.selection().unwrap();
        assert!(approx(rect.height, 100.0));
        assert!(approx(rect.width, 400.0));

        let mut s = session();
        s.set_selection(0.0, 500.0, 400.0, 50.0);
        s.set_aspect_lock(true, 1.0);
        let rect = s.selection().unwrap();
        assert!(approx(rect.height, 100.0));
        assert!(approx(rect.width, 100.0));
        assert_invariants(&s);
    }

    #[test]
    fn test_set_selection_clamps() {
        let mut s = session();
        s.set_selection(-50.0, 580.0, 0.0, 100.0);
        assert_eq!(s.selection().unwrap(), CropRect::new(0.0, 500.0, 1.0, 100.0));

        s.set_selection(700.0, 0.0, 5000.0, 5000.0);
        assert_eq!(s.selection().unwrap(), CropRect::new(0.0, 0.0, 800.0, 600.0));

        s.set_aspect_lock(true, 0.5);
        s.set_selection(0.0, 0.0, 800.0, 10.0);
        let rect = s.selection().unwrap();
        assert!(approx(rect.height, 600.0));
        assert!(approx(rect.width, 300.0));
        assert_invariants(&s);
    }

    #[test]
    fn test_set_zoom_keeps_image_rect() {
        let mut s = session();
        s.set_selection(10.0, 20.0, 30.0, 40.0);
        s.set_zoom(3.0);
        s.set_zoom(0.0);
        assert!((s.zoom() - 3.0).abs() < EPS);
        assert_eq!(s.selection().unwrap(), CropRect::new(10.0, 20.0, 30.0, 40.0));
        assert_eq!(s.screen_rect().unwrap(), CropRect::new(30.0, 60.0, 90.0, 120.0));
    }

    #[test]
    fn test_random_drags_preserve_invariants() {
        let mut s = session();
        s.set_aspect_lock(true, 16.0 / 9.0);
        let points = [
            (10.0, 10.0),
            (790.0, 590.0),
            (-100.0, 300.0),
            (400.0, 700.0),
            (123.0, 456.0),
            (800.0, 0.0),
        ];
        for (i, from) in points.iter().enumerate() {
            let to = points[(i + 2) % points.len()];
            drag(&mut s, *from, to);
            assert_invariants(&s);
        }
    }
}
