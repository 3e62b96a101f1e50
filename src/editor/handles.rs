// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Resize handles around the crop rectangle.

use crate::models::crop::{CropRect, Point};

/// Default handle edge length in screen pixels.
pub const DEFAULT_HANDLE_SIZE: f64 = 12.0;

/// Default extra hit-test tolerance around each handle, in screen pixels.
pub const DEFAULT_HANDLE_MARGIN: f64 = 5.0;

/// One of the eight control points of the crop rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
    Top,
    Right,
    Bottom,
    Left,
}

impl Handle {
    /// Hit-test order: corners win over edges.
    pub const ALL: [Handle; 8] = [
        Handle::TopLeft,
        Handle::TopRight,
        Handle::BottomRight,
        Handle::BottomLeft,
        Handle::Top,
        Handle::Right,
        Handle::Bottom,
        Handle::Left,
    ];

    pub const CORNERS: [Handle; 4] = [
        Handle::TopLeft,
        Handle::TopRight,
        Handle::BottomRight,
        Handle::BottomLeft,
    ];

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            Handle::TopLeft | Handle::TopRight | Handle::BottomRight | Handle::BottomLeft
        )
    }

    pub fn moves_left(self) -> bool {
        matches!(self, Handle::Left | Handle::TopLeft | Handle::BottomLeft)
    }

    pub fn moves_right(self) -> bool {
        matches!(self, Handle::Right | Handle::TopRight | Handle::BottomRight)
    }

    pub fn moves_top(self) -> bool {
        matches!(self, Handle::Top | Handle::TopLeft | Handle::TopRight)
    }

    pub fn moves_bottom(self) -> bool {
        matches!(self, Handle::Bottom | Handle::BottomLeft | Handle::BottomRight)
    }

    /// Outward direction of a corner handle as `(sx, sy)` signs.
    pub fn corner_direction(self) -> (f64, f64) {
        let sx = if self.moves_left() { -1.0 } else { 1.0 };
        let sy = if self.moves_top() { -1.0 } else { 1.0 };
        (sx, sy)
    }

    /// Position of the handle on `rect`.
    pub fn position(self, rect: &CropRect) -> Point {
        let c = rect.center();
        match self {
            Handle::TopLeft => Point::new(rect.x, rect.y),
            Handle::TopRight => Point::new(rect.right(), rect.y),
            Handle::BottomRight => Point::new(rect.right(), rect.bottom()),
            Handle::BottomLeft => Point::new(rect.x, rect.bottom()),
            Handle::Top => Point::new(c.x, rect.y),
            Handle::Right => Point::new(rect.right(), c.y),
            Handle::Bottom => Point::new(c.x, rect.bottom()),
            Handle::Left => Point::new(rect.x, c.y),
        }
    }

    /// The corner diagonally opposite this corner handle.
    pub fn opposite_corner(self, rect: &CropRect) -> Point {
        match self {
            Handle::TopLeft => Point::new(rect.right(), rect.bottom()),
            Handle::TopRight => Point::new(rect.x, rect.bottom()),
            Handle::BottomLeft => Point::new(rect.right(), rect.y),
            _ => Point::new(rect.x, rect.y),
        }
    }
}

/// Screen-space size and tolerance of the handles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleGeometry {
    pub size: f64,
    pub margin: f64,
}

impl Default for HandleGeometry {
    fn default() -> Self {
        Self {
            size: DEFAULT_HANDLE_SIZE,
            margin: DEFAULT_HANDLE_MARGIN,
        }
    }
}

impl HandleGeometry {
    /// The drawn square of `handle` on a screen-space rectangle.
    pub fn visual_rect(&self, handle: Handle, screen_rect: &CropRect) -> CropRect {
        let p = handle.position(screen_rect);
        let half = self.size / 2.0;
        CropRect::new(p.x - half, p.y - half, self.size, self.size)
    }

    /// The hotspot of `handle`, i.e. the visual square grown by the margin.
    pub fn hotspot(&self, handle: Handle, screen_rect: &CropRect) -> CropRect {
        let v = self.visual_rect(handle, screen_rect);
        CropRect::new(
            v.x - self.margin,
            v.y - self.margin,
            v.width + 2.0 * self.margin,
            v.height + 2.0 * self.margin,
        )
    }

    /// Handles that are active for the given lock state.
    pub fn active(locked: bool) -> &'static [Handle] {
        if locked {
            &Handle::CORNERS
        } else {
            &Handle::ALL
        }
    }

    /// First active handle whose hotspot contains `screen`.
    pub fn hit_test(&self, screen_rect: &CropRect, screen: Point, locked: bool) -> Option<Handle> {
        Self::active(locked)
            .iter()
            .copied()
            .find(|h| self.hotspot(*h, screen_rect).contains(screen))
    }
}
