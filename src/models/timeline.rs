// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Keyframe timeline.
//!
//! Sparse per-frame crop rectangles and the rules for filling the frames
//! between them. Keyframes are keyed by frame index, so iteration is
//! always in frame order.

use super::crop::CropRect;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Easing curve applied to every segment between two keyframes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationKind {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    Smoothstep,
}

impl InterpolationKind {
    pub const ALL: [InterpolationKind; 4] = [
        InterpolationKind::Linear,
        InterpolationKind::EaseIn,
        InterpolationKind::EaseOut,
        InterpolationKind::Smoothstep,
    ];

    /// Map a normalized segment position `t` in `[0, 1]` through the curve.
    pub fn ease(self, t: f64) -> f64 {
        match self {
            InterpolationKind::Linear => t,
            InterpolationKind::EaseIn => t * t,
            InterpolationKind::EaseOut => t * (2.0 - t),
            InterpolationKind::Smoothstep => t * t * (3.0 - 2.0 * t),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            InterpolationKind::Linear => "Linear",
            InterpolationKind::EaseIn => "Ease In (Quad)",
            InterpolationKind::EaseOut => "Ease Out (Quad)",
            InterpolationKind::Smoothstep => "Smoothstep (Bezier)",
        }
    }
}

/// Search direction for keyframe navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

/// Where a frame sits relative to the keyframes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyframeStatus {
    Empty,
    /// On a keyframe; `index` is 1-based.
    OnKeyframe { index: usize, total: usize },
    HoldingStart,
    HoldingEnd,
    Interpolating,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Timeline {
    keyframes: BTreeMap<u32, CropRect>,
    current_frame: u32,
    interpolation: InterpolationKind,
}

impl Timeline {
    pub fn new(interpolation: InterpolationKind) -> Self {
        Self {
            interpolation,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Keyframes in frame order.
    pub fn keyframes(&self) -> impl Iterator<Item = (u32, &CropRect)> + '_ {
        self.keyframes.iter().map(|(f, r)| (*f, r))
    }

    pub fn frames(&self) -> impl Iterator<Item = u32> + '_ {
        self.keyframes.keys().copied()
    }

    pub fn get(&self, frame: u32) -> Option<&CropRect> {
        self.keyframes.get(&frame)
    }

    pub fn current_frame(&self) -> u32 {
        self.current_frame
    }

    pub fn set_current_frame(&mut self, frame: u32) {
        self.current_frame = frame;
    }

    pub fn interpolation(&self) -> InterpolationKind {
        self.interpolation
    }

    /// Change the curve used between keyframes. Stored rectangles are untouched.
    pub fn set_interpolation(&mut self, kind: InterpolationKind) {
        self.interpolation = kind;
    }

    /// Store `rect` at `frame`, replacing any existing keyframe there.
    ///
    /// Lock and selection preconditions are checked by the owning project.
    pub fn insert(&mut self, frame: u32, rect: CropRect) -> Option<CropRect> {
        self.keyframes.insert(frame, rect)
    }

    /// Remove the keyframe at `frame`, if any.
    pub fn remove(&mut self, frame: u32) -> Option<CropRect> {
        self.keyframes.remove(&frame)
    }

    pub fn clear(&mut self) {
        self.keyframes.clear();
    }

    /// Closest keyframe strictly before or after `frame`, wrapping around to
    /// the far end when there is none in that direction.
    pub fn nearest_keyframe(&self, frame: u32, direction: Direction) -> Option<u32> {
        match direction {
            Direction::Prev => self
                .keyframes
                .range(..frame)
                .next_back()
                .or_else(|| self.keyframes.last_key_value())
                .map(|(f, _)| *f),
            Direction::Next => self
                .keyframes
                .range(frame.saturating_add(1)..)
                .next()
                .filter(|(f, _)| **f > frame)
                .or_else(|| self.keyframes.first_key_value())
                .map(|(f, _)| *f),
        }
    }

    /// Animated rectangle at `frame`.
    ///
    /// With no keyframes the caller's live rectangle is returned. Frames
    /// outside the keyframed range hold the nearest end.
    pub fn interpolate(&self, frame: u32, live: Option<CropRect>) -> Option<CropRect> {
        let (first_frame, first) = match self.keyframes.first_key_value() {
            Some(kf) => kf,
            None => return live,
        };
        if let Some(rect) = self.keyframes.get(&frame) {
            return Some(*rect);
        }
        if frame < *first_frame {
            return Some(*first);
        }

        let (prev_frame, prev) = self.keyframes.range(..frame).next_back()?;
        let Some((next_frame, next)) = self.keyframes.range(frame..).next() else {
            return Some(*prev);
        };

        let t = (frame - prev_frame) as f64 / (next_frame - prev_frame) as f64;
        Some(prev.lerp(next, self.interpolation.ease(t)))
    }

    /// Describe where `frame` sits relative to the keyframes.
    pub fn status(&self, frame: u32) -> KeyframeStatus {
        if self.keyframes.is_empty() {
            return KeyframeStatus::Empty;
        }
        if self.keyframes.contains_key(&frame) {
            return KeyframeStatus::OnKeyframe {
                index: self.keyframes.range(..=frame).count(),
                total: self.keyframes.len(),
            };
        }
        let has_prev = self.keyframes.range(..frame).next().is_some();
        let has_next = self.keyframes.range(frame..).next().is_some();
        match (has_prev, has_next) {
            (false, _) => KeyframeStatus::HoldingStart,
            (true, false) => KeyframeStatus::HoldingEnd,
            (true, true) => KeyframeStatus::Interpolating,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_a() -> CropRect {
        CropRect::new(0.0, 0.0, 400.0, 300.0)
    }

    fn rect_b() -> CropRect {
        CropRect::new(100.0, 50.0, 200.0, 150.0)
    }

    fn two_key_timeline(kind: InterpolationKind) -> Timeline {
        let mut timeline = Timeline::new(kind);
        timeline.insert(0, rect_a());
        timeline.insert(50, rect_b());
        timeline
    }

    fn assert_rect_eq(actual: CropRect, expected: CropRect) {
        let close = |a: f64, b: f64| (a - b).abs() < 1e-9;
        assert!(
            close(actual.x, expected.x)
                && close(actual.y, expected.y)
                && close(actual.width, expected.width)
                && close(actual.height, expected.height),
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn test_easing_endpoints() {
        for kind in InterpolationKind::ALL {
            assert_eq!(kind.ease(0.0), 0.0, "{kind:?}");
            assert_eq!(kind.ease(1.0), 1.0, "{kind:?}");
        }
    }

    #[test]
    fn test_easing_shapes() {
        for i in 0..=100 {
            let t = i as f64 / 100.0;
            assert!(InterpolationKind::EaseIn.ease(t) <= t + 1e-12);
            assert!(InterpolationKind::EaseOut.ease(t) >= t - 1e-12);
        }

        // Smoothstep has a flat slope at both ends.
        let h = 1e-6;
        let slope_start = InterpolationKind::Smoothstep.ease(h) / h;
        let slope_end = (1.0 - InterpolationKind::Smoothstep.ease(1.0 - h)) / h;
        assert!(slope_start.abs() < 1e-4);
        assert!(slope_end.abs() < 1e-4);
    }

    #[test]
    fn test_linear_midpoint() {
        let timeline = two_key_timeline(InterpolationKind::Linear);
        assert_rect_eq(
            timeline.interpolate(25, None).unwrap(),
            CropRect::new(50.0, 25.0, 300.0, 225.0),
        );
    }

    #[test]
    fn test_ease_out_midpoint() {
        let timeline = two_key_timeline(InterpolationKind::EaseOut);
        assert_rect_eq(
            timeline.interpolate(25, None).unwrap(),
            CropRect::new(75.0, 37.5, 250.0, 187.5),
        );
    }

    #[test]
    fn test_keyframes_are_exact() {
        for kind in InterpolationKind::ALL {
            let mut timeline = two_key_timeline(kind);
            let odd = CropRect::new(33.3, 17.7, 123.456, 92.592);
            timeline.insert(37, odd);
            assert_eq!(timeline.interpolate(0, None), Some(rect_a()));
            assert_eq!(timeline.interpolate(37, None), Some(odd));
            assert_eq!(timeline.interpolate(50, None), Some(rect_b()));
        }
    }

    #[test]
    fn test_holds_outside_range() {
        let mut timeline = Timeline::new(InterpolationKind::Smoothstep);
        timeline.insert(10, rect_a());
        timeline.insert(20, rect_b());
        for frame in 0..10 {
            assert_eq!(timeline.interpolate(frame, None), Some(rect_a()));
        }
        for frame in 21..200 {
            assert_eq!(timeline.interpolate(frame, None), Some(rect_b()));
        }
    }

    #[test]
    fn test_empty_returns_live() {
        let timeline = Timeline::default();
        let live = CropRect::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(timeline.interpolate(7, Some(live)), Some(live));
        assert_eq!(timeline.interpolate(7, None), None);
    }

    #[test]
    fn test_insert_overwrites() {
        let mut timeline = two_key_timeline(InterpolationKind::Linear);
        let replaced = timeline.insert(50, rect_a());
        assert_eq!(replaced, Some(rect_b()));
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline.get(50), Some(&rect_a()));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut timeline = two_key_timeline(InterpolationKind::Linear);
        assert_eq!(timeline.remove(7), None);
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline.remove(0), Some(rect_a()));
        assert_eq!(timeline.len(), 1);
    }

    #[test]
    fn test_nearest_keyframe_wraps() {
        let mut timeline = Timeline::default();
        for frame in [10, 50, 90] {
            timeline.insert(frame, rect_a());
        }
        assert_eq!(timeline.nearest_keyframe(5, Direction::Prev), Some(90));
        assert_eq!(timeline.nearest_keyframe(95, Direction::Next), Some(10));
        assert_eq!(timeline.nearest_keyframe(50, Direction::Prev), Some(10));
        assert_eq!(timeline.nearest_keyframe(50, Direction::Next), Some(90));
        assert_eq!(timeline.nearest_keyframe(90, Direction::Next), Some(10));
        assert_eq!(timeline.nearest_keyframe(10, Direction::Prev), Some(90));
        assert_eq!(timeline.nearest_keyframe(u32::MAX, Direction::Next), Some(10));
        assert_eq!(Timeline::default().nearest_keyframe(3, Direction::Next), None);
    }

    #[test]
    fn test_interpolation_change_keeps_keyframes() {
        let mut timeline = two_key_timeline(InterpolationKind::Linear);
        let before: Vec<_> = timeline.keyframes().map(|(f, r)| (f, *r)).collect();
        timeline.set_interpolation(InterpolationKind::EaseIn);
        let after: Vec<_> = timeline.keyframes().map(|(f, r)| (f, *r)).collect();
        assert_eq!(before, after);
        // t = 0.5 -> 0.25 of the way
        assert_rect_eq(
            timeline.interpolate(25, None).unwrap(),
            CropRect::new(25.0, 12.5, 350.0, 262.5),
        );
    }

    #[test]
    fn test_status() {
        let mut timeline = Timeline::default();
        assert_eq!(timeline.status(0), KeyframeStatus::Empty);
        timeline.insert(10, rect_a());
        timeline.insert(20, rect_b());
        assert_eq!(timeline.status(5), KeyframeStatus::HoldingStart);
        assert_eq!(timeline.status(10), KeyframeStatus::OnKeyframe { index: 1, total: 2 });
        assert_eq!(timeline.status(15), KeyframeStatus::Interpolating);
        assert_eq!(timeline.status(20), KeyframeStatus::OnKeyframe { index: 2, total: 2 });
        assert_eq!(timeline.status(25), KeyframeStatus::HoldingEnd);
    }
}
