// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Project state management.
//!
//! A project is the single editing session for one loaded animation. It
//! owns the live selection editor, the keyframe timeline and the output
//! resolution lock, and enforces the rules that tie them together.

use super::crop::{CropRect, ImageSize};
use super::timeline::{Direction, InterpolationKind, Timeline};
use crate::editor::{handles::HandleGeometry, EditSession};
use crate::error::{CropError, Result};
use std::path::PathBuf;

/// Relative slack allowed between a keyframe's ratio and the locked ratio.
const RATIO_TOLERANCE: f64 = 1e-6;

/// Facts about the loaded source animation.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceInfo {
    pub path: PathBuf,
    pub size: ImageSize,
    pub frame_count: u32,
    pub frame_rate: Option<f64>,
}

/// Locked output resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputLock {
    pub width: u32,
    pub height: u32,
}

impl OutputLock {
    pub fn ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

/// Complete editing session for one animation.
#[derive(Debug, Clone)]
pub struct Project {
    pub source: SourceInfo,
    pub editor: EditSession,
    pub timeline: Timeline,
    lock: Option<OutputLock>,
}

impl Project {
    /// Create a new project for the given source.
    pub fn new(source: SourceInfo, interpolation: InterpolationKind, handles: HandleGeometry) -> Self {
        Self {
            editor: EditSession::new(source.size).with_handles(handles),
            timeline: Timeline::new(interpolation),
            source,
            lock: None,
        }
    }

    pub fn lock(&self) -> Option<OutputLock> {
        self.lock
    }

    pub fn is_locked(&self) -> bool {
        self.lock.is_some()
    }

    pub fn current_frame(&self) -> u32 {
        self.timeline.current_frame()
    }

    pub fn last_frame(&self) -> u32 {
        self.source.frame_count.saturating_sub(1)
    }

    /// Lock the output resolution and constrain the selection to its ratio.
    ///
    /// Refused while keyframes exist, since they were drawn for the
    /// current ratio.
    pub fn lock_output(&mut self, width: u32, height: u32) -> Result<OutputLock> {
        if width == 0 || height == 0 {
            return Err(CropError::InvalidOutputSize { width, height });
        }
        if !self.timeline.is_empty() {
            return Err(CropError::KeyframesPinned {
                keyframes: self.timeline.len(),
            });
        }
        let lock = OutputLock { width, height };
        self.lock = Some(lock);
        self.editor.set_aspect_lock(true, lock.ratio());
        if self.editor.selection().is_none() {
            self.editor.set_selection(0.0, 0.0, width as f64, height as f64);
        }
        log::info!("Locked output resolution at {}x{}", width, height);
        Ok(lock)
    }

    /// Release the output lock.
    ///
    /// With keyframes present this deletes them, so it is refused unless
    /// `confirmed` is set.
    pub fn unlock_output(&mut self, confirmed: bool) -> Result<()> {
        if !self.timeline.is_empty() {
            if !confirmed {
                return Err(CropError::ConfirmationRequired {
                    keyframes: self.timeline.len(),
                });
            }
            log::info!("Unlock cleared {} keyframe(s)", self.timeline.len());
            self.timeline.clear();
        }
        self.lock = None;
        self.editor.set_aspect_lock(false, 1.0);
        log::info!("Unlocked output resolution");
        Ok(())
    }

    /// Pin `rect` as the keyframe for `frame`.
    ///
    /// The rectangle must lie inside the source and share the locked ratio.
    pub fn add_keyframe(&mut self, frame: u32, rect: Option<CropRect>) -> Result<()> {
        let lock = self.lock.ok_or(CropError::NotLocked)?;
        let rect = rect.filter(|r| !r.is_empty()).ok_or(CropError::EmptySelection)?;
        if frame >= self.source.frame_count {
            return Err(CropError::FrameOutOfRange {
                frame,
                frame_count: self.source.frame_count,
            });
        }
        if !rect.fits_within(self.source.size) {
            return Err(CropError::OutOfBounds);
        }
        let expected = lock.ratio();
        let actual = rect.aspect_ratio();
        if (actual - expected).abs() > RATIO_TOLERANCE * expected {
            return Err(CropError::RatioMismatch { expected, actual });
        }
        self.timeline.insert(frame, rect);
        log::info!(
            "Keyframe at frame {}: {:.1}x{:.1} @ ({:.1}, {:.1}), total {}",
            frame,
            rect.width,
            rect.height,
            rect.x,
            rect.y,
            self.timeline.len()
        );
        Ok(())
    }

    /// Pin the live selection at the current frame.
    pub fn add_keyframe_here(&mut self) -> Result<()> {
        self.add_keyframe(self.current_frame(), self.editor.selection())?;
        self.refresh_selection();
        Ok(())
    }

    /// Remove the keyframe at the current frame, if there is one.
    pub fn remove_keyframe_here(&mut self) -> bool {
        let frame = self.current_frame();
        let removed = self.timeline.remove(frame).is_some();
        if removed {
            log::info!("Removed keyframe at frame {}, total {}", frame, self.timeline.len());
            self.refresh_selection();
        }
        removed
    }

    /// Move to `frame`, clamped to the animation.
    pub fn seek(&mut self, frame: u32) {
        self.timeline.set_current_frame(frame.min(self.last_frame()));
        self.refresh_selection();
    }

    pub fn step(&mut self, delta: i64) {
        let target = (self.current_frame() as i64 + delta).clamp(0, self.last_frame() as i64);
        self.seek(target as u32);
    }

    /// Jump to the neighbouring keyframe, wrapping around at the ends.
    pub fn jump_to_keyframe(&mut self, direction: Direction) -> Option<u32> {
        let target = self.timeline.nearest_keyframe(self.current_frame(), direction)?;
        self.seek(target);
        Some(target)
    }

    pub fn set_interpolation(&mut self, kind: InterpolationKind) {
        self.timeline.set_interpolation(kind);
        self.refresh_selection();
    }

    /// Show the animated rectangle for the current frame, unless a drag is active.
    pub fn refresh_selection(&mut self) {
        if !self.editor.is_idle() || self.timeline.is_empty() {
            return;
        }
        if let Some(rect) = self
            .timeline
            .interpolate(self.current_frame(), self.editor.selection())
        {
            self.editor.set_selection_rect(&rect);
        }
    }
}
