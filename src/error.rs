// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types for the cropping engine and the render worker.

use thiserror::Error;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, CropError>;

/// Errors surfaced to the user at the action that triggered them.
#[derive(Debug, Error)]
pub enum CropError {
    /// Keyframes and export require a locked output resolution.
    #[error("Please set the output resolution and lock the project first")]
    NotLocked,

    /// The live selection is empty or degenerate.
    #[error("Select a crop area first")]
    EmptySelection,

    /// Export was requested on an empty timeline.
    #[error("Add at least one keyframe before exporting")]
    NoKeyframes,

    /// Keyframe index outside the loaded animation.
    #[error("Frame {frame} is outside the animation ({frame_count} frames)")]
    FrameOutOfRange { frame: u32, frame_count: u32 },

    /// Output resolution with a zero dimension.
    #[error("Invalid output size {width}x{height}")]
    InvalidOutputSize { width: u32, height: u32 },

    /// A keyframe rectangle that does not share the locked output ratio.
    #[error("Crop ratio {actual:.4} does not match the locked ratio {expected:.4}")]
    RatioMismatch { expected: f64, actual: f64 },

    /// A keyframe rectangle reaching outside the source animation.
    #[error("Crop area extends outside the animation")]
    OutOfBounds,

    /// The output cannot be re-locked while keyframes depend on it.
    #[error("Unlock the resolution before changing it ({keyframes} keyframe(s) pinned)")]
    KeyframesPinned { keyframes: usize },

    /// Unlocking would delete keyframes and has not been confirmed.
    #[error("Unlocking the resolution will delete {keyframes} keyframe(s)")]
    ConfirmationRequired { keyframes: usize },

    /// The encoder executable could not be started.
    #[error("Encoder not found: {program}")]
    EncoderNotFound { program: String },

    /// The encoder exited with a failure status.
    #[error("Encoder failed with status {status}\n{diagnostics}")]
    EncoderFailed { status: String, diagnostics: String },

    /// The user cancelled the render.
    #[error("Export cancelled by user")]
    Cancelled,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CropError {
    /// Whether the error is a rejected precondition rather than a runtime failure.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            CropError::NotLocked
                | CropError::EmptySelection
                | CropError::NoKeyframes
                | CropError::FrameOutOfRange { .. }
                | CropError::InvalidOutputSize { .. }
                | CropError::RatioMismatch { .. }
                | CropError::OutOfBounds
                | CropError::KeyframesPinned { .. }
                | CropError::ConfirmationRequired { .. }
        )
    }
}
