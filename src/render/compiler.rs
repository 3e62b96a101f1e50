// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Keyframe timeline to filter graph compilation.
//!
//! The encoder evaluates the crop per output frame, so the whole keyframe
//! animation is turned into one piecewise expression per quantity. To
//! keep every output frame the same size, the source is scaled by
//! `target_width / width(n)` first and a fixed `target` window is cut
//! out at the scaled offset.

use super::expr::{EvalContext, Expr};
use crate::error::{CropError, Result};
use crate::models::crop::{CropRect, ImageSize};
use crate::models::project::OutputLock;
use crate::models::timeline::{InterpolationKind, Timeline};

/// Decimal places used for literal coefficients unless configured otherwise.
pub const DEFAULT_PRECISION: usize = 2;

/// Scaler flags used unless configured otherwise.
pub const DEFAULT_SCALE_FLAGS: &str = "lanczos";

/// Text formatting options for the generated filter graph.
#[derive(Debug, Clone, PartialEq)]
pub struct CompileOptions {
    pub precision: usize,
    pub scale_flags: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            scale_flags: DEFAULT_SCALE_FLAGS.to_string(),
        }
    }
}

/// Crop x/y/width/height as functions of the frame number.
#[derive(Debug, Clone, PartialEq)]
pub struct CropTracks {
    pub x: Expr,
    pub y: Expr,
    pub width: Expr,
    pub height: Expr,
}

/// The compiled scale + crop pipeline for one timeline snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledCrop {
    pub target: OutputLock,
    pub tracks: CropTracks,
    /// Source scale factor per frame.
    pub scale: Expr,
    pub scaled_width: Expr,
    pub scaled_height: Expr,
    /// Crop offsets in scaled coordinates.
    pub crop_x: Expr,
    pub crop_y: Expr,
}

/// Compile a timeline into per-frame expressions.
///
/// All keyframes must share the aspect ratio of `target`, which holds for
/// any timeline built while the project was locked.
pub fn compile(timeline: &Timeline, target: OutputLock) -> Result<CompiledCrop> {
    let keys: Vec<(u32, CropRect)> = timeline.keyframes().map(|(f, r)| (f, *r)).collect();
    if keys.is_empty() {
        return Err(CropError::NoKeyframes);
    }
    if target.width == 0 || target.height == 0 {
        return Err(CropError::InvalidOutputSize {
            width: target.width,
            height: target.height,
        });
    }

    let kind = timeline.interpolation();
    let tracks = CropTracks {
        x: build_track(&keys, kind, |r| r.x),
        y: build_track(&keys, kind, |r| r.y),
        width: build_track(&keys, kind, |r| r.width),
        height: build_track(&keys, kind, |r| r.height),
    };

    let scale = Expr::div(Expr::int(target.width as i64), tracks.width.clone());
    let scaled_width = Expr::mul(Expr::InputWidth, scale.clone());
    let scaled_height = Expr::mul(Expr::InputHeight, scale.clone());
    let crop_x = Expr::mul(tracks.x.clone(), scale.clone());
    let crop_y = Expr::mul(tracks.y.clone(), scale.clone());

    log::debug!(
        "Compiled {} keyframe(s) with {:?} easing for {}x{} output",
        keys.len(),
        kind,
        target.width,
        target.height
    );

    Ok(CompiledCrop {
        target,
        tracks,
        scale,
        scaled_width,
        scaled_height,
        crop_x,
        crop_y,
    })
}

/// Piecewise track for one rectangle field.
///
/// Before the first keyframe and after the last the boundary value holds;
/// in between each segment is eased exactly like `Timeline::interpolate`.
fn build_track(keys: &[(u32, CropRect)], kind: InterpolationKind, field: fn(&CropRect) -> f64) -> Expr {
    let (first_frame, first) = keys[0];
    let (_, last) = keys[keys.len() - 1];

    let mut expr = Expr::num(field(&last));
    for pair in keys.windows(2).rev() {
        let (start_frame, start) = pair[0];
        let (end_frame, end) = pair[1];
        let segment = segment_expr(start_frame, end_frame, field(&start), field(&end), kind);
        expr = Expr::if_less(Expr::FrameNumber, Expr::int(end_frame as i64), segment, expr);
    }

    Expr::if_less(
        Expr::FrameNumber,
        Expr::int(first_frame as i64),
        Expr::num(field(&first)),
        expr,
    )
}

/// `start + (end - start) * ease((n - start_frame) / (end_frame - start_frame))`
fn segment_expr(start_frame: u32, end_frame: u32, start: f64, end: f64, kind: InterpolationKind) -> Expr {
    let t = Expr::div(
        Expr::sub(Expr::FrameNumber, Expr::int(start_frame as i64)),
        Expr::int(end_frame as i64 - start_frame as i64),
    );
    Expr::add(Expr::num(start), Expr::mul(Expr::num(end - start), ease_expr(t, kind)))
}

/// The easing polynomial written over `t`.
fn ease_expr(t: Expr, kind: InterpolationKind) -> Expr {
    match kind {
        InterpolationKind::Linear => t,
        InterpolationKind::EaseIn => Expr::mul(t.clone(), t),
        InterpolationKind::EaseOut => Expr::mul(t.clone(), Expr::sub(Expr::int(2), t)),
        InterpolationKind::Smoothstep => Expr::mul(
            Expr::mul(t.clone(), t.clone()),
            Expr::sub(Expr::int(3), Expr::mul(Expr::int(2), t)),
        ),
    }
}

impl CompiledCrop {
    /// The full filter graph: dynamic scale, fixed-size crop, palette re-encode.
    pub fn filter_graph(&self, options: &CompileOptions) -> String {
        let p = options.precision;
        format!(
            "scale=w='{}':h='{}':eval=frame:flags={},\
             crop=w={}:h={}:x='{}':y='{}':exact=1,\
             split[s0][s1];[s0]palettegen[p];[s1][p]paletteuse",
            self.scaled_width.render(p),
            self.scaled_height.render(p),
            options.scale_flags,
            self.target.width,
            self.target.height,
            self.crop_x.render(p),
            self.crop_y.render(p),
        )
    }

    /// Source-space crop rectangle the tracks describe at `frame`.
    pub fn crop_at(&self, frame: u32, source: ImageSize) -> CropRect {
        let ctx = context(frame, source);
        CropRect::new(
            self.tracks.x.eval(&ctx),
            self.tracks.y.eval(&ctx),
            self.tracks.width.eval(&ctx),
            self.tracks.height.eval(&ctx),
        )
    }

    /// Scaled-space crop window at `frame`, with literals rounded to `precision`.
    pub fn output_window_at(&self, frame: u32, source: ImageSize, precision: usize) -> CropRect {
        let ctx = context(frame, source);
        let scale = self.scale.eval_rounded(&ctx, precision);
        CropRect::new(
            self.crop_x.eval_rounded(&ctx, precision),
            self.crop_y.eval_rounded(&ctx, precision),
            self.tracks.width.eval_rounded(&ctx, precision) * scale,
            self.tracks.height.eval_rounded(&ctx, precision) * scale,
        )
    }

    /// Largest error in the crop offsets, in output pixels, caused by
    /// rounding literals to `precision` over frames `0..frame_count`.
    pub fn max_drift(&self, source: ImageSize, frame_count: u32, precision: usize) -> f64 {
        (0..frame_count.max(1))
            .map(|frame| {
                let exact = self.crop_at(frame, source);
                let scale = self.target.width as f64 / exact.width;
                let rounded = self.output_window_at(frame, source, precision);
                (rounded.x - exact.x * scale)
                    .abs()
                    .max((rounded.y - exact.y * scale).abs())
            })
            .fold(0.0, f64::max)
    }
}

fn context(frame: u32, source: ImageSize) -> EvalContext {
    EvalContext {
        frame: frame as f64,
        input_width: source.w(),
        input_height: source.h(),
    }
}
