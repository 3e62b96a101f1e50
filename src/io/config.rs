// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application settings.
//!
//! Settings are read from an optional YAML file. Every field has a
//! default, so a partial file (or none at all) is fine.

use crate::editor::handles::{HandleGeometry, DEFAULT_HANDLE_MARGIN, DEFAULT_HANDLE_SIZE};
use crate::models::timeline::InterpolationKind;
use crate::render::compiler::{CompileOptions, DEFAULT_PRECISION, DEFAULT_SCALE_FLAGS};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the settings file location.
pub const CONFIG_ENV: &str = "KEYCROP_CONFIG";

/// Settings file looked up in the working directory.
pub const CONFIG_FILE: &str = "keycrop.yaml";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub encoder: EncoderSettings,
    pub render: RenderSettings,
    pub editor: EditorSettings,
    pub view: ViewSettings,
}

/// Locations of the external encoder tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderSettings {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            ffprobe: PathBuf::from("ffprobe"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Decimal places for literal coefficients in filter expressions.
    pub precision: usize,
    pub scale_flags: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            scale_flags: DEFAULT_SCALE_FLAGS.to_string(),
        }
    }
}

impl RenderSettings {
    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            precision: self.precision,
            scale_flags: self.scale_flags.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Handle square size in screen pixels.
    pub handle_size: f64,
    /// Extra hit-test tolerance around handles in screen pixels.
    pub handle_margin: f64,
    pub default_interpolation: InterpolationKind,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            handle_size: DEFAULT_HANDLE_SIZE,
            handle_margin: DEFAULT_HANDLE_MARGIN,
            default_interpolation: InterpolationKind::Linear,
        }
    }
}

impl EditorSettings {
    pub fn handle_geometry(&self) -> HandleGeometry {
        HandleGeometry {
            size: self.handle_size.max(1.0),
            margin: self.handle_margin.max(0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_step: f64,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            min_zoom: 0.1,
            max_zoom: 4.0,
            zoom_step: 0.1,
        }
    }
}

impl ViewSettings {
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min_zoom, self.max_zoom.max(self.min_zoom))
    }

    /// Zoom after `steps` increments of `zoom_step`, clamped to the range.
    pub fn step_zoom(&self, zoom: f64, steps: i32) -> f64 {
        let step = if self.zoom_step > 0.0 { self.zoom_step } else { 0.1 };
        self.clamp_zoom(zoom + step * steps as f64)
    }
}

/// Parse settings from YAML text.
pub fn parse_settings(yaml: &str) -> Result<Settings> {
    let settings: Settings = serde_yaml::from_str(yaml)?;
    Ok(settings)
}

/// Read settings from `path`.
pub fn load_settings(path: &Path) -> Result<Settings> {
    let yaml = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_settings(&yaml).with_context(|| format!("Failed to parse {}", path.display()))
}

/// The settings file to use: `$KEYCROP_CONFIG`, else `keycrop.yaml`.
pub fn settings_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
}

/// Load the settings file if present, falling back to defaults.
pub fn load_or_default() -> Settings {
    let path = settings_path();
    if !path.exists() {
        log::info!("No settings file at {}, using defaults", path.display());
        return Settings::default();
    }
    match load_settings(&path) {
        Ok(settings) => {
            log::info!("Loaded settings from {}", path.display());
            settings
        }
        Err(e) => {
            log::warn!("{:#}; using defaults", e);
            Settings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let settings = parse_settings("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.render.precision, 2);
        assert_eq!(settings.encoder.ffmpeg, PathBuf::from("ffmpeg"));
    }

    #[test]
    fn test_partial_document() {
        let yaml = "
render:
  precision: 4
editor:
  default_interpolation: ease_out
encoder:
  ffmpeg: /opt/ffmpeg/bin/ffmpeg
";
        let settings = parse_settings(yaml).unwrap();
        assert_eq!(settings.render.precision, 4);
        assert_eq!(settings.render.scale_flags, "lanczos");
        assert_eq!(settings.editor.default_interpolation, InterpolationKind::EaseOut);
        assert_eq!(settings.editor.handle_size, 12.0);
        assert_eq!(settings.encoder.ffmpeg, PathBuf::from("/opt/ffmpeg/bin/ffmpeg"));
        assert_eq!(settings.encoder.ffprobe, PathBuf::from("ffprobe"));
    }

    #[test]
    fn test_invalid_document_is_an_error() {
        assert!(parse_settings("render: [1, 2").is_err());
        assert!(parse_settings("render:\n  precision: lots").is_err());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = load_settings(Path::new("/nonexistent/keycrop.yaml")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/keycrop.yaml"));
    }

    #[test]
    fn test_zoom_clamp() {
        let view = ViewSettings::default();
        assert_eq!(view.clamp_zoom(10.0), 4.0);
        assert_eq!(view.clamp_zoom(0.01), 0.1);
        assert_eq!(view.clamp_zoom(1.5), 1.5);
    }

    #[test]
    fn test_step_zoom_uses_configured_step() {
        let view = parse_settings("view:\n  zoom_step: 0.25").unwrap().view;
        assert!((view.step_zoom(1.0, 1) - 1.25).abs() < 1e-9);
        assert!((view.step_zoom(1.0, -2) - 0.5).abs() < 1e-9);
        assert_eq!(view.step_zoom(3.9, 1), 4.0);
        assert_eq!(view.step_zoom(0.2, -1), 0.1);
    }
}
