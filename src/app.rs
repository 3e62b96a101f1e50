// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the main application structure that implements
//! the egui::App trait. It owns the project, the decoded frames, playback
//! and the render job, and routes UI actions to the model.

use crate::error::CropError;
use crate::io::config::Settings;
use crate::io::media::{load_gif, probe_stream, LoadedFrame, LoadedMedia};
use crate::models::{
    crop::ImageSize,
    project::{Project, SourceInfo},
    timeline::Direction,
};
use crate::render::{
    compiler::{compile, CompiledCrop},
    job::{RenderEvent, RenderJob, RenderRequest},
};
use crate::ui::{canvas, properties, timeline, toolbar};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::time::{Duration, Instant};

/// Frame-accurate playback clock driven by per-frame delays.
#[derive(Debug, Default)]
struct Playback {
    playing: bool,
    /// Time spent on the current frame so far.
    carry_ms: f64,
    last_tick: Option<Instant>,
}

impl Playback {
    fn play(&mut self) {
        self.playing = true;
        self.carry_ms = 0.0;
        self.last_tick = None;
    }

    fn pause(&mut self) {
        self.playing = false;
        self.last_tick = None;
    }

    /// Advance by `elapsed_ms` starting at `frame`, wrapping after the last frame.
    fn advance(&mut self, elapsed_ms: f64, frame: u32, delays: &[u32]) -> u32 {
        if delays.is_empty() {
            return frame;
        }
        let count = delays.len() as u32;
        let mut frame = frame.min(count - 1);
        self.carry_ms += elapsed_ms;
        loop {
            let delay = delays[frame as usize].max(1) as f64;
            if self.carry_ms < delay {
                break;
            }
            self.carry_ms -= delay;
            frame = (frame + 1) % count;
        }
        frame
    }

    /// Time left before the frame after `frame` is due.
    fn remaining(&self, frame: u32, delays: &[u32]) -> Duration {
        let delay = delays.get(frame as usize).copied().unwrap_or(1).max(1) as f64;
        Duration::from_millis((delay - self.carry_ms).max(1.0) as u64)
    }
}

/// Modal windows.
enum Dialog {
    ConfirmUnlock { keyframes: usize },
    Message { title: String, text: String },
    Shortcuts,
}

/// Result of background animation loading.
struct LoadedAnimation {
    path: PathBuf,
    media: LoadedMedia,
    frame_rate: Option<f64>,
}

/// Main application state.
pub struct KeyCropApp {
    settings: Settings,

    /// Current project (if an animation is loaded)
    project: Option<Project>,

    /// Decoded frames of the loaded animation
    frames: Vec<LoadedFrame>,

    /// Frame delays in milliseconds, by frame index
    delays: Vec<u32>,

    /// Texture showing the current frame
    frame_texture: Option<egui::TextureHandle>,

    /// Frame currently uploaded to `frame_texture`
    shown_frame: Option<u32>,

    playback: Playback,

    /// Width and height typed into the output lock fields
    output_size: (u32, u32),

    /// Receiver for background animation loading
    loader: Option<Receiver<Result<LoadedAnimation, String>>>,

    /// Loading state message
    loading_message: Option<String>,

    render: Option<RenderJob>,
    render_progress: properties::RenderProgress,

    dialog: Option<Dialog>,
    status: String,
}

impl KeyCropApp {
    /// Create a new application instance.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            project: None,
            frames: Vec::new(),
            delays: Vec::new(),
            frame_texture: None,
            shown_frame: None,
            playback: Playback::default(),
            output_size: (1, 1),
            loader: None,
            loading_message: None,
            render: None,
            render_progress: properties::RenderProgress { frame: 0, total: 0 },
            dialog: None,
            status: "Ready".to_string(),
        }
    }

    /// Decode a GIF and probe its metadata (asynchronously).
    pub fn load_animation(&mut self, path: PathBuf) {
        let (sender, receiver) = channel();
        self.loader = Some(receiver);
        self.loading_message = Some(format!("Loading {}...", display_name(&path)));
        self.playback.pause();

        let ffprobe = self.settings.encoder.ffprobe.clone();
        std::thread::spawn(move || {
            let result = (|| -> anyhow::Result<LoadedAnimation> {
                let media = load_gif(&path)?;
                log::info!(
                    "Decoded {} ({}x{}, {} frames)",
                    path.display(),
                    media.width,
                    media.height,
                    media.frame_count()
                );

                let frame_rate = match probe_stream(&ffprobe, &path) {
                    Ok(info) => {
                        if (info.width, info.height) != (media.width, media.height) {
                            log::warn!(
                                "Probe reports {}x{}, decoder {}x{}",
                                info.width,
                                info.height,
                                media.width,
                                media.height
                            );
                        }
                        Some(info.frame_rate)
                    }
                    Err(e) => {
                        log::warn!("Metadata probe failed: {:#}", e);
                        None
                    }
                };

                Ok(LoadedAnimation {
                    path,
                    media,
                    frame_rate,
                })
            })();

            let _ = sender.send(result.map_err(|e| format!("{:#}", e)));
        });
    }

    fn finish_loading(&mut self, ctx: &egui::Context, loaded: LoadedAnimation) {
        let LoadedAnimation {
            path,
            media,
            frame_rate,
        } = loaded;

        let source = SourceInfo {
            path,
            size: ImageSize::new(media.width, media.height),
            frame_count: media.frame_count(),
            frame_rate,
        };
        let mut project = Project::new(
            source,
            self.settings.editor.default_interpolation,
            self.settings.editor.handle_geometry(),
        );
        project.editor.set_zoom(self.settings.view.clamp_zoom(1.0));

        self.delays = media.frames.iter().map(|f| f.delay_ms).collect();
        self.frames = media.frames;
        self.output_size = (media.width, media.height);
        self.shown_frame = None;
        self.frame_texture = self.frames.first().map(|frame| {
            ctx.load_texture(
                "gif_frame",
                color_image(project.source.size, frame),
                egui::TextureOptions::LINEAR,
            )
        });
        self.status = format!(
            "{} | {}x{} | {} frames",
            display_name(&project.source.path),
            media.width,
            media.height,
            project.source.frame_count
        );
        self.project = Some(project);
        log::info!("Animation loaded");
    }

    /// Upload the current frame to the texture if it changed.
    fn sync_texture(&mut self) {
        let (Some(project), Some(texture)) = (self.project.as_ref(), self.frame_texture.as_mut())
        else {
            return;
        };
        let current = project.current_frame();
        if self.shown_frame == Some(current) {
            return;
        }
        if let Some(frame) = self.frames.get(current as usize) {
            texture.set(
                color_image(project.source.size, frame),
                egui::TextureOptions::LINEAR,
            );
            self.shown_frame = Some(current);
        }
    }

    fn tick_playback(&mut self, ctx: &egui::Context) {
        if !self.playback.playing {
            return;
        }
        let Some(project) = self.project.as_mut() else {
            self.playback.pause();
            return;
        };

        let now = Instant::now();
        let elapsed = self
            .playback
            .last_tick
            .map(|t| now.duration_since(t).as_secs_f64() * 1000.0)
            .unwrap_or(0.0);
        self.playback.last_tick = Some(now);

        let current = project.current_frame();
        let next = self.playback.advance(elapsed, current, &self.delays);
        if next != current {
            project.seek(next);
        }
        ctx.request_repaint_after(self.playback.remaining(next, &self.delays));
    }

    fn toggle_playback(&mut self) {
        if self.playback.playing {
            self.playback.pause();
        } else if self.project.is_some() {
            self.playback.play();
        }
    }

    fn seek(&mut self, frame: u32) {
        if let Some(project) = self.project.as_mut() {
            project.seek(frame);
        }
    }

    fn step(&mut self, delta: i64) {
        self.playback.pause();
        if let Some(project) = self.project.as_mut() {
            project.step(delta);
        }
    }

    fn jump_to_keyframe(&mut self, direction: Direction) {
        if let Some(project) = self.project.as_mut() {
            if let Some(frame) = project.jump_to_keyframe(direction) {
                self.playback.pause();
                log::debug!("Jumped to keyframe at frame {}", frame);
            }
        }
    }

    fn set_zoom(&mut self, zoom: f64) {
        let zoom = self.settings.view.clamp_zoom(zoom);
        if let Some(project) = self.project.as_mut() {
            project.editor.set_zoom(zoom);
        }
    }

    fn rendering(&self) -> bool {
        self.render.is_some()
    }

    /// Show a failed operation to the user.
    fn report(&mut self, err: CropError) {
        if let CropError::ConfirmationRequired { keyframes } = err {
            self.dialog = Some(Dialog::ConfirmUnlock { keyframes });
            return;
        }
        let title = if err.is_precondition() {
            log::warn!("{}", err);
            "Cannot do that yet"
        } else {
            log::error!("{}", err);
            "Error"
        };
        self.dialog = Some(Dialog::Message {
            title: title.to_string(),
            text: err.to_string(),
        });
    }

    fn handle_properties_action(&mut self, action: properties::PropertiesAction) {
        use properties::PropertiesAction;

        if self.rendering()
            && !matches!(
                action,
                PropertiesAction::None
                    | PropertiesAction::CancelRender
                    | PropertiesAction::SetSelection(_)
                    | PropertiesAction::JumpToKeyframe(_)
            )
        {
            log::debug!("Ignoring {:?} while rendering", action);
            return;
        }
        match action {
            PropertiesAction::None => return,
            PropertiesAction::JumpToKeyframe(direction) => {
                self.jump_to_keyframe(direction);
                return;
            }
            PropertiesAction::Export => {
                self.start_export();
                return;
            }
            PropertiesAction::CancelRender => {
                if let Some(job) = &self.render {
                    job.cancel();
                }
                return;
            }
            _ => {}
        }
        let Some(project) = self.project.as_mut() else {
            return;
        };

        let result = match action {
            PropertiesAction::LockOutput { width, height } => {
                project.lock_output(width, height).map(|lock| {
                    log::info!("Output locked at {}x{}", lock.width, lock.height);
                })
            }
            PropertiesAction::UnlockOutput => project.unlock_output(false),
            PropertiesAction::AddKeyframe => project.add_keyframe_here().map(|()| {
                log::info!(
                    "Keyframe set at frame {} ({} total)",
                    project.current_frame(),
                    project.timeline.len()
                );
            }),
            PropertiesAction::RemoveKeyframe => {
                if project.remove_keyframe_here() {
                    log::info!("Keyframe removed at frame {}", project.current_frame());
                }
                Ok(())
            }
            PropertiesAction::SetInterpolation(kind) => {
                project.set_interpolation(kind);
                log::info!("Interpolation set to {}", kind.label());
                Ok(())
            }
            PropertiesAction::SetSelection(rect) => {
                project
                    .editor
                    .set_selection(rect.x, rect.y, rect.width, rect.height);
                Ok(())
            }
            PropertiesAction::None
            | PropertiesAction::JumpToKeyframe(_)
            | PropertiesAction::Export
            | PropertiesAction::CancelRender => Ok(()),
        };

        if let Err(e) = result {
            self.report(e);
        }
    }

    fn handle_toolbar_action(&mut self, action: toolbar::ToolbarAction) {
        use toolbar::ToolbarAction;

        match action {
            ToolbarAction::None => {}
            ToolbarAction::TogglePlay => self.toggle_playback(),
            ToolbarAction::Stop => {
                self.playback.pause();
                self.seek(0);
            }
            ToolbarAction::Step(delta) => self.step(delta),
            ToolbarAction::JumpToStart => {
                self.playback.pause();
                self.seek(0);
            }
            ToolbarAction::JumpToEnd => {
                self.playback.pause();
                if let Some(project) = self.project.as_mut() {
                    let last = project.last_frame();
                    project.seek(last);
                }
            }
            ToolbarAction::SetZoom(zoom) => self.set_zoom(zoom),
            ToolbarAction::ShowShortcuts => self.dialog = Some(Dialog::Shortcuts),
        }
    }

    fn handle_keyboard(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() || self.project.is_none() {
            return;
        }

        let (escape, space, left, right, command, shift) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Escape),
                i.key_pressed(egui::Key::Space),
                i.key_pressed(egui::Key::ArrowLeft),
                i.key_pressed(egui::Key::ArrowRight),
                i.modifiers.command,
                i.modifiers.shift,
            )
        });

        if escape {
            if let Some(project) = self.project.as_mut() {
                if project.editor.is_idle() {
                    project.editor.clear_selection();
                }
            }
        }
        if space {
            self.toggle_playback();
        }
        for (pressed, forward) in [(left, false), (right, true)] {
            if !pressed {
                continue;
            }
            if command {
                let action = if forward {
                    toolbar::ToolbarAction::JumpToEnd
                } else {
                    toolbar::ToolbarAction::JumpToStart
                };
                self.handle_toolbar_action(action);
            } else if shift {
                self.jump_to_keyframe(if forward {
                    Direction::Next
                } else {
                    Direction::Prev
                });
            } else {
                self.step(if forward { 1 } else { -1 });
            }
        }

        let zoom_delta = ctx.input(|i| i.zoom_delta()) as f64;
        if zoom_delta != 1.0 {
            if let Some(zoom) = self.project.as_ref().map(|p| p.editor.zoom()) {
                self.set_zoom(zoom * zoom_delta);
            }
        }
    }

    /// Compile the timeline and start the encoder in the background.
    fn start_export(&mut self) {
        if self.rendering() {
            return;
        }
        let Some(project) = self.project.as_ref() else {
            return;
        };

        let compiled = (|| -> crate::error::Result<CompiledCrop> {
            let lock = project.lock().ok_or(CropError::NotLocked)?;
            if project.editor.selection().is_none() {
                return Err(CropError::EmptySelection);
            }
            compile(&project.timeline, lock)
        })();
        let compiled = match compiled {
            Ok(compiled) => compiled,
            Err(e) => {
                self.report(e);
                return;
            }
        };

        let default_name = project
            .source
            .path
            .file_stem()
            .map(|stem| format!("{}_cropped.gif", stem.to_string_lossy()))
            .unwrap_or_else(|| "cropped.gif".to_string());
        let Some(picked) = rfd::FileDialog::new()
            .add_filter("GIF", &["gif"])
            .set_file_name(default_name)
            .save_file()
        else {
            return;
        };
        let output = with_gif_extension(picked);
        if output == project.source.path {
            self.dialog = Some(Dialog::Message {
                title: "Cannot do that yet".to_string(),
                text: "Choose an output file other than the source animation".to_string(),
            });
            return;
        }

        let options = self.settings.render.compile_options();
        let drift = compiled.max_drift(project.source.size, project.source.frame_count, options.precision);
        if drift > 0.5 {
            log::warn!(
                "Rounding to {} decimals shifts the crop by up to {:.2} px; raise render.precision",
                options.precision,
                drift
            );
        } else {
            log::debug!("Crop drift from rounding: {:.4} px", drift);
        }
        let filter_graph = compiled.filter_graph(&options);
        log::info!("Exporting to {}", output.display());
        log::debug!("Filter graph: {}", filter_graph);

        let total_frames = project.source.frame_count;
        let request = RenderRequest {
            ffmpeg: self.settings.encoder.ffmpeg.clone(),
            input: project.source.path.clone(),
            output,
            filter_graph,
            total_frames,
        };
        self.playback.pause();
        self.render = Some(RenderJob::spawn(request));
        self.render_progress = properties::RenderProgress {
            frame: 0,
            total: total_frames,
        };
    }

    fn poll_render(&mut self, ctx: &egui::Context) {
        let Some(job) = &self.render else {
            return;
        };

        let mut finished = None;
        for event in job.poll() {
            match event {
                RenderEvent::Progress { frame, total } => {
                    self.render_progress = properties::RenderProgress { frame, total };
                }
                RenderEvent::Finished(result) => finished = Some(result),
            }
        }

        match finished {
            None => ctx.request_repaint_after(Duration::from_millis(100)),
            Some(result) => {
                self.render = None;
                match result {
                    Ok(path) => {
                        self.status = format!("Exported {}", path.display());
                        self.dialog = Some(Dialog::Message {
                            title: "Export complete".to_string(),
                            text: format!("Saved {}", path.display()),
                        });
                    }
                    Err(CropError::Cancelled) => {
                        self.status = "Export cancelled".to_string();
                    }
                    Err(e) => self.report(e),
                }
            }
        }
    }

    fn show_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = self.dialog.take() else {
            return;
        };
        let title = match &dialog {
            Dialog::ConfirmUnlock { .. } => "Unlock output?".to_string(),
            Dialog::Message { title, .. } => title.clone(),
            Dialog::Shortcuts => "Keyboard Shortcuts".to_string(),
        };

        let mut close = false;
        let mut confirmed = false;
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| match &dialog {
                Dialog::ConfirmUnlock { keyframes } => {
                    ui.label(format!(
                        "Unlocking removes all {} keyframes. Continue?",
                        keyframes
                    ));
                    ui.horizontal(|ui| {
                        if ui.button("Unlock").clicked() {
                            confirmed = true;
                            close = true;
                        }
                        if ui.button("Keep").clicked() {
                            close = true;
                        }
                    });
                }
                Dialog::Message { text, .. } => {
                    ui.label(text);
                    if ui.button("OK").clicked() {
                        close = true;
                    }
                }
                Dialog::Shortcuts => {
                    egui::Grid::new("shortcuts").num_columns(2).show(ui, |ui| {
                        for (keys, what) in SHORTCUTS {
                            ui.label(egui::RichText::new(*keys).monospace());
                            ui.label(*what);
                            ui.end_row();
                        }
                    });
                    if ui.button("Close").clicked() {
                        close = true;
                    }
                }
            });

        if confirmed {
            if let Some(project) = self.project.as_mut() {
                match project.unlock_output(true) {
                    Ok(()) => log::info!("Output unlocked, keyframes cleared"),
                    Err(e) => log::error!("{}", e),
                }
            }
        }
        if !close {
            self.dialog = Some(dialog);
        }
    }
}

const SHORTCUTS: &[(&str, &str)] = &[
    ("Space", "Play / pause"),
    ("← / →", "Previous / next frame"),
    ("Shift+← / →", "Previous / next keyframe"),
    ("Ctrl+← / →", "First / last frame"),
    ("Ctrl+scroll", "Zoom"),
    ("Escape", "Clear selection"),
];

impl eframe::App for KeyCropApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for completed loading
        if let Some(ref receiver) = self.loader {
            if let Ok(result) = receiver.try_recv() {
                self.loader = None;
                self.loading_message = None;

                match result {
                    Ok(loaded) => self.finish_loading(ctx, loaded),
                    Err(e) => {
                        log::error!("Failed to load animation: {}", e);
                        self.dialog = Some(Dialog::Message {
                            title: "Error".to_string(),
                            text: e,
                        });
                    }
                }
            }
        }

        // Request repaint if still loading (to update spinner)
        if self.loading_message.is_some() {
            ctx.request_repaint();
        }

        self.poll_render(ctx);
        self.tick_playback(ctx);
        self.handle_keyboard(ctx);

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    let idle = self.render.is_none();
                    if ui.add_enabled(idle, egui::Button::new("Open GIF...")).clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("GIF", &["gif"])
                            .pick_file()
                        {
                            self.load_animation(path);
                        }
                        ui.close_menu();
                    }
                    let can_export = idle && self.project.is_some();
                    if ui
                        .add_enabled(can_export, egui::Button::new("Export GIF..."))
                        .clicked()
                    {
                        ui.close_menu();
                        self.start_export();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Help", |ui| {
                    if ui.button("Keyboard Shortcuts").clicked() {
                        self.dialog = Some(Dialog::Shortcuts);
                        ui.close_menu();
                    }
                });
            });
        });

        // Toolbar
        let zoom = self.project.as_ref().map_or(1.0, |p| p.editor.zoom());
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| {
                toolbar::show(ui, self.playback.playing, zoom, &self.settings.view)
            })
            .inner;
        self.handle_toolbar_action(toolbar_action);

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.label(egui::RichText::new(&self.status).weak());
        });

        if let Some(project) = self.project.as_ref() {
            // Timeline scrubber
            let seek = egui::TopBottomPanel::bottom("timeline")
                .show(ctx, |ui| timeline::show(ui, project))
                .inner;
            if let Some(frame) = seek {
                self.seek(frame);
            }
        }

        if let Some(project) = self.project.as_ref() {
            // Properties panel (right side)
            let render = self.render.as_ref().map(|_| self.render_progress);
            let properties_action = egui::SidePanel::right("properties")
                .default_width(260.0)
                .show(ctx, |ui| properties::show(ui, project, &mut self.output_size, render))
                .inner;
            self.handle_properties_action(properties_action);
        }

        self.sync_texture();

        // Main canvas (center)
        let events = egui::CentralPanel::default()
            .show(ctx, |ui| {
                if let Some(ref message) = self.loading_message {
                    canvas::show_loading(ui, message);
                    Vec::new()
                } else if let (Some(project), Some(texture)) =
                    (self.project.as_ref(), self.frame_texture.as_ref())
                {
                    canvas::show(ui, &project.editor, texture)
                } else {
                    canvas::show_welcome(ui);
                    Vec::new()
                }
            })
            .inner;

        if let Some(project) = self.project.as_mut() {
            for event in events {
                project.editor.apply(event);
            }
        }

        self.show_dialog(ctx);
    }
}

fn color_image(size: ImageSize, frame: &LoadedFrame) -> egui::ColorImage {
    egui::ColorImage::from_rgba_unmultiplied(
        [size.width as usize, size.height as usize],
        &frame.pixels,
    )
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Append `.gif` unless the path already ends with it.
fn with_gif_extension(path: PathBuf) -> PathBuf {
    let is_gif = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gif"));
    if is_gif {
        path
    } else {
        let mut name = path.into_os_string();
        name.push(".gif");
        PathBuf::from(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playback_honours_frame_delays() {
        let delays = [100, 50, 200];
        let mut playback = Playback::default();

        assert_eq!(playback.advance(60.0, 0, &delays), 0);
        assert_eq!(playback.advance(60.0, 0, &delays), 1);
        assert_eq!(playback.advance(20.0, 1, &delays), 1);
        assert_eq!(playback.advance(10.0, 1, &delays), 2);
    }

    #[test]
    fn test_playback_wraps_to_first_frame() {
        let delays = [100, 100];
        let mut playback = Playback::default();
        assert_eq!(playback.advance(250.0, 0, &delays), 0);
        assert_eq!(playback.advance(60.0, 0, &delays), 1);
    }

    #[test]
    fn test_playback_without_frames() {
        let mut playback = Playback::default();
        assert_eq!(playback.advance(1000.0, 3, &[]), 3);
    }

    #[test]
    fn test_remaining_time() {
        let delays = [100, 100];
        let mut playback = Playback::default();
        playback.advance(30.0, 0, &delays);
        assert_eq!(playback.remaining(0, &delays), Duration::from_millis(70));
    }

    #[test]
    fn test_gif_extension_appended() {
        assert_eq!(
            with_gif_extension(PathBuf::from("/tmp/out")),
            PathBuf::from("/tmp/out.gif")
        );
        assert_eq!(
            with_gif_extension(PathBuf::from("/tmp/out.GIF")),
            PathBuf::from("/tmp/out.GIF")
        );
        assert_eq!(
            with_gif_extension(PathBuf::from("/tmp/out.mp4")),
            PathBuf::from("/tmp/out.mp4.gif")
        );
    }
}
