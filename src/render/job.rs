// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Background render worker.
//!
//! The encoder runs on its own thread so the UI stays responsive. The UI
//! polls for progress, and may cancel, which kills the encoder process.
//! The encoder writes to a scratch file beside the chosen output, which
//! replaces the output only when the render succeeds. The filter script
//! and the scratch file are always deleted.

use crate::error::{CropError, Result};
use crate::io::encoder::{
    diagnostics, parse_progress_frame, partial_output_path, push_tail, write_filter_script,
};
use std::collections::VecDeque;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard};

/// Everything the worker needs, captured when the export starts.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub ffmpeg: PathBuf,
    pub input: PathBuf,
    pub output: PathBuf,
    pub filter_graph: String,
    pub total_frames: u32,
}

/// Messages from the worker to the UI.
#[derive(Debug)]
pub enum RenderEvent {
    Progress { frame: u32, total: u32 },
    Finished(Result<PathBuf>),
}

/// Handle to a running render.
pub struct RenderJob {
    receiver: Receiver<RenderEvent>,
    child: Arc<Mutex<Option<Child>>>,
    cancelled: Arc<AtomicBool>,
}

impl RenderJob {
    /// Start rendering on a background thread.
    pub fn spawn(request: RenderRequest) -> Self {
        let (sender, receiver) = channel();
        let child = Arc::new(Mutex::new(None));
        let cancelled = Arc::new(AtomicBool::new(false));

        let worker_child = Arc::clone(&child);
        let worker_cancelled = Arc::clone(&cancelled);
        std::thread::spawn(move || {
            let result = run(&request, &worker_child, &worker_cancelled, &sender);
            match &result {
                Ok(path) => log::info!("Render finished: {}", path.display()),
                Err(e) => log::error!("Render failed: {}", e),
            }
            let _ = sender.send(RenderEvent::Finished(result));
        });

        Self {
            receiver,
            child,
            cancelled,
        }
    }

    /// Drain pending events without blocking.
    pub fn poll(&self) -> Vec<RenderEvent> {
        self.receiver.try_iter().collect()
    }

    /// Ask the worker to stop and kill the encoder if it is running.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        if let Some(child) = lock_slot(&self.child).as_mut() {
            if let Err(e) = child.kill() {
                log::warn!("Failed to kill encoder: {}", e);
            }
        }
        log::info!("Render cancellation requested");
    }

    /// Block until the worker reports its result.
    #[cfg(test)]
    pub fn wait(self) -> Result<PathBuf> {
        for event in self.receiver.iter() {
            if let RenderEvent::Finished(result) = event {
                return result;
            }
        }
        Err(CropError::Cancelled)
    }
}

/// The slot only ever holds the child handle, so a panic elsewhere cannot
/// leave it half-updated.
fn lock_slot(slot: &Mutex<Option<Child>>) -> MutexGuard<'_, Option<Child>> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn run(
    request: &RenderRequest,
    child_slot: &Mutex<Option<Child>>,
    cancelled: &AtomicBool,
    sender: &Sender<RenderEvent>,
) -> Result<PathBuf> {
    let script = write_filter_script(&request.filter_graph)?;
    let partial = partial_output_path(&request.output)?;

    let mut command = Command::new(&request.ffmpeg);
    command
        .args(["-y", "-hide_banner", "-nostats", "-progress", "pipe:1"])
        .arg("-i")
        .arg(&request.input)
        .arg("-filter_complex_script")
        .arg(&*script)
        .arg(&*partial)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    log::debug!("Starting encoder: {:?}", command);

    let mut child = command.spawn().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CropError::EncoderNotFound {
                program: request.ffmpeg.display().to_string(),
            }
        } else {
            CropError::Io(e)
        }
    })?;

    let stdout = child.stdout.take();
    let stderr_reader = child.stderr.take().map(|stderr| {
        std::thread::spawn(move || {
            let mut tail = VecDeque::new();
            for line in BufReader::new(stderr).lines().map_while(|l| l.ok()) {
                push_tail(&mut tail, line);
            }
            tail
        })
    });

    {
        let mut slot = lock_slot(child_slot);
        if cancelled.load(Ordering::SeqCst) {
            let _ = child.kill();
        }
        *slot = Some(child);
    }

    if let Some(stdout) = stdout {
        let mut last = 0;
        for line in BufReader::new(stdout).lines().map_while(|l| l.ok()) {
            if let Some(frame) = parse_progress_frame(&line) {
                let frame = frame.min(request.total_frames);
                if frame != last {
                    last = frame;
                    let _ = sender.send(RenderEvent::Progress {
                        frame,
                        total: request.total_frames,
                    });
                }
            }
        }
    }

    let child = lock_slot(child_slot).take();
    let status = match child {
        Some(mut child) => child.wait()?,
        None => return Err(CropError::Cancelled),
    };
    let tail = stderr_reader
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default();

    check_status(status, cancelled.load(Ordering::SeqCst), &tail)?;
    partial
        .persist(&request.output)
        .map_err(|e| CropError::Io(e.error))?;
    Ok(request.output.clone())
}

/// Decide the outcome of a finished encoder run.
///
/// A successful exit wins over a late cancel request: the kill did not
/// land, so the output is complete.
fn check_status(status: ExitStatus, cancelled: bool, tail: &VecDeque<String>) -> Result<()> {
    if status.success() {
        if cancelled {
            log::info!("Cancel arrived after the encoder finished; keeping output");
        }
        return Ok(());
    }
    if cancelled {
        return Err(CropError::Cancelled);
    }
    Err(CropError::EncoderFailed {
        status: status.to_string(),
        diagnostics: diagnostics(tail),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::time::Duration;

    fn request(ffmpeg: impl Into<PathBuf>, output: PathBuf) -> RenderRequest {
        RenderRequest {
            ffmpeg: ffmpeg.into(),
            input: PathBuf::from("input.gif"),
            output,
            filter_graph: "scale=w='iw':h='ih'".to_string(),
            total_frames: 10,
        }
    }

    fn entries(dir: &Path) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        paths.sort();
        paths
    }

    #[test]
    fn test_missing_encoder_keeps_existing_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("previous.gif");
        std::fs::write(&output, b"previous export").unwrap();

        let job = RenderJob::spawn(request("keycrop-no-such-encoder", output.clone()));
        let err = job.wait().unwrap_err();

        assert!(matches!(err, CropError::EncoderNotFound { .. }), "{err}");
        assert_eq!(std::fs::read(&output).unwrap(), b"previous export");
        assert_eq!(entries(dir.path()), vec![output]);
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_render_keeps_existing_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("previous.gif");
        std::fs::write(&output, b"previous export").unwrap();

        let job = RenderJob::spawn(request("false", output.clone()));
        let err = job.wait().unwrap_err();

        assert!(matches!(err, CropError::EncoderFailed { .. }), "{err}");
        assert_eq!(std::fs::read(&output).unwrap(), b"previous export");
        assert_eq!(entries(dir.path()), vec![output]);
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_render_replaces_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("clip.gif");
        std::fs::write(&output, b"previous export").unwrap();

        let job = RenderJob::spawn(request("true", output.clone()));
        assert_eq!(job.wait().unwrap(), output);

        // `true` writes nothing, so the empty scratch file took its place.
        assert_eq!(std::fs::read(&output).unwrap(), b"");
        assert_eq!(entries(dir.path()), vec![output]);
    }

    #[cfg(unix)]
    #[test]
    fn test_cancel_kills_encoder_and_cleans_up() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("out");
        std::fs::create_dir(&out_dir).unwrap();
        let output = out_dir.join("clip.gif");
        let script_record = dir.path().join("script-path");

        // Records the filter script path, writes partial output and then
        // reports progress slowly until killed.
        let encoder = dir.path().join("fake-ffmpeg");
        std::fs::write(
            &encoder,
            format!(
                "#!/bin/sh\n\
                 while [ $# -gt 1 ]; do\n\
                 \x20 if [ \"$1\" = -filter_complex_script ]; then echo \"$2\" > '{}'; fi\n\
                 \x20 shift\n\
                 done\n\
                 echo partial > \"$1\"\n\
                 i=1\n\
                 while [ $i -le 300 ]; do\n\
                 \x20 echo frame=$i\n\
                 \x20 i=$((i + 1))\n\
                 \x20 sleep 0.1\n\
                 done\n",
                script_record.display()
            ),
        )
        .unwrap();
        std::fs::set_permissions(&encoder, std::fs::Permissions::from_mode(0o755)).unwrap();

        let job = RenderJob::spawn(request(&encoder, output.clone()));
        let mut progressed = false;
        while !progressed {
            match job.receiver.recv_timeout(Duration::from_secs(10)).unwrap() {
                RenderEvent::Progress { frame, total } => {
                    assert!(frame >= 1);
                    assert_eq!(total, 10);
                    progressed = true;
                }
                RenderEvent::Finished(result) => panic!("finished early: {result:?}"),
            }
        }

        job.cancel();
        let err = job.wait().unwrap_err();

        assert!(matches!(err, CropError::Cancelled), "{err}");
        assert!(!output.exists());
        assert!(entries(&out_dir).is_empty());
        let script = std::fs::read_to_string(&script_record).unwrap();
        assert!(!Path::new(script.trim()).exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_success_outweighs_late_cancel() {
        use std::os::unix::process::ExitStatusExt;

        let tail = VecDeque::new();
        let exited = ExitStatus::from_raw(0);
        let killed = ExitStatus::from_raw(9);

        assert!(check_status(exited, true, &tail).is_ok());
        assert!(matches!(
            check_status(killed, true, &tail),
            Err(CropError::Cancelled)
        ));
        assert!(matches!(
            check_status(killed, false, &tail),
            Err(CropError::EncoderFailed { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_poisoned_slot_still_yields_child() {
        let slot = Arc::new(Mutex::new(Some(Command::new("true").spawn().unwrap())));
        let poisoner = Arc::clone(&slot);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("poison the slot");
        })
        .join();
        assert!(slot.is_poisoned());

        let mut child = lock_slot(&slot).take().expect("child survives poisoning");
        assert!(child.wait().unwrap().success());
    }
}
