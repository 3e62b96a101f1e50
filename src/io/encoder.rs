// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Helpers for talking to the external encoder.
//!
//! Parsing of the encoder's progress and metadata text, diagnostics
//! extraction, and scratch files that clean up after themselves.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::path::Path;
use tempfile::TempPath;

/// Number of stderr lines kept for error reports.
pub const STDERR_TAIL_LINES: usize = 50;

/// Extract the frame counter from an encoder progress line.
///
/// Handles both `-progress` output (`frame=12`) and the classic stats
/// line (`frame=  12 fps=...`).
pub fn parse_progress_frame(line: &str) -> Option<u32> {
    let marker = "frame=";
    let start = line.find(marker)? + marker.len();
    line[start..].trim_start().split(|c: char| !c.is_ascii_digit()).next()?.parse().ok()
}

/// Parse a rational frame rate such as `30/1` or `30000/1001`.
pub fn parse_frame_rate(text: &str) -> Option<f64> {
    let text = text.trim();
    let rate = match text.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => text.parse().ok()?,
    };
    (rate.is_finite() && rate > 0.0).then_some(rate)
}

/// Push a line onto a bounded tail buffer.
pub fn push_tail(tail: &mut VecDeque<String>, line: String) {
    tail.push_back(line);
    if tail.len() > STDERR_TAIL_LINES {
        tail.pop_front();
    }
}

/// Pick the lines worth showing the user from the encoder's stderr tail.
pub fn diagnostics(tail: &VecDeque<String>) -> String {
    let errors: Vec<&str> = tail
        .iter()
        .map(String::as_str)
        .filter(|line| {
            line.contains("Error")
                || line.contains("error")
                || line.contains("Invalid")
                || line.contains("Failed")
                || line.contains("failed")
        })
        .collect();

    if errors.is_empty() {
        let skip = tail.len().saturating_sub(5);
        tail.iter().skip(skip).cloned().collect::<Vec<_>>().join("\n")
    } else {
        errors.join("\n")
    }
}

/// Write the filter graph to a scratch file, removed when the returned path drops.
pub fn write_filter_script(graph: &str) -> io::Result<TempPath> {
    let mut file = tempfile::Builder::new()
        .prefix("keycrop-filter")
        .suffix(".txt")
        .tempfile()?;
    file.write_all(graph.as_bytes())?;
    file.flush()?;
    Ok(file.into_temp_path())
}

/// Reserve a scratch path beside `target` for the encoder to write into.
///
/// The path keeps the target's extension so the encoder picks the same
/// muxer. It is removed on drop unless persisted over the target.
pub fn partial_output_path(target: &Path) -> io::Result<TempPath> {
    let dir = match target.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let suffix = target
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    let file = tempfile::Builder::new()
        .prefix(".keycrop-partial-")
        .suffix(&suffix)
        .tempfile_in(dir)?;
    Ok(file.into_temp_path())
}
