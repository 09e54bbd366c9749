//! Pipeline stages for diagram-to-SVG conversion.
//!
//! Each submodule implements exactly one transformation step. Keeping stages
//! separate makes each independently testable and lets us swap a tool
//! (e.g. a different PDF-to-SVG converter) without touching other stages.
//!
//! ## Data Flow
//!
//! ```text
//! scan ──▶ render ──▶ pages::merge ──▶ pages::split ──▶ svg
//! (list)   (draw.io)  (lopdf)          (lopdf)          (Inkscape)
//! ```
//!
//! 1. [`scan`]   — extension-filtered, sorted listing of the input directory
//! 2. [`render`] — draw.io CLI export, one PDF per diagram, sequential
//! 3. [`pages`]  — merge every exported PDF into one document, then split it
//!    back into single-page files; runs in `spawn_blocking` because lopdf is
//!    synchronous
//! 4. [`svg`]    — Inkscape conversion of each page PDF, bounded concurrency

pub mod pages;
pub mod render;
pub mod scan;
pub mod svg;

use crate::error::PipelineError;
use std::ffi::OsString;
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

/// Run an external converter on one input file.
///
/// Distinguishes "could not spawn the binary" (installation problem) from
/// "the tool exited non-zero" (bad input). Stderr is captured and trimmed to
/// its last lines so draw.io's Electron chatter does not swamp the error.
pub(crate) async fn run_tool(
    tool: &'static str,
    binary: &Path,
    args: &[OsString],
    input: &Path,
) -> Result<(), PipelineError> {
    debug!("exec {} {:?}", binary.display(), args);

    let output = Command::new(binary)
        .args(args)
        .output()
        .await
        .map_err(|e| PipelineError::ToolNotFound {
            tool,
            path: binary.to_path_buf(),
            source: e,
        })?;

    if !output.status.success() {
        return Err(PipelineError::ToolFailed {
            tool,
            input: input.to_path_buf(),
            status: output.status.to_string(),
            stderr: stderr_tail(&output.stderr),
        });
    }

    Ok(())
}

/// Last few non-empty stderr lines, capped so error messages stay readable.
fn stderr_tail(stderr: &[u8]) -> String {
    const MAX_LINES: usize = 5;
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(MAX_LINES);
    let tail = lines[start..].join("\n");
    if tail.is_empty() {
        "(no stderr output)".to_string()
    } else {
        tail
    }
}
