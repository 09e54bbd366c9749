//! Error types for the drawio2svg library.
//!
//! Every variant of [`PipelineError`] is fatal: the run stops on the first
//! failed export. A half-converted diagram set is worse than none, because
//! downstream docs would silently reference stale SVGs.
//!
//! Variants are grouped by pipeline stage. Tool problems are split in two:
//! [`PipelineError::ToolNotFound`] (the binary could not even be spawned,
//! usually an installation/PATH problem) and [`PipelineError::ToolFailed`]
//! (the tool ran and exited non-zero, usually a bad input file). The two
//! need very different fixes, so they get different messages.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the drawio2svg library.
#[derive(Debug, Error)]
pub enum PipelineError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The input directory does not exist.
    #[error("input directory not found: '{path}'\nCheck the path exists and is readable.")]
    InputDirNotFound { path: PathBuf },

    /// The input path exists but is not a directory.
    #[error("input path is not a directory: '{path}'")]
    NotADirectory { path: PathBuf },

    /// No diagram files matched the configured extensions.
    #[error(
        "no diagram files found in '{path}' (looked for extensions: {extensions:?})\n\
         Nothing to do — add .drawio/.xml files or adjust --ext."
    )]
    NoDiagramsFound {
        path: PathBuf,
        extensions: Vec<String>,
    },

    // ── External tool errors ──────────────────────────────────────────────
    /// The tool binary could not be spawned at all.
    #[error(
        "could not run {tool} at '{path}': {source}\n\
         Install it or point the pipeline at the binary (--drawio / --inkscape)."
    )]
    ToolNotFound {
        tool: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The tool ran but exited with a failure status.
    #[error("{tool} failed on '{input}' ({status})\nstderr: {stderr}")]
    ToolFailed {
        tool: &'static str,
        input: PathBuf,
        status: String,
        stderr: String,
    },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// The export stage reported success but left no PDFs behind.
    #[error(
        "no PDFs found in working directory '{path}'\n\
         draw.io reported success but exported nothing — check the diagram files."
    )]
    NoPdfsProduced { path: PathBuf },

    /// A file handed to the merge stage does not start with `%PDF`.
    #[error("'{path}' is not a PDF (first bytes: {magic:?})\nDid the export step produce it?")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    /// lopdf could not parse a document.
    #[error("failed to read PDF '{path}': {detail}")]
    PdfParse { path: PathBuf, detail: String },

    /// lopdf could not write a document.
    #[error("failed to write PDF '{path}': {detail}")]
    PdfWrite { path: PathBuf, detail: String },

    /// The merged document contains no pages.
    #[error("merged document '{path}' has no pages — nothing to split")]
    NoPages { path: PathBuf },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Directory creation, file deletion, or listing failed.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error (task panic, runtime creation, …).
    #[error("internal error: {0}")]
    Internal(String),
}

impl PipelineError {
    /// Shorthand for wrapping an `io::Error` with the path it concerned.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }
}
