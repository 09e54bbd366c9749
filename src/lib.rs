//! # drawio2svg
//!
//! Batch-convert draw.io diagrams to per-page SVG files.
//!
//! ## Why this crate?
//!
//! draw.io exports multi-page diagrams to a single PDF per file, and most
//! documentation toolchains want one SVG per diagram page. Gluing the export,
//! page extraction, and SVG conversion together by hand (or with a shell
//! script) is fragile: partial output is left behind on failure and page
//! numbering drifts between runs. This crate drives the whole pipeline from
//! one command, works in a throwaway directory, and either produces the full
//! set of SVGs or fails loudly.
//!
//! ## Pipeline Overview
//!
//! ```text
//! diagrams (.drawio / .xml)
//!  │
//!  ├─ 1. Scan    list diagram files in the input directory
//!  ├─ 2. Render  draw.io CLI → one PDF per diagram (in a temp workdir)
//!  ├─ 3. Merge   lopdf copies every page into merged.pdf
//!  ├─ 4. Split   merged.pdf → page1.pdf … pageN.pdf
//!  └─ 5. SVG     Inkscape → pageN.svg in the output directory
//! ```
//!
//! External tools do the drawing: draw.io renders diagrams, Inkscape traces
//! PDF pages into plain SVG. The crate only orchestrates them and reshuffles
//! PDF pages with [`lopdf`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use drawio2svg::{run, PipelineConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PipelineConfig::builder("diagrams", "site/assets").build()?;
//!     let report = run(&config).await?;
//!     println!(
//!         "{} diagrams → {} pages → {} SVGs in {}ms",
//!         report.diagram_count,
//!         report.page_count,
//!         report.svg_paths.len(),
//!         report.timings.total_ms
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `drawio2svg` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! drawio2svg = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod run;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{PipelineConfig, PipelineConfigBuilder, DEFAULT_DIAGRAM_EXTENSIONS};
pub use error::PipelineError;
pub use report::{RunReport, StageTimings};
pub use run::{run, run_sync};
