//! CLI binary for drawio2svg.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `PipelineConfig` and prints a run summary.

use anyhow::{Context, Result};
use clap::Parser;
use drawio2svg::{run, PipelineConfig};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert every .drawio/.xml file in ./diagrams to SVGs in ./svg
  drawio2svg diagrams -o svg

  # Use the macOS app-bundle binary
  drawio2svg diagrams -o svg \
      --drawio /Applications/draw.io.app/Contents/MacOS/draw.io

  # Keep the intermediate PDFs for debugging a bad export
  drawio2svg diagrams -o svg --workdir ./_pdfs_

  # Machine-readable report for build scripts
  drawio2svg diagrams -o svg --json > report.json

REQUIRED TOOLS:
  draw.io    diagram → PDF export     https://github.com/jgraph/drawio-desktop
  Inkscape   PDF → plain SVG tracing  https://inkscape.org

ENVIRONMENT VARIABLES:
  DRAWIO2SVG_DRAWIO       Path to the draw.io CLI binary
  DRAWIO2SVG_INKSCAPE     Path to the Inkscape binary
  DRAWIO2SVG_OUTPUT       Output directory (same as -o)
  DRAWIO2SVG_CONCURRENCY  Concurrent Inkscape invocations (same as -c)
  RUST_LOG                Tracing filter (overrides -v/-q)
"#;

/// Batch-convert draw.io diagrams to per-page SVG files.
#[derive(Parser, Debug)]
#[command(
    name = "drawio2svg",
    version,
    about = "Batch-convert draw.io diagrams to per-page SVG files",
    long_about = "Export every draw.io diagram in a directory to PDF, renumber the pages \
across all diagrams, and convert each page to a plain SVG. Requires the draw.io CLI \
and Inkscape to be installed.",
    arg_required_else_help = true,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Directory containing the diagram source files.
    input_dir: PathBuf,

    /// Directory the SVG files are written to.
    #[arg(short, long, env = "DRAWIO2SVG_OUTPUT", default_value = "svg")]
    output: PathBuf,

    /// Path to the draw.io CLI binary.
    #[arg(long, env = "DRAWIO2SVG_DRAWIO", default_value = "drawio")]
    drawio: PathBuf,

    /// Path to the Inkscape binary.
    #[arg(long, env = "DRAWIO2SVG_INKSCAPE", default_value = "inkscape")]
    inkscape: PathBuf,

    /// Export full pages instead of cropping to the drawing bounds.
    #[arg(long)]
    no_crop: bool,

    /// Diagram file extensions to pick up (repeatable).
    #[arg(long = "ext", value_name = "EXT")]
    extensions: Vec<String>,

    /// Filename prefix for the numbered output files (page1.svg, …).
    #[arg(long, default_value = "page")]
    prefix: String,

    /// Number of concurrent Inkscape invocations.
    #[arg(short, long, env = "DRAWIO2SVG_CONCURRENCY", default_value_t = 4)]
    concurrency: usize,

    /// Use this directory for intermediate PDFs and leave it in place.
    #[arg(long)]
    workdir: Option<PathBuf>,

    /// Keep the temporary working directory after the run.
    #[arg(long)]
    keep_workdir: bool,

    /// Print the run report as JSON instead of a summary line.
    #[arg(long)]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let mut builder = PipelineConfig::builder(&cli.input_dir, &cli.output)
        .drawio_path(&cli.drawio)
        .inkscape_path(&cli.inkscape)
        .crop(!cli.no_crop)
        .page_prefix(&cli.prefix)
        .concurrency(cli.concurrency)
        .keep_workdir(cli.keep_workdir);
    if !cli.extensions.is_empty() {
        builder = builder.diagram_extensions(cli.extensions.clone());
    }
    if let Some(ref dir) = cli.workdir {
        builder = builder.workdir(dir);
    }
    let config = builder.build().context("invalid configuration")?;

    // ── Run pipeline ─────────────────────────────────────────────────────
    let report = run(&config).await.context("conversion failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("failed to serialise report")?;
        println!("{json}");
    } else if !cli.quiet {
        eprintln!(
            "✔ {} diagrams → {} pages → {} SVGs in {}ms  →  {}",
            report.diagram_count,
            report.page_count,
            report.svg_paths.len(),
            report.timings.total_ms,
            cli.output.display(),
        );
    }

    Ok(())
}
