//! Pipeline driver: sequences scan → render → merge → split → svg and owns
//! the working-directory lifecycle.
//!
//! The working directory holds every intermediate PDF. By default it is a
//! [`tempfile::TempDir`] kept alive for the duration of the run and deleted
//! when the driver returns — success, error, or panic — so a failed run
//! never leaves half-converted files for the next run to trip over. The
//! final output directory is only written to in the last stage.

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::pipeline::{pages, render, scan, svg};
use crate::report::{RunReport, StageTimings};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::TempDir;
use tracing::{debug, info};

/// The working directory for intermediate PDFs.
///
/// `Temp` is deleted on drop; `Fixed` (user-supplied via
/// [`PipelineConfig::workdir`]) is left in place for inspection.
enum Workdir {
    Temp(TempDir),
    Fixed(PathBuf),
}

impl Workdir {
    fn path(&self) -> &Path {
        match self {
            Workdir::Temp(t) => t.path(),
            Workdir::Fixed(p) => p,
        }
    }
}

/// Run the full diagram-to-SVG pipeline.
///
/// This is the primary entry point for the library.
///
/// # Errors
/// Any stage failure aborts the run and is returned as [`PipelineError`];
/// there is no partial-success mode. The output directory may already
/// contain SVGs from pages converted before the failing one.
pub async fn run(config: &PipelineConfig) -> Result<RunReport, PipelineError> {
    let total_start = Instant::now();
    info!(
        "starting pipeline: '{}' → '{}'",
        config.input_dir.display(),
        config.output_dir.display()
    );

    let diagrams = scan::scan_dir(&config.input_dir, &config.diagram_extensions)?;
    if diagrams.is_empty() {
        return Err(PipelineError::NoDiagramsFound {
            path: config.input_dir.clone(),
            extensions: config.diagram_extensions.clone(),
        });
    }
    debug!("found {} diagram files", diagrams.len());

    std::fs::create_dir_all(&config.output_dir)
        .map_err(|e| PipelineError::io(&config.output_dir, e))?;

    let workdir = match &config.workdir {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|e| PipelineError::io(dir, e))?;
            // A reused workdir may still hold page PDFs from an earlier run;
            // the merge stage would sweep them up, so clear them first.
            let stale = scan::scan_dir(dir, &["pdf".to_string()])?;
            if !stale.is_empty() {
                debug!(
                    "removing {} leftover PDFs from '{}'",
                    stale.len(),
                    dir.display()
                );
                for path in &stale {
                    std::fs::remove_file(path).map_err(|e| PipelineError::io(path, e))?;
                }
            }
            Workdir::Fixed(dir.clone())
        }
        None => Workdir::Temp(
            TempDir::new().map_err(|e| PipelineError::Internal(format!("tempdir: {e}")))?,
        ),
    };
    debug!("working directory: {}", workdir.path().display());

    let mut timings = StageTimings::default();

    info!("step 1/4: exporting {} diagrams to PDF", diagrams.len());
    let stage = Instant::now();
    let diagram_count = render::diagrams_to_pdf(&diagrams, workdir.path(), config).await?;
    timings.render_ms = stage.elapsed().as_millis() as u64;

    info!("step 2/4: merging exported PDFs");
    let stage = Instant::now();
    let (merged, page_count) = pages::merge_pdfs(workdir.path()).await?;
    timings.merge_ms = stage.elapsed().as_millis() as u64;

    info!("step 3/4: splitting {} pages", page_count);
    let stage = Instant::now();
    let page_pdfs = pages::split_pdf(&merged, &config.page_prefix).await?;
    timings.split_ms = stage.elapsed().as_millis() as u64;

    info!("step 4/4: converting {} pages to SVG", page_pdfs.len());
    let stage = Instant::now();
    let svg_paths = svg::pdfs_to_svg(&page_pdfs, &config.output_dir, config).await?;
    timings.svg_ms = stage.elapsed().as_millis() as u64;

    if config.keep_workdir {
        if let Workdir::Temp(tmp) = workdir {
            let kept = tmp.keep();
            info!("keeping working directory: {}", kept.display());
        }
    }

    timings.total_ms = total_start.elapsed().as_millis() as u64;
    info!(
        "pipeline complete: {} diagrams → {} SVGs in {}ms",
        diagram_count,
        svg_paths.len(),
        timings.total_ms
    );

    Ok(RunReport {
        diagram_count,
        page_count,
        svg_paths,
        timings,
    })
}

/// Synchronous wrapper around [`run`].
///
/// Creates a temporary tokio runtime internally.
pub fn run_sync(config: &PipelineConfig) -> Result<RunReport, PipelineError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| PipelineError::Internal(format!("failed to create tokio runtime: {e}")))?
        .block_on(run(config))
}
