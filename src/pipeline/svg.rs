//! SVG conversion: invoke Inkscape to trace each single-page PDF into a
//! plain SVG in the output directory.
//!
//! Inkscape processes are fully independent, so conversions run through a
//! bounded concurrent stream (`buffer_unordered`). Results are re-sorted
//! afterwards because completion order is nondeterministic.

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::pipeline::run_tool;
use futures::stream::{self, StreamExt};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::info;

/// Convert each page PDF to `<output_dir>/<stem>.svg`.
///
/// Invokes `inkscape --without-gui --file=<pdf> --export-plain-svg=<svg>`
/// per page, up to `config.concurrency` at a time. Aborts on the first
/// failure. Returns the written SVG paths in page order (the order of
/// `page_pdfs`), regardless of which conversion finished first.
pub async fn pdfs_to_svg(
    page_pdfs: &[PathBuf],
    out_dir: &Path,
    config: &PipelineConfig,
) -> Result<Vec<PathBuf>, PipelineError> {
    let results: Vec<Result<(), PipelineError>> =
        stream::iter(page_pdfs.iter().map(|pdf| {
            let svg = out_dir.join(svg_name(pdf));
            let inkscape = config.inkscape_path.clone();
            async move {
                let args = convert_args(pdf, &svg);
                run_tool("inkscape", &inkscape, &args, pdf).await?;
                info!("SVG generated for '{}'", pdf.display());
                Ok(())
            }
        }))
        .buffer_unordered(config.concurrency)
        .collect()
        .await;

    results.into_iter().collect::<Result<(), _>>()?;

    // Every conversion succeeded; the output paths are a pure function of
    // the inputs, so rebuild them in page order.
    Ok(page_pdfs
        .iter()
        .map(|pdf| out_dir.join(svg_name(pdf)))
        .collect())
}

/// `page3.pdf` → `page3.svg`.
fn svg_name(pdf: &Path) -> PathBuf {
    let mut name = PathBuf::from(pdf.file_name().unwrap_or_default());
    name.set_extension("svg");
    name
}

/// Argument vector for one Inkscape conversion.
fn convert_args(pdf: &Path, svg: &Path) -> Vec<OsString> {
    let mut file_arg = OsString::from("--file=");
    file_arg.push(pdf.as_os_str());
    let mut export_arg = OsString::from("--export-plain-svg=");
    export_arg.push(svg.as_os_str());
    vec!["--without-gui".into(), file_arg, export_arg]
}
