//! Diagram export: invoke the draw.io CLI to turn each diagram into a PDF.
//!
//! Exports run strictly one at a time. The draw.io CLI is the Electron
//! desktop app in headless mode, and concurrent launches race on its shared
//! profile directory and crash intermittently.

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::pipeline::run_tool;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::info;

/// Export every diagram file to a PDF in `out_dir`.
///
/// Invokes `drawio -a [--crop] -x -o <out_dir>/ <file>` per diagram:
/// `-x` export, `-a` all pages, `-o` output folder (the trailing separator
/// tells draw.io it is a folder, keeping the diagram's own filename).
///
/// Returns the number of diagrams exported. Aborts on the first failure.
pub async fn diagrams_to_pdf(
    files: &[PathBuf],
    out_dir: &Path,
    config: &PipelineConfig,
) -> Result<usize, PipelineError> {
    let mut out_folder: OsString = out_dir.as_os_str().to_os_string();
    out_folder.push(std::path::MAIN_SEPARATOR.to_string());

    for file in files {
        let args = export_args(file, &out_folder, config.crop);
        run_tool("draw.io", &config.drawio_path, &args, file).await?;
        info!("PDF generated for '{}'", file.display());
    }

    Ok(files.len())
}

/// Argument vector for one draw.io export.
fn export_args(file: &Path, out_folder: &OsString, crop: bool) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-a".into()];
    if crop {
        args.push("--crop".into());
    }
    args.push("-x".into());
    args.push("-o".into());
    args.push(out_folder.clone());
    args.push(file.as_os_str().to_os_string());
    args
}
