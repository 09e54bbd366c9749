//! Configuration for a pipeline run.
//!
//! All behaviour is controlled through [`PipelineConfig`], built via
//! [`PipelineConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share configs across tasks, log them, and diff two runs to
//! understand why their outputs differ.

use crate::error::PipelineError;
use std::fmt;
use std::path::{Path, PathBuf};

/// Extensions treated as diagram sources by default.
///
/// draw.io saves both `.drawio` and plain `.xml` files; matching is
/// case-insensitive.
pub const DEFAULT_DIAGRAM_EXTENSIONS: &[&str] = &["drawio", "xml"];

/// Name given to the intermediate merged document inside the workdir.
pub(crate) const MERGED_NAME: &str = "merged.pdf";

/// Configuration for a diagram-to-SVG pipeline run.
///
/// Built via [`PipelineConfig::builder()`].
///
/// # Example
/// ```rust
/// use drawio2svg::PipelineConfig;
///
/// let config = PipelineConfig::builder("diagrams", "out")
///     .drawio_path("/Applications/draw.io.app/Contents/MacOS/draw.io")
///     .concurrency(8)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct PipelineConfig {
    /// Directory scanned for diagram source files.
    pub input_dir: PathBuf,

    /// Directory the final `pageN.svg` files are written to. Created if absent.
    pub output_dir: PathBuf,

    /// Path to the draw.io CLI binary. Default: `drawio` (resolved via PATH).
    ///
    /// On macOS the desktop app bundles the CLI at
    /// `/Applications/draw.io.app/Contents/MacOS/draw.io`.
    pub drawio_path: PathBuf,

    /// Path to the Inkscape binary. Default: `inkscape` (resolved via PATH).
    pub inkscape_path: PathBuf,

    /// Pass `--crop` to draw.io so each exported page is cropped to its
    /// drawing bounds rather than the full canvas. Default: true.
    pub crop: bool,

    /// File extensions (without dot) treated as diagram sources.
    /// Default: [`DEFAULT_DIAGRAM_EXTENSIONS`].
    pub diagram_extensions: Vec<String>,

    /// Filename prefix for split pages and final SVGs (`page1.pdf`,
    /// `page1.svg`, …). Default: `"page"`.
    pub page_prefix: String,

    /// Number of concurrent Inkscape invocations in the SVG stage. Default: 4.
    ///
    /// Inkscape processes are independent, so page conversions can run in
    /// parallel. draw.io exports always run sequentially: the CLI spins up a
    /// shared Electron instance and concurrent launches race on its profile
    /// directory.
    pub concurrency: usize,

    /// Use this directory for intermediate PDFs instead of a fresh temp dir.
    ///
    /// Mainly useful for debugging a bad export. The directory is created if
    /// needed and is NOT deleted afterwards; leftover `.pdf` files from a
    /// previous run are removed before exporting so they cannot be merged
    /// into the new run.
    pub workdir: Option<PathBuf>,

    /// Keep the temporary working directory after the run (its path is
    /// logged). Ignored when `workdir` is set. Default: false.
    pub keep_workdir: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output_dir: PathBuf::from("svg"),
            drawio_path: PathBuf::from("drawio"),
            inkscape_path: PathBuf::from("inkscape"),
            crop: true,
            diagram_extensions: DEFAULT_DIAGRAM_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            page_prefix: "page".to_string(),
            concurrency: 4,
            workdir: None,
            keep_workdir: false,
        }
    }
}

impl fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineConfig")
            .field("input_dir", &self.input_dir)
            .field("output_dir", &self.output_dir)
            .field("drawio_path", &self.drawio_path)
            .field("inkscape_path", &self.inkscape_path)
            .field("crop", &self.crop)
            .field("diagram_extensions", &self.diagram_extensions)
            .field("page_prefix", &self.page_prefix)
            .field("concurrency", &self.concurrency)
            .field("workdir", &self.workdir)
            .field("keep_workdir", &self.keep_workdir)
            .finish()
    }
}

impl PipelineConfig {
    /// Create a builder with the two mandatory paths set.
    pub fn builder(input_dir: impl AsRef<Path>, output_dir: impl AsRef<Path>) -> PipelineConfigBuilder {
        PipelineConfigBuilder {
            config: PipelineConfig {
                input_dir: input_dir.as_ref().to_path_buf(),
                output_dir: output_dir.as_ref().to_path_buf(),
                ..Self::default()
            },
        }
    }
}

/// Builder for [`PipelineConfig`].
#[derive(Debug)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    pub fn drawio_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.drawio_path = path.into();
        self
    }

    pub fn inkscape_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.inkscape_path = path.into();
        self
    }

    pub fn crop(mut self, v: bool) -> Self {
        self.config.crop = v;
        self
    }

    /// Replace the extension filter. Leading dots and case are ignored.
    pub fn diagram_extensions<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.diagram_extensions = exts
            .into_iter()
            .map(|e| e.into().trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self
    }

    pub fn page_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.page_prefix = prefix.into();
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn workdir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.workdir = Some(dir.into());
        self
    }

    pub fn keep_workdir(mut self, v: bool) -> Self {
        self.config.keep_workdir = v;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<PipelineConfig, PipelineError> {
        let c = &self.config;
        if c.diagram_extensions.is_empty() {
            return Err(PipelineError::InvalidConfig(
                "at least one diagram extension is required".into(),
            ));
        }
        if c.page_prefix.is_empty() {
            return Err(PipelineError::InvalidConfig(
                "page prefix must not be empty".into(),
            ));
        }
        if c.input_dir == c.output_dir {
            return Err(PipelineError::InvalidConfig(format!(
                "input and output directory must differ (both are '{}')",
                c.input_dir.display()
            )));
        }
        if c.concurrency == 0 {
            return Err(PipelineError::InvalidConfig("concurrency must be ≥ 1".into()));
        }
        Ok(self.config)
    }
}
