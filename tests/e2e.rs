//! End-to-end tests for the drawio2svg pipeline.
//!
//! The real external tools are replaced by small shell-script stand-ins:
//! the fake draw.io copies a pre-built fixture PDF into the output folder,
//! the fake Inkscape writes a minimal SVG. This exercises the whole driver —
//! scanning, tool invocation, merge, split, SVG stage, workdir cleanup —
//! without needing draw.io or Inkscape installed. Unix-only, since the
//! stand-ins are `sh` scripts.

#![cfg(unix)]

use drawio2svg::{run, PipelineConfig, PipelineError};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::path::{Path, PathBuf};

// ── Test helpers ─────────────────────────────────────────────────────────

/// Build a minimal n-page PDF fixture on disk.
fn make_pdf(path: &Path, pages: usize) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for i in 0..pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![100.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(format!("Page {}", i + 1))]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as u32;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();
    doc.save(path).unwrap();
}

/// Write an executable shell script.
fn write_script(path: &Path, body: &str) {
    use std::os::unix::fs::PermissionsExt;
    std::fs::write(path, body).unwrap();
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

/// Fake draw.io: copies `<fixtures>/<stem>.pdf` into the `-o` folder,
/// mirroring the real CLI's output naming.
fn fake_drawio(dir: &Path, fixtures: &Path) -> PathBuf {
    let script = dir.join("drawio");
    write_script(
        &script,
        &format!(
            r#"#!/bin/sh
out=""
prev=""
for a in "$@"; do
  if [ "$prev" = "-o" ]; then out="$a"; fi
  prev="$a"
  input="$a"
done
stem=$(basename "$input")
stem="${{stem%.*}}"
cp "{fixtures}/$stem.pdf" "$out$stem.pdf"
"#,
            fixtures = fixtures.display()
        ),
    );
    script
}

/// Fake Inkscape: writes a one-line SVG to the `--export-plain-svg=` path.
fn fake_inkscape(dir: &Path) -> PathBuf {
    let script = dir.join("inkscape");
    write_script(
        &script,
        r#"#!/bin/sh
for a in "$@"; do
  case "$a" in
    --export-plain-svg=*) out="${a#--export-plain-svg=}" ;;
  esac
done
printf '<svg xmlns="http://www.w3.org/2000/svg"/>' > "$out"
"#,
    );
    script
}

struct Fixture {
    root: tempfile::TempDir,
    input: PathBuf,
    output: PathBuf,
    drawio: PathBuf,
    inkscape: PathBuf,
}

/// Standard layout: two diagrams (2 pages + 1 page) and working stub tools.
fn setup() -> Fixture {
    let root = tempfile::tempdir().unwrap();
    let input = root.path().join("input");
    let output = root.path().join("output");
    let fixtures = root.path().join("fixtures");
    let bin = root.path().join("bin");
    for d in [&input, &fixtures, &bin] {
        std::fs::create_dir_all(d).unwrap();
    }

    std::fs::write(input.join("alpha.drawio"), b"<mxfile/>").unwrap();
    std::fs::write(input.join("beta.xml"), b"<mxfile/>").unwrap();
    make_pdf(&fixtures.join("alpha.pdf"), 2);
    make_pdf(&fixtures.join("beta.pdf"), 1);

    let drawio = fake_drawio(&bin, &fixtures);
    let inkscape = fake_inkscape(&bin);

    Fixture {
        root,
        input,
        output,
        drawio,
        inkscape,
    }
}

fn config(fx: &Fixture) -> PipelineConfig {
    PipelineConfig::builder(&fx.input, &fx.output)
        .drawio_path(&fx.drawio)
        .inkscape_path(&fx.inkscape)
        .build()
        .unwrap()
}

// ── Full-pipeline tests ──────────────────────────────────────────────────

#[tokio::test]
async fn full_pipeline_produces_numbered_svgs() {
    let fx = setup();
    let report = run(&config(&fx)).await.expect("pipeline should succeed");

    assert_eq!(report.diagram_count, 2);
    assert_eq!(report.page_count, 3, "2 + 1 pages across both diagrams");
    assert_eq!(report.svg_paths.len(), 3);

    for (i, path) in report.svg_paths.iter().enumerate() {
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            format!("page{}.svg", i + 1)
        );
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.starts_with("<svg"), "{}: {content}", path.display());
    }
}

#[tokio::test]
async fn no_intermediates_leak_into_input_or_output() {
    let fx = setup();
    let report = run(&config(&fx)).await.unwrap();

    // Only the final SVGs remain; no stray PDFs in the input or output tree.
    let mut pdfs = Vec::new();
    collect_pdfs(fx.root.path(), &mut pdfs);
    // The fixtures directory legitimately keeps its two source PDFs.
    pdfs.retain(|p| !p.starts_with(fx.root.path().join("fixtures")));
    assert!(pdfs.is_empty(), "leftover intermediate PDFs: {pdfs:?}");
    assert_eq!(report.svg_paths.len(), 3);
}

fn collect_pdfs(dir: &Path, acc: &mut Vec<PathBuf>) {
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let p = entry.path();
            if p.is_dir() {
                collect_pdfs(&p, acc);
            } else if p.extension().is_some_and(|e| e == "pdf") {
                acc.push(p);
            }
        }
    }
}

#[tokio::test]
async fn fixed_workdir_is_left_in_place() {
    let fx = setup();
    let workdir = fx.root.path().join("scratch");
    let config = PipelineConfig::builder(&fx.input, &fx.output)
        .drawio_path(&fx.drawio)
        .inkscape_path(&fx.inkscape)
        .workdir(&workdir)
        .build()
        .unwrap();

    let report = run(&config).await.unwrap();
    assert_eq!(report.page_count, 3);
    assert!(workdir.is_dir(), "fixed workdir must survive the run");
    // Page PDFs stay behind for inspection (merged.pdf was consumed by split).
    assert!(workdir.join("page1.pdf").exists());
    assert!(!workdir.join("merged.pdf").exists());
}

#[tokio::test]
async fn rerun_with_fixed_workdir_does_not_double_pages() {
    let fx = setup();
    let workdir = fx.root.path().join("scratch");
    let config = PipelineConfig::builder(&fx.input, &fx.output)
        .drawio_path(&fx.drawio)
        .inkscape_path(&fx.inkscape)
        .workdir(&workdir)
        .build()
        .unwrap();

    let first = run(&config).await.unwrap();
    assert_eq!(first.page_count, 3);

    // The page PDFs left behind by the first run must not be merged again.
    let second = run(&config).await.unwrap();
    assert_eq!(second.page_count, 3);
    assert_eq!(second.svg_paths.len(), 3);
}

#[tokio::test]
async fn custom_prefix_names_the_output() {
    let fx = setup();
    let config = PipelineConfig::builder(&fx.input, &fx.output)
        .drawio_path(&fx.drawio)
        .inkscape_path(&fx.inkscape)
        .page_prefix("diagram")
        .build()
        .unwrap();

    let report = run(&config).await.unwrap();
    assert!(report.svg_paths[0].ends_with("diagram1.svg"));
    assert!(report.svg_paths[2].ends_with("diagram3.svg"));
}

// ── Failure-path tests ───────────────────────────────────────────────────

#[tokio::test]
async fn failing_export_aborts_with_stderr() {
    let fx = setup();
    let bad = fx.root.path().join("bin/drawio-broken");
    write_script(
        &bad,
        "#!/bin/sh\necho 'Electron failed to start' >&2\nexit 1\n",
    );

    let config = PipelineConfig::builder(&fx.input, &fx.output)
        .drawio_path(&bad)
        .inkscape_path(&fx.inkscape)
        .build()
        .unwrap();

    let err = run(&config).await.unwrap_err();
    match err {
        PipelineError::ToolFailed { tool, stderr, .. } => {
            assert_eq!(tool, "draw.io");
            assert!(stderr.contains("Electron failed to start"));
        }
        other => panic!("expected ToolFailed, got {other:?}"),
    }

    // Nothing reached the output directory.
    assert!(std::fs::read_dir(&fx.output)
        .map(|mut d| d.next().is_none())
        .unwrap_or(true));
}

#[tokio::test]
async fn garbage_export_is_caught_before_merge() {
    let fx = setup();
    // This "draw.io" writes an HTML error page instead of a PDF.
    let bad = fx.root.path().join("bin/drawio-garbage");
    write_script(
        &bad,
        r#"#!/bin/sh
out=""
prev=""
for a in "$@"; do
  if [ "$prev" = "-o" ]; then out="$a"; fi
  prev="$a"
  input="$a"
done
stem=$(basename "$input")
stem="${stem%.*}"
printf '<html>export failed</html>' > "$out$stem.pdf"
"#,
    );

    let config = PipelineConfig::builder(&fx.input, &fx.output)
        .drawio_path(&bad)
        .inkscape_path(&fx.inkscape)
        .build()
        .unwrap();

    let err = run(&config).await.unwrap_err();
    assert!(matches!(err, PipelineError::NotAPdf { .. }), "got {err:?}");
}

#[tokio::test]
async fn missing_inkscape_fails_after_split() {
    let fx = setup();
    let config = PipelineConfig::builder(&fx.input, &fx.output)
        .drawio_path(&fx.drawio)
        .inkscape_path("/no/such/inkscape")
        .build()
        .unwrap();

    let err = run(&config).await.unwrap_err();
    assert!(
        matches!(err, PipelineError::ToolNotFound { tool: "inkscape", .. }),
        "got {err:?}"
    );
}

// ── Report shape ─────────────────────────────────────────────────────────

#[tokio::test]
async fn report_serialises_and_times_stages() {
    let fx = setup();
    let report = run(&config(&fx)).await.unwrap();

    let json = serde_json::to_string_pretty(&report).expect("report must serialise");
    let back: drawio2svg::RunReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back.page_count, report.page_count);
    assert!(
        report.timings.total_ms
            >= report.timings.merge_ms.max(report.timings.split_ms),
        "total must cover the stages"
    );
}
