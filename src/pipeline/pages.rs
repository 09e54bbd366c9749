//! PDF page manipulation: merge every exported PDF into one document, then
//! split it back into single-page files.
//!
//! ## Why merge before splitting?
//!
//! Each draw.io export produces one PDF per diagram, with as many pages as
//! the diagram has tabs. Merging first gives every page a single global
//! number, so the final `pageN.svg` numbering is continuous across diagrams
//! instead of restarting at 1 for each source file.
//!
//! ## Why spawn_blocking?
//!
//! lopdf is a synchronous library that parses whole documents in memory.
//! `tokio::task::spawn_blocking` keeps that CPU-bound work off the async
//! worker threads.

use crate::config::MERGED_NAME;
use crate::error::PipelineError;
use crate::pipeline::scan;
use lopdf::{Document, Object, ObjectId};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Merge every `.pdf` in `workdir` into `workdir/merged.pdf` and delete the
/// sources. Returns the merged path and its page count.
pub async fn merge_pdfs(workdir: &Path) -> Result<(PathBuf, usize), PipelineError> {
    let dir = workdir.to_path_buf();
    tokio::task::spawn_blocking(move || merge_blocking(&dir))
        .await
        .map_err(|e| PipelineError::Internal(format!("merge task panicked: {e}")))?
}

/// Split `merged` into one single-page PDF per page (`<prefix>1.pdf` …) in
/// the same directory, then delete `merged`. Returns the page files in order.
pub async fn split_pdf(merged: &Path, prefix: &str) -> Result<Vec<PathBuf>, PipelineError> {
    let merged = merged.to_path_buf();
    let prefix = prefix.to_string();
    tokio::task::spawn_blocking(move || split_blocking(&merged, &prefix))
        .await
        .map_err(|e| PipelineError::Internal(format!("split task panicked: {e}")))?
}

// ── Blocking implementations ─────────────────────────────────────────────

fn merge_blocking(workdir: &Path) -> Result<(PathBuf, usize), PipelineError> {
    let sources = scan::scan_dir(workdir, &["pdf".to_string()])?;
    if sources.is_empty() {
        return Err(PipelineError::NoPdfsProduced {
            path: workdir.to_path_buf(),
        });
    }

    // Renumber each source into a disjoint object-id range, then pool the
    // objects of all documents into one space.
    let mut max_id = 1;
    let mut merged = Document::with_version("1.5");
    let mut source_pages: Vec<(ObjectId, Object)> = Vec::new();
    let mut source_objects: BTreeMap<ObjectId, Object> = BTreeMap::new();

    for path in &sources {
        check_pdf_magic(path)?;
        let mut doc = Document::load(path).map_err(|e| PipelineError::PdfParse {
            path: path.clone(),
            detail: e.to_string(),
        })?;
        doc.renumber_objects_with(max_id);
        max_id = doc.max_id + 1;

        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
        debug!("{}: {} pages", path.display(), page_ids.len());
        for id in page_ids {
            let object = doc
                .get_object(id)
                .map_err(|e| PipelineError::PdfParse {
                    path: path.clone(),
                    detail: e.to_string(),
                })?
                .to_owned();
            source_pages.push((id, object));
        }
        source_objects.extend(doc.objects);
    }

    // Fold all source catalogs and page-tree roots into a single pair;
    // pages get re-parented below, outlines are dropped.
    let mut catalog: Option<(ObjectId, Object)> = None;
    let mut pages_root: Option<(ObjectId, Object)> = None;

    for (object_id, object) in source_objects.iter() {
        match object.type_name().unwrap_or("") {
            "Catalog" => {
                let id = catalog.as_ref().map(|(id, _)| *id).unwrap_or(*object_id);
                catalog = Some((id, object.clone()));
            }
            "Pages" => {
                if let Ok(dict) = object.as_dict() {
                    let mut dict = dict.clone();
                    if let Some((_, ref existing)) = pages_root {
                        if let Ok(existing) = existing.as_dict() {
                            dict.extend(existing);
                        }
                    }
                    let id = pages_root.as_ref().map(|(id, _)| *id).unwrap_or(*object_id);
                    pages_root = Some((id, Object::Dictionary(dict)));
                }
            }
            "Page" | "Outlines" | "Outline" => {}
            _ => {
                merged.objects.insert(*object_id, object.clone());
            }
        }
    }

    let (pages_id, pages_obj) = pages_root.ok_or_else(|| {
        PipelineError::Internal("no page-tree root found in any source PDF".into())
    })?;
    let (catalog_id, catalog_obj) = catalog.ok_or_else(|| {
        PipelineError::Internal("no catalog found in any source PDF".into())
    })?;

    for (object_id, object) in &source_pages {
        if let Ok(dict) = object.as_dict() {
            let mut dict = dict.clone();
            dict.set("Parent", pages_id);
            merged.objects.insert(*object_id, Object::Dictionary(dict));
        }
    }

    if let Ok(dict) = pages_obj.as_dict() {
        let mut dict = dict.clone();
        dict.set("Count", source_pages.len() as u32);
        dict.set(
            "Kids",
            source_pages
                .iter()
                .map(|(id, _)| Object::Reference(*id))
                .collect::<Vec<_>>(),
        );
        merged.objects.insert(pages_id, Object::Dictionary(dict));
    }

    if let Ok(dict) = catalog_obj.as_dict() {
        let mut dict = dict.clone();
        dict.set("Pages", pages_id);
        dict.remove(b"Outlines");
        merged.objects.insert(catalog_id, Object::Dictionary(dict));
    }

    merged.trailer.set("Root", catalog_id);
    merged.max_id = merged.objects.len() as u32;
    merged.renumber_objects();
    merged.compress();

    let dest = workdir.join(MERGED_NAME);
    merged.save(&dest).map_err(|e| PipelineError::PdfWrite {
        path: dest.clone(),
        detail: e.to_string(),
    })?;

    for path in &sources {
        std::fs::remove_file(path).map_err(|e| PipelineError::io(path, e))?;
    }

    let page_count = source_pages.len();
    info!("merged {} PDFs into {} pages", sources.len(), page_count);
    Ok((dest, page_count))
}

fn split_blocking(merged: &Path, prefix: &str) -> Result<Vec<PathBuf>, PipelineError> {
    let doc = Document::load(merged).map_err(|e| PipelineError::PdfParse {
        path: merged.to_path_buf(),
        detail: e.to_string(),
    })?;

    // BTreeMap is keyed by 1-based page number, so values come out in order.
    let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
    if page_ids.is_empty() {
        return Err(PipelineError::NoPages {
            path: merged.to_path_buf(),
        });
    }

    let dir = merged.parent().unwrap_or_else(|| Path::new("."));
    let mut written = Vec::with_capacity(page_ids.len());

    for (i, page_id) in page_ids.iter().enumerate() {
        let mut single = doc.clone();
        retain_page(&mut single, *page_id, &page_ids).map_err(|detail| {
            PipelineError::PdfParse {
                path: merged.to_path_buf(),
                detail,
            }
        })?;

        let path = dir.join(format!("{}{}.pdf", prefix, i + 1));
        single.save(&path).map_err(|e| PipelineError::PdfWrite {
            path: path.clone(),
            detail: e.to_string(),
        })?;
        debug!("wrote {}", path.display());
        written.push(path);
    }

    std::fs::remove_file(merged).map_err(|e| PipelineError::io(merged, e))?;
    info!("split into {} single-page PDFs", written.len());
    Ok(written)
}

/// Rewrite `doc`'s page tree so it contains exactly `keep`.
///
/// The other page objects are removed, the page-tree root's Kids/Count are
/// rewritten, and everything the remaining page no longer references
/// (content streams, per-page resources of the dropped pages) is pruned.
fn retain_page(doc: &mut Document, keep: ObjectId, all_pages: &[ObjectId]) -> Result<(), String> {
    let catalog_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|e| format!("bad trailer Root: {e}"))?;
    let pages_id = doc
        .get_object(catalog_id)
        .and_then(Object::as_dict)
        .and_then(|d| d.get(b"Pages"))
        .and_then(Object::as_reference)
        .map_err(|e| format!("bad catalog Pages entry: {e}"))?;

    for id in all_pages {
        if *id != keep {
            doc.objects.remove(id);
        }
    }

    doc.get_object_mut(keep)
        .and_then(Object::as_dict_mut)
        .map_err(|e| format!("page object is not a dictionary: {e}"))?
        .set("Parent", pages_id);

    let pages_dict = doc
        .get_object_mut(pages_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| format!("page-tree root is not a dictionary: {e}"))?;
    pages_dict.set("Count", 1u32);
    pages_dict.set("Kids", vec![Object::Reference(keep)]);

    doc.prune_objects();
    doc.renumber_objects();
    doc.compress();
    Ok(())
}

/// Reject files that do not start with `%PDF` before lopdf sees them, so a
/// botched export reports the offending file instead of a parse backtrace.
fn check_pdf_magic(path: &Path) -> Result<(), PipelineError> {
    use std::io::Read;

    let mut f = std::fs::File::open(path).map_err(|e| PipelineError::io(path, e))?;
    let mut magic = [0u8; 4];
    f.read_exact(&mut magic).map_err(|e| PipelineError::io(path, e))?;
    if &magic != b"%PDF" {
        return Err(PipelineError::NotAPdf {
            path: path.to_path_buf(),
            magic,
        });
    }
    Ok(())
}
