//! Run report: what a completed pipeline run produced and how long each
//! stage took.
//!
//! Serialisable so the CLI can emit it as JSON (`--json`) for build scripts
//! that want to know exactly which SVGs were (re)generated.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Summary of a successful pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Number of diagram source files found and exported.
    pub diagram_count: usize,

    /// Number of pages in the merged document (== number of SVGs produced).
    pub page_count: usize,

    /// Paths of the SVG files written to the output directory, in page order.
    pub svg_paths: Vec<PathBuf>,

    /// Wall-clock timings per stage.
    pub timings: StageTimings,
}

/// Per-stage wall-clock durations in milliseconds.
///
/// The render stage dominates in practice — draw.io boots an Electron
/// instance per invocation — so these numbers are the first thing to look at
/// when a run feels slow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StageTimings {
    /// Diagram → PDF export (draw.io).
    pub render_ms: u64,
    /// PDF merge (lopdf).
    pub merge_ms: u64,
    /// Per-page split (lopdf).
    pub split_ms: u64,
    /// PDF → SVG conversion (Inkscape).
    pub svg_ms: u64,
    /// Whole run, including workdir setup and cleanup.
    pub total_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_round_trips_through_json() {
        let report = RunReport {
            diagram_count: 2,
            page_count: 5,
            svg_paths: vec![PathBuf::from("out/page1.svg"), PathBuf::from("out/page2.svg")],
            timings: StageTimings {
                render_ms: 1200,
                merge_ms: 8,
                split_ms: 12,
                svg_ms: 300,
                total_ms: 1600,
            },
        };

        let json = serde_json::to_string(&report).expect("report must serialise");
        let back: RunReport = serde_json::from_str(&json).expect("report must deserialise");
        assert_eq!(back.diagram_count, 2);
        assert_eq!(back.page_count, 5);
        assert_eq!(back.svg_paths.len(), 2);
        assert_eq!(back.timings.render_ms, 1200);
    }
}
