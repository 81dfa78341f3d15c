//! CLI output formatting for every subcommand.
//!
//! Output is **information-centric**: each entity gets a header line with a
//! positional index and its identity, followed by indented context lines.
//!
//! # Output Format
//!
//! ## Filters
//!
//! ```text
//! Filters
//! 001 normal (Original)
//!     none
//! 002 grayscale (Mono)
//!     grayscale(100%)
//! ```
//!
//! ## Preview
//!
//! ```text
//! Preview
//!     Filter: sepia(0.3) saturate(1.4) brightness(1.1)
//!     Transform: rotate(90deg) scaleX(-1)
//!     Viewport: 2x, pan (10, -4)
//! ```
//!
//! ## Bake
//!
//! ```text
//! 001 beach.jpg → out/beach-edited.jpg
//!     1200x800 JPEG, 245.1 KB
//!     sha256: 3f7a…
//! 002 broken.jpg
//!     Error: Failed to decode broken.jpg: …
//!
//! Baked 1 photo, 1 failed
//! ```
//!
//! # Architecture
//!
//! Each display has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::export::SavedEdit;
use crate::filters::FilterCatalog;
use crate::pipeline::Preview;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn format_size(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

// ============================================================================
// Filters
// ============================================================================

pub fn format_filters(catalog: &FilterCatalog) -> Vec<String> {
    let mut lines = vec!["Filters".to_string()];
    for (i, filter) in catalog.filters().iter().enumerate() {
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            filter.name,
            filter.label
        ));
        lines.push(format!("{}{}", indent(1), filter.css_filter));
    }
    lines
}

pub fn print_filters(catalog: &FilterCatalog) {
    for line in format_filters(catalog) {
        println!("{}", line);
    }
}

// ============================================================================
// Preview
// ============================================================================

pub fn format_preview(preview: &Preview) -> Vec<String> {
    let or_none = |css: String| if css.is_empty() { "none".to_string() } else { css };

    let mut lines = vec![
        "Preview".to_string(),
        format!("{}Filter: {}", indent(1), or_none(preview.filter_css())),
        format!("{}Transform: {}", indent(1), or_none(preview.transform_css())),
    ];
    if let Some(viewport) = &preview.viewport {
        lines.push(format!(
            "{}Viewport: {}x, pan ({}, {})",
            indent(1),
            viewport.zoom,
            viewport.pan_x,
            viewport.pan_y
        ));
    } else if preview.scale < 1.0 {
        lines.push(format!("{}Scale: {}", indent(1), preview.scale));
    }
    lines
}

pub fn print_preview(preview: &Preview) {
    for line in format_preview(preview) {
        println!("{}", line);
    }
}

// ============================================================================
// Bake
// ============================================================================

/// One input of a `bake` run and what became of it.
pub enum BakeOutcome<'a> {
    Saved {
        source: &'a Path,
        output: &'a Path,
        saved: &'a SavedEdit,
    },
    Failed {
        source: &'a Path,
        error: String,
    },
}

pub fn format_bake_outcome(index: usize, outcome: &BakeOutcome) -> Vec<String> {
    match outcome {
        BakeOutcome::Saved {
            source,
            output,
            saved,
        } => vec![
            format!(
                "{} {} → {}",
                format_index(index),
                source.display(),
                output.display()
            ),
            format!(
                "{}{}x{} {}, {}",
                indent(1),
                saved.width,
                saved.height,
                saved.format,
                format_size(saved.bytes.len())
            ),
            format!("{}sha256: {}", indent(1), saved.digest),
        ],
        BakeOutcome::Failed { source, error } => vec![
            format!("{} {}", format_index(index), source.display()),
            format!("{}Error: {}", indent(1), error),
        ],
    }
}

pub fn format_bake_summary(outcomes: &[BakeOutcome]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, outcome) in outcomes.iter().enumerate() {
        lines.extend(format_bake_outcome(i + 1, outcome));
    }
    let failed = outcomes
        .iter()
        .filter(|o| matches!(o, BakeOutcome::Failed { .. }))
        .count();
    let saved = outcomes.len() - failed;

    lines.push(String::new());
    if failed == 0 {
        lines.push(format!("Baked {}", plural(saved, "photo")));
    } else {
        lines.push(format!("Baked {}, {} failed", plural(saved, "photo"), failed));
    }
    lines
}

pub fn print_bake_summary(outcomes: &[BakeOutcome]) {
    for line in format_bake_summary(outcomes) {
        println!("{}", line);
    }
}
