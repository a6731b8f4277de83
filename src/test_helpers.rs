//! Shared test utilities for the field-journal test suite.
//!
//! Provides photo fixtures, record fixtures, and lookups over the document
//! tree (`DocumentNode`, `Table`, `Paragraph`).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let photos = setup_photos(&["cover.png", "dune.png"]);
//! let config = JournalConfig::default();
//! let ctx = BuildContext::new(photos.path(), &config);
//!
//! let nodes = day_entry(&ctx, &sample_day());
//! assert!(contains_text(&nodes, "Salt flats"));
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::document::{DocumentNode, ImageNode, Paragraph, Table};
use crate::journal::{DayEntry, FieldNote, ImageRef};

// =========================================================================
// Fixture setup
// =========================================================================

/// Write a small PNG of the given size.
pub fn write_png(path: &Path, width: u32, height: u32) {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x * 7 % 256) as u8, (y * 13 % 256) as u8, 96])
    });
    img.save(path).unwrap();
}

/// Create a temp photo directory holding a 60x40 PNG for each name.
pub fn setup_photos(names: &[&str]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for name in names {
        write_png(&tmp.path().join(name), 60, 40);
    }
    tmp
}

/// A day with every optional field set.
pub fn sample_day() -> DayEntry {
    DayEntry {
        label: "4".to_string(),
        title: "Salar de Atacama".to_string(),
        description: "Walked the crust of the salt flats at dawn.".to_string(),
        coordinates: Some("-23.5,-68.25".to_string()),
        geo_note: Some(FieldNote {
            title: "Evaporites".to_string(),
            text: "Halite crusts over a gypsum base.".to_string(),
        }),
        images: vec![
            ImageRef::with_caption("salt.png", "Salt flats"),
            ImageRef::new("flamingo.png"),
        ],
    }
}

/// A day with only the required fields.
pub fn bare_day(label: &str, title: &str) -> DayEntry {
    DayEntry {
        label: label.to_string(),
        title: title.to_string(),
        description: String::new(),
        coordinates: None,
        geo_note: None,
        images: Vec::new(),
    }
}

// =========================================================================
// Tree lookups
// =========================================================================

/// Visible text of every heading and paragraph, depth-first, including
/// paragraphs inside table cells.
pub fn all_text(nodes: &[DocumentNode]) -> Vec<String> {
    let mut out = Vec::new();
    for node in nodes {
        match node {
            DocumentNode::Table(t) => {
                for cell in t.rows.iter().flat_map(|r| &r.cells) {
                    out.extend(all_text(&cell.children));
                }
            }
            other => out.extend(other.text()),
        }
    }
    out
}

/// Whether any heading or paragraph (at any depth) contains `needle`.
pub fn contains_text(nodes: &[DocumentNode], needle: &str) -> bool {
    all_text(nodes).iter().any(|t| t.contains(needle))
}

/// All top-level image nodes.
pub fn images(nodes: &[DocumentNode]) -> Vec<&ImageNode> {
    nodes
        .iter()
        .filter_map(|n| match n {
            DocumentNode::Image(i) => Some(i),
            _ => None,
        })
        .collect()
}

/// The single top-level table. Panics if there is not exactly one.
pub fn only_table(nodes: &[DocumentNode]) -> &Table {
    let tables: Vec<&Table> = nodes
        .iter()
        .filter_map(|n| match n {
            DocumentNode::Table(t) => Some(t),
            _ => None,
        })
        .collect();
    assert_eq!(tables.len(), 1, "expected exactly one table, got {}", tables.len());
    tables[0]
}

/// Text of each cell in a table row.
pub fn row_texts(table: &Table, row: usize) -> Vec<String> {
    table.rows[row]
        .cells
        .iter()
        .map(|c| all_text(&c.children).join("\n"))
        .collect()
}

/// Expect a paragraph node. Panics with the node on mismatch.
pub fn as_paragraph(node: &DocumentNode) -> &Paragraph {
    match node {
        DocumentNode::Paragraph(p) => p,
        other => panic!("expected paragraph, got {other:?}"),
    }
}
