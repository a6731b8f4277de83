//! # Field Journal
//!
//! Turns a JSON travel record (days, coordinates, geological notes, photo
//! filenames) and a directory of photos into a formatted field-journal
//! document: title page, regional context, timeline, table of contents, one
//! section per day, glossary and a stratigraphic index.
//!
//! # Architecture: One Pass
//!
//! ```text
//! 1. Load      travelData.json  →  JournalRecord     (parse + canonicalize)
//! 2. Audit     record + photos  →  missing photo list (report only)
//! 3. Assemble  record + photos  →  Document           (generic node tree)
//! 4. Render    Document         →  .docx / .html bytes → atomic write
//! ```
//!
//! Only loading and writing can fail. A missing or unreadable photo never
//! aborts a run: the audit lists it, and the document shows a placeholder in
//! its place.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`journal`] | Input record types, wire-shape parsing and canonicalization |
//! | [`audit`] | Cross-checks referenced photos against the photo directory |
//! | [`imaging`] | Photo lookup, format identification, display-size arithmetic |
//! | [`builders`] | Record fragments → document nodes (images, notes, tables, days) |
//! | [`document`] | The generic node tree shared by builders and renderers |
//! | [`assemble`] | Fixed section order, running header and footer |
//! | [`render`] | `.docx` (via `docx-rs`) and HTML (via Maud) output, atomic write |
//! | [`config`] | `journal.toml` loading, merging over stock defaults, validation |
//! | [`output`] | CLI output formatting for audit and build results |
//!
//! # Design Decisions
//!
//! ## A Generic Document Tree
//!
//! Builders never touch the serializer. They return [`document::DocumentNode`]
//! values, which are plain comparable data, so every section of the journal is
//! unit-testable without opening a `.docx` file. The renderers are the only
//! code that knows about OOXML or HTML.
//!
//! ## Explicit Build Context
//!
//! The photo directory and configuration are passed to every builder through
//! [`builders::BuildContext`]. Nothing reads ambient state, so a test can
//! point a builder at a temp directory and a tweaked config.
//!
//! ## Canonicalize Once
//!
//! The input accepts several shapes (bare filename or `{url, caption}`, a
//! legacy single `image` key, numeric or text day labels). They are
//! normalized once in [`journal`], and everything downstream sees one shape.

pub mod assemble;
pub mod audit;
pub mod builders;
pub mod config;
pub mod document;
pub mod imaging;
pub mod journal;
pub mod output;
pub mod render;

#[cfg(test)]
pub(crate) mod test_helpers;
