//! Serialization and writing.
//!
//! The assembled [`Document`] is handed to one of two renderers:
//!
//! | Format | Module | Library |
//! |---|---|---|
//! | `docx` (default) | [`docx`] | `docx-rs` packs OOXML into a zip container |
//! | `html` | [`html`] | `maud` compile-time templates, auto-escaped |
//!
//! Neither embeds a timestamp, so a rerun on unchanged inputs reproduces the
//! same file. (`docx-rs` numbers paragraphs from a process-wide counter, so
//! two `.docx` renders within one process differ in those ids.)
//! [`write_document`] then replaces the output file atomically, so a failed
//! run never leaves a truncated document behind.

pub mod docx;
pub mod html;

use crate::config::StyleConfig;
use crate::document::Document;
use std::fs;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Document packaging failed: {0}")]
    Pack(String),
}

/// Output document format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Word-processing document (Office Open XML).
    #[default]
    Docx,
    /// Standalone HTML page; photos are linked, not embedded.
    Html,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Docx => "docx",
            OutputFormat::Html => "html",
        }
    }
}

/// Serialize a document to bytes in the given format.
pub fn to_bytes(
    document: &Document,
    style: &StyleConfig,
    format: OutputFormat,
) -> Result<Vec<u8>, RenderError> {
    let bytes = match format {
        OutputFormat::Docx => docx::to_docx(document, style)?,
        OutputFormat::Html => html::to_html(document, style).into_bytes(),
    };
    tracing::debug!(?format, bytes = bytes.len(), "rendered document");
    Ok(bytes)
}

/// Write `bytes` to `path`, replacing any existing file.
///
/// The bytes go to a temporary file in the destination directory first,
/// which is then renamed over `path`. Missing parent directories are created.
pub fn write_document(path: &Path, bytes: &[u8]) -> Result<(), RenderError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| RenderError::Io(e.error))?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote document");
    Ok(())
}
