//! Photo audit.
//!
//! Cross-checks every photo the record references (the cover and each
//! day's images) against the photo directory, before any document work.
//! The audit only reports: a missing photo never stops the build, it turns
//! into a placeholder in the document instead.
//!
//! A name that points outside the photo directory (`../x.jpg`, an absolute
//! path) counts as missing.
//!
//! Occurrences are reported individually. A filename referenced by three
//! days and missing from disk yields three entries.

use crate::imaging::{photo_exists, resolve_photo};
use crate::journal::JournalRecord;
use std::fmt;
use std::path::Path;

/// Where a photo reference appears in the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetContext {
    Cover,
    /// A day, by its label.
    Day(String),
}

impl fmt::Display for AssetContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetContext::Cover => f.write_str("Cover"),
            AssetContext::Day(label) => write!(f, "Day {label}"),
        }
    }
}

/// A referenced photo that is not on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingAsset {
    pub image_name: String,
    pub context: AssetContext,
}

impl MissingAsset {
    /// `"Cover"` or `"Day <label>"`.
    pub fn context_label(&self) -> String {
        self.context.to_string()
    }
}

/// List every photo reference in `record` whose file is not in `photo_dir`,
/// in record order (cover first).
pub fn audit(record: &JournalRecord, photo_dir: &Path) -> Vec<MissingAsset> {
    let cover = record
        .cover_image
        .iter()
        .map(|image| (image, AssetContext::Cover));
    let days = record.days.iter().flat_map(|day| {
        day.images
            .iter()
            .map(move |image| (image, AssetContext::Day(day.label.clone())))
    });

    let missing: Vec<MissingAsset> = cover
        .chain(days)
        .filter(|(image, _)| {
            !resolve_photo(photo_dir, &image.filename).is_some_and(|path| photo_exists(&path))
        })
        .map(|(image, context)| MissingAsset {
            image_name: image.filename.clone(),
            context,
        })
        .collect();

    tracing::debug!(
        photo_dir = %photo_dir.display(),
        missing = missing.len(),
        "photo audit finished"
    );
    missing
}
