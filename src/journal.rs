//! Travel record loading and canonicalization.
//!
//! The record is a hand-edited JSON file that has grown over time, so the
//! wire shape is loose:
//!
//! - image references are either a bare filename or `{ "url", "caption" }`
//! - a day carries either an `images` list or the older single `image`
//! - day labels are strings or numbers
//!
//! Only `tripTitle` and `days` are required. Every other field that is
//! missing, `null` or of the wrong type is treated as absent (with a
//! warning), so one bad value never costs the whole journal.
//!
//! [`load_journal`] parses the wire shape and immediately normalizes it into
//! [`JournalRecord`], so the builders only ever see one consistent form:
//!
//! ```text
//! travelData.json  →  RawRecord (serde)  →  JournalRecord (canonical)
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("cannot read travel record {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid travel record: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Canonical types
// ============================================================================

/// A fully loaded travel record. Read-only after [`load_journal`].
#[derive(Debug, Clone, PartialEq)]
pub struct JournalRecord {
    pub title: String,
    pub author: String,
    pub cover_image: Option<ImageRef>,
    /// Reading order of the document.
    pub days: Vec<DayEntry>,
    pub glossary: Vec<GlossaryTerm>,
}

/// One day of the journal, with the legacy `image` field already folded
/// into `images`.
#[derive(Debug, Clone, PartialEq)]
pub struct DayEntry {
    /// Display label, e.g. `"3"` or `"Day 3"`. Not required to be unique.
    pub label: String,
    pub title: String,
    pub description: String,
    /// `"lat,long"` as written in the record.
    pub coordinates: Option<String>,
    pub geo_note: Option<FieldNote>,
    pub images: Vec<ImageRef>,
}

/// A photo reference, resolved relative to the photo directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub filename: String,
    /// Never `Some("")`.
    pub caption: Option<String>,
}

impl ImageRef {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            caption: None,
        }
    }

    pub fn with_caption(filename: impl Into<String>, caption: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            caption: non_blank(caption.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldNote {
    pub title: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GlossaryTerm {
    pub term: String,
    pub definition: String,
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecord {
    #[serde(alias = "title")]
    trip_title: String,
    #[serde(default)]
    author: Lenient<String>,
    #[serde(default)]
    cover_image: Lenient<RawImageRef>,
    days: Vec<RawDay>,
    #[serde(default)]
    glossary: Lenient<Vec<Lenient<GlossaryTerm>>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDay {
    #[serde(default)]
    day: Lenient<DayLabel>,
    #[serde(default)]
    title: Lenient<String>,
    #[serde(default)]
    description: Lenient<String>,
    #[serde(default)]
    coordinates: Lenient<String>,
    #[serde(default)]
    geo_note: Lenient<FieldNote>,
    #[serde(default)]
    images: Lenient<Vec<Lenient<RawImageRef>>>,
    #[serde(default)]
    image: Lenient<RawImageRef>,
}

/// `"cover.jpg"` or `{ "url": "cover.jpg", "caption": "..." }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawImageRef {
    Bare(String),
    Described {
        url: String,
        #[serde(default)]
        caption: Lenient<String>,
    },
}

/// An optional field that never fails the parse.
///
/// `null` and absent keys are [`Lenient::Absent`]; a value of the wrong
/// shape is kept as [`Lenient::Malformed`] so it can be reported and then
/// treated as absent.
#[derive(Debug)]
enum Lenient<T> {
    Absent,
    Valid(T),
    Malformed(serde_json::Value),
}

impl<T> Default for Lenient<T> {
    fn default() -> Self {
        Lenient::Absent
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Lenient<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        if value.is_null() {
            return Ok(Lenient::Absent);
        }
        Ok(match T::deserialize(&value) {
            Ok(parsed) => Lenient::Valid(parsed),
            Err(_) => Lenient::Malformed(value),
        })
    }
}

impl<T> Lenient<T> {
    /// The parsed value; a malformed one is logged and dropped.
    fn accept(self, field: &str, context: &str) -> Option<T> {
        match self {
            Lenient::Absent => None,
            Lenient::Valid(value) => Some(value),
            Lenient::Malformed(found) => {
                tracing::warn!(field, context, %found, "ignoring malformed field");
                None
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DayLabel {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for DayLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayLabel::Number(n) => match n.as_f64() {
                // 3.0 from a float-typed exporter reads as "3"
                Some(v) if n.is_f64() && v.fract() == 0.0 && v.abs() < 1e15 => {
                    write!(f, "{}", v as i64)
                }
                _ => write!(f, "{n}"),
            },
            DayLabel::Text(s) => f.write_str(s),
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Read and canonicalize the travel record at `path`.
///
/// Fails when the file is missing or unreadable, is not valid JSON, or lacks
/// `tripTitle` or `days`. Optional fields of the wrong type are logged and
/// treated as absent.
pub fn load_journal(path: &Path) -> Result<JournalRecord, JournalError> {
    let content = fs::read_to_string(path).map_err(|source| JournalError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let record = parse_journal(&content)?;
    tracing::debug!(
        path = %path.display(),
        days = record.days.len(),
        glossary = record.glossary.len(),
        "loaded travel record"
    );
    Ok(record)
}

/// Parse and canonicalize a record from JSON text.
pub fn parse_journal(json: &str) -> Result<JournalRecord, JournalError> {
    let raw: RawRecord = serde_json::from_str(json)?;
    Ok(canonicalize(raw))
}

fn canonicalize(raw: RawRecord) -> JournalRecord {
    let glossary = raw
        .glossary
        .accept("glossary", "record")
        .unwrap_or_default()
        .into_iter()
        .filter_map(|term| term.accept("glossary[]", "record"))
        .collect();
    JournalRecord {
        title: raw.trip_title,
        author: raw.author.accept("author", "record").unwrap_or_default(),
        cover_image: raw
            .cover_image
            .accept("coverImage", "record")
            .map(|image| image.into_image_ref("record")),
        days: raw.days.into_iter().map(DayEntry::from).collect(),
        glossary,
    }
}

impl RawImageRef {
    fn into_image_ref(self, context: &str) -> ImageRef {
        match self {
            RawImageRef::Bare(filename) => ImageRef::new(filename),
            RawImageRef::Described { url, caption } => ImageRef {
                filename: url,
                caption: caption.accept("caption", context).and_then(non_blank),
            },
        }
    }
}

impl From<RawDay> for DayEntry {
    fn from(raw: RawDay) -> Self {
        let label = raw
            .day
            .accept("day", "day entry")
            .map(|l| l.to_string())
            .unwrap_or_default();
        let context = format!("day {label}");

        // A well-formed list wins over the legacy scalar, even when empty;
        // anything else falls back to `image`.
        let images = match raw.images.accept("images", &context) {
            Some(list) => list
                .into_iter()
                .filter_map(|item| item.accept("images[]", &context))
                .map(|item| item.into_image_ref(&context))
                .collect(),
            None => raw
                .image
                .accept("image", &context)
                .map(|single| single.into_image_ref(&context))
                .into_iter()
                .collect(),
        };
        DayEntry {
            title: raw.title.accept("title", &context).unwrap_or_default(),
            description: raw
                .description
                .accept("description", &context)
                .unwrap_or_default(),
            coordinates: raw
                .coordinates
                .accept("coordinates", &context)
                .and_then(non_blank),
            geo_note: raw.geo_note.accept("geoNote", &context),
            images,
            label,
        }
    }
}

fn non_blank(s: String) -> Option<String> {
    if s.trim().is_empty() { None } else { Some(s) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn minimal_record_parses() {
        let record =
            parse_journal(r#"{"tripTitle":"T","days":[{"day":1,"title":"D1","description":"desc"}]}"#)
                .unwrap();
        assert_eq!(record.title, "T");
        assert_eq!(record.author, "");
        assert!(record.cover_image.is_none());
        assert!(record.glossary.is_empty());
        assert_eq!(record.days.len(), 1);
        let day = &record.days[0];
        assert_eq!(day.label, "1");
        assert_eq!(day.title, "D1");
        assert_eq!(day.description, "desc");
        assert!(day.images.is_empty());
        assert!(day.coordinates.is_none());
        assert!(day.geo_note.is_none());
    }

    #[test]
    fn title_alias_accepted() {
        let record = parse_journal(r#"{"title":"Alias","days":[]}"#).unwrap();
        assert_eq!(record.title, "Alias");
    }

    #[test]
    fn missing_trip_title_is_error() {
        let result = parse_journal(r#"{"days":[]}"#);
        assert!(matches!(result, Err(JournalError::Json(_))));
    }

    #[test]
    fn missing_days_is_error() {
        let result = parse_journal(r#"{"tripTitle":"T"}"#);
        assert!(matches!(result, Err(JournalError::Json(_))));
    }

    #[test]
    fn malformed_json_is_error() {
        let result = parse_journal("{ not json");
        assert!(matches!(result, Err(JournalError::Json(_))));
    }

    #[test]
    fn day_labels_accept_strings_and_numbers() {
        let record = parse_journal(
            r#"{"tripTitle":"T","days":[
                {"day":"Day 1","title":"a"},
                {"day":2,"title":"b"},
                {"day":3.0,"title":"c"},
                {"day":4.5,"title":"d"}
            ]}"#,
        )
        .unwrap();
        let labels: Vec<&str> = record.days.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, vec!["Day 1", "2", "3", "4.5"]);
    }

    #[test]
    fn image_refs_accept_bare_and_described_forms() {
        let record = parse_journal(
            r#"{"tripTitle":"T","coverImage":"cover.jpg","days":[
                {"day":1,"title":"a","images":[
                    "plain.jpg",
                    {"url":"captioned.jpg","caption":"Salt flats"},
                    {"url":"blank.jpg","caption":"   "},
                    {"url":"nocaption.jpg"}
                ]}
            ]}"#,
        )
        .unwrap();
        assert_eq!(record.cover_image, Some(ImageRef::new("cover.jpg")));
        assert_eq!(
            record.days[0].images,
            vec![
                ImageRef::new("plain.jpg"),
                ImageRef::with_caption("captioned.jpg", "Salt flats"),
                ImageRef::new("blank.jpg"),
                ImageRef::new("nocaption.jpg"),
            ]
        );
    }

    #[test]
    fn images_list_wins_over_legacy_image() {
        let record = parse_journal(
            r#"{"tripTitle":"T","days":[
                {"day":1,"title":"a","images":["new.jpg"],"image":"old.jpg"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(record.days[0].images, vec![ImageRef::new("new.jpg")]);
    }

    #[test]
    fn empty_images_list_still_wins_over_legacy_image() {
        let record = parse_journal(
            r#"{"tripTitle":"T","days":[
                {"day":1,"title":"a","images":[],"image":"old.jpg"}
            ]}"#,
        )
        .unwrap();
        assert!(record.days[0].images.is_empty());
    }

    #[test]
    fn legacy_image_used_when_list_absent() {
        let record = parse_journal(
            r#"{"tripTitle":"T","days":[
                {"day":1,"title":"a","image":{"url":"old.jpg","caption":"Old"}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(
            record.days[0].images,
            vec![ImageRef::with_caption("old.jpg", "Old")]
        );
    }

    #[test]
    fn blank_coordinates_normalize_to_none() {
        let record = parse_journal(
            r#"{"tripTitle":"T","days":[
                {"day":1,"title":"a","coordinates":"  "},
                {"day":2,"title":"b","coordinates":"-27.1,-109.3"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(record.days[0].coordinates, None);
        assert_eq!(record.days[1].coordinates.as_deref(), Some("-27.1,-109.3"));
    }

    #[test]
    fn geo_note_and_glossary_parse() {
        let record = parse_journal(
            r#"{"tripTitle":"T","author":"R. Finch","days":[
                {"day":1,"title":"a","geoNote":{"title":"Basalt","text":"Columnar jointing."}}
            ],"glossary":[{"term":"Tuff","definition":"Consolidated volcanic ash."}]}"#,
        )
        .unwrap();
        assert_eq!(record.author, "R. Finch");
        assert_eq!(
            record.days[0].geo_note,
            Some(FieldNote {
                title: "Basalt".to_string(),
                text: "Columnar jointing.".to_string(),
            })
        );
        assert_eq!(record.glossary[0].term, "Tuff");
    }

    #[test]
    fn day_without_label_or_title_still_loads() {
        let record = parse_journal(
            r#"{"tripTitle":"T","days":[
                {"day":1,"description":"x"},
                {"title":"Untitled label"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(record.days[0].label, "1");
        assert_eq!(record.days[0].title, "");
        assert_eq!(record.days[0].description, "x");
        assert_eq!(record.days[1].label, "");
        assert_eq!(record.days[1].title, "Untitled label");
    }

    #[test]
    fn non_list_images_fall_back_to_legacy_image() {
        let record = parse_journal(
            r#"{"tripTitle":"T","days":[
                {"day":1,"title":"a","images":"x.jpg","image":"y.jpg"},
                {"day":2,"title":"b","images":{"url":"z.jpg"}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(record.days[0].images, vec![ImageRef::new("y.jpg")]);
        assert!(record.days[1].images.is_empty());
    }

    #[test]
    fn malformed_geo_note_is_dropped() {
        let record = parse_journal(
            r#"{"tripTitle":"T","days":[
                {"day":1,"title":"a","geoNote":"rocks"},
                {"day":2,"title":"b","geoNote":{"title":"No text"}}
            ]}"#,
        )
        .unwrap();
        assert!(record.days[0].geo_note.is_none());
        assert!(record.days[1].geo_note.is_none());
    }

    #[test]
    fn non_string_coordinates_are_dropped() {
        let record = parse_journal(
            r#"{"tripTitle":"T","days":[
                {"day":1,"title":"a","coordinates":[-33.4,-70.6],"description":"kept"}
            ]}"#,
        )
        .unwrap();
        assert!(record.days[0].coordinates.is_none());
        assert_eq!(record.days[0].description, "kept");
    }

    #[test]
    fn malformed_image_entries_are_skipped_or_lose_their_caption() {
        let record = parse_journal(
            r#"{"tripTitle":"T","coverImage":{"url":"cover.jpg","caption":5},"days":[
                {"day":1,"title":"a","images":[
                    {"url":"numbered.jpg","caption":5},
                    {"caption":"no url"},
                    42,
                    null,
                    "plain.jpg"
                ]}
            ]}"#,
        )
        .unwrap();
        assert_eq!(record.cover_image, Some(ImageRef::new("cover.jpg")));
        assert_eq!(
            record.days[0].images,
            vec![ImageRef::new("numbered.jpg"), ImageRef::new("plain.jpg")]
        );
    }

    #[test]
    fn malformed_author_and_glossary_entries_are_dropped() {
        let record = parse_journal(
            r#"{"tripTitle":"T","author":["a","b"],"days":[],"glossary":[
                {"term":"Tuff","definition":"Volcanic ash rock."},
                {"term":"Orphan"},
                "loose"
            ]}"#,
        )
        .unwrap();
        assert_eq!(record.author, "");
        assert_eq!(record.glossary.len(), 1);
        assert_eq!(record.glossary[0].term, "Tuff");
    }

    #[test]
    fn null_optional_fields_are_absent() {
        let record = parse_journal(
            r#"{"tripTitle":"T","coverImage":null,"days":[
                {"day":1,"title":"a","images":null,"image":"y.jpg","geoNote":null}
            ]}"#,
        )
        .unwrap();
        assert!(record.cover_image.is_none());
        assert_eq!(record.days[0].images, vec![ImageRef::new("y.jpg")]);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let record =
            parse_journal(r#"{"tripTitle":"T","budget":1200,"days":[{"day":1,"title":"a","mood":"good"}]}"#)
                .unwrap();
        assert_eq!(record.days.len(), 1);
    }

    #[test]
    fn load_journal_missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("travelData.json");
        let err = load_journal(&path).unwrap_err();
        assert!(matches!(err, JournalError::Io { .. }));
        assert!(err.to_string().contains("travelData.json"));
    }

    #[test]
    fn load_journal_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("travelData.json");
        fs::write(&path, r#"{"tripTitle":"Chile","days":[]}"#).unwrap();
        let record = load_journal(&path).unwrap();
        assert_eq!(record.title, "Chile");
    }
}
