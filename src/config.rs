//! Journal configuration module.
//!
//! Handles loading, validating, and merging `journal.toml`. Every value has a
//! stock default; a user file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [paths]
//! data = "travelData.json"
//! photos = "photos"
//! output = "Geological_Field_Journal_2026.docx"
//!
//! [images]
//! body = { width = 450, height = 300 }    # In-body photo box (px)
//! cover = { width = 550, height = 350 }   # Cover photo box (px)
//! preserve_aspect = false                 # true = fit inside box, false = stretch
//!
//! [style]
//! font = "Georgia"
//! body_size = 22            # Half-points (22 = 11pt)
//! accent = "A04040"
//! muted = "999999"
//!
//! [document]
//! regional_context = true
//! closing_text = "End of Records"
//!
//! [gps]
//! hyperlink = true
//! map_url = "https://www.google.com/maps/search/?api=1"
//!
//! [[timeline.eras]]
//! text = "HOLOCENE (0.01 Ma): ..."
//! fill = "F5F5DC"
//! ```
//!
//! Unknown keys are rejected to catch typos early. Note that arrays (like
//! `timeline.eras`) replace the stock value entirely rather than merging.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Journal configuration loaded from `journal.toml`.
///
/// All fields have defaults that reproduce the classic field-journal layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JournalConfig {
    /// Input record, photo directory and output file locations.
    pub paths: PathsConfig,
    /// Photo display sizing.
    pub images: ImagesConfig,
    /// Fonts, sizes and palette.
    pub style: StyleConfig,
    /// Optional sections and fixed document text.
    pub document: DocumentConfig,
    /// GPS line rendering.
    pub gps: GpsConfig,
    /// Static geological timeline table.
    pub timeline: TimelineConfig,
}

impl JournalConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, b) in [("images.body", &self.images.body), ("images.cover", &self.images.cover)] {
            if b.width == 0 || b.height == 0 {
                return Err(ConfigError::Validation(format!(
                    "{name} width and height must be non-zero"
                )));
            }
        }
        if self.style.body_size == 0 {
            return Err(ConfigError::Validation(
                "style.body_size must be non-zero".into(),
            ));
        }

        let mut colors = vec![
            ("style.accent", self.style.accent.as_str()),
            ("style.muted", self.style.muted.as_str()),
            ("style.heading1.color", self.style.heading1.color.as_str()),
            ("style.heading2.color", self.style.heading2.color.as_str()),
            ("style.heading3.color", self.style.heading3.color.as_str()),
            ("timeline.header_fill", self.timeline.header_fill.as_str()),
            (
                "timeline.header_text_color",
                self.timeline.header_text_color.as_str(),
            ),
        ];
        colors.extend(
            self.timeline
                .eras
                .iter()
                .map(|era| ("timeline.eras.fill", era.fill.as_str())),
        );
        for (name, value) in colors {
            if !is_hex_color(value) {
                return Err(ConfigError::Validation(format!(
                    "{name} must be six hex digits without '#', got {value:?}"
                )));
            }
        }

        if self.timeline.eras.is_empty() {
            return Err(ConfigError::Validation(
                "timeline.eras must not be empty".into(),
            ));
        }
        if let Err(e) = url::Url::parse(&self.gps.map_url) {
            return Err(ConfigError::Validation(format!(
                "gps.map_url is not a valid URL: {e}"
            )));
        }
        Ok(())
    }
}

/// `RRGGBB` without a leading `#`, the form OOXML expects.
fn is_hex_color(value: &str) -> bool {
    value.len() == 6 && value.chars().all(|c| c.is_ascii_hexdigit())
}

/// Input and output locations. CLI flags override these.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// JSON travel record.
    pub data: String,
    /// Directory that image filenames are resolved against.
    pub photos: String,
    /// Generated document, overwritten on each run.
    pub output: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data: "travelData.json".to_string(),
            photos: "photos".to_string(),
            output: "Geological_Field_Journal_2026.docx".to_string(),
        }
    }
}

/// A display box in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoxSize {
    pub width: u32,
    pub height: u32,
}

/// Photo display sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// Box for photos inside day entries.
    pub body: BoxSize,
    /// Box for the title-page cover photo.
    pub cover: BoxSize,
    /// Scale photos to fit inside the box instead of stretching to it.
    pub preserve_aspect: bool,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            body: BoxSize {
                width: 450,
                height: 300,
            },
            cover: BoxSize {
                width: 550,
                height: 350,
            },
            preserve_aspect: false,
        }
    }
}

/// Size and colour for one heading level.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeadingStyle {
    /// Half-points.
    pub size: usize,
    pub color: String,
}

/// Fonts, sizes and palette.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleConfig {
    pub font: String,
    /// Body text size in half-points.
    pub body_size: usize,
    /// Brand colour for field notes, table headers and heading 1.
    pub accent: String,
    /// Secondary text (closing line, header text).
    pub muted: String,
    pub heading1: HeadingStyle,
    pub heading2: HeadingStyle,
    pub heading3: HeadingStyle,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            font: "Georgia".to_string(),
            body_size: 22,
            accent: "A04040".to_string(),
            muted: "999999".to_string(),
            heading1: HeadingStyle {
                size: 48,
                color: "A04040".to_string(),
            },
            heading2: HeadingStyle {
                size: 32,
                color: "4F4F4F".to_string(),
            },
            heading3: HeadingStyle {
                size: 26,
                color: "4F4F4F".to_string(),
            },
        }
    }
}

/// Optional sections and fixed document text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocumentConfig {
    /// Running page header text. No header when absent.
    pub header_text: Option<String>,
    /// Line under the title on the title page.
    pub subtitle: Option<String>,
    /// Emit the "Regional Geological Context" heading and map placeholder.
    pub regional_context: bool,
    pub map_placeholder: String,
    /// Paragraph between the index heading and the index table.
    pub index_intro: String,
    pub closing_text: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            header_text: None,
            subtitle: None,
            regional_context: true,
            map_placeholder: "📍 PLACEHOLDER: TECTONIC MAP OF CHILE / NAZCA PLATE SUBDUCTION"
                .to_string(),
            index_intro: "Summary of key geological observations recorded during the expedition."
                .to_string(),
            closing_text: "End of Records".to_string(),
        }
    }
}

/// GPS line rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GpsConfig {
    /// Render coordinates as a link to a map search.
    pub hyperlink: bool,
    /// Map search base URL; coordinates are appended as the `query` parameter.
    pub map_url: String,
}

impl Default for GpsConfig {
    fn default() -> Self {
        Self {
            hyperlink: true,
            map_url: "https://www.google.com/maps/search/?api=1".to_string(),
        }
    }
}

/// One tinted row of the timeline table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimelineEra {
    pub text: String,
    pub fill: String,
}

/// Static geological timeline table. Reference content, not record data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimelineConfig {
    pub title: String,
    pub header_fill: String,
    pub header_text_color: String,
    pub eras: Vec<TimelineEra>,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        let era = |text: &str, fill: &str| TimelineEra {
            text: text.to_string(),
            fill: fill.to_string(),
        };
        Self {
            title: "FIELD STRATIGRAPHY & REGIONAL TIMELINE".to_string(),
            header_fill: "A04040".to_string(),
            header_text_color: "FFFFFF".to_string(),
            eras: vec![
                era(
                    "HOLOCENE (0.01 Ma): Rapa Nui human history and Moai carving.",
                    "F5F5DC",
                ),
                era(
                    "PLEISTOCENE (2.5 Ma): Formation of Atacama evaporite basins.",
                    "EFEBE9",
                ),
                era(
                    "MIOCENE (12 Ma): Intrusion of the Torres del Paine laccoliths.",
                    "D7CCC8",
                ),
                era(
                    "CRETACEOUS (100 Ma): Initial compression and subduction of the Nazca plate.",
                    "BCAAA4",
                ),
            ],
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// The bottom layer: every journal setting at its stock value, as a TOML table.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(JournalConfig::default()).expect("default config must serialize")
}

/// Lay the user's `journal.toml` over the stock defaults.
///
/// Sections (`[images]`, `[style.heading1]`, ...) are merged key by key, so a
/// file that sets only `preserve_aspect` keeps the stock box sizes. Anything
/// that is not a section, `timeline.eras` included, is replaced whole.
pub fn merge_toml(defaults: toml::Value, user: toml::Value) -> toml::Value {
    match (defaults, user) {
        (toml::Value::Table(mut table), toml::Value::Table(user_table)) => {
            for (key, user_val) in user_table {
                let merged = match table.remove(&key) {
                    Some(default_val) => merge_toml(default_val, user_val),
                    None => user_val,
                };
                table.insert(key, merged);
            }
            toml::Value::Table(table)
        }
        (_, user) => user,
    }
}

/// Read the user layer. No `journal.toml` means no layer, not an error.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    Ok(Some(toml::from_str(&content)?))
}

/// Apply the user layer (if any), then type-check and validate the result.
///
/// Unknown keys fail here, at deserialization, before any photo is touched.
pub fn resolve_config(
    defaults: toml::Value,
    user: Option<toml::Value>,
) -> Result<JournalConfig, ConfigError> {
    let merged = match user {
        Some(user) => merge_toml(defaults, user),
        None => defaults,
    };
    let config: JournalConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the journal configuration: stock defaults, then the single
/// `journal.toml` at `path` when it exists, then validation.
pub fn load_config(path: &Path) -> Result<JournalConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(path)?)
}

/// Returns a fully-commented stock `journal.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Field Journal Configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Locations (the --data, --photos and --output flags override these)
# ---------------------------------------------------------------------------
[paths]
data = "travelData.json"
photos = "photos"
output = "Geological_Field_Journal_2026.docx"

# ---------------------------------------------------------------------------
# Photo sizing, in pixels
# ---------------------------------------------------------------------------
[images]
# Set to true to scale photos inside the box keeping their proportions.
# When false they are stretched to exactly this size.
preserve_aspect = false

[images.body]
width = 450
height = 300

[images.cover]
width = 550
height = 350

# ---------------------------------------------------------------------------
# Typography and palette (colours are RRGGBB without '#')
# ---------------------------------------------------------------------------
[style]
font = "Georgia"
# Sizes are in half-points: 22 = 11pt.
body_size = 22
accent = "A04040"
muted = "999999"

[style.heading1]
size = 48
color = "A04040"

[style.heading2]
size = 32
color = "4F4F4F"

[style.heading3]
size = 26
color = "4F4F4F"

# ---------------------------------------------------------------------------
# Document sections
# ---------------------------------------------------------------------------
[document]
# header_text = "DRAFT FIELD JOURNAL - FEB 2026"
# subtitle = "A Study of Tectonic and Volcanic Formations"
regional_context = true
map_placeholder = "📍 PLACEHOLDER: TECTONIC MAP OF CHILE / NAZCA PLATE SUBDUCTION"
index_intro = "Summary of key geological observations recorded during the expedition."
closing_text = "End of Records"

# ---------------------------------------------------------------------------
# GPS lines
# ---------------------------------------------------------------------------
[gps]
# Link coordinates to a map search. The coordinates are appended as ?query=.
hyperlink = true
map_url = "https://www.google.com/maps/search/?api=1"

# ---------------------------------------------------------------------------
# Timeline table (replaces the whole list when overridden)
# ---------------------------------------------------------------------------
[timeline]
title = "FIELD STRATIGRAPHY & REGIONAL TIMELINE"
header_fill = "A04040"
header_text_color = "FFFFFF"

[[timeline.eras]]
text = "HOLOCENE (0.01 Ma): Rapa Nui human history and Moai carving."
fill = "F5F5DC"

[[timeline.eras]]
text = "PLEISTOCENE (2.5 Ma): Formation of Atacama evaporite basins."
fill = "EFEBE9"

[[timeline.eras]]
text = "MIOCENE (12 Ma): Intrusion of the Torres del Paine laccoliths."
fill = "D7CCC8"

[[timeline.eras]]
text = "CRETACEOUS (100 Ma): Initial compression and subduction of the Nazca plate."
fill = "BCAAA4"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_classic_layout() {
        let config = JournalConfig::default();
        assert_eq!(config.images.body, BoxSize { width: 450, height: 300 });
        assert_eq!(config.images.cover, BoxSize { width: 550, height: 350 });
        assert!(!config.images.preserve_aspect);
        assert_eq!(config.style.accent, "A04040");
        assert_eq!(config.timeline.eras.len(), 4);
        assert!(config.document.regional_context);
    }

    #[test]
    fn default_config_is_valid() {
        JournalConfig::default().validate().unwrap();
    }

    #[test]
    fn parse_partial_config() {
        let toml = r##"
[style]
accent = "336699"
"##;
        let config: JournalConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.style.accent, "336699");
        // Default values preserved
        assert_eq!(config.style.font, "Georgia");
        assert_eq!(config.paths.photos, "photos");
    }

    #[test]
    fn stock_config_toml_matches_defaults() {
        let parsed: JournalConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = JournalConfig::default();
        assert_eq!(parsed.images.body, defaults.images.body);
        assert_eq!(parsed.images.cover, defaults.images.cover);
        assert_eq!(parsed.timeline.eras, defaults.timeline.eras);
        assert_eq!(parsed.document.closing_text, defaults.document.closing_text);
        assert_eq!(parsed.gps.map_url, defaults.gps.map_url);
        assert!(parsed.document.header_text.is_none());
    }

    #[test]
    fn user_eras_replace_stock_list() {
        let user: toml::Value = toml::from_str(
            "[[timeline.eras]]\ntext = \"HOLOCENE: salt flats form.\"\nfill = \"F5F5DC\"",
        )
        .unwrap();
        let config = resolve_config(stock_defaults_value(), Some(user)).unwrap();
        assert_eq!(config.timeline.eras.len(), 1);
        assert_eq!(config.timeline.eras[0].text, "HOLOCENE: salt flats form.");
        assert_eq!(config.paths.data, "travelData.json");
    }

    #[test]
    fn merge_toml_overlay_wins_and_base_survives() {
        let base: toml::Value = toml::from_str("[a]\nx = 1\ny = 2").unwrap();
        let overlay: toml::Value = toml::from_str("[a]\ny = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"]["x"].as_integer(), Some(1));
        assert_eq!(merged["a"]["y"].as_integer(), Some(3));
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("journal.toml")).unwrap();
        assert_eq!(config.paths.output, "Geological_Field_Journal_2026.docx");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("journal.toml");
        fs::write(
            &path,
            r##"
[images.cover]
width = 600
height = 400

[document]
subtitle = "Andes 2026"
"##,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.images.cover, BoxSize { width: 600, height: 400 });
        assert_eq!(config.document.subtitle.as_deref(), Some("Andes 2026"));
        // Unspecified values should be defaults
        assert_eq!(config.images.body, BoxSize { width: 450, height: 300 });
        assert_eq!(config.document.closing_text, "End of Records");
    }

    #[test]
    fn load_config_timeline_eras_replace_stock_list() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("journal.toml");
        fs::write(
            &path,
            r##"
[[timeline.eras]]
text = "JURASSIC (150 Ma)"
fill = "CCCCCC"
"##,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.timeline.eras.len(), 1);
        assert_eq!(config.timeline.eras[0].text, "JURASSIC (150 Ma)");
        assert_eq!(config.timeline.title, "FIELD STRATIGRAPHY & REGIONAL TIMELINE");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("journal.toml");
        fs::write(&path, "this is not valid toml [[[").unwrap();

        let result = load_config(&path);
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_rejects_unknown_keys() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("journal.toml");
        fs::write(&path, "[style]\naccnet = \"A04040\"\n").unwrap();

        let result = load_config(&path);
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_rejects_zero_image_box() {
        let mut config = JournalConfig::default();
        config.images.body.width = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_rejects_hash_prefixed_color() {
        let mut config = JournalConfig::default();
        config.style.accent = "#A04040".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("style.accent"));
    }

    #[test]
    fn validate_rejects_bad_era_fill() {
        let mut config = JournalConfig::default();
        config.timeline.eras[2].fill = "beige".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_rejects_empty_timeline() {
        let mut config = JournalConfig::default();
        config.timeline.eras.clear();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_rejects_relative_map_url() {
        let mut config = JournalConfig::default();
        config.gps.map_url = "maps/search".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("gps.map_url"));
    }
}
