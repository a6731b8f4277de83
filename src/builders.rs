//! Node builders: one journal fragment in, document nodes out.
//!
//! Every builder takes what it needs explicitly (a [`BuildContext`] for the
//! photo directory and configuration) and reads no ambient state. Builders
//! never fail: optional inputs that are absent produce nothing, and photos
//! that are missing or unreadable produce a visible placeholder instead.
//!
//! | Builder | Input | Output |
//! |---|---|---|
//! | [`image_block`] | `ImageRef` + cover flag | image + optional caption, or placeholder |
//! | [`field_note`] | `Option<&FieldNote>` | shaded one-cell table, or nothing |
//! | [`timeline_table`] | `[timeline]` config | static era table |
//! | [`map_placeholder`] | `[document]` config | dashed placeholder cell |
//! | [`stratigraphic_index`] | all days | DAY / TOPIC / SUMMARY table |
//! | [`glossary_entries`] | glossary terms | one line per term |
//! | [`day_entry`] | one `DayEntry` | the whole day section |

use crate::config::{DocumentConfig, JournalConfig, TimelineConfig};
use crate::document::{
    Alignment, Border, BorderStyle, CellBorders, DocumentNode, Heading, Hyperlink, ImageNode,
    Paragraph, Spacing, Table, TableCell, TableRow, TextRun,
};
use crate::imaging::{self, Photo, display_size, load_photo};
use crate::journal::{DayEntry, FieldNote, GlossaryTerm, ImageRef};
use std::path::{Path, PathBuf};

/// Index summaries longer than this many characters are cut.
pub const SUMMARY_LENGTH: usize = 80;

const PLACEHOLDER_COLOR: &str = "FF0000";
const CAPTION_COLOR: &str = "4F4F4F";
const NOTE_FILL: &str = "EFEBE9";
const GPS_COLOR: &str = "666666";
const LINK_COLOR: &str = "0000FF";
const MAP_TEXT_COLOR: &str = "555555";
const WHITE: &str = "FFFFFF";
const BLACK: &str = "000000";

/// Everything a builder may consult besides its direct input.
#[derive(Debug, Clone, Copy)]
pub struct BuildContext<'a> {
    pub photo_dir: &'a Path,
    pub config: &'a JournalConfig,
}

impl<'a> BuildContext<'a> {
    pub fn new(photo_dir: &'a Path, config: &'a JournalConfig) -> Self {
        Self { photo_dir, config }
    }

    /// Absolute path of a photo filename; `None` when the name points
    /// outside the photo directory.
    pub fn resolve(&self, filename: &str) -> Option<PathBuf> {
        imaging::resolve_photo(self.photo_dir, filename)
    }
}

// ============================================================================
// Images
// ============================================================================

/// Build the block for one photo reference.
///
/// - missing file, or a name outside the photo directory → one highlighted
///   `[MISSING IMAGE: <name>]` paragraph
/// - file present but not a decodable image → `[UNREADABLE IMAGE: <name>]`
/// - otherwise → the centered image, then an italic caption if there is one
///
/// Covers use the larger `images.cover` box.
pub fn image_block(ctx: &BuildContext<'_>, image: &ImageRef, is_cover: bool) -> Vec<DocumentNode> {
    let missing = || vec![placeholder(&format!("[MISSING IMAGE: {}]", image.filename))];
    let Some(path) = ctx.resolve(&image.filename) else {
        tracing::warn!(name = %image.filename, "photo name leaves the photo directory");
        return missing();
    };
    if !imaging::photo_exists(&path) {
        tracing::debug!(path = %path.display(), "photo missing, inserting placeholder");
        return missing();
    }

    let photo = match load_photo(&path).and_then(Photo::into_png) {
        Ok(photo) => photo,
        Err(e) => {
            tracing::warn!(error = %e, "photo unreadable, inserting placeholder");
            return vec![placeholder(&format!(
                "[UNREADABLE IMAGE: {}]",
                image.filename
            ))];
        }
    };

    let images = &ctx.config.images;
    let bounds = if is_cover { images.cover } else { images.body };
    let source = (photo.dimensions.width, photo.dimensions.height);
    let (width, height) = display_size(source, (bounds.width, bounds.height), images.preserve_aspect);
    tracing::trace!(
        path = %photo.path.display(),
        bytes = photo.data.len(),
        width,
        height,
        "embedding photo"
    );

    let mut nodes = vec![DocumentNode::Image(ImageNode {
        source: photo.path,
        data: photo.data,
        width,
        height,
        alignment: Alignment::Center,
        spacing: Spacing {
            before: 200,
            after: 0,
        },
    })];

    if let Some(caption) = image.caption.as_deref().filter(|c| !c.trim().is_empty()) {
        nodes.push(DocumentNode::Paragraph(
            Paragraph::new()
                .run(TextRun::new(caption).italic().size(18).color(CAPTION_COLOR))
                .align(Alignment::Center)
                .spacing(0, 200),
        ));
    }
    nodes
}

fn placeholder(text: &str) -> DocumentNode {
    DocumentNode::Paragraph(
        Paragraph::new()
            .run(TextRun::new(text).bold().color(PLACEHOLDER_COLOR))
            .align(Alignment::Center),
    )
}

// ============================================================================
// Field notes
// ============================================================================

/// Shaded box with a thick accent bar on the left.
pub fn field_note(ctx: &BuildContext<'_>, note: Option<&FieldNote>) -> Vec<DocumentNode> {
    let Some(note) = note else {
        return Vec::new();
    };
    let accent = &ctx.config.style.accent;

    let cell = TableCell::new(vec![
        DocumentNode::Paragraph(Paragraph::new().run(
            TextRun::new(format!("⛏ FIELD NOTE: {}", note.title))
                .bold()
                .color(accent.as_str()),
        )),
        DocumentNode::Paragraph(
            Paragraph::new()
                .run(TextRun::new(note.text.as_str()).italic())
                .spacing(100, 0),
        ),
    ])
    .shading(NOTE_FILL)
    .borders(CellBorders {
        left: Some(Border {
            style: BorderStyle::Single,
            size: 20,
            color: Some(accent.clone()),
        }),
        ..CellBorders::default()
    });

    vec![DocumentNode::Table(
        Table::new(vec![TableRow::new(vec![cell])]).cell_margin(200),
    )]
}

// ============================================================================
// Static reference tables
// ============================================================================

/// Geological era table: a title row, then one tinted row per era.
///
/// The content comes from configuration, not from the record.
pub fn timeline_table(timeline: &TimelineConfig) -> Vec<DocumentNode> {
    let header = TableRow::new(vec![
        TableCell::paragraph(
            Paragraph::new()
                .run(
                    TextRun::new(timeline.title.as_str())
                        .bold()
                        .color(timeline.header_text_color.as_str())
                        .size(20),
                )
                .align(Alignment::Center),
        )
        .shading(timeline.header_fill.as_str()),
    ]);

    let rows = std::iter::once(header)
        .chain(timeline.eras.iter().map(|era| {
            TableRow::new(vec![
                TableCell::paragraph(
                    Paragraph::new().run(TextRun::new(era.text.as_str()).color(BLACK).size(20)),
                )
                .shading(era.fill.as_str()),
            ])
        }))
        .collect();

    vec![DocumentNode::Table(Table::new(rows).cell_margin(120))]
}

/// Dashed box standing in for a regional map.
pub fn map_placeholder(document: &DocumentConfig) -> Vec<DocumentNode> {
    let dashed = || {
        Some(Border {
            style: BorderStyle::Dashed,
            size: 10,
            color: None,
        })
    };
    let cell = TableCell::paragraph(
        Paragraph::new()
            .run(
                TextRun::new(document.map_placeholder.as_str())
                    .italic()
                    .color(MAP_TEXT_COLOR),
            )
            .align(Alignment::Center),
    )
    .borders(CellBorders {
        top: dashed(),
        bottom: dashed(),
        ..CellBorders::default()
    });

    vec![DocumentNode::Table(
        Table::new(vec![TableRow::new(vec![cell])]).cell_margin(500),
    )]
}

// ============================================================================
// Stratigraphic index
// ============================================================================

/// Index summary: the first [`SUMMARY_LENGTH`] characters of the note text,
/// always followed by `...`.
pub fn summarize(text: &str) -> String {
    let prefix = match text.char_indices().nth(SUMMARY_LENGTH) {
        Some((cut, _)) => &text[..cut],
        None => text,
    };
    format!("{prefix}...")
}

/// One row per day that has a field note; days without one are skipped.
pub fn stratigraphic_index(ctx: &BuildContext<'_>, days: &[DayEntry]) -> Vec<DocumentNode> {
    let accent = ctx.config.style.accent.as_str();
    let header_cell = |label: &str| {
        TableCell::paragraph(Paragraph::new().run(TextRun::new(label).bold().color(WHITE)))
            .shading(accent)
    };
    let header = TableRow::new(vec![
        header_cell("DAY"),
        header_cell("TOPIC"),
        header_cell("SUMMARY"),
    ]);

    let rows = std::iter::once(header)
        .chain(days.iter().filter_map(|day| {
            let note = day.geo_note.as_ref()?;
            Some(TableRow::new(vec![
                TableCell::paragraph(Paragraph::text(day.label.as_str())),
                TableCell::paragraph(
                    Paragraph::new().run(TextRun::new(note.title.as_str()).bold()),
                ),
                TableCell::paragraph(Paragraph::text(summarize(&note.text))),
            ]))
        }))
        .collect();

    vec![DocumentNode::Table(Table::new(rows))]
}

// ============================================================================
// Glossary
// ============================================================================

/// `Term: definition`, indented, one paragraph per term.
pub fn glossary_entries(terms: &[GlossaryTerm]) -> Vec<DocumentNode> {
    terms
        .iter()
        .map(|g| {
            DocumentNode::Paragraph(
                Paragraph::new()
                    .run(TextRun::new(format!("{}: ", g.term)).bold())
                    .run(TextRun::new(g.definition.as_str()))
                    .indent(240)
                    .spacing(0, 120),
            )
        })
        .collect()
}

// ============================================================================
// Day entries
// ============================================================================

/// Map search link for a coordinate pair, e.g.
/// `https://www.google.com/maps/search/?api=1&query=-33.45%2C-70.66`.
///
/// Returns `None` if `base` is not a valid URL.
pub fn map_search_url(base: &str, coordinates: &str) -> Option<String> {
    url::Url::parse_with_params(base, &[("query", coordinates)])
        .ok()
        .map(String::from)
}

fn gps_line(ctx: &BuildContext<'_>, coordinates: &str) -> Paragraph {
    let line = Paragraph::new()
        .run(TextRun::new("📍 GPS: ").bold().color(GPS_COLOR).size(16))
        .spacing(0, 100);

    let gps = &ctx.config.gps;
    let url = gps
        .hyperlink
        .then(|| map_search_url(&gps.map_url, coordinates))
        .flatten();
    match url {
        Some(url) => line.link(Hyperlink {
            url,
            run: TextRun::new(coordinates)
                .color(LINK_COLOR)
                .underline()
                .size(16),
        }),
        None => line.run(TextRun::new(coordinates).italic().color(GPS_COLOR).size(16)),
    }
}

/// A full day section, in order: heading, GPS line, description, field note,
/// photos, page break.
pub fn day_entry(ctx: &BuildContext<'_>, day: &DayEntry) -> Vec<DocumentNode> {
    let mut nodes = vec![DocumentNode::Heading(Heading::new(
        2,
        format!("{}: {}", day.label, day.title),
    ))];

    if let Some(coordinates) = &day.coordinates {
        nodes.push(DocumentNode::Paragraph(gps_line(ctx, coordinates)));
    }

    nodes.push(DocumentNode::Paragraph(
        Paragraph::text(day.description.as_str()).spacing(0, 200),
    ));
    nodes.extend(field_note(ctx, day.geo_note.as_ref()));
    for image in &day.images {
        nodes.extend(image_block(ctx, image, false));
    }
    nodes.push(DocumentNode::PageBreak);
    nodes
}
