//! Document assembly.
//!
//! Composes the builder output into one [`Document`] in a fixed section
//! order:
//!
//! ```text
//! Title (H1) · subtitle · cover photo
//! ── page break ──
//! Regional Geological Context (H1) · map placeholder     [document.regional_context]
//! Timeline table
//! ── page break ──
//! Table of contents
//! ── page break ──
//! Day 1 … Day N            (each ends with its own page break)
//! Geological Glossary (H1) · terms                        [non-empty glossary]
//! Stratigraphic Index (H1) · intro · index table
//! End of Records
//! ```
//!
//! The running footer ("Page X of Y") and optional header are attached once
//! at document level. Assembly is a pure function of the record, the photo
//! directory contents and the configuration: it cannot fail, and running it
//! twice gives equal trees.

use crate::builders::{
    BuildContext, day_entry, glossary_entries, image_block, map_placeholder,
    stratigraphic_index, timeline_table,
};
use crate::document::{
    Alignment, Document, DocumentNode, Field, Heading, Paragraph, TextRun, TocMarker,
};
use crate::journal::JournalRecord;

const FOOTER_SIZE: usize = 16;

/// Build the complete document tree for a record.
pub fn assemble(record: &JournalRecord, ctx: &BuildContext<'_>) -> Document {
    let doc_config = &ctx.config.document;
    let style = &ctx.config.style;
    let mut body = Vec::new();

    // Title page
    body.push(DocumentNode::Heading(
        Heading::new(1, record.title.as_str()).align(Alignment::Center),
    ));
    if let Some(subtitle) = &doc_config.subtitle {
        body.push(DocumentNode::Paragraph(
            Paragraph::new()
                .run(TextRun::new(subtitle.as_str()).italic())
                .align(Alignment::Center),
        ));
    }
    if let Some(cover) = &record.cover_image {
        body.extend(image_block(ctx, cover, true));
    }
    body.push(DocumentNode::PageBreak);

    // Regional context
    if doc_config.regional_context {
        body.push(DocumentNode::Heading(Heading::new(
            1,
            "Regional Geological Context",
        )));
        body.extend(map_placeholder(doc_config));
    }
    body.extend(timeline_table(&ctx.config.timeline));
    body.push(DocumentNode::PageBreak);

    body.push(DocumentNode::TableOfContents(TocMarker {
        title: "Table of Contents".to_string(),
        levels: (1, 3),
    }));
    body.push(DocumentNode::PageBreak);

    for day in &record.days {
        body.extend(day_entry(ctx, day));
    }

    if !record.glossary.is_empty() {
        body.push(DocumentNode::Heading(Heading::new(1, "Geological Glossary")));
        body.extend(glossary_entries(&record.glossary));
    }

    body.push(DocumentNode::Heading(Heading::new(1, "Stratigraphic Index")));
    body.push(DocumentNode::Paragraph(
        Paragraph::text(doc_config.index_intro.as_str()).spacing(0, 200),
    ));
    body.extend(stratigraphic_index(ctx, &record.days));
    body.push(DocumentNode::Paragraph(
        Paragraph::new()
            .run(
                TextRun::new(doc_config.closing_text.as_str())
                    .italic()
                    .color(style.muted.as_str()),
            )
            .align(Alignment::Right),
    ));

    let header = doc_config.header_text.as_ref().map(|text| {
        Paragraph::new()
            .run(
                TextRun::new(text.as_str())
                    .size(FOOTER_SIZE)
                    .color(style.muted.as_str()),
            )
            .align(Alignment::Right)
    });

    tracing::debug!(nodes = body.len(), days = record.days.len(), "assembled document");
    Document {
        header,
        footer: page_footer(&record.author),
        body,
    }
}

/// `[<author> | ]Page <n> of <total>`, right-aligned, numbers in bold.
fn page_footer(author: &str) -> Paragraph {
    let prefix = if author.trim().is_empty() {
        "Page ".to_string()
    } else {
        format!("{} | Page ", author.trim())
    };
    Paragraph::new()
        .run(TextRun::new(prefix).size(FOOTER_SIZE))
        .field(Field::PageNumber, true)
        .run(TextRun::new(" of ").size(FOOTER_SIZE))
        .field(Field::TotalPages, true)
        .align(Alignment::Right)
}
