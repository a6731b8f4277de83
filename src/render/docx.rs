//! `.docx` rendering via `docx-rs`.
//!
//! A direct mapping of the node tree onto the `docx-rs` builders. The only
//! decisions made here are OOXML units:
//!
//! - photo sizes: pixels → EMU (9525 per pixel at 96 dpi)
//! - table width: percent → fiftieths of a percent
//! - page numbers: complex fields (`PAGE`, `NUMPAGES`) the viewer fills in

use super::RenderError;
use crate::config::{HeadingStyle, StyleConfig};
use crate::document::{self as model, Alignment, DocumentNode, Field, Inline};
use docx_rs::{
    AlignmentType, BorderType, BreakType, Docx, FieldCharType, Footer, Header, Hyperlink,
    HyperlinkType, InstrNUMPAGES, InstrPAGE, InstrText, LineSpacing, Paragraph, Pic, Run,
    RunFonts, Shading, ShdType, Style, StyleType, Table, TableCell, TableCellBorder,
    TableCellBorderPosition, TableCellMargins, TableOfContents, TableRow, WidthType,
};
use std::io::Cursor;

const EMU_PER_PIXEL: u32 = 9525;
/// Text width of an A4/Letter page with default margins, in twips.
const TEXT_WIDTH_TWIPS: usize = 9000;

/// Render a document to `.docx` bytes.
pub fn to_docx(document: &model::Document, style: &StyleConfig) -> Result<Vec<u8>, RenderError> {
    let mut docx = Docx::new()
        .default_fonts(
            RunFonts::new()
                .ascii(style.font.as_str())
                .hi_ansi(style.font.as_str())
                .cs(style.font.as_str()),
        )
        .default_size(style.body_size)
        .add_style(heading_style(1, &style.heading1))
        .add_style(heading_style(2, &style.heading2))
        .add_style(heading_style(3, &style.heading3))
        .footer(Footer::new().add_paragraph(paragraph(&document.footer)));

    if let Some(header) = &document.header {
        docx = docx.header(Header::new().add_paragraph(paragraph(header)));
    }

    for node in &document.body {
        docx = match node {
            DocumentNode::Heading(h) => docx.add_paragraph(heading(h)),
            DocumentNode::Paragraph(p) => docx.add_paragraph(paragraph(p)),
            DocumentNode::Table(t) => docx.add_table(table(t)),
            DocumentNode::Image(i) => docx.add_paragraph(image(i)),
            DocumentNode::PageBreak => docx.add_paragraph(page_break()),
            DocumentNode::TableOfContents(toc) => docx
                .add_paragraph(Paragraph::new().add_run(Run::new().add_text(toc.title.as_str()).bold()))
                .add_table_of_contents(
                    TableOfContents::new()
                        .heading_styles_range(toc.levels.0 as usize, toc.levels.1 as usize),
                ),
        };
    }

    let mut buf = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buf)
        .map_err(|e| RenderError::Pack(e.to_string()))?;
    Ok(buf.into_inner())
}

fn heading_style(level: u8, style: &HeadingStyle) -> Style {
    Style::new(format!("Heading{level}"), StyleType::Paragraph)
        .name(format!("Heading {level}"))
        .size(style.size)
        .color(style.color.as_str())
        .bold()
}

fn alignment(alignment: Alignment) -> AlignmentType {
    match alignment {
        Alignment::Left => AlignmentType::Left,
        Alignment::Center => AlignmentType::Center,
        Alignment::Right => AlignmentType::Right,
    }
}

fn heading(h: &model::Heading) -> Paragraph {
    Paragraph::new()
        .style(&format!("Heading{}", h.level))
        .align(alignment(h.alignment))
        .add_run(Run::new().add_text(h.text.as_str()))
}

fn run(r: &model::TextRun) -> Run {
    let mut run = Run::new().add_text(r.text.as_str());
    if r.bold {
        run = run.bold();
    }
    if r.italic {
        run = run.italic();
    }
    if r.underline {
        run = run.underline("single");
    }
    if let Some(color) = &r.color {
        run = run.color(color.as_str());
    }
    if let Some(size) = r.size {
        run = run.size(size);
    }
    run
}

/// `PAGE` / `NUMPAGES` as a complex field: begin, instruction, separate,
/// placeholder value, end.
fn field_runs(field: Field, bold: bool) -> Vec<Run> {
    let instr = match field {
        Field::PageNumber => InstrText::PAGE(InstrPAGE::new()),
        Field::TotalPages => InstrText::NUMPAGES(InstrNUMPAGES::new()),
    };
    let styled = |run: Run| if bold { run.bold() } else { run };
    vec![
        styled(Run::new().add_field_char(FieldCharType::Begin, true)),
        styled(Run::new().add_instr_text(instr)),
        styled(Run::new().add_field_char(FieldCharType::Separate, false)),
        styled(Run::new().add_text("1")),
        styled(Run::new().add_field_char(FieldCharType::End, false)),
    ]
}

fn paragraph(p: &model::Paragraph) -> Paragraph {
    let mut para = Paragraph::new().align(alignment(p.alignment));
    if p.spacing != model::Spacing::default() {
        para = para.line_spacing(
            LineSpacing::new()
                .before(p.spacing.before)
                .after(p.spacing.after),
        );
    }
    if let Some(left) = p.indent_left {
        para = para.indent(Some(left as i32), None, None, None);
    }
    for inline in &p.inlines {
        para = match inline {
            Inline::Text(r) => para.add_run(run(r)),
            Inline::Hyperlink(link) => para.add_hyperlink(
                Hyperlink::new(link.url.as_str(), HyperlinkType::External).add_run(run(&link.run)),
            ),
            Inline::Field { field, bold } => field_runs(*field, *bold)
                .into_iter()
                .fold(para, |para, r| para.add_run(r)),
        };
    }
    para
}

fn page_break() -> Paragraph {
    Paragraph::new().add_run(Run::new().add_break(BreakType::Page))
}

fn px_to_emu(px: u32) -> u32 {
    px.saturating_mul(EMU_PER_PIXEL)
}

fn image(i: &model::ImageNode) -> Paragraph {
    let pic = Pic::new_with_dimensions(i.data.clone(), i.width, i.height)
        .size(px_to_emu(i.width), px_to_emu(i.height));
    let mut para = Paragraph::new()
        .align(alignment(i.alignment))
        .add_run(Run::new().add_image(pic));
    if i.spacing != model::Spacing::default() {
        para = para.line_spacing(
            LineSpacing::new()
                .before(i.spacing.before)
                .after(i.spacing.after),
        );
    }
    para
}

fn border_type(style: model::BorderStyle) -> BorderType {
    match style {
        model::BorderStyle::Single => BorderType::Single,
        model::BorderStyle::Dashed => BorderType::Dashed,
    }
}

fn cell(c: &model::TableCell) -> TableCell {
    let mut cell = TableCell::new();
    for child in &c.children {
        cell = match child {
            DocumentNode::Heading(h) => cell.add_paragraph(heading(h)),
            DocumentNode::Paragraph(p) => cell.add_paragraph(paragraph(p)),
            DocumentNode::Table(t) => cell.add_table(table(t)),
            DocumentNode::Image(i) => cell.add_paragraph(image(i)),
            // Page flow markers have no meaning inside a cell
            DocumentNode::PageBreak | DocumentNode::TableOfContents(_) => cell,
        };
    }
    if let Some(fill) = &c.shading {
        cell = cell.shading(Shading::new().shd_type(ShdType::Clear).fill(fill.as_str()));
    }

    let sides = [
        (TableCellBorderPosition::Top, &c.borders.top),
        (TableCellBorderPosition::Left, &c.borders.left),
        (TableCellBorderPosition::Bottom, &c.borders.bottom),
        (TableCellBorderPosition::Right, &c.borders.right),
    ];
    for (position, border) in sides {
        if let Some(b) = border {
            cell = cell.set_border(
                TableCellBorder::new(position)
                    .border_type(border_type(b.style))
                    .size(b.size as usize)
                    .color(b.color.as_deref().unwrap_or("auto")),
            );
        }
    }
    cell
}

fn table(t: &model::Table) -> Table {
    let columns = t.rows.iter().map(|r| r.cells.len()).max().unwrap_or(1).max(1);
    let width = TEXT_WIDTH_TWIPS * t.width_pct as usize / 100;
    let rows = t
        .rows
        .iter()
        .map(|r| TableRow::new(r.cells.iter().map(cell).collect()))
        .collect();

    let mut table = Table::new(rows)
        .set_grid(vec![width / columns; columns])
        .width(t.width_pct as usize * 50, WidthType::Pct);
    if let Some(m) = t.cell_margin {
        let m = m as usize;
        table = table.margins(TableCellMargins::new().margin(m, m, m, m));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JournalConfig;
    use crate::document::{Document, Heading, Paragraph as P, TextRun};

    fn small_document() -> Document {
        Document {
            header: Some(P::text("DRAFT")),
            footer: P::new()
                .run(TextRun::new("Page "))
                .field(Field::PageNumber, true)
                .run(TextRun::new(" of "))
                .field(Field::TotalPages, true),
            body: vec![
                DocumentNode::Heading(Heading::new(1, "Chile 2026")),
                DocumentNode::PageBreak,
                DocumentNode::Paragraph(P::text("Plain text").spacing(0, 200)),
            ],
        }
    }

    #[test]
    fn produces_a_zip_container() {
        let config = JournalConfig::default();
        let bytes = to_docx(&small_document(), &config.style).unwrap();
        assert!(bytes.len() > 100);
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn renders_every_node_kind() {
        use crate::document::{
            Border, BorderStyle, CellBorders, Hyperlink as Link, ImageNode, Spacing, Table as T,
            TableCell as C, TableRow as R, TocMarker,
        };
        let config = JournalConfig::default();
        let png = {
            let mut buf = Cursor::new(Vec::new());
            image::RgbImage::new(4, 3)
                .write_to(&mut buf, image::ImageFormat::Png)
                .unwrap();
            buf.into_inner()
        };
        let mut doc = small_document();
        doc.body.extend([
            DocumentNode::TableOfContents(TocMarker {
                title: "Table of Contents".to_string(),
                levels: (1, 3),
            }),
            DocumentNode::Paragraph(P::new().link(Link {
                url: "https://example.com/?q=1".to_string(),
                run: TextRun::new("link").underline(),
            })),
            DocumentNode::Image(ImageNode {
                source: "x.png".into(),
                data: png,
                width: 4,
                height: 3,
                alignment: Alignment::Center,
                spacing: Spacing { before: 200, after: 0 },
            }),
            DocumentNode::Table(
                T::new(vec![R {
                    cells: vec![
                        C::paragraph(P::text("cell"))
                            .shading("EFEBE9")
                            .borders(CellBorders {
                                left: Some(Border {
                                    style: BorderStyle::Single,
                                    size: 20,
                                    color: Some("A04040".to_string()),
                                }),
                                ..CellBorders::default()
                            }),
                    ],
                }])
                .cell_margin(200),
            ),
        ]);
        let bytes = to_docx(&doc, &config.style).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn jpeg_photo_is_packed_as_png_media() {
        use crate::document::{ImageNode, Spacing};
        use crate::imaging::{Photo, load_photo};
        use std::io::Read;

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("ridge.jpg");
        image::RgbImage::from_pixel(16, 12, image::Rgb([90, 80, 70]))
            .save(&path)
            .unwrap();
        let photo = load_photo(&path).and_then(Photo::into_png).unwrap();

        let mut doc = small_document();
        doc.body.push(DocumentNode::Image(ImageNode {
            source: path,
            data: photo.data,
            width: 16,
            height: 12,
            alignment: Alignment::Center,
            spacing: Spacing::default(),
        }));
        let bytes = to_docx(&doc, &JournalConfig::default().style).unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let media: Vec<String> = archive
            .file_names()
            .filter(|name| name.starts_with("word/media/"))
            .map(str::to_string)
            .collect();
        assert_eq!(media.len(), 1);
        let mut magic = [0u8; 8];
        archive
            .by_name(&media[0])
            .unwrap()
            .read_exact(&mut magic)
            .unwrap();
        assert_eq!(&magic, b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn pixels_convert_to_emu() {
        assert_eq!(px_to_emu(450), 4_286_250);
        assert_eq!(px_to_emu(u32::MAX), u32::MAX);
    }
}
