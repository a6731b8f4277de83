//! Generic document tree.
//!
//! The builders and the assembler only produce these nodes; the renderers in
//! [`crate::render`] are the only code that knows about `.docx` or HTML. The
//! tree is plain data: `Clone + PartialEq`, so two assemblies of the same
//! inputs can be compared directly.
//!
//! ```text
//! Document
//! ├── header: Option<Paragraph>
//! ├── footer: Paragraph              (page fields live here)
//! └── body: Vec<DocumentNode>
//!     ├── Heading
//!     ├── Paragraph ── Inline::{Text, Hyperlink, Field}
//!     ├── Table ── TableRow ── TableCell ── Vec<DocumentNode>
//!     ├── Image                      (bytes + display size)
//!     ├── PageBreak
//!     └── TableOfContents
//! ```

use std::path::PathBuf;

/// The complete output, ready for a renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Running header, attached once at document level.
    pub header: Option<Paragraph>,
    /// Running footer, attached once at document level.
    pub footer: Paragraph,
    pub body: Vec<DocumentNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DocumentNode {
    Heading(Heading),
    Paragraph(Paragraph),
    Table(Table),
    Image(ImageNode),
    PageBreak,
    TableOfContents(TocMarker),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    /// 1-based, as in "Heading 1".
    pub level: u8,
    pub text: String,
    pub alignment: Alignment,
}

impl Heading {
    pub fn new(level: u8, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
            alignment: Alignment::Left,
        }
    }

    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }
}

/// Vertical spacing around a paragraph, in twentieths of a point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Spacing {
    pub before: u32,
    pub after: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    pub inlines: Vec<Inline>,
    pub alignment: Alignment,
    pub spacing: Spacing,
    /// Left indent in twentieths of a point.
    pub indent_left: Option<u32>,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// A paragraph holding one unstyled run.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new().run(TextRun::new(text))
    }

    pub fn run(mut self, run: TextRun) -> Self {
        self.inlines.push(Inline::Text(run));
        self
    }

    pub fn link(mut self, link: Hyperlink) -> Self {
        self.inlines.push(Inline::Hyperlink(link));
        self
    }

    pub fn field(mut self, field: Field, bold: bool) -> Self {
        self.inlines.push(Inline::Field { field, bold });
        self
    }

    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn spacing(mut self, before: u32, after: u32) -> Self {
        self.spacing = Spacing { before, after };
        self
    }

    pub fn indent(mut self, left: u32) -> Self {
        self.indent_left = Some(left);
        self
    }

    /// Concatenated visible text, with fields shown as `{PAGE}`/`{NUMPAGES}`.
    pub fn plain_text(&self) -> String {
        self.inlines
            .iter()
            .map(|inline| match inline {
                Inline::Text(run) => run.text.clone(),
                Inline::Hyperlink(link) => link.run.text.clone(),
                Inline::Field { field, .. } => format!("{{{}}}", field.instruction()),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text(TextRun),
    Hyperlink(Hyperlink),
    /// A field the viewer fills in (page numbers).
    Field { field: Field, bold: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    PageNumber,
    TotalPages,
}

impl Field {
    /// OOXML field instruction name.
    pub fn instruction(self) -> &'static str {
        match self {
            Field::PageNumber => "PAGE",
            Field::TotalPages => "NUMPAGES",
        }
    }
}

/// A span of uniformly styled text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    /// `RRGGBB`.
    pub color: Option<String>,
    /// Half-points.
    pub size: Option<usize>,
}

impl TextRun {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn size(mut self, half_points: usize) -> Self {
        self.size = Some(half_points);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hyperlink {
    pub url: String,
    pub run: TextRun,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub rows: Vec<TableRow>,
    /// Percent of the text width.
    pub width_pct: u32,
    /// Inner cell padding in twentieths of a point, all four sides.
    pub cell_margin: Option<u32>,
}

impl Table {
    pub fn new(rows: Vec<TableRow>) -> Self {
        Self {
            rows,
            width_pct: 100,
            cell_margin: None,
        }
    }

    pub fn cell_margin(mut self, margin: u32) -> Self {
        self.cell_margin = Some(margin);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

impl TableRow {
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self { cells }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableCell {
    pub children: Vec<DocumentNode>,
    /// Background fill, `RRGGBB`.
    pub shading: Option<String>,
    pub borders: CellBorders,
}

impl TableCell {
    pub fn new(children: Vec<DocumentNode>) -> Self {
        Self {
            children,
            ..Self::default()
        }
    }

    /// A cell holding a single paragraph.
    pub fn paragraph(paragraph: Paragraph) -> Self {
        Self::new(vec![DocumentNode::Paragraph(paragraph)])
    }

    pub fn shading(mut self, fill: impl Into<String>) -> Self {
        self.shading = Some(fill.into());
        self
    }

    pub fn borders(mut self, borders: CellBorders) -> Self {
        self.borders = borders;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderStyle {
    Single,
    Dashed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Border {
    pub style: BorderStyle,
    /// Eighths of a point.
    pub size: u32,
    pub color: Option<String>,
}

/// Per-side borders. `None` leaves the renderer default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellBorders {
    pub top: Option<Border>,
    pub left: Option<Border>,
    pub bottom: Option<Border>,
    pub right: Option<Border>,
}

/// An embedded photo.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageNode {
    /// Absolute source path, kept for renderers that link instead of embed.
    pub source: PathBuf,
    /// PNG-encoded photo bytes.
    pub data: Vec<u8>,
    /// Display size in pixels.
    pub width: u32,
    pub height: u32,
    pub alignment: Alignment,
    pub spacing: Spacing,
}

/// Where the viewer should build the table of contents.
#[derive(Debug, Clone, PartialEq)]
pub struct TocMarker {
    pub title: String,
    /// Heading levels to include, inclusive.
    pub levels: (u8, u8),
}

impl DocumentNode {
    /// Visible text of a heading or paragraph; `None` for other nodes.
    pub fn text(&self) -> Option<String> {
        match self {
            DocumentNode::Heading(h) => Some(h.text.clone()),
            DocumentNode::Paragraph(p) => Some(p.plain_text()),
            _ => None,
        }
    }
}

impl Document {
    /// All headings in body order, descending into tables.
    pub fn headings(&self) -> Vec<&Heading> {
        let mut out = Vec::new();
        collect_headings(&self.body, &mut out);
        out
    }
}

fn collect_headings<'a>(nodes: &'a [DocumentNode], out: &mut Vec<&'a Heading>) {
    for node in nodes {
        match node {
            DocumentNode::Heading(h) => out.push(h),
            DocumentNode::Table(t) => {
                for cell in t.rows.iter().flat_map(|r| &r.cells) {
                    collect_headings(&cell.children, out);
                }
            }
            _ => {}
        }
    }
}
