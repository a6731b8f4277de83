//! Single-page HTML rendering.
//!
//! A preview of the journal that opens in any browser. Headings get stable
//! `section-N` anchors (numbered in body order) so the table of contents can
//! link to them; page breaks become `div.page-break`, which the print
//! stylesheet turns into real breaks. Photos are referenced by `file://` URL
//! rather than embedded.

use crate::config::StyleConfig;
use crate::document::{
    Alignment, Border, BorderStyle, Document, DocumentNode, Heading, ImageNode, Inline, Paragraph,
    Table, TableCell, TextRun, TocMarker,
};
use maud::{DOCTYPE, Markup, html};
use std::cell::Cell;

/// Render a document as a standalone HTML page.
pub fn to_html(document: &Document, style: &StyleConfig) -> String {
    let renderer = HtmlRenderer {
        document,
        next_heading: Cell::new(0),
    };
    let title = document
        .headings()
        .first()
        .map(|h| h.text.clone())
        .unwrap_or_default();

    let markup = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (stylesheet(style)) }
            }
            body {
                @if let Some(header) = &document.header {
                    header.running-header { (renderer.paragraph(header)) }
                }
                main {
                    @for node in &document.body {
                        (renderer.node(node))
                    }
                }
                footer.running-footer { (renderer.paragraph(&document.footer)) }
            }
        }
    };
    markup.into_string()
}

struct HtmlRenderer<'a> {
    document: &'a Document,
    /// Index of the next heading to render; matches `Document::headings` order.
    next_heading: Cell<usize>,
}

impl HtmlRenderer<'_> {
    fn node(&self, node: &DocumentNode) -> Markup {
        match node {
            DocumentNode::Heading(h) => self.heading(h),
            DocumentNode::Paragraph(p) => self.paragraph(p),
            DocumentNode::Table(t) => self.table(t),
            DocumentNode::Image(i) => image(i),
            DocumentNode::PageBreak => html! { div.page-break {} },
            DocumentNode::TableOfContents(toc) => self.toc(toc),
        }
    }

    fn heading(&self, h: &Heading) -> Markup {
        let n = self.next_heading.get();
        self.next_heading.set(n + 1);
        let id = section_id(n);
        let style = text_align(h.alignment);
        html! {
            @match h.level {
                1 => { h1 id=(id) style=[style] { (h.text) } }
                2 => { h2 id=(id) style=[style] { (h.text) } }
                _ => { h3 id=(id) style=[style] { (h.text) } }
            }
        }
    }

    fn paragraph(&self, p: &Paragraph) -> Markup {
        let mut css = Vec::new();
        css.extend(text_align(p.alignment).map(str::to_string));
        if p.spacing.before > 0 {
            css.push(format!("margin-top:{}pt", twips_to_pt(p.spacing.before)));
        }
        if p.spacing.after > 0 {
            css.push(format!("margin-bottom:{}pt", twips_to_pt(p.spacing.after)));
        }
        if let Some(left) = p.indent_left {
            css.push(format!("margin-left:{}pt", twips_to_pt(left)));
        }
        let style = (!css.is_empty()).then(|| css.join(";"));

        html! {
            p style=[style] {
                @for inline in &p.inlines {
                    @match inline {
                        Inline::Text(run) => { (text_run(run)) }
                        Inline::Hyperlink(link) => { a href=(link.url) { (text_run(&link.run)) } }
                        Inline::Field { field, bold } => {
                            @let placeholder = field.instruction();
                            @if *bold {
                                strong { span.field data-field=(placeholder) { "#" } }
                            } @else {
                                span.field data-field=(placeholder) { "#" }
                            }
                        }
                    }
                }
            }
        }
    }

    fn table(&self, t: &Table) -> Markup {
        let padding = t
            .cell_margin
            .map(|m| format!("padding:{}pt", twips_to_pt(m)));
        html! {
            table style={ "width:" (t.width_pct) "%" } {
                @for row in &t.rows {
                    tr {
                        @for cell in &row.cells {
                            (self.cell(cell, padding.as_deref()))
                        }
                    }
                }
            }
        }
    }

    fn cell(&self, c: &TableCell, padding: Option<&str>) -> Markup {
        let mut css: Vec<String> = padding.map(str::to_string).into_iter().collect();
        if let Some(fill) = &c.shading {
            css.push(format!("background:#{fill}"));
        }
        let sides = [
            ("top", &c.borders.top),
            ("left", &c.borders.left),
            ("bottom", &c.borders.bottom),
            ("right", &c.borders.right),
        ];
        for (side, border) in sides {
            if let Some(b) = border {
                css.push(format!("border-{side}:{}", border_css(b)));
            }
        }
        let style = (!css.is_empty()).then(|| css.join(";"));
        html! {
            td style=[style] {
                @for child in &c.children {
                    (self.node(child))
                }
            }
        }
    }

    fn toc(&self, toc: &TocMarker) -> Markup {
        let (min, max) = toc.levels;
        html! {
            nav.toc {
                p { strong { (toc.title) } }
                ol {
                    @for (n, h) in self.document.headings().iter().enumerate() {
                        @if (min..=max).contains(&h.level) {
                            li class={ "toc-level-" (h.level) } {
                                a href={ "#" (section_id(n)) } { (h.text) }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn section_id(n: usize) -> String {
    format!("section-{}", n + 1)
}

fn text_run(run: &TextRun) -> Markup {
    let mut css = Vec::new();
    if let Some(color) = &run.color {
        css.push(format!("color:#{color}"));
    }
    if let Some(size) = run.size {
        css.push(format!("font-size:{}pt", half_points_to_pt(size)));
    }
    if run.underline {
        css.push("text-decoration:underline".to_string());
    }
    let style = (!css.is_empty()).then(|| css.join(";"));

    let inner = html! { span style=[style] { (run.text) } };
    match (run.bold, run.italic) {
        (true, true) => html! { strong { em { (inner) } } },
        (true, false) => html! { strong { (inner) } },
        (false, true) => html! { em { (inner) } },
        (false, false) => inner,
    }
}

fn image(i: &ImageNode) -> Markup {
    let src = url::Url::from_file_path(&i.source)
        .map(String::from)
        .unwrap_or_else(|()| i.source.display().to_string());
    let alt = i
        .source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    html! {
        figure style=[text_align(i.alignment)] {
            img src=(src) alt=(alt) width=(i.width) height=(i.height);
        }
    }
}

fn text_align(alignment: Alignment) -> Option<&'static str> {
    match alignment {
        Alignment::Left => None,
        Alignment::Center => Some("text-align:center"),
        Alignment::Right => Some("text-align:right"),
    }
}

fn border_css(border: &Border) -> String {
    let style = match border.style {
        BorderStyle::Single => "solid",
        BorderStyle::Dashed => "dashed",
    };
    // Eighths of a point
    let width = f64::from(border.size) / 8.0;
    let color = border.color.as_deref().unwrap_or("000000");
    format!("{width}pt {style} #{color}")
}

fn twips_to_pt(twips: u32) -> f64 {
    f64::from(twips) / 20.0
}

fn half_points_to_pt(half_points: usize) -> f64 {
    half_points as f64 / 2.0
}

fn stylesheet(style: &StyleConfig) -> String {
    let heading = |tag: &str, h: &crate::config::HeadingStyle| {
        format!(
            "{tag}{{font-size:{}pt;color:#{};}}",
            half_points_to_pt(h.size),
            h.color
        )
    };
    format!(
        "body{{font-family:{font},serif;font-size:{body}pt;max-width:46em;margin:2em auto;}}\
         {h1}{h2}{h3}\
         table{{border-collapse:collapse;margin:1em 0;}}\
         figure{{margin:0;}}\
         .running-header,.running-footer{{color:#{muted};}}\
         .page-break{{border-top:1px dotted #{muted};margin:2em 0;}}\
         @media print{{.page-break{{border:0;break-after:page;}}}}",
        font = style.font,
        body = half_points_to_pt(style.body_size),
        h1 = heading("h1", &style.heading1),
        h2 = heading("h2", &style.heading2),
        h3 = heading("h3", &style.heading3),
        muted = style.muted,
    )
}
