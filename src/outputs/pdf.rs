//! PDF painting for a [`ReportLayout`].
//!
//! Pages are A4 with 10 mm margins and use the built-in Helvetica family,
//! which only encodes single-byte text. Every page gets the centered
//! [`PageHeader`] at the top and `Page N` at the bottom. Line wrapping uses
//! an average glyph width, so lines may end a little short of the margin.

use crate::error::{Error, Result};
use crate::models::{Article, Summary};
use crate::outputs::report::{Block, PageHeader, ReportLayout, build_layout};
use chrono::Local;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Rect, Rgb,
};
use tracing::{info, instrument};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 10.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
/// Body content stops this far above the bottom edge; the footer lives below.
const BOTTOM_LIMIT: f32 = 20.0;
const LAYER_NAME: &str = "Layer 1";

const PT_TO_MM: f32 = 0.3528;
/// Average Helvetica advance width as a fraction of the font size.
const AVG_GLYPH_EM: f32 = 0.5;
const BOLD_GLYPH_EM: f32 = 0.56;

const BODY_SIZE: f32 = 10.0;
const BODY_LINE: f32 = 6.0;

#[derive(Clone, Copy)]
enum Align {
    Left,
    Center,
}

#[derive(Clone, Copy)]
enum Face {
    Regular,
    Bold,
    Italic,
}

/// Render stage: lay out and paint the report, returning the PDF bytes.
#[instrument(level = "info", skip_all, fields(%topic, articles = articles.len()))]
pub fn render_report(articles: &[Article], summaries: &[Summary], topic: &str) -> Result<Vec<u8>> {
    let layout = build_layout(articles, summaries, topic, Local::now().naive_local());
    let bytes = paint(&layout)?;
    info!(bytes = bytes.len(), "Rendered PDF report");
    Ok(bytes)
}

/// Paint an already built layout.
pub fn paint(layout: &ReportLayout) -> Result<Vec<u8>> {
    let mut painter = Painter::new(&layout.header)?;
    for block in &layout.body {
        painter.block(block);
    }
    painter.finish()
}

/// Greedy word wrap to lines of at most `max_chars` characters.
///
/// Words longer than a line (URLs, mostly) are split across lines.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0;

        for word in paragraph.split_whitespace() {
            let chars: Vec<char> = word.chars().collect();
            for chunk in chars.chunks(max_chars) {
                let chunk_len = chunk.len();
                let needed = if current_len == 0 { chunk_len } else { current_len + 1 + chunk_len };
                if needed > max_chars && current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                if current_len > 0 {
                    current.push(' ');
                    current_len += 1;
                }
                current.extend(chunk);
                current_len += chunk_len;
            }
        }
        lines.push(current);
    }
    lines
}

fn text_width(text: &str, size: f32, face: Face) -> f32 {
    let em = match face {
        Face::Bold => BOLD_GLYPH_EM,
        Face::Regular | Face::Italic => AVG_GLYPH_EM,
    };
    text.chars().count() as f32 * size * PT_TO_MM * em
}

fn chars_per_line(size: f32, face: Face) -> usize {
    (CONTENT_WIDTH / text_width("m", size, face)).floor() as usize
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(Rgb::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        None,
    ))
}

struct Painter<'a> {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
    header: &'a PageHeader,
    /// Distance of the cursor from the top edge, in mm.
    y: f32,
    page_no: usize,
}

impl<'a> Painter<'a> {
    fn new(header: &'a PageHeader) -> Result<Self> {
        let (doc, page, layer) =
            PdfDocument::new(&header.title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER_NAME);
        let font = |f: BuiltinFont| {
            doc.add_builtin_font(f)
                .map_err(|e| Error::Render(e.to_string()))
        };
        let regular = font(BuiltinFont::Helvetica)?;
        let bold = font(BuiltinFont::HelveticaBold)?;
        let italic = font(BuiltinFont::HelveticaOblique)?;
        let layer = doc.get_page(page).get_layer(layer);

        let mut painter = Self {
            doc,
            layer,
            regular,
            bold,
            italic,
            header,
            y: MARGIN,
            page_no: 1,
        };
        painter.page_header();
        Ok(painter)
    }

    fn font(&self, face: Face) -> &IndirectFontRef {
        match face {
            Face::Regular => &self.regular,
            Face::Bold => &self.bold,
            Face::Italic => &self.italic,
        }
    }

    /// One line of text in a cell of `height` mm starting at the cursor.
    fn cell(&mut self, text: &str, size: f32, face: Face, height: f32, align: Align) {
        let x = match align {
            Align::Left => MARGIN,
            Align::Center => (PAGE_WIDTH - text_width(text, size, face)).max(0.0) / 2.0,
        };
        let baseline = self.y + height * 0.5 + size * PT_TO_MM * 0.35;
        self.layer.set_fill_color(rgb((0, 0, 0)));
        self.layer.use_text(
            text,
            size,
            Mm(x),
            Mm(PAGE_HEIGHT - baseline),
            self.font(face),
        );
        self.y += height;
    }

    fn page_header(&mut self) {
        let header = self.header;
        self.cell(&header.title, 16.0, Face::Bold, 12.0, Align::Center);
        self.cell(&header.topic, 12.0, Face::Regular, 8.0, Align::Center);
        self.cell(&header.generated_on, 12.0, Face::Regular, 8.0, Align::Center);
        self.y += 10.0;
    }

    fn page_footer(&mut self) {
        self.y = PAGE_HEIGHT - 15.0;
        let label = format!("Page {}", self.page_no);
        self.cell(&label, 8.0, Face::Italic, 10.0, Align::Center);
    }

    fn new_page(&mut self) {
        self.page_footer();
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER_NAME);
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.page_no += 1;
        self.y = MARGIN;
        self.page_header();
    }

    fn ensure_space(&mut self, height: f32) {
        if self.y + height > PAGE_HEIGHT - BOTTOM_LIMIT {
            self.new_page();
        }
    }

    fn block(&mut self, block: &Block) {
        match block {
            Block::Line(text) => {
                self.ensure_space(8.0);
                self.cell(text, 12.0, Face::Bold, 8.0, Align::Left);
            }
            Block::Section { text, fill } => {
                self.ensure_space(10.0);
                self.layer.set_fill_color(rgb(*fill));
                self.layer.add_rect(Rect::new(
                    Mm(MARGIN),
                    Mm(PAGE_HEIGHT - self.y - 10.0),
                    Mm(PAGE_WIDTH - MARGIN),
                    Mm(PAGE_HEIGHT - self.y),
                ));
                self.cell(text, 14.0, Face::Bold, 10.0, Align::Left);
            }
            Block::Label(text) => {
                self.ensure_space(6.0 + BODY_LINE);
                self.cell(text, 11.0, Face::Bold, 6.0, Align::Left);
            }
            Block::Paragraph(text) => {
                for line in wrap_text(text, chars_per_line(BODY_SIZE, Face::Regular)) {
                    self.ensure_space(BODY_LINE);
                    self.cell(&line, BODY_SIZE, Face::Regular, BODY_LINE, Align::Left);
                }
            }
            Block::Gap(mm) => {
                self.y += mm;
            }
            Block::Divider => {
                self.ensure_space(1.0);
                let y = Mm(PAGE_HEIGHT - self.y);
                self.layer.set_outline_color(rgb((200, 200, 200)));
                self.layer.set_outline_thickness(0.5);
                self.layer.add_line(Line {
                    points: vec![
                        (Point::new(Mm(MARGIN), y), false),
                        (Point::new(Mm(PAGE_WIDTH - MARGIN), y), false),
                    ],
                    is_closed: false,
                });
            }
        }
    }

    fn finish(mut self) -> Result<Vec<u8>> {
        self.page_footer();
        self.doc
            .save_to_bytes()
            .map_err(|e| Error::Render(e.to_string()))
    }
}
