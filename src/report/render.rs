//! Draws a [`Document`] onto A4 pages.
//!
//! Layout follows a simple cursor model: cells are placed left to right from
//! the current position, `ln` moves the cursor to the start of the next line,
//! and a cell that would cross the bottom margin starts a new page first.

use printpdf::path::PaintMode;
use printpdf::{Color, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference, Rect, Rgb};

use super::document::{cell_width, Document, Page, StatisticsPage, TablePage, TitlePage};
use super::fonts::{FontSet, LoadedFace, LoadedFonts};
use super::RenderError;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 10.0;
const BOTTOM_MARGIN: f32 = 15.0;
const CELL_PADDING: f32 = 1.0;
const BORDER_WIDTH: f32 = 0.2;
const PT_TO_MM: f32 = 25.4 / 72.0;
const MM_TO_PT: f32 = 72.0 / 25.4;
const LAYER: &str = "Layer 1";

const ACCENT: [u8; 3] = [41, 128, 185];
const HEADER_FILL: [u8; 3] = [52, 152, 219];

#[derive(Clone, Copy)]
enum Face {
    Regular,
    Bold,
    Italic,
}

#[derive(Clone, Copy)]
struct TextStyle {
    face: Face,
    size: f32,
    color: [u8; 3],
}

const TITLE: TextStyle = TextStyle {
    face: Face::Bold,
    size: 24.0,
    color: ACCENT,
};
const SUBTITLE: TextStyle = TextStyle {
    face: Face::Italic,
    size: 16.0,
    color: HEADER_FILL,
};
const TIMESTAMP: TextStyle = TextStyle {
    face: Face::Regular,
    size: 12.0,
    color: [100, 100, 100],
};
const SECTION: TextStyle = TextStyle {
    face: Face::Bold,
    size: 18.0,
    color: [44, 62, 80],
};
const TABLE_SECTION: TextStyle = TextStyle {
    size: 16.0,
    ..SECTION
};
const SUMMARY: TextStyle = TextStyle {
    face: Face::Bold,
    size: 12.0,
    color: [52, 73, 94],
};
const SUBSECTION: TextStyle = TextStyle {
    size: 14.0,
    ..SUMMARY
};
const COLUMN_NAME: TextStyle = TextStyle {
    face: Face::Bold,
    size: 11.0,
    color: ACCENT,
};
const STAT_LINE: TextStyle = TextStyle {
    face: Face::Regular,
    size: 10.0,
    color: [0, 0, 0],
};
const TABLE_HEADER: TextStyle = TextStyle {
    face: Face::Bold,
    size: 10.0,
    color: [255, 255, 255],
};
const TABLE_BODY: TextStyle = TextStyle {
    face: Face::Regular,
    size: 8.0,
    color: [0, 0, 0],
};

#[derive(Clone, Copy, PartialEq)]
enum Align {
    Left,
    Center,
}

#[derive(Clone, Copy, Default)]
struct Frame {
    fill: Option<[u8; 3]>,
    border: bool,
}

/// Renders `document` into PDF bytes.
///
/// # Errors
///
/// Returns an error if a font cannot be loaded or the PDF cannot be
/// serialized.
pub fn render(document: &Document, fonts: &FontSet) -> Result<Vec<u8>, RenderError> {
    let mut canvas = Canvas::new(fonts)?;
    draw(&mut canvas, document);
    log::debug!("rendered {} physical pages", canvas.pages);
    canvas.finish()
}

fn draw(canvas: &mut Canvas, document: &Document) {
    for page in document.pages() {
        match page {
            Page::Title(title) => title_page(canvas, title),
            Page::Statistics(stats) => statistics_page(canvas, stats),
            Page::Table(table) => table_page(canvas, table),
        }
    }
}

fn title_page(canvas: &mut Canvas, page: &TitlePage) {
    canvas.add_page();
    canvas.line(60.0, &page.title, TITLE, Align::Center);
    canvas.line(20.0, &page.subtitle, SUBTITLE, Align::Center);
    canvas.line(
        20.0,
        &format!("Generated: {}", page.generated_at),
        TIMESTAMP,
        Align::Center,
    );
    canvas.ln(40.0);
    canvas.cell(
        0.0,
        2.0,
        "",
        STAT_LINE,
        Align::Left,
        Frame {
            fill: Some(ACCENT),
            border: false,
        },
    );
    canvas.ln(2.0);
}

fn statistics_page(canvas: &mut Canvas, page: &StatisticsPage) {
    canvas.add_page();
    canvas.line(15.0, "Data statistics", SECTION, Align::Left);
    canvas.ln(5.0);
    canvas.line(
        10.0,
        &format!("Total records: {}", page.row_count),
        SUMMARY,
        Align::Left,
    );
    canvas.line(
        10.0,
        &format!("Number of columns: {}", page.column_count),
        SUMMARY,
        Align::Left,
    );
    canvas.ln(10.0);

    if !page.numeric.is_empty() {
        canvas.line(10.0, "Numeric column statistics:", SUBSECTION, Align::Left);
        canvas.ln(5.0);
        for summary in &page.numeric {
            column_summary(canvas, &summary.name, &summary.description.to_string());
        }
    }
    if !page.text.is_empty() {
        canvas.line(10.0, "Text columns:", SUBSECTION, Align::Left);
        canvas.ln(5.0);
        for summary in &page.text {
            column_summary(canvas, &summary.name, &summary.distinct.to_string());
        }
    }
}

fn column_summary(canvas: &mut Canvas, name: &str, detail: &str) {
    canvas.line(8.0, &format!("Column: {name}"), COLUMN_NAME, Align::Left);
    canvas.line(6.0, detail, STAT_LINE, Align::Left);
    canvas.ln(2.0);
}

fn table_page(canvas: &mut Canvas, page: &TablePage) {
    canvas.add_page();
    canvas.line(15.0, &page.heading(), TABLE_SECTION, Align::Left);
    canvas.ln(5.0);

    let header_frame = Frame {
        fill: Some(HEADER_FILL),
        border: true,
    };
    row(canvas, &page.header, 10.0, TABLE_HEADER, header_frame);
    for r in &page.rows {
        let frame = Frame {
            fill: Some(r.fill().rgb()),
            border: true,
        };
        row(canvas, &r.cells, 8.0, TABLE_BODY, frame);
    }
}

/// Draws one grid row. The width is derived from this row's own cell count.
fn row(canvas: &mut Canvas, cells: &[String], height: f32, style: TextStyle, frame: Frame) {
    let width = cell_width(cells.len());
    for text in cells {
        canvas.cell(width, height, text, style, Align::Center, frame);
    }
    canvas.ln(height);
}

struct Canvas {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    fonts: LoadedFonts,
    /// The page created with the document has not been handed out yet.
    fresh: bool,
    pages: usize,
    x: f32,
    y: f32,
}

impl Canvas {
    fn new(fonts: &FontSet) -> Result<Self, RenderError> {
        let (doc, page, layer) =
            PdfDocument::new("Report", Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER);
        let fonts = fonts.load(&doc)?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            layer,
            fonts,
            fresh: true,
            pages: 1,
            x: MARGIN,
            y: MARGIN,
        })
    }

    fn add_page(&mut self) {
        if self.fresh {
            self.fresh = false;
        } else {
            let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER);
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.pages += 1;
        }
        self.x = MARGIN;
        self.y = MARGIN;
    }

    /// Places a cell at the cursor and advances the cursor past it. A width
    /// of zero extends the cell to the right margin.
    fn cell(
        &mut self,
        width: f32,
        height: f32,
        text: &str,
        style: TextStyle,
        align: Align,
        frame: Frame,
    ) {
        if self.y + height > PAGE_HEIGHT - BOTTOM_MARGIN {
            let x = self.x;
            self.add_page();
            self.x = x;
        }
        let width = if width > 0.0 {
            width
        } else {
            PAGE_WIDTH - MARGIN - self.x
        };

        let mode = match (frame.fill, frame.border) {
            (Some(_), true) => Some(PaintMode::FillStroke),
            (Some(_), false) => Some(PaintMode::Fill),
            (None, true) => Some(PaintMode::Stroke),
            (None, false) => None,
        };
        if let Some(mode) = mode {
            if let Some(fill) = frame.fill {
                self.layer.set_fill_color(color(fill));
            }
            self.layer.set_outline_color(color([0, 0, 0]));
            self.layer.set_outline_thickness(BORDER_WIDTH * MM_TO_PT);
            let top = PAGE_HEIGHT - self.y;
            let rect = Rect::new(Mm(self.x), Mm(top - height), Mm(self.x + width), Mm(top))
                .with_mode(mode);
            self.layer.add_rect(rect);
        }

        if !text.is_empty() {
            let font_mm = style.size * PT_TO_MM;
            let face = self.face(style.face);
            let offset = match align {
                Align::Left => CELL_PADDING,
                Align::Center => (width - face.text_width(text) * font_mm) / 2.0,
            };
            let baseline = self.y + 0.5 * height + 0.3 * font_mm;
            self.layer.set_fill_color(color(style.color));
            self.layer.use_text(
                text,
                style.size,
                Mm(self.x + offset),
                Mm(PAGE_HEIGHT - baseline),
                &face.font,
            );
        }
        self.x += width;
    }

    /// A full-width cell followed by a line break.
    fn line(&mut self, height: f32, text: &str, style: TextStyle, align: Align) {
        self.cell(0.0, height, text, style, align, Frame::default());
        self.ln(height);
    }

    fn ln(&mut self, height: f32) {
        self.x = MARGIN;
        self.y += height;
    }

    fn face(&self, face: Face) -> &LoadedFace {
        match face {
            Face::Regular => &self.fonts.regular,
            Face::Bold => &self.fonts.bold,
            Face::Italic => &self.fonts.italic,
        }
    }

    fn finish(self) -> Result<Vec<u8>, RenderError> {
        let Self { doc, layer, .. } = self;
        drop(layer);
        doc.save_to_bytes()
            .map_err(|e| RenderError::Pdf(format!("{e:?}")))
    }
}

fn color([r, g, b]: [u8; 3]) -> Color {
    Color::Rgb(Rgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv::read_table;
    use crate::report::ReportBuilder;
    use chrono::NaiveDate;

    fn sample_document(rows: usize) -> Document {
        let mut text = String::from("city,value\n");
        for i in 0..rows {
            text.push_str(&format!("Paris-{i},{i}\n"));
        }
        let table = read_table(&text).unwrap();
        let generated_at = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 0)
            .unwrap();
        ReportBuilder::new()
            .title_page("Analytical report", "Based on file: data.csv", &generated_at)
            .statistics_page(&table)
            .unwrap()
            .table_pages(&table)
            .unwrap()
            .finish()
    }

    #[test]
    fn renders_pdf_bytes() {
        let bytes = render(&sample_document(30), &FontSet::builtin()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        // built-in faces are not embedded
        assert!(bytes.len() < 200_000);
    }

    #[test]
    fn renders_with_truetype_fonts() {
        let fonts = FontSet::discover(None);
        if !fonts.is_unicode() {
            return;
        }
        let bytes = render(&sample_document(3), &fonts).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn one_physical_page_per_logical_page() {
        let document = sample_document(30);
        let mut canvas = Canvas::new(&FontSet::builtin()).unwrap();
        draw(&mut canvas, &document);
        assert_eq!(canvas.pages, document.pages().len());
    }

    #[test]
    fn cells_break_at_bottom_margin() {
        let mut canvas = Canvas::new(&FontSet::builtin()).unwrap();
        canvas.add_page();
        for _ in 0..30 {
            canvas.line(10.0, "line", STAT_LINE, Align::Left);
        }
        // 27 lines fit between the top margin and the 15 mm bottom margin
        assert_eq!(canvas.pages, 2);
        assert!((canvas.y - (MARGIN + 3.0 * 10.0)).abs() < 1e-3);
    }

    #[test]
    fn zero_width_cell_spans_content() {
        let mut canvas = Canvas::new(&FontSet::builtin()).unwrap();
        canvas.add_page();
        canvas.cell(0.0, 5.0, "", STAT_LINE, Align::Left, Frame::default());
        assert!((canvas.x - (PAGE_WIDTH - MARGIN)).abs() < 1e-3);
    }
}
