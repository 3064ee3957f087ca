use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::models::Invoice;

// Layout coordinates are millimetres measured from the top-left corner of
// an A4 page; text is placed on its baseline.
pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
const MM_TO_PT: f32 = 72.0 / 25.4;

pub const TOP_MARGIN: f32 = 20.0;
/// A line whose baseline would fall below this starts a new page.
pub const BOTTOM_LIMIT: f32 = 277.0;

pub const LEFT_X: f32 = 20.0;
pub const QTY_X: f32 = 120.0;
pub const RATE_X: f32 = 140.0;
pub const AMOUNT_X: f32 = 170.0;
pub const AMOUNT_RIGHT_X: f32 = 190.0;

const DETAILS_Y: [f32; 3] = [40.0, 45.0, 50.0];
const BILL_TO_Y: f32 = 70.0;
const CLIENT_NAME_Y: f32 = 75.0;
const CLIENT_EMAIL_Y: f32 = 80.0;
const CLIENT_ADDRESS_Y: f32 = 85.0;
pub const TABLE_TOP: f32 = 110.0;

pub const ROW_HEIGHT: f32 = 10.0;
pub const TEXT_LINE_HEIGHT: f32 = 5.0;
const SECTION_GAP: f32 = 20.0;

const TITLE_SIZE: f32 = 20.0;
const HEADING_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 10.0;
const TOTAL_SIZE: f32 = 12.0;

const REGULAR_FONT: &str = "F1";
const BOLD_FONT: &str = "F2";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write invoice file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to build PDF document: {0}")]
    Pdf(#[from] lopdf::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
}

/// A run of text placed at an absolute position on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub style: FontStyle,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub spans: Vec<TextSpan>,
}

/// Result of laying out an invoice: the pages plus the vertical position of
/// the last line written.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceLayout {
    pub pages: Vec<PageLayout>,
    pub cursor: f32,
}

/// Service for exporting invoices as PDF files
pub struct InvoiceGenerator {
    output_dir: PathBuf,
}

impl InvoiceGenerator {
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self, ExportError> {
        // Create the output directory if it doesn't exist
        let path = output_dir.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }

        Ok(Self {
            output_dir: path.to_path_buf(),
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn file_name(invoice: &Invoice) -> String {
        format!("invoice-{}.pdf", invoice.id)
    }

    /// Render the invoice and write it to `<output_dir>/invoice-<id>.pdf`.
    ///
    /// A file left behind by a failed write is removed before the error is
    /// returned.
    pub fn export_invoice(&self, invoice: &Invoice) -> Result<PathBuf, ExportError> {
        let path = self.output_dir.join(Self::file_name(invoice));

        let layout = layout_invoice(invoice);
        debug!(pages = layout.pages.len(), last_line_mm = layout.cursor, "invoice laid out");
        let mut doc = render_pdf(&layout, &format!("Invoice {}", invoice.id))?;

        let written = File::create(&path)
            .map_err(ExportError::from)
            .and_then(|file| {
                let mut writer = BufWriter::new(file);
                doc.save_to(&mut writer)?;
                writer.flush()?;
                Ok(())
            });

        if let Err(err) = written {
            error!(path = %path.display(), %err, "invoice export failed");
            let _ = fs::remove_file(&path);
            return Err(err);
        }

        info!(
            invoice_id = %invoice.id,
            path = %path.display(),
            pages = layout.pages.len(),
            items = invoice.items.len(),
            "invoice exported"
        );
        Ok(path)
    }
}

/// Currency as shown on the document: `$` and exactly two decimals.
pub fn format_currency(value: f64) -> String {
    // Adding zero folds -0.0 into 0.0 so empty totals don't print "$-0.00".
    format!("${:.2}", value + 0.0)
}

/// Lay the invoice out top to bottom on as many pages as it needs.
pub fn layout_invoice(invoice: &Invoice) -> InvoiceLayout {
    let mut w = LayoutWriter::new();

    // Header
    w.centered("INVOICE", PAGE_WIDTH_MM / 2.0, TITLE_SIZE);

    let details = [
        format!("Invoice #: {}", invoice.id),
        format!("Date: {}", invoice.date.format("%Y-%m-%d")),
        format!("Due Date: {}", invoice.due_date.format("%Y-%m-%d")),
    ];
    for (text, y) in details.into_iter().zip(DETAILS_Y) {
        w.move_to(y);
        w.text(text, LEFT_X, BODY_SIZE, FontStyle::Regular);
    }

    // Client block
    w.move_to(BILL_TO_Y);
    w.text("Bill To:", LEFT_X, HEADING_SIZE, FontStyle::Bold);
    w.move_to(CLIENT_NAME_Y);
    w.text(&invoice.client.name, LEFT_X, BODY_SIZE, FontStyle::Regular);
    w.move_to(CLIENT_EMAIL_Y);
    w.text(&invoice.client.email, LEFT_X, BODY_SIZE, FontStyle::Regular);

    w.move_to(CLIENT_ADDRESS_Y);
    for line in invoice.client.address_lines() {
        w.break_page_if_full();
        w.text(line, LEFT_X, BODY_SIZE, FontStyle::Regular);
        w.advance(TEXT_LINE_HEIGHT);
    }

    // Items table, pushed down only when a long address would reach it
    let table_top = if w.pages.is_empty() {
        TABLE_TOP.max(w.cursor + ROW_HEIGHT)
    } else {
        w.cursor + ROW_HEIGHT
    };
    w.move_to(table_top);
    w.break_page_if_full();
    table_header(&mut w);
    w.advance(ROW_HEIGHT);

    let description_width = QTY_X - LEFT_X - 2.0;
    for item in &invoice.items {
        if w.break_page_if_full() {
            table_header(&mut w);
            w.advance(ROW_HEIGHT);
        }
        let description = fit_to_width(&item.description, description_width, BODY_SIZE);
        w.text(description, LEFT_X, BODY_SIZE, FontStyle::Regular);
        w.text(item.quantity.to_string(), QTY_X, BODY_SIZE, FontStyle::Regular);
        w.text(format_currency(item.rate), RATE_X, BODY_SIZE, FontStyle::Regular);
        w.text(format_currency(item.amount()), AMOUNT_X, BODY_SIZE, FontStyle::Regular);
        w.advance(ROW_HEIGHT);
    }

    // Totals
    let totals = invoice.totals();
    w.advance(ROW_HEIGHT);
    w.break_page_if_full();
    w.right_aligned(format!("Subtotal: {}", format_currency(totals.subtotal)), AMOUNT_RIGHT_X, BODY_SIZE);
    w.advance(ROW_HEIGHT);
    w.break_page_if_full();
    w.right_aligned(
        format!("Tax ({}%): {}", invoice.tax, format_currency(totals.tax_amount)),
        AMOUNT_RIGHT_X,
        BODY_SIZE,
    );
    w.advance(ROW_HEIGHT);
    w.break_page_if_full();
    w.right_aligned(format!("Total: {}", format_currency(totals.total)), AMOUNT_RIGHT_X, TOTAL_SIZE);

    // Notes & terms, each only when present
    if let Some(notes) = &invoice.notes {
        text_section(&mut w, "Notes:", notes);
    }
    if let Some(terms) = &invoice.terms {
        text_section(&mut w, "Terms & Conditions:", terms);
    }

    w.finish()
}

fn table_header(w: &mut LayoutWriter) {
    for (label, x) in [("Description", LEFT_X), ("Qty", QTY_X), ("Rate", RATE_X), ("Amount", AMOUNT_X)] {
        w.text(label, x, BODY_SIZE, FontStyle::Bold);
    }
}

fn text_section(w: &mut LayoutWriter, heading: &str, body: &str) {
    w.advance(SECTION_GAP);
    w.break_page_if_full();
    w.text(heading, LEFT_X, BODY_SIZE, FontStyle::Bold);
    for line in body.lines() {
        w.advance(TEXT_LINE_HEIGHT);
        w.break_page_if_full();
        w.text(line, LEFT_X, BODY_SIZE, FontStyle::Regular);
    }
}

struct LayoutWriter {
    pages: Vec<PageLayout>,
    current: PageLayout,
    cursor: f32,
}

impl LayoutWriter {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: PageLayout::default(),
            cursor: TOP_MARGIN,
        }
    }

    fn move_to(&mut self, y: f32) {
        self.cursor = y;
    }

    fn advance(&mut self, dy: f32) {
        self.cursor += dy;
    }

    /// Start a new page when the cursor has run past the bottom limit.
    fn break_page_if_full(&mut self) -> bool {
        if self.cursor <= BOTTOM_LIMIT {
            return false;
        }
        self.pages.push(std::mem::take(&mut self.current));
        self.cursor = TOP_MARGIN;
        true
    }

    fn text(&mut self, text: impl Into<String>, x: f32, size: f32, style: FontStyle) {
        self.current.spans.push(TextSpan {
            text: text.into(),
            x,
            y: self.cursor,
            size,
            style,
        });
    }

    fn centered(&mut self, text: &str, center_x: f32, size: f32) {
        let x = center_x - text_width(text, size) / 2.0;
        self.text(text, x, size, FontStyle::Regular);
    }

    fn right_aligned(&mut self, text: String, right_x: f32, size: f32) {
        let x = right_x - text_width(&text, size);
        self.text(text, x, size, FontStyle::Regular);
    }

    fn finish(mut self) -> InvoiceLayout {
        self.pages.push(self.current);
        InvoiceLayout {
            pages: self.pages,
            cursor: self.cursor,
        }
    }
}

// Glyph advance widths of the standard Helvetica font for ' '..='~', in
// thousandths of an em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];
const DEFAULT_WIDTH: u16 = 556;

fn char_width(c: char) -> u16 {
    match c {
        ' '..='~' => HELVETICA_WIDTHS[c as usize - ' ' as usize],
        _ => DEFAULT_WIDTH,
    }
}

/// Width of `text` set in Helvetica at `size` points, in millimetres.
pub fn text_width(text: &str, size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(char_width(c))).sum();
    units as f32 / 1000.0 * size / MM_TO_PT
}

/// Truncate `text` with an ellipsis so it fits in `max_width` millimetres.
fn fit_to_width(text: &str, max_width: f32, size: f32) -> String {
    if text_width(text, size) <= max_width {
        return text.to_string();
    }

    let budget = max_width - text_width("...", size);
    let mut fitted = String::new();
    let mut used = 0.0;
    for c in text.chars() {
        let w = f32::from(char_width(c)) / 1000.0 * size / MM_TO_PT;
        if used + w > budget {
            break;
        }
        used += w;
        fitted.push(c);
    }
    fitted.push_str("...");
    fitted
}

/// Standard Type1 fonts use WinAnsi; anything outside Latin-1 is replaced.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match u8::try_from(u32::from(c)) {
            Ok(byte) if !(0x80..0xA0).contains(&byte) => byte,
            _ => b'?',
        })
        .collect()
}

fn text_operations(span: &TextSpan) -> Vec<Operation> {
    let font = match span.style {
        FontStyle::Regular => REGULAR_FONT,
        FontStyle::Bold => BOLD_FONT,
    };
    let x = span.x * MM_TO_PT;
    let y = (PAGE_HEIGHT_MM - span.y) * MM_TO_PT;

    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![font.into(), span.size.into()]),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new("Tj", vec![Object::string_literal(encode_win_ansi(&span.text))]),
        Operation::new("ET", vec![]),
    ]
}

/// Build a PDF document with one page per layout page.
pub fn render_pdf(layout: &InvoiceLayout, title: &str) -> Result<Document, ExportError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            REGULAR_FONT => regular_id,
            BOLD_FONT => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(layout.pages.len());
    for page in &layout.pages {
        let operations: Vec<Operation> = page.spans.iter().flat_map(text_operations).collect();
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count,
        "Resources" => resources_id,
        "MediaBox" => vec![
            0.into(),
            0.into(),
            (PAGE_WIDTH_MM * MM_TO_PT).into(),
            (PAGE_HEIGHT_MM * MM_TO_PT).into(),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(encode_win_ansi(title)),
        "Creator" => Object::string_literal("invoice_form"),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    Ok(doc)
}
