//! Invoice PDF rendering
//!
//! US Letter pages in the built-in Helvetica faces, so no font files are embedded. Long orders
//! continue on further pages with the column header repeated; the totals block is never split.

use lopdf::{
    Document, Object, ObjectId, Stream,
    content::{Content, Operation},
    dictionary,
};
use thiserror::Error;

use crate::money::format_taka;

const PAGE_WIDTH: i64 = 612;
const PAGE_HEIGHT: i64 = 792;
const MARGIN: i64 = 50;
const LINE_HEIGHT: i64 = 16;
const MAX_DESCRIPTION_CHARS: usize = 48;

const QUANTITY_X: i64 = 340;
const UNIT_PRICE_X: i64 = 400;
const LINE_TOTAL_X: i64 = 490;

#[derive(Debug, Error)]
pub enum InvoicePdfError {
    #[error("failed to encode page content")]
    Content(#[from] lopdf::Error),

    #[error("failed to write document")]
    Write(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceLine {
    pub description: String,
    pub quantity: u64,
    pub unit_price: u64,
    pub line_total: u64,
}

/// Everything printed on an invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceDocument {
    pub invoice_number: String,
    pub order_number: String,
    pub issued_on: String,
    pub customer_name: String,
    pub shipping_address: Vec<String>,
    pub payment_method: String,
    pub lines: Vec<InvoiceLine>,
    pub subtotal: u64,
    pub discount: u64,
    pub shipping_charge: u64,
    pub packaging_charge: u64,
    pub total: u64,
    pub payment_status: String,
}

#[derive(Clone, Copy)]
enum Face {
    Regular,
    Bold,
}

impl Face {
    const fn resource(self) -> &'static str {
        match self {
            Self::Regular => "F1",
            Self::Bold => "F2",
        }
    }
}

/// Accumulates drawing operations top to bottom, starting a new page when the cursor would
/// cross the bottom margin.
struct PageWriter {
    pages: Vec<Vec<Operation>>,
    operations: Vec<Operation>,
    cursor: i64,
}

impl PageWriter {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            operations: Vec::new(),
            cursor: PAGE_HEIGHT - MARGIN,
        }
    }

    /// Whether `lines` more lines fit above the bottom margin.
    fn has_room(&self, lines: i64) -> bool {
        self.cursor - LINE_HEIGHT * (lines - 1) >= MARGIN
    }

    /// Moves to a fresh page unless `lines` more lines fit on this one. Returns whether a page
    /// was started.
    fn reserve(&mut self, lines: i64) -> bool {
        if self.has_room(lines) {
            return false;
        }

        self.pages.push(std::mem::take(&mut self.operations));
        self.cursor = PAGE_HEIGHT - MARGIN;

        true
    }

    fn text_at(&mut self, x: i64, face: Face, size: i64, text: &str) {
        self.operations.extend([
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![Object::Name(face.resource().into()), Object::Integer(size)],
            ),
            Operation::new("Td", vec![Object::Integer(x), Object::Integer(self.cursor)]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ]);
    }

    fn line(&mut self, face: Face, size: i64, text: &str) {
        self.reserve(1);
        self.text_at(MARGIN, face, size, text);
        self.advance(1);
    }

    fn advance(&mut self, lines: i64) {
        self.cursor -= LINE_HEIGHT * lines;
    }

    fn rule(&mut self) {
        let y = self.cursor + LINE_HEIGHT / 2;

        self.operations.extend([
            Operation::new("m", vec![Object::Integer(MARGIN), Object::Integer(y)]),
            Operation::new(
                "l",
                vec![Object::Integer(PAGE_WIDTH - MARGIN), Object::Integer(y)],
            ),
            Operation::new("S", vec![]),
        ]);

        self.advance(1);
    }

    fn row(&mut self, face: Face, cells: [&str; 4]) {
        let [description, quantity, unit_price, line_total] = cells;

        self.text_at(MARGIN, face, 10, description);
        self.text_at(QUANTITY_X, face, 10, quantity);
        self.text_at(UNIT_PRICE_X, face, 10, unit_price);
        self.text_at(LINE_TOTAL_X, face, 10, line_total);
        self.advance(1);
    }

    fn header_row(&mut self) {
        self.row(Face::Bold, ["Item", "Qty", "Unit Price", "Total"]);
        self.rule();
    }

    fn amount(&mut self, face: Face, label: &str, amount: &str) {
        self.text_at(UNIT_PRICE_X, face, 10, label);
        self.text_at(LINE_TOTAL_X, face, 10, amount);
        self.advance(1);
    }

    fn into_contents(mut self) -> Vec<Content> {
        self.pages.push(self.operations);

        self.pages
            .into_iter()
            .map(|operations| Content { operations })
            .collect()
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_DESCRIPTION_CHARS {
        return text.to_string();
    }

    let mut truncated: String = text.chars().take(MAX_DESCRIPTION_CHARS - 3).collect();
    truncated.push_str("...");
    truncated
}

fn layout(invoice: &InvoiceDocument) -> Vec<Content> {
    let mut page = PageWriter::new();

    page.line(Face::Bold, 20, "Invoice");
    page.advance(1);

    page.line(
        Face::Regular,
        11,
        &format!("Invoice Number: {}", invoice.invoice_number),
    );
    page.line(
        Face::Regular,
        11,
        &format!("Order Number: {}", invoice.order_number),
    );
    page.line(Face::Regular, 11, &format!("Date: {}", invoice.issued_on));
    page.advance(1);

    page.line(Face::Bold, 12, "Bill To");
    page.line(Face::Regular, 11, &invoice.customer_name);

    for address_line in &invoice.shipping_address {
        page.line(Face::Regular, 11, address_line);
    }

    page.line(
        Face::Regular,
        11,
        &format!("Payment Method: {}", invoice.payment_method),
    );
    page.advance(1);

    page.reserve(3);
    page.header_row();

    for line in &invoice.lines {
        if page.reserve(1) {
            page.header_row();
        }

        page.row(
            Face::Regular,
            [
                &truncate(&line.description),
                &line.quantity.to_string(),
                &format_taka(line.unit_price),
                &format_taka(line.line_total),
            ],
        );
    }

    // Rule, subtotal, shipping, packaging, total, a gap and the status line stay together.
    let footer_lines = if invoice.discount > 0 { 8 } else { 7 };
    page.reserve(footer_lines);

    page.rule();
    page.amount(Face::Regular, "Subtotal", &format_taka(invoice.subtotal));

    if invoice.discount > 0 {
        page.amount(
            Face::Regular,
            "Discount",
            &format!("-{}", format_taka(invoice.discount)),
        );
    }

    page.amount(
        Face::Regular,
        "Shipping",
        &format_taka(invoice.shipping_charge),
    );
    page.amount(
        Face::Regular,
        "Packaging",
        &format_taka(invoice.packaging_charge),
    );
    page.amount(Face::Bold, "Total", &format_taka(invoice.total));
    page.advance(1);

    page.line(
        Face::Bold,
        12,
        &format!("Payment Status: {}", invoice.payment_status),
    );

    page.into_contents()
}

fn font(document: &mut Document, base_font: &str) -> ObjectId {
    document.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
    })
}

/// Render `invoice` as a PDF, one page unless the line items run past the first.
///
/// # Errors
///
/// Returns [`InvoicePdfError`] if the page content cannot be encoded or the document cannot be
/// serialized.
pub fn render(invoice: &InvoiceDocument) -> Result<Vec<u8>, InvoicePdfError> {
    let mut document = Document::with_version("1.5");

    let pages_id = document.new_object_id();
    let regular_id = font(&mut document, "Helvetica");
    let bold_id = font(&mut document, "Helvetica-Bold");

    let resources_id = document.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
    });

    let mut kids = Vec::new();

    for content in layout(invoice) {
        let content_id = document.add_object(Stream::new(dictionary! {}, content.encode()?));

        let page_id = document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });

        kids.push(Object::Reference(page_id));
    }

    let count = i64::try_from(kids.len()).unwrap_or(i64::MAX);

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => Object::Integer(count),
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    };

    document.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = document.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });

    document.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    document.save_to(&mut bytes)?;

    Ok(bytes)
}
