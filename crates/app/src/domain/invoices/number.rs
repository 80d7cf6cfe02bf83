//! Invoice numbers and file names

use jiff::Timestamp;

/// `INV{order_number}-{yyyymmddHHMMSS}`, with the issue time in UTC.
#[must_use]
pub fn invoice_number(order_number: &str, issued_at: Timestamp) -> String {
    format!("INV{order_number}-{}", issued_at.strftime("%Y%m%d%H%M%S"))
}

#[must_use]
pub fn pdf_file_name(invoice_number: &str) -> String {
    format!("invoice_{invoice_number}.pdf")
}
