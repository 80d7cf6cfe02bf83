//! Invoice Records

use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use jiff::Timestamp;

use crate::{
    domain::orders::records::{OrderStatus, OrderUuid, UnknownVariant},
    uuids::TypedUuid,
};

/// Whether an invoice has been settled. Tracked apart from the order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentStatus {
    Paid,
    Unpaid,
}

impl PaymentStatus {
    #[must_use]
    pub const fn for_order(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Paid => Self::Paid,
            _ => Self::Unpaid,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Unpaid => "unpaid",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Paid => "Paid",
            Self::Unpaid => "Unpaid",
        }
    }
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "paid" => Ok(Self::Paid),
            "unpaid" => Ok(Self::Unpaid),
            other => Err(UnknownVariant {
                kind: "payment status",
                value: other.to_string(),
            }),
        }
    }
}

/// Invoice UUID
pub type InvoiceUuid = TypedUuid<InvoiceRecord>;

/// Invoice Record, without the rendered document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceRecord {
    pub uuid: InvoiceUuid,
    pub order_uuid: OrderUuid,
    pub invoice_number: String,
    pub issued_at: Timestamp,
    pub total_price: u64,
    pub payment_status: PaymentStatus,
    pub pdf_file_name: String,
}

/// A rendered invoice ready for download.
#[derive(Clone, PartialEq, Eq)]
pub struct InvoicePdf {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for InvoicePdf {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvoicePdf")
            .field("file_name", &self.file_name)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}
