//! Invoices Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    accounts::records::CustomerUuid,
    database::{amount_to_i64, try_get_amount},
    domain::{
        invoices::records::{InvoicePdf, InvoiceRecord, InvoiceUuid, PaymentStatus},
        orders::records::OrderUuid,
    },
};

const CREATE_INVOICE_SQL: &str = include_str!("sql/create_invoice.sql");
const GET_CUSTOMER_INVOICE_SQL: &str = include_str!("sql/get_customer_invoice.sql");
const GET_CUSTOMER_INVOICE_PDF_SQL: &str = include_str!("sql/get_customer_invoice_pdf.sql");
const GET_INVOICE_HEADER_SQL: &str = include_str!("sql/get_invoice_header.sql");

/// Invoice fields stored alongside the rendered document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NewInvoice {
    pub(crate) uuid: InvoiceUuid,
    pub(crate) order_uuid: OrderUuid,
    pub(crate) invoice_number: String,
    pub(crate) issued_at: Timestamp,
    pub(crate) total_price: u64,
    pub(crate) payment_status: PaymentStatus,
    pub(crate) pdf: InvoicePdf,
}

/// Customer and shipping details printed on an invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InvoiceHeader {
    pub(crate) customer_name: String,
    pub(crate) address_line: Option<String>,
    pub(crate) postal_code: Option<String>,
    pub(crate) area_name: Option<String>,
    pub(crate) city_name: Option<String>,
    pub(crate) division_name: Option<String>,
}

impl InvoiceHeader {
    /// Street line, then `Area, City, Division Postal` with missing parts skipped.
    pub(crate) fn address_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();

        if let Some(address_line) = &self.address_line {
            lines.push(address_line.clone());
        }

        let locality = [&self.area_name, &self.city_name, &self.division_name]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");

        let locality = match &self.postal_code {
            Some(postal_code) if !locality.is_empty() => format!("{locality} {postal_code}"),
            Some(postal_code) => postal_code.clone(),
            None => locality,
        };

        if !locality.is_empty() {
            lines.push(locality);
        }

        lines
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgInvoicesRepository;

impl PgInvoicesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_invoice(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        invoice: &NewInvoice,
    ) -> Result<InvoiceRecord, sqlx::Error> {
        query_as::<Postgres, InvoiceRecord>(CREATE_INVOICE_SQL)
            .bind(invoice.uuid.into_uuid())
            .bind(invoice.order_uuid.into_uuid())
            .bind(&invoice.invoice_number)
            .bind(SqlxTimestamp::from(invoice.issued_at))
            .bind(amount_to_i64(invoice.total_price, "total_price")?)
            .bind(invoice.payment_status.as_str())
            .bind(&invoice.pdf.file_name)
            .bind(&invoice.pdf.bytes)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_customer_invoice(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
        order: OrderUuid,
    ) -> Result<InvoiceRecord, sqlx::Error> {
        query_as::<Postgres, InvoiceRecord>(GET_CUSTOMER_INVOICE_SQL)
            .bind(order.into_uuid())
            .bind(customer.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_customer_invoice_pdf(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
        order: OrderUuid,
    ) -> Result<InvoicePdf, sqlx::Error> {
        let row = sqlx::query(GET_CUSTOMER_INVOICE_PDF_SQL)
            .bind(order.into_uuid())
            .bind(customer.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        Ok(InvoicePdf {
            file_name: row.try_get("pdf_file_name")?,
            bytes: row.try_get("pdf")?,
        })
    }

    pub(crate) async fn get_invoice_header(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<InvoiceHeader, sqlx::Error> {
        let row = sqlx::query(GET_INVOICE_HEADER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        Ok(InvoiceHeader {
            customer_name: row.try_get("customer_name")?,
            address_line: row.try_get("address_line")?,
            postal_code: row.try_get("postal_code")?,
            area_name: row.try_get("area_name")?,
            city_name: row.try_get("city_name")?,
            division_name: row.try_get("division_name")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for InvoiceRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let payment_status = row
            .try_get::<&str, _>("payment_status")?
            .parse::<PaymentStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "payment_status".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: InvoiceUuid::from_uuid(row.try_get("uuid")?),
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            invoice_number: row.try_get("invoice_number")?,
            issued_at: row.try_get::<SqlxTimestamp, _>("issued_at")?.to_jiff(),
            total_price: try_get_amount(row, "total_price")?,
            payment_status,
            pdf_file_name: row.try_get("pdf_file_name")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> InvoiceHeader {
        InvoiceHeader {
            customer_name: "Ayesha".to_string(),
            address_line: Some("House 12, Road 5".to_string()),
            postal_code: Some("1216".to_string()),
            area_name: Some("Mirpur".to_string()),
            city_name: Some("Dhaka City".to_string()),
            division_name: Some("Dhaka".to_string()),
        }
    }

    #[test]
    fn address_lines_join_locality() {
        assert_eq!(
            header().address_lines(),
            vec![
                "House 12, Road 5".to_string(),
                "Mirpur, Dhaka City, Dhaka 1216".to_string(),
            ]
        );
    }

    #[test]
    fn missing_address_prints_nothing() {
        let header = InvoiceHeader {
            address_line: None,
            postal_code: None,
            area_name: None,
            city_name: None,
            division_name: None,
            ..header()
        };

        assert!(header.address_lines().is_empty());
    }
}
