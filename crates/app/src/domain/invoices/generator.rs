//! Invoice generation inside a caller's transaction.

use jiff::Timestamp;
use sqlx::{Postgres, Transaction};
use tracing::info;

use crate::{
    domain::{
        invoices::{
            errors::InvoicesServiceError,
            number::{invoice_number, pdf_file_name},
            pdf::{InvoiceDocument, InvoiceLine, render},
            records::{InvoicePdf, InvoiceRecord, InvoiceUuid, PaymentStatus},
            repository::{NewInvoice, PgInvoicesRepository},
        },
        orders::{records::OrderRecord, repositories::PgOrderItemsRepository},
    },
    settings::StoreSettings,
};

/// Renders and stores the invoice for an order.
///
/// Checkout, status updates and payment callbacks call this explicitly after an order becomes
/// paid. A second invoice for the same order fails with
/// [`InvoicesServiceError::AlreadyExists`] from the one-invoice-per-order constraint.
#[derive(Debug, Clone)]
pub(crate) struct InvoiceGenerator {
    settings: StoreSettings,
    invoices_repository: PgInvoicesRepository,
    order_items_repository: PgOrderItemsRepository,
}

impl InvoiceGenerator {
    #[must_use]
    pub(crate) fn new(settings: StoreSettings) -> Self {
        Self {
            settings,
            invoices_repository: PgInvoicesRepository::new(),
            order_items_repository: PgOrderItemsRepository::new(),
        }
    }

    #[tracing::instrument(
        name = "invoices.generator.generate",
        skip(self, tx, order),
        fields(order_uuid = %order.uuid, order_number = %order.order_number),
        err
    )]
    pub(crate) async fn generate(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &OrderRecord,
        issued_at: Timestamp,
    ) -> Result<InvoiceRecord, InvoicesServiceError> {
        let header = self
            .invoices_repository
            .get_invoice_header(tx, order.uuid)
            .await?;
        let items = self
            .order_items_repository
            .list_order_items(tx, order.uuid)
            .await?;

        let number = invoice_number(&order.order_number, issued_at);
        let payment_status = PaymentStatus::for_order(order.status);

        let document = InvoiceDocument {
            invoice_number: number.clone(),
            order_number: order.order_number.clone(),
            issued_on: issued_at
                .to_zoned(self.settings.time_zone())
                .date()
                .to_string(),
            shipping_address: header.address_lines(),
            customer_name: header.customer_name,
            payment_method: order.payment_method.label().to_string(),
            lines: items
                .iter()
                .map(|item| InvoiceLine {
                    description: item.description(),
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                    line_total: item.line_total(),
                })
                .collect(),
            subtotal: order.subtotal,
            discount: order.discount,
            shipping_charge: order.shipping_charge,
            packaging_charge: order.packaging_charge,
            total: order.total_price,
            payment_status: payment_status.label().to_string(),
        };

        let bytes = render(&document)?;

        let invoice = self
            .invoices_repository
            .create_invoice(
                tx,
                &NewInvoice {
                    uuid: InvoiceUuid::new(),
                    order_uuid: order.uuid,
                    pdf: InvoicePdf {
                        file_name: pdf_file_name(&number),
                        bytes,
                    },
                    invoice_number: number,
                    issued_at,
                    total_price: order.total_price,
                    payment_status,
                },
            )
            .await?;

        info!(invoice_number = %invoice.invoice_number, "generated invoice");

        Ok(invoice)
    }
}
