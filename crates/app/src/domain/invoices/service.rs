//! Invoices service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;

use crate::{
    accounts::records::CustomerUuid,
    database::Db,
    domain::{
        invoices::{
            errors::InvoicesServiceError,
            generator::InvoiceGenerator,
            records::{InvoicePdf, InvoiceRecord},
            repository::PgInvoicesRepository,
        },
        orders::{records::OrderUuid, repositories::PgOrdersRepository},
    },
    settings::StoreSettings,
};

#[derive(Debug, Clone)]
pub struct PgInvoicesService {
    db: Db,
    generator: InvoiceGenerator,
    repository: PgInvoicesRepository,
    orders_repository: PgOrdersRepository,
}

impl PgInvoicesService {
    #[must_use]
    pub fn new(db: Db, settings: StoreSettings) -> Self {
        Self {
            db,
            generator: InvoiceGenerator::new(settings),
            repository: PgInvoicesRepository::new(),
            orders_repository: PgOrdersRepository::new(),
        }
    }
}

#[async_trait]
impl InvoicesService for PgInvoicesService {
    async fn generate_invoice(
        &self,
        order: OrderUuid,
        now: Timestamp,
    ) -> Result<InvoiceRecord, InvoicesServiceError> {
        let mut tx = self.db.begin().await?;

        let order = self.orders_repository.get_order(&mut tx, order).await?;
        let invoice = self.generator.generate(&mut tx, &order, now).await?;

        tx.commit().await?;

        Ok(invoice)
    }

    async fn get_invoice(
        &self,
        customer: CustomerUuid,
        order: OrderUuid,
    ) -> Result<InvoiceRecord, InvoicesServiceError> {
        let mut tx = self.db.begin().await?;

        let invoice = self
            .repository
            .get_customer_invoice(&mut tx, customer, order)
            .await?;

        tx.commit().await?;

        Ok(invoice)
    }

    async fn download_invoice(
        &self,
        customer: CustomerUuid,
        order: OrderUuid,
    ) -> Result<InvoicePdf, InvoicesServiceError> {
        let mut tx = self.db.begin().await?;

        let pdf = self
            .repository
            .get_customer_invoice_pdf(&mut tx, customer, order)
            .await?;

        tx.commit().await?;

        Ok(pdf)
    }
}

#[automock]
#[async_trait]
pub trait InvoicesService: Send + Sync {
    /// Render and store the invoice for `order` regardless of who owns it.
    ///
    /// Fails with [`InvoicesServiceError::AlreadyExists`] if the order already has one.
    async fn generate_invoice(
        &self,
        order: OrderUuid,
        now: Timestamp,
    ) -> Result<InvoiceRecord, InvoicesServiceError>;

    /// The invoice for one of the customer's orders.
    async fn get_invoice(
        &self,
        customer: CustomerUuid,
        order: OrderUuid,
    ) -> Result<InvoiceRecord, InvoicesServiceError>;

    /// The stored PDF for one of the customer's orders.
    async fn download_invoice(
        &self,
        customer: CustomerUuid,
        order: OrderUuid,
    ) -> Result<InvoicePdf, InvoicesServiceError>;
}
