//! Orders service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::info;

use crate::{
    accounts::records::CustomerUuid,
    database::Db,
    domain::{
        invoices::generator::InvoiceGenerator,
        orders::{
            errors::OrdersServiceError,
            records::{OrderDetails, OrderRecord, OrderStatus, OrderUuid},
            repositories::{PgOrderItemsRepository, PgOrdersRepository},
        },
    },
    settings::StoreSettings,
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    orders_repository: PgOrdersRepository,
    items_repository: PgOrderItemsRepository,
    invoices: InvoiceGenerator,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db, settings: StoreSettings) -> Self {
        Self {
            db,
            orders_repository: PgOrdersRepository::new(),
            items_repository: PgOrderItemsRepository::new(),
            invoices: InvoiceGenerator::new(settings),
        }
    }
}

/// Move a locked order to `to` inside `tx`, generating its invoice when it becomes paid.
pub(crate) async fn transition_in(
    orders_repository: &PgOrdersRepository,
    invoices: &InvoiceGenerator,
    tx: &mut Transaction<'_, Postgres>,
    order: &OrderRecord,
    to: OrderStatus,
    now: Timestamp,
) -> Result<OrderRecord, OrdersServiceError> {
    order.status.transition_to(to)?;

    let updated = orders_repository.update_status(tx, order.uuid, to).await?;

    if updated.status == OrderStatus::Paid {
        invoices.generate(tx, &updated, now).await?;
    }

    info!(
        order_uuid = %updated.uuid,
        from = %order.status,
        to = %updated.status,
        "order status changed"
    );

    Ok(updated)
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn get_order(
        &self,
        customer: CustomerUuid,
        order: OrderUuid,
    ) -> Result<OrderDetails, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let order = self
            .orders_repository
            .get_customer_order(&mut tx, customer, order)
            .await?;
        let items = self
            .items_repository
            .list_order_items(&mut tx, order.uuid)
            .await?;

        tx.commit().await?;

        Ok(OrderDetails { order, items })
    }

    async fn list_orders(
        &self,
        customer: CustomerUuid,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let orders = self
            .orders_repository
            .list_customer_orders(&mut tx, customer)
            .await?;

        tx.commit().await?;

        Ok(orders)
    }

    #[tracing::instrument(
        name = "orders.service.update_status",
        skip(self),
        fields(order_uuid = %order, status = %status),
        err
    )]
    async fn update_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
        now: Timestamp,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self.orders_repository.lock_order(&mut tx, order).await?;

        let updated = transition_in(
            &self.orders_repository,
            &self.invoices,
            &mut tx,
            &current,
            status,
            now,
        )
        .await?;

        tx.commit().await?;

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// One of the customer's orders with its items.
    async fn get_order(
        &self,
        customer: CustomerUuid,
        order: OrderUuid,
    ) -> Result<OrderDetails, OrdersServiceError>;

    /// The customer's orders, newest first.
    async fn list_orders(
        &self,
        customer: CustomerUuid,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// Move an order along its lifecycle. Becoming paid generates the invoice in the same
    /// transaction.
    async fn update_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
        now: Timestamp,
    ) -> Result<OrderRecord, OrdersServiceError>;
}
