//! Order Items Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    database::{amount_to_i64, try_get_amount, try_get_quantity},
    domain::{
        catalog::{
            records::{ProductUuid, VariantUuid},
            variants::VariantAttributes,
        },
        orders::{
            data::NewOrderItem,
            records::{OrderItemRecord, OrderItemUuid, OrderUuid},
        },
    },
};

const CREATE_ORDER_ITEM_SQL: &str = include_str!("../sql/create_order_item.sql");
const LIST_ORDER_ITEMS_SQL: &str = include_str!("../sql/list_order_items.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrderItemsRepository;

impl PgOrderItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        item: &NewOrderItem,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_ORDER_ITEM_SQL)
            .bind(item.uuid.into_uuid())
            .bind(order.into_uuid())
            .bind(item.product_uuid.into_uuid())
            .bind(item.variant_uuid.map(VariantUuid::into_uuid))
            .bind(amount_to_i64(item.quantity, "quantity")?)
            .bind(amount_to_i64(item.unit_price, "unit_price")?)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn list_order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Vec<OrderItemRecord>, sqlx::Error> {
        query_as::<Postgres, OrderItemRecord>(LIST_ORDER_ITEMS_SQL)
            .bind(order.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for OrderItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let variant_uuid = row
            .try_get::<Option<Uuid>, _>("variant_uuid")?
            .map(VariantUuid::from_uuid);

        let variant_attributes = if variant_uuid.is_some() {
            Some(VariantAttributes {
                color: row.try_get("variant_color")?,
                size: row.try_get("variant_size")?,
                brand: row.try_get("variant_brand")?,
                capacity: row.try_get("variant_capacity")?,
            })
        } else {
            None
        };

        Ok(Self {
            uuid: OrderItemUuid::from_uuid(row.try_get("uuid")?),
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            product_name: row.try_get("product_name")?,
            variant_uuid,
            variant_attributes,
            quantity: try_get_quantity(row, "quantity")?,
            unit_price: try_get_amount(row, "unit_price")?,
        })
    }
}
