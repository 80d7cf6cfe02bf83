//! Cart Items Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    accounts::records::CustomerUuid,
    database::{amount_to_i64, try_get_quantity},
    domain::{
        carts::records::{CartItemRecord, CartItemUuid, CartItemVariant, CartUuid},
        catalog::{
            records::{ProductUuid, VariantUuid},
            repository::try_get_product,
            variants::VariantAttributes,
        },
    },
};

const GET_CART_ITEMS_SQL: &str = include_str!("../sql/get_cart_items.sql");
const GET_CART_ITEM_SQL: &str = include_str!("../sql/get_cart_item.sql");
const UPSERT_CART_ITEM_SQL: &str = include_str!("../sql/upsert_cart_item.sql");
const UPDATE_CART_ITEM_QUANTITY_SQL: &str = include_str!("../sql/update_cart_item_quantity.sql");
const DELETE_CART_ITEM_SQL: &str = include_str!("../sql/delete_cart_item.sql");
const COUNT_CART_ITEMS_SQL: &str = include_str!("../sql/count_cart_items.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartItemsRepository;

impl PgCartItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_cart_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<Vec<CartItemRecord>, sqlx::Error> {
        query_as::<Postgres, CartItemRecord>(GET_CART_ITEMS_SQL)
            .bind(cart.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_cart_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        item: CartItemUuid,
    ) -> Result<CartItemRecord, sqlx::Error> {
        query_as::<Postgres, CartItemRecord>(GET_CART_ITEM_SQL)
            .bind(item.into_uuid())
            .bind(cart.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Add `quantity` of a line, merging into an existing line for the same product and variant.
    pub(crate) async fn upsert_cart_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        product: ProductUuid,
        variant: Option<VariantUuid>,
        quantity: u64,
    ) -> Result<CartItemUuid, sqlx::Error> {
        let uuid: Uuid = query_scalar(UPSERT_CART_ITEM_SQL)
            .bind(CartItemUuid::new().into_uuid())
            .bind(cart.into_uuid())
            .bind(product.into_uuid())
            .bind(variant.map(VariantUuid::into_uuid))
            .bind(amount_to_i64(quantity, "quantity")?)
            .fetch_one(&mut **tx)
            .await?;

        Ok(CartItemUuid::from_uuid(uuid))
    }

    pub(crate) async fn update_quantity(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
        item: CartItemUuid,
        quantity: u64,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPDATE_CART_ITEM_QUANTITY_SQL)
            .bind(item.into_uuid())
            .bind(customer.into_uuid())
            .bind(amount_to_i64(quantity, "quantity")?)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn delete_cart_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
        item: CartItemUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_CART_ITEM_SQL)
            .bind(item.into_uuid())
            .bind(customer.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Sum of quantities in the customer's open cart; zero without one.
    pub(crate) async fn count_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
    ) -> Result<u64, sqlx::Error> {
        let count: i64 = query_scalar(COUNT_CART_ITEMS_SQL)
            .bind(customer.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        u64::try_from(count).map_err(|e| sqlx::Error::ColumnDecode {
            index: "count".to_string(),
            source: Box::new(e),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for CartItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let variant = row
            .try_get::<Option<Uuid>, _>("variant_uuid")?
            .map(|uuid| -> sqlx::Result<CartItemVariant> {
                Ok(CartItemVariant {
                    uuid: VariantUuid::from_uuid(uuid),
                    attributes: VariantAttributes {
                        color: row.try_get("variant_color")?,
                        size: row.try_get("variant_size")?,
                        brand: row.try_get("variant_brand")?,
                        capacity: row.try_get("variant_capacity")?,
                    },
                })
            })
            .transpose()?;

        Ok(Self {
            uuid: CartItemUuid::from_uuid(row.try_get("uuid")?),
            cart_uuid: CartUuid::from_uuid(row.try_get("cart_uuid")?),
            product: try_get_product(row, "product_")?,
            variant,
            quantity: try_get_quantity(row, "quantity")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
