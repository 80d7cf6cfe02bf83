//! Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::{
    accounts::records::CustomerUuid,
    database::{amount_to_i64, try_get_amount},
    domain::{
        addresses::records::AddressUuid,
        carts::records::CartUuid,
        coupons::records::CouponUuid,
        orders::{
            data::NewOrder,
            records::{OrderRecord, OrderStatus, OrderUuid, PaymentMethod},
        },
    },
};

const CREATE_ORDER_SQL: &str = include_str!("../sql/create_order.sql");
const GET_ORDER_SQL: &str = include_str!("../sql/get_order.sql");
const GET_CUSTOMER_ORDER_SQL: &str = include_str!("../sql/get_customer_order.sql");
const LOCK_ORDER_SQL: &str = include_str!("../sql/lock_order.sql");
const LIST_CUSTOMER_ORDERS_SQL: &str = include_str!("../sql/list_customer_orders.sql");
const UPDATE_ORDER_STATUS_SQL: &str = include_str!("../sql/update_order_status.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Inserts the order, or returns `None` when its order number is already taken.
    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &NewOrder,
    ) -> Result<Option<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order.customer_uuid.into_uuid())
            .bind(order.cart_uuid.into_uuid())
            .bind(&order.order_number)
            .bind(order.payment_method.as_str())
            .bind(order.status.as_str())
            .bind(amount_to_i64(order.totals.subtotal, "subtotal")?)
            .bind(amount_to_i64(order.totals.discount, "discount")?)
            .bind(amount_to_i64(order.totals.shipping_charge, "shipping_charge")?)
            .bind(amount_to_i64(order.totals.packaging_charge, "packaging_charge")?)
            .bind(amount_to_i64(order.totals.grand_total, "total_price")?)
            .bind(order.coupon_uuid.map(CouponUuid::into_uuid))
            .bind(order.shipping_address_uuid.into_uuid())
            .bind(order.billing_address_uuid.into_uuid())
            .bind(&order.phone_number)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_customer_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(GET_CUSTOMER_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(customer.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Read an order, holding a row lock until the transaction ends.
    pub(crate) async fn lock_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LOCK_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Newest first.
    pub(crate) async fn list_customer_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LIST_CUSTOMER_ORDERS_SQL)
            .bind(customer.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn update_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(UPDATE_ORDER_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(status.as_str())
            .fetch_one(&mut **tx)
            .await
    }
}

fn decode_error(
    column: &str,
    source: impl std::error::Error + Send + Sync + 'static,
) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(source),
    }
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let payment_method = row
            .try_get::<&str, _>("payment_method")?
            .parse::<PaymentMethod>()
            .map_err(|e| decode_error("payment_method", e))?;

        let status = row
            .try_get::<&str, _>("status")?
            .parse::<OrderStatus>()
            .map_err(|e| decode_error("status", e))?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            customer_uuid: CustomerUuid::from_uuid(row.try_get("customer_uuid")?),
            cart_uuid: CartUuid::from_uuid(row.try_get("cart_uuid")?),
            order_number: row.try_get("order_number")?,
            payment_method,
            status,
            subtotal: try_get_amount(row, "subtotal")?,
            discount: try_get_amount(row, "discount")?,
            shipping_charge: try_get_amount(row, "shipping_charge")?,
            packaging_charge: try_get_amount(row, "packaging_charge")?,
            total_price: try_get_amount(row, "total_price")?,
            coupon_uuid: row
                .try_get::<Option<Uuid>, _>("coupon_uuid")?
                .map(CouponUuid::from_uuid),
            shipping_address_uuid: row
                .try_get::<Option<Uuid>, _>("shipping_address_uuid")?
                .map(AddressUuid::from_uuid),
            billing_address_uuid: row
                .try_get::<Option<Uuid>, _>("billing_address_uuid")?
                .map(AddressUuid::from_uuid),
            phone_number: row.try_get("phone_number")?,
            ordered_at: row.try_get::<SqlxTimestamp, _>("ordered_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
