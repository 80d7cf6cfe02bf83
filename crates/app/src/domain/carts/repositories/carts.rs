//! Carts Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    accounts::records::CustomerUuid,
    domain::{
        carts::records::{CartRecord, CartUuid},
        coupons::records::CouponUuid,
    },
};

const CREATE_OPEN_CART_SQL: &str = include_str!("../sql/create_open_cart.sql");
const GET_OPEN_CART_SQL: &str = include_str!("../sql/get_open_cart.sql");
const LOCK_OPEN_CART_SQL: &str = include_str!("../sql/lock_open_cart.sql");
const SET_CART_COUPON_SQL: &str = include_str!("../sql/set_cart_coupon.sql");
const MARK_CART_PAID_SQL: &str = include_str!("../sql/mark_cart_paid.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartsRepository;

impl PgCartsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_open_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
    ) -> Result<Option<CartRecord>, sqlx::Error> {
        query_as::<Postgres, CartRecord>(GET_OPEN_CART_SQL)
            .bind(customer.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Like [`Self::get_open_cart`], holding a row lock until the transaction ends.
    pub(crate) async fn lock_open_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
    ) -> Result<Option<CartRecord>, sqlx::Error> {
        query_as::<Postgres, CartRecord>(LOCK_OPEN_CART_SQL)
            .bind(customer.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Return the customer's open cart, creating it first if there is none.
    pub(crate) async fn get_or_create_open_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
    ) -> Result<CartRecord, sqlx::Error> {
        query(CREATE_OPEN_CART_SQL)
            .bind(CartUuid::new().into_uuid())
            .bind(customer.into_uuid())
            .execute(&mut **tx)
            .await?;

        self.lock_open_cart(tx, customer)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub(crate) async fn set_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        coupon: Option<CouponUuid>,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(SET_CART_COUPON_SQL)
            .bind(cart.into_uuid())
            .bind(coupon.map(CouponUuid::into_uuid))
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn mark_paid(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(MARK_CART_PAID_SQL)
            .bind(cart.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for CartRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CartUuid::from_uuid(row.try_get("uuid")?),
            customer_uuid: CustomerUuid::from_uuid(row.try_get("customer_uuid")?),
            coupon_uuid: row
                .try_get::<Option<Uuid>, _>("coupon_uuid")?
                .map(CouponUuid::from_uuid),
            is_paid: row.try_get("is_paid")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
