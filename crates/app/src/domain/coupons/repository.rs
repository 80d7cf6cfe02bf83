//! Coupons Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    accounts::records::CustomerUuid,
    database::{amount_to_i64, try_get_amount, try_get_optional_amount},
    domain::coupons::{
        data::NewCoupon,
        records::{CouponDiscount, CouponRecord, CouponUuid},
    },
};

const CREATE_COUPON_SQL: &str = include_str!("sql/create_coupon.sql");
const GET_COUPON_SQL: &str = include_str!("sql/get_coupon.sql");
const GET_COUPON_BY_CODE_SQL: &str = include_str!("sql/get_coupon_by_code.sql");
const HAS_REDEEMED_SQL: &str = include_str!("sql/has_redeemed.sql");
const REDEEM_COUPON_SQL: &str = include_str!("sql/redeem_coupon.sql");
const MARK_COUPON_USED_SQL: &str = include_str!("sql/mark_coupon_used.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCouponsRepository;

impl PgCouponsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: &NewCoupon,
    ) -> Result<CouponRecord, sqlx::Error> {
        let (percentage, fixed_amount) = match coupon.discount {
            Some(CouponDiscount::Percentage(percent)) => (Some(i16::from(percent)), None),
            Some(CouponDiscount::FixedAmount(amount)) => {
                (None, Some(amount_to_i64(amount, "fixed_amount")?))
            }
            None => (None, None),
        };

        let minimum_purchase_amount = coupon
            .minimum_purchase_amount
            .map(|amount| amount_to_i64(amount, "minimum_purchase_amount"))
            .transpose()?;

        query_as::<Postgres, CouponRecord>(CREATE_COUPON_SQL)
            .bind(coupon.uuid.into_uuid())
            .bind(&coupon.code)
            .bind(percentage)
            .bind(fixed_amount)
            .bind(SqlxTimestamp::from(coupon.valid_from))
            .bind(SqlxTimestamp::from(coupon.valid_to))
            .bind(amount_to_i64(coupon.max_uses, "max_uses")?)
            .bind(minimum_purchase_amount)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: CouponUuid,
    ) -> Result<CouponRecord, sqlx::Error> {
        query_as::<Postgres, CouponRecord>(GET_COUPON_SQL)
            .bind(coupon.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_coupon_by_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<CouponRecord, sqlx::Error> {
        query_as::<Postgres, CouponRecord>(GET_COUPON_BY_CODE_SQL)
            .bind(code)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn has_redeemed(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: CouponUuid,
        customer: CustomerUuid,
    ) -> Result<bool, sqlx::Error> {
        query_scalar::<Postgres, bool>(HAS_REDEEMED_SQL)
            .bind(coupon.into_uuid())
            .bind(customer.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Validate and consume a use in one statement. `false` when any rule refused it.
    pub(crate) async fn redeem(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: CouponUuid,
        customer: CustomerUuid,
        cart_total: u64,
        now: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let redeemed = query_scalar::<Postgres, Uuid>(REDEEM_COUPON_SQL)
            .bind(coupon.into_uuid())
            .bind(customer.into_uuid())
            .bind(SqlxTimestamp::from(now))
            .bind(amount_to_i64(cart_total, "cart_total")?)
            .fetch_optional(&mut **tx)
            .await?;

        Ok(redeemed.is_some())
    }

    /// Record a use without checking the validity window or minimum purchase.
    pub(crate) async fn mark_used(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: CouponUuid,
        customer: CustomerUuid,
    ) -> Result<bool, sqlx::Error> {
        let marked = query_scalar::<Postgres, Uuid>(MARK_COUPON_USED_SQL)
            .bind(coupon.into_uuid())
            .bind(customer.into_uuid())
            .fetch_optional(&mut **tx)
            .await?;

        Ok(marked.is_some())
    }
}

impl<'r> FromRow<'r, PgRow> for CouponRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let percentage: Option<i16> = row.try_get("discount_percentage")?;
        let fixed_amount = try_get_optional_amount(row, "fixed_amount")?;

        let percentage = percentage
            .map(u8::try_from)
            .transpose()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "discount_percentage".to_string(),
                source: Box::new(e),
            })?;

        // A fixed amount takes precedence when both columns are populated.
        let discount = match (fixed_amount, percentage) {
            (Some(amount), _) => Some(CouponDiscount::FixedAmount(amount)),
            (None, Some(percent)) => Some(CouponDiscount::Percentage(percent)),
            (None, None) => None,
        };

        Ok(Self {
            uuid: CouponUuid::from_uuid(row.try_get("uuid")?),
            code: row.try_get("code")?,
            discount,
            valid_from: row.try_get::<SqlxTimestamp, _>("valid_from")?.to_jiff(),
            valid_to: row.try_get::<SqlxTimestamp, _>("valid_to")?.to_jiff(),
            max_uses: try_get_amount(row, "max_uses")?,
            uses_count: try_get_amount(row, "uses_count")?,
            minimum_purchase_amount: try_get_optional_amount(row, "minimum_purchase_amount")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
