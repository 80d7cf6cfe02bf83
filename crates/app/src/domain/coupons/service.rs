//! Coupons service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::{Postgres, Transaction, error::ErrorKind};
use tracing::info;

use crate::{
    accounts::records::CustomerUuid,
    database::Db,
    domain::coupons::{
        data::NewCoupon,
        errors::CouponsServiceError,
        records::{CouponDiscount, CouponRecord, CouponUuid},
        repository::PgCouponsRepository,
        rules::CouponRejection,
    },
};

/// Longest accepted coupon code.
pub const MAX_CODE_LENGTH: usize = 20;

#[derive(Debug, Clone)]
pub struct PgCouponsService {
    db: Db,
    repository: PgCouponsRepository,
}

impl PgCouponsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCouponsRepository::new(),
        }
    }
}

/// Atomically validate and consume one use of `coupon` for `customer` inside `tx`.
///
/// When the conditional update refuses, the coupon is re-read to name the rule that failed.
pub(crate) async fn redeem_in(
    repository: &PgCouponsRepository,
    tx: &mut Transaction<'_, Postgres>,
    coupon: CouponUuid,
    customer: CustomerUuid,
    cart_total: u64,
    now: Timestamp,
) -> Result<(), CouponsServiceError> {
    let redeemed = repository
        .redeem(tx, coupon, customer, cart_total, now)
        .await
        .map_err(already_used_on_conflict)?;

    if redeemed {
        return Ok(());
    }

    let record = repository.get_coupon(tx, coupon).await?;
    let already_used = repository.has_redeemed(tx, coupon, customer).await?;

    record.check(now, already_used, cart_total)?;

    // Every rule passed on re-read, so a concurrent redemption took the last use.
    Err(CouponRejection::UsageLimitReached.into())
}

fn already_used_on_conflict(error: sqlx::Error) -> CouponsServiceError {
    let unique_violation = error
        .as_database_error()
        .is_some_and(|db_error| matches!(db_error.kind(), ErrorKind::UniqueViolation));

    if unique_violation {
        CouponsServiceError::AlreadyUsed
    } else {
        error.into()
    }
}

fn validate_new_coupon(coupon: &NewCoupon) -> Result<(), CouponsServiceError> {
    let code_length = coupon.code.chars().count();

    if code_length == 0 || code_length > MAX_CODE_LENGTH {
        return Err(CouponsServiceError::InvalidData);
    }

    if coupon.valid_from > coupon.valid_to {
        return Err(CouponsServiceError::InvalidData);
    }

    if matches!(coupon.discount, Some(CouponDiscount::Percentage(percent)) if percent > 100) {
        return Err(CouponsServiceError::InvalidData);
    }

    Ok(())
}

#[async_trait]
impl CouponsService for PgCouponsService {
    #[tracing::instrument(
        name = "coupons.service.create_coupon",
        skip(self, coupon),
        fields(coupon_uuid = %coupon.uuid, code = %coupon.code),
        err
    )]
    async fn create_coupon(&self, coupon: NewCoupon) -> Result<CouponRecord, CouponsServiceError> {
        let coupon = NewCoupon {
            code: coupon.code.trim().to_string(),
            ..coupon
        };

        validate_new_coupon(&coupon)?;

        let mut tx = self.db.begin().await?;

        let created = self.repository.create_coupon(&mut tx, &coupon).await?;

        tx.commit().await?;

        info!(discount = %created.discount_display(), "created coupon");

        Ok(created)
    }

    async fn get_coupon_by_code(&self, code: &str) -> Result<CouponRecord, CouponsServiceError> {
        let mut tx = self.db.begin().await?;

        let coupon = self
            .repository
            .get_coupon_by_code(&mut tx, code.trim())
            .await?;

        tx.commit().await?;

        Ok(coupon)
    }

    async fn is_valid(
        &self,
        coupon: CouponUuid,
        customer: CustomerUuid,
        cart_total: u64,
        now: Timestamp,
    ) -> Result<bool, CouponsServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.repository.get_coupon(&mut tx, coupon).await?;
        let already_used = self
            .repository
            .has_redeemed(&mut tx, coupon, customer)
            .await?;

        tx.commit().await?;

        Ok(record.is_valid(now, already_used, cart_total))
    }

    #[tracing::instrument(
        name = "coupons.service.mark_as_used",
        skip(self),
        fields(coupon_uuid = %coupon, customer_uuid = %customer),
        err
    )]
    async fn mark_as_used(
        &self,
        coupon: CouponUuid,
        customer: CustomerUuid,
    ) -> Result<(), CouponsServiceError> {
        let mut tx = self.db.begin().await?;

        let marked = self
            .repository
            .mark_used(&mut tx, coupon, customer)
            .await
            .map_err(already_used_on_conflict)?;

        if !marked {
            // Surfaces NotFound for an unknown coupon.
            self.repository.get_coupon(&mut tx, coupon).await?;

            if self.repository.has_redeemed(&mut tx, coupon, customer).await? {
                return Err(CouponsServiceError::AlreadyUsed);
            }

            return Err(CouponRejection::UsageLimitReached.into());
        }

        tx.commit().await?;

        info!("coupon marked as used");

        Ok(())
    }

    #[tracing::instrument(
        name = "coupons.service.redeem",
        skip(self),
        fields(coupon_uuid = %coupon, customer_uuid = %customer),
        err
    )]
    async fn redeem(
        &self,
        coupon: CouponUuid,
        customer: CustomerUuid,
        cart_total: u64,
        now: Timestamp,
    ) -> Result<(), CouponsServiceError> {
        let mut tx = self.db.begin().await?;

        redeem_in(&self.repository, &mut tx, coupon, customer, cart_total, now).await?;

        tx.commit().await?;

        info!("coupon redeemed");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CouponsService: Send + Sync {
    /// Creates a coupon. Codes are trimmed and must be unique.
    async fn create_coupon(&self, coupon: NewCoupon) -> Result<CouponRecord, CouponsServiceError>;

    /// Looks a coupon up by its exact code.
    async fn get_coupon_by_code(&self, code: &str) -> Result<CouponRecord, CouponsServiceError>;

    /// Whether `customer` could use `coupon` on a cart worth `cart_total` at `now`.
    async fn is_valid(
        &self,
        coupon: CouponUuid,
        customer: CustomerUuid,
        cart_total: u64,
        now: Timestamp,
    ) -> Result<bool, CouponsServiceError>;

    /// Records a use by `customer`, refusing a second use or one past the usage cap.
    async fn mark_as_used(
        &self,
        coupon: CouponUuid,
        customer: CustomerUuid,
    ) -> Result<(), CouponsServiceError>;

    /// Validates and consumes a use in a single atomic step.
    async fn redeem(
        &self,
        coupon: CouponUuid,
        customer: CustomerUuid,
        cart_total: u64,
        now: Timestamp,
    ) -> Result<(), CouponsServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::{SignedDuration, Timestamp};
    use testresult::TestResult;

    use crate::test::{TestContext, helpers::create_customer};

    use super::*;

    fn new_coupon(code: &str, max_uses: u64) -> NewCoupon {
        let now = Timestamp::now();

        NewCoupon {
            uuid: CouponUuid::new(),
            code: code.to_string(),
            discount: Some(CouponDiscount::Percentage(10)),
            valid_from: now - SignedDuration::from_hours(1),
            valid_to: now + SignedDuration::from_hours(1),
            max_uses,
            minimum_purchase_amount: None,
        }
    }

    #[tokio::test]
    async fn create_and_fetch_by_code() -> TestResult {
        let ctx = TestContext::new().await;

        let created = ctx.coupons.create_coupon(new_coupon(" SAVE10 ", 0)).await?;
        let fetched = ctx.coupons.get_coupon_by_code("SAVE10").await?;

        assert_eq!(created.code, "SAVE10");
        assert_eq!(fetched.uuid, created.uuid);
        assert_eq!(fetched.discount, Some(CouponDiscount::Percentage(10)));

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_code_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.coupons.create_coupon(new_coupon("DUP", 0)).await?;
        let result = ctx.coupons.create_coupon(new_coupon("DUP", 0)).await;

        assert!(
            matches!(result, Err(CouponsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn overlong_code_returns_invalid_data() {
        let ctx = TestContext::new().await;

        let result = ctx
            .coupons
            .create_coupon(new_coupon("ABCDEFGHIJKLMNOPQRSTU", 0))
            .await;

        assert!(
            matches!(result, Err(CouponsServiceError::InvalidData)),
            "expected InvalidData, got {result:?}"
        );
    }

    #[tokio::test]
    async fn unknown_code_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.coupons.get_coupon_by_code("NOPE").await;

        assert!(
            matches!(result, Err(CouponsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn mark_as_used_twice_returns_already_used() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = create_customer(&ctx, "rahim@example.com").await?;
        let coupon = ctx.coupons.create_coupon(new_coupon("ONCE", 0)).await?;

        ctx.coupons.mark_as_used(coupon.uuid, customer).await?;
        let result = ctx.coupons.mark_as_used(coupon.uuid, customer).await;

        assert!(
            matches!(result, Err(CouponsServiceError::AlreadyUsed)),
            "expected AlreadyUsed, got {result:?}"
        );

        let coupon = ctx.coupons.get_coupon_by_code("ONCE").await?;

        assert_eq!(coupon.uses_count, 1);

        Ok(())
    }

    #[tokio::test]
    async fn used_coupon_is_invalid_for_that_customer_only() -> TestResult {
        let ctx = TestContext::new().await;
        let first = create_customer(&ctx, "first@example.com").await?;
        let second = create_customer(&ctx, "second@example.com").await?;
        let coupon = ctx.coupons.create_coupon(new_coupon("SHARE", 0)).await?;
        let now = Timestamp::now();

        ctx.coupons.mark_as_used(coupon.uuid, first).await?;

        assert!(!ctx.coupons.is_valid(coupon.uuid, first, 100_00, now).await?);
        assert!(ctx.coupons.is_valid(coupon.uuid, second, 100_00, now).await?);

        Ok(())
    }

    #[tokio::test]
    async fn single_use_coupon_redeems_once_across_customers() -> TestResult {
        let ctx = TestContext::new().await;
        let first = create_customer(&ctx, "a@example.com").await?;
        let second = create_customer(&ctx, "b@example.com").await?;
        let coupon = ctx.coupons.create_coupon(new_coupon("SOLO", 1)).await?;
        let now = Timestamp::now();

        let (a, b) = tokio::join!(
            ctx.coupons.redeem(coupon.uuid, first, 100_00, now),
            ctx.coupons.redeem(coupon.uuid, second, 100_00, now),
        );

        let successes = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();

        assert_eq!(successes, 1, "exactly one redemption should win: {a:?} {b:?}");

        let loser = if a.is_ok() { b } else { a };

        assert!(
            matches!(
                loser,
                Err(CouponsServiceError::Rejected(
                    CouponRejection::UsageLimitReached
                ))
            ),
            "expected UsageLimitReached, got {loser:?}"
        );

        let coupon = ctx.coupons.get_coupon_by_code("SOLO").await?;

        assert_eq!(coupon.uses_count, 1);

        Ok(())
    }

    #[tokio::test]
    async fn redeem_below_minimum_names_the_rule() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = create_customer(&ctx, "min@example.com").await?;
        let coupon = ctx
            .coupons
            .create_coupon(NewCoupon {
                minimum_purchase_amount: Some(500_00),
                ..new_coupon("BIGSPEND", 0)
            })
            .await?;

        let result = ctx
            .coupons
            .redeem(coupon.uuid, customer, 499_00, Timestamp::now())
            .await;

        assert!(
            matches!(
                result,
                Err(CouponsServiceError::Rejected(
                    CouponRejection::BelowMinimumPurchase { minimum: 500_00 }
                ))
            ),
            "expected BelowMinimumPurchase, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn redeem_unknown_coupon_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = create_customer(&ctx, "ghost@example.com").await?;

        let result = ctx
            .coupons
            .redeem(CouponUuid::new(), customer, 100_00, Timestamp::now())
            .await;

        assert!(
            matches!(result, Err(CouponsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }
}
