//! Coupon eligibility and discount rules

use jiff::Timestamp;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use thiserror::Error;

use crate::{
    domain::coupons::records::{CouponDiscount, CouponRecord},
    money::format_taka,
};

/// The first rule a coupon failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CouponRejection {
    #[error("coupon is not valid yet")]
    NotYetValid,

    #[error("coupon has expired")]
    Expired,

    #[error("coupon has already been used")]
    AlreadyUsed,

    #[error("coupon usage limit reached")]
    UsageLimitReached,

    #[error("cart total is below the coupon minimum")]
    BelowMinimumPurchase { minimum: u64 },
}

impl CouponRecord {
    /// Evaluate every eligibility rule in order.
    ///
    /// # Errors
    ///
    /// Returns the first [`CouponRejection`] that applies.
    pub fn check(
        &self,
        now: Timestamp,
        already_used: bool,
        cart_total: u64,
    ) -> Result<(), CouponRejection> {
        if now < self.valid_from {
            return Err(CouponRejection::NotYetValid);
        }

        if now > self.valid_to {
            return Err(CouponRejection::Expired);
        }

        if already_used {
            return Err(CouponRejection::AlreadyUsed);
        }

        if self.max_uses > 0 && self.uses_count >= self.max_uses {
            return Err(CouponRejection::UsageLimitReached);
        }

        if let Some(minimum) = self.minimum_purchase_amount
            && cart_total < minimum
        {
            return Err(CouponRejection::BelowMinimumPurchase { minimum });
        }

        Ok(())
    }

    #[must_use]
    pub fn is_valid(&self, now: Timestamp, already_used: bool, cart_total: u64) -> bool {
        self.check(now, already_used, cart_total).is_ok()
    }

    /// Discount on `total`, never more than `total`.
    #[must_use]
    pub fn discount_amount(&self, total: u64) -> u64 {
        let discount = match self.discount {
            Some(CouponDiscount::FixedAmount(amount)) => amount,
            Some(CouponDiscount::Percentage(percent)) => percent_of_minor(percent, total),
            None => 0,
        };

        discount.min(total)
    }

    #[must_use]
    pub fn discount_display(&self) -> String {
        match self.discount {
            Some(CouponDiscount::FixedAmount(amount)) => format!("{} off", format_taka(amount)),
            Some(CouponDiscount::Percentage(percent)) => format!("{percent}% off"),
            None => "No discount".to_string(),
        }
    }
}

/// `percent`% of `minor`, rounded half away from zero. Saturates at `minor` when the
/// intermediate value is not representable.
fn percent_of_minor(percent: u8, minor: u64) -> u64 {
    Decimal::from(minor)
        .checked_mul(Decimal::from(percent))
        .and_then(|scaled| scaled.checked_div(Decimal::ONE_HUNDRED))
        .map(|amount| amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|amount| amount.to_u64())
        .unwrap_or(minor)
}

#[cfg(test)]
mod tests {
    use jiff::{SignedDuration, Timestamp};

    use crate::domain::coupons::records::CouponUuid;

    use super::*;

    fn coupon(discount: Option<CouponDiscount>) -> CouponRecord {
        let now = Timestamp::now();

        CouponRecord {
            uuid: CouponUuid::new(),
            code: "SAVE".to_string(),
            discount,
            valid_from: now - SignedDuration::from_hours(24),
            valid_to: now + SignedDuration::from_hours(24),
            max_uses: 0,
            uses_count: 0,
            minimum_purchase_amount: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn fixed_amount_discount() {
        let coupon = coupon(Some(CouponDiscount::FixedAmount(100_00)));

        assert_eq!(coupon.discount_amount(500_00), 100_00);
        assert_eq!(500_00 - coupon.discount_amount(500_00), 400_00);
    }

    #[test]
    fn percentage_discount() {
        let coupon = coupon(Some(CouponDiscount::Percentage(20)));

        assert_eq!(coupon.discount_amount(1_000_00), 200_00);
    }

    #[test]
    fn percentage_rounds_half_away_from_zero() {
        let coupon = coupon(Some(CouponDiscount::Percentage(15)));

        // 15% of 0.10 is 0.015 → 2 poisha
        assert_eq!(coupon.discount_amount(10), 2);
        // 15% of 0.03 is 0.0045 → 0 poisha
        assert_eq!(coupon.discount_amount(3), 0);
    }

    #[test]
    fn discount_never_exceeds_total() {
        let coupon = coupon(Some(CouponDiscount::FixedAmount(900_00)));

        assert_eq!(coupon.discount_amount(500_00), 500_00);
    }

    #[test]
    fn percentage_on_huge_total_is_clamped() {
        let coupon = coupon(Some(CouponDiscount::Percentage(100)));

        assert_eq!(coupon.discount_amount(u64::MAX), u64::MAX);
    }

    #[test]
    fn no_discount_configured() {
        let coupon = coupon(None);

        assert_eq!(coupon.discount_amount(500_00), 0);
        assert_eq!(coupon.discount_display(), "No discount");
    }

    #[test]
    fn discount_display_variants() {
        assert_eq!(
            coupon(Some(CouponDiscount::FixedAmount(100_00))).discount_display(),
            "100 TK off"
        );
        assert_eq!(
            coupon(Some(CouponDiscount::Percentage(15))).discount_display(),
            "15% off"
        );
    }

    #[test]
    fn rejects_before_window() {
        let coupon = coupon(None);
        let early = coupon.valid_from - SignedDuration::from_secs(1);

        assert_eq!(
            coupon.check(early, false, 0),
            Err(CouponRejection::NotYetValid)
        );
    }

    #[test]
    fn rejects_after_window() {
        let coupon = coupon(None);
        let late = coupon.valid_to + SignedDuration::from_secs(1);

        assert_eq!(coupon.check(late, false, 0), Err(CouponRejection::Expired));
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let coupon = coupon(None);

        assert!(coupon.is_valid(coupon.valid_from, false, 0));
        assert!(coupon.is_valid(coupon.valid_to, false, 0));
    }

    #[test]
    fn rejects_customer_who_already_used_it() {
        let coupon = coupon(None);

        assert_eq!(
            coupon.check(Timestamp::now(), true, 0),
            Err(CouponRejection::AlreadyUsed)
        );
        assert!(!coupon.is_valid(Timestamp::now(), true, 1_000_00));
    }

    #[test]
    fn rejects_when_usage_cap_reached() {
        let coupon = CouponRecord {
            max_uses: 2,
            uses_count: 2,
            ..coupon(None)
        };

        assert_eq!(
            coupon.check(Timestamp::now(), false, 0),
            Err(CouponRejection::UsageLimitReached)
        );
    }

    #[test]
    fn unlimited_when_max_uses_is_zero() {
        let coupon = CouponRecord {
            max_uses: 0,
            uses_count: 10_000,
            ..coupon(None)
        };

        assert!(coupon.is_valid(Timestamp::now(), false, 0));
    }

    #[test]
    fn rejects_cart_below_minimum() {
        let coupon = CouponRecord {
            minimum_purchase_amount: Some(300_00),
            ..coupon(None)
        };

        assert_eq!(
            coupon.check(Timestamp::now(), false, 299_99),
            Err(CouponRejection::BelowMinimumPurchase { minimum: 300_00 })
        );
        assert!(coupon.is_valid(Timestamp::now(), false, 300_00));
    }
}
