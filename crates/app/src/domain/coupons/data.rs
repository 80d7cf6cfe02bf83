//! Coupon Data

use jiff::Timestamp;

use crate::domain::coupons::records::{CouponDiscount, CouponUuid};

/// New Coupon Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCoupon {
    pub uuid: CouponUuid,
    pub code: String,
    pub discount: Option<CouponDiscount>,
    pub valid_from: Timestamp,
    pub valid_to: Timestamp,
    pub max_uses: u64,
    pub minimum_purchase_amount: Option<u64>,
}
