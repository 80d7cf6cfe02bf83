//! Coupon Records

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Coupon UUID
pub type CouponUuid = TypedUuid<CouponRecord>;

/// What a coupon takes off a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CouponDiscount {
    /// Whole percent, `0..=100`.
    Percentage(u8),

    /// Minor units.
    FixedAmount(u64),
}

/// Coupon Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponRecord {
    pub uuid: CouponUuid,
    pub code: String,
    pub discount: Option<CouponDiscount>,
    pub valid_from: Timestamp,
    pub valid_to: Timestamp,

    /// `0` means unlimited.
    pub max_uses: u64,
    pub uses_count: u64,
    pub minimum_purchase_amount: Option<u64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
