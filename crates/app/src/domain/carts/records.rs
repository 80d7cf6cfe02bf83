//! Cart Records

use jiff::Timestamp;

use crate::{
    accounts::records::CustomerUuid,
    domain::{
        catalog::{
            records::{ProductRecord, VariantUuid},
            variants::VariantAttributes,
        },
        coupons::records::CouponUuid,
    },
    uuids::TypedUuid,
};

/// Cart UUID
pub type CartUuid = TypedUuid<CartRecord>;

/// Cart Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartRecord {
    pub uuid: CartUuid,
    pub customer_uuid: CustomerUuid,
    pub coupon_uuid: Option<CouponUuid>,
    pub is_paid: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Cart Item UUID
pub type CartItemUuid = TypedUuid<CartItemRecord>;

/// The variant a cart line was added with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemVariant {
    pub uuid: VariantUuid,
    pub attributes: VariantAttributes,
}

/// Cart Item Record, joined with the live product it references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemRecord {
    pub uuid: CartItemUuid,
    pub cart_uuid: CartUuid,
    pub product: ProductRecord,
    pub variant: Option<CartItemVariant>,
    pub quantity: u64,
    pub created_at: Timestamp,
}
