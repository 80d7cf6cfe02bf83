//! Cart summaries

use jiff::Timestamp;

use crate::{
    domain::{
        carts::{
            records::{CartItemRecord, CartItemUuid, CartUuid},
            totals::CartTotals,
        },
        catalog::records::{ProductUuid, VariantUuid},
        coupons::records::CouponUuid,
    },
    money::format_amount,
};

/// One priced line of a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub item_uuid: CartItemUuid,
    pub product_uuid: ProductUuid,
    pub product_name: String,
    pub variant_uuid: Option<VariantUuid>,

    /// e.g. `Color: Black, Capacity: 128GB`; `None` for a bare product.
    pub variant_label: Option<String>,

    pub quantity: u64,
    pub unit_price: u64,
    pub line_total: u64,
}

impl CartLine {
    #[must_use]
    pub fn from_item(item: &CartItemRecord, now: Timestamp) -> Self {
        Self {
            item_uuid: item.uuid,
            product_uuid: item.product.uuid,
            product_name: item.product.name.clone(),
            variant_uuid: item.variant.as_ref().map(|variant| variant.uuid),
            variant_label: item
                .variant
                .as_ref()
                .filter(|variant| !variant.attributes.is_empty())
                .map(|variant| variant.attributes.to_string()),
            quantity: item.quantity,
            unit_price: item.unit_price(now),
            line_total: item.line_total(now),
        }
    }
}

/// A coupon attached to a cart that still applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedCoupon {
    pub uuid: CouponUuid,
    pub code: String,
    pub discount_display: String,
}

/// The customer's open cart as priced at read time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummary {
    pub cart_uuid: CartUuid,
    pub lines: Vec<CartLine>,
    pub item_count: u64,
    pub coupon: Option<AppliedCoupon>,
    pub totals: CartTotals,
}

/// Outcome of applying a coupon code to the open cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponApplication {
    pub coupon_uuid: CouponUuid,
    pub code: String,
    pub discount: u64,
    pub discount_display: String,

    /// Subtotal before the discount.
    pub subtotal: u64,

    /// Subtotal after the discount.
    pub new_subtotal: u64,

    /// Grand total including fees.
    pub new_total: u64,
}

impl CouponApplication {
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "Coupon applied successfully! You saved {} TK.",
            format_amount(self.discount)
        )
    }
}
