//! Order Data

use crate::{
    accounts::records::CustomerUuid,
    domain::{
        addresses::records::AddressUuid,
        carts::{records::CartUuid, totals::CartTotals},
        catalog::records::{ProductUuid, VariantUuid},
        coupons::records::CouponUuid,
        orders::records::{OrderItemUuid, OrderStatus, OrderUuid, PaymentMethod},
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub customer_uuid: CustomerUuid,
    pub cart_uuid: CartUuid,
    pub order_number: String,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub totals: CartTotals,
    pub coupon_uuid: Option<CouponUuid>,
    pub shipping_address_uuid: AddressUuid,
    pub billing_address_uuid: AddressUuid,
    pub phone_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderItem {
    pub uuid: OrderItemUuid,
    pub product_uuid: ProductUuid,
    pub variant_uuid: Option<VariantUuid>,
    pub quantity: u64,
    pub unit_price: u64,
}
