//! Catalog Data

use crate::domain::catalog::{
    records::{FlashSale, ProductUuid, VariantUuid},
    variants::VariantAttributes,
};

/// New Product Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub name: String,
    pub price: u64,
    pub discounted_price: Option<u64>,
    pub flash_sale: Option<FlashSale>,
    pub in_stock: bool,
}

/// New Variant Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVariant {
    pub uuid: VariantUuid,
    pub product_uuid: ProductUuid,
    pub attributes: VariantAttributes,
    pub stock_quantity: u64,
}
