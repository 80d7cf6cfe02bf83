//! Catalog Records

use jiff::Timestamp;

use crate::{domain::catalog::variants::VariantAttributes, uuids::TypedUuid};

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Time-boxed sale price on a product. Both ends of the window are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashSale {
    pub price: u64,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
}

/// Product Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub name: String,
    pub price: u64,
    pub discounted_price: Option<u64>,
    pub flash_sale: Option<FlashSale>,
    pub in_stock: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Variant UUID
pub type VariantUuid = TypedUuid<VariantRecord>;

/// Product Variant Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantRecord {
    pub uuid: VariantUuid,
    pub product_uuid: ProductUuid,
    pub attributes: VariantAttributes,
    pub stock_quantity: u64,
    pub created_at: Timestamp,
}
