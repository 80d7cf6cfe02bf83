//! Cart Data

use crate::domain::catalog::{records::ProductUuid, variants::VariantAttributes};

/// A line to add to the open cart.
///
/// An empty `selection` adds the bare product; otherwise the first variant matching every
/// selected attribute is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCartItem {
    pub product_uuid: ProductUuid,
    pub quantity: u64,
    pub selection: VariantAttributes,
}
