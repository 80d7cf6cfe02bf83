//! Product pricing rules

use jiff::Timestamp;
use thiserror::Error;

use crate::domain::catalog::records::{FlashSale, ProductRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PriceError {
    #[error("discounted price cannot exceed the list price")]
    DiscountAboveList,

    #[error("flash sale price cannot exceed the list price")]
    FlashSaleAboveList,

    #[error("flash sale must start before it ends")]
    FlashSaleWindowInverted,
}

impl FlashSale {
    #[must_use]
    pub fn is_active(&self, now: Timestamp) -> bool {
        self.starts_at <= now && now <= self.ends_at
    }
}

impl ProductRecord {
    /// The unit price a shopper pays at `now`.
    ///
    /// An active flash sale wins over a discounted price, which wins over the list price.
    #[must_use]
    pub fn current_price(&self, now: Timestamp) -> u64 {
        if let Some(sale) = self.flash_sale.filter(|sale| sale.is_active(now)) {
            return sale.price;
        }

        self.discounted_price.unwrap_or(self.price)
    }
}

/// Check the price fields of a product before it is stored.
///
/// # Errors
///
/// Returns the first [`PriceError`] the fields violate.
pub fn validate_prices(
    price: u64,
    discounted_price: Option<u64>,
    flash_sale: Option<&FlashSale>,
) -> Result<(), PriceError> {
    if discounted_price.is_some_and(|discounted| discounted > price) {
        return Err(PriceError::DiscountAboveList);
    }

    if let Some(sale) = flash_sale {
        if sale.price > price {
            return Err(PriceError::FlashSaleAboveList);
        }

        if sale.starts_at > sale.ends_at {
            return Err(PriceError::FlashSaleWindowInverted);
        }
    }

    Ok(())
}
