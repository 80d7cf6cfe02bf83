//! Cart totals

use jiff::Timestamp;

use crate::{domain::carts::records::CartItemRecord, settings::StoreSettings};

impl CartItemRecord {
    /// Unit price at `now`. Variants are priced by their product.
    #[must_use]
    pub fn unit_price(&self, now: Timestamp) -> u64 {
        self.product.current_price(now)
    }

    #[must_use]
    pub fn line_total(&self, now: Timestamp) -> u64 {
        self.unit_price(now).saturating_mul(self.quantity)
    }
}

/// Sum of every line total at `now`.
#[must_use]
pub fn total_price(items: &[CartItemRecord], now: Timestamp) -> u64 {
    items
        .iter()
        .fold(0, |total, item| total.saturating_add(item.line_total(now)))
}

/// Sum of quantities.
#[must_use]
pub fn item_count(items: &[CartItemRecord]) -> u64 {
    items
        .iter()
        .fold(0, |count, item| count.saturating_add(item.quantity))
}

/// The money breakdown shown on a cart and stored on an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartTotals {
    pub subtotal: u64,
    pub discount: u64,
    pub shipping_charge: u64,
    pub packaging_charge: u64,
    pub grand_total: u64,
}

impl CartTotals {
    /// `(subtotal - discount) + shipping + packaging`. The discount never exceeds the subtotal.
    #[must_use]
    pub fn compute(subtotal: u64, discount: u64, settings: &StoreSettings) -> Self {
        let discount = discount.min(subtotal);

        let grand_total = (subtotal - discount)
            .saturating_add(settings.shipping_charge)
            .saturating_add(settings.packaging_charge);

        Self {
            subtotal,
            discount,
            shipping_charge: settings.shipping_charge,
            packaging_charge: settings.packaging_charge,
            grand_total,
        }
    }

    /// Subtotal after the discount, before fees.
    #[must_use]
    pub fn discounted_subtotal(&self) -> u64 {
        self.subtotal - self.discount
    }
}

#[cfg(test)]
mod tests {
    use jiff::{SignedDuration, Timestamp};

    use crate::domain::{
        carts::records::{CartItemUuid, CartUuid},
        catalog::records::{FlashSale, ProductRecord, ProductUuid},
    };

    use super::*;

    fn product(price: u64) -> ProductRecord {
        ProductRecord {
            uuid: ProductUuid::new(),
            name: "Widget".to_string(),
            price,
            discounted_price: None,
            flash_sale: None,
            in_stock: true,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    fn item(product: ProductRecord, quantity: u64) -> CartItemRecord {
        CartItemRecord {
            uuid: CartItemUuid::new(),
            cart_uuid: CartUuid::new(),
            product,
            variant: None,
            quantity,
            created_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn total_is_sum_of_quantity_times_current_price() {
        let now = Timestamp::UNIX_EPOCH;
        let items = vec![item(product(120_00), 2), item(product(35_50), 3)];

        assert_eq!(total_price(&items, now), 240_00 + 106_50);
        assert_eq!(item_count(&items), 5);
    }

    #[test]
    fn removing_a_line_reduces_total_by_that_line() {
        let now = Timestamp::UNIX_EPOCH;
        let mut items = vec![item(product(100_00), 1), item(product(250_00), 2)];

        let before = total_price(&items, now);
        let removed = items.pop().map(|line| line.line_total(now)).unwrap_or_default();

        assert_eq!(before - total_price(&items, now), 500_00);
        assert_eq!(removed, 500_00);
    }

    #[test]
    fn active_flash_sale_prices_the_line() -> Result<(), jiff::Error> {
        let now = Timestamp::UNIX_EPOCH;
        let mut sale_product = product(100_00);

        sale_product.discounted_price = Some(90_00);
        sale_product.flash_sale = Some(FlashSale {
            price: 70_00,
            starts_at: now.checked_sub(SignedDuration::from_hours(1))?,
            ends_at: now.checked_add(SignedDuration::from_hours(1))?,
        });

        let line = item(sale_product, 2);

        assert_eq!(line.unit_price(now), 70_00);
        assert_eq!(line.line_total(now), 140_00);

        let later = now.checked_add(SignedDuration::from_hours(2))?;

        assert_eq!(line.line_total(later), 180_00);

        Ok(())
    }

    #[test]
    fn empty_cart_totals_zero() {
        assert_eq!(total_price(&[], Timestamp::UNIX_EPOCH), 0);
        assert_eq!(item_count(&[]), 0);
    }

    #[test]
    fn grand_total_adds_fees_to_discounted_subtotal() {
        let totals = CartTotals::compute(500_00, 0, &StoreSettings::default());

        assert_eq!(totals.grand_total, 560_00);

        let discounted = CartTotals::compute(500_00, 100_00, &StoreSettings::default());

        assert_eq!(discounted.discounted_subtotal(), 400_00);
        assert_eq!(discounted.grand_total, 460_00);
    }

    #[test]
    fn discount_is_clamped_to_subtotal() {
        let totals = CartTotals::compute(50_00, 80_00, &StoreSettings::default());

        assert_eq!(totals.discount, 50_00);
        assert_eq!(totals.grand_total, 60_00);
    }
}
