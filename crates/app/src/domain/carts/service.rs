//! Carts service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::info;

use crate::{
    accounts::records::CustomerUuid,
    database::Db,
    domain::{
        carts::{
            data::NewCartItem,
            errors::CartsServiceError,
            records::{CartItemRecord, CartItemUuid, CartRecord},
            repositories::{PgCartItemsRepository, PgCartsRepository},
            summary::{AppliedCoupon, CartLine, CartSummary, CouponApplication},
            totals::{CartTotals, item_count, total_price},
        },
        catalog::repository::PgCatalogRepository,
        coupons::repository::PgCouponsRepository,
    },
    settings::StoreSettings,
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    settings: StoreSettings,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
    catalog_repository: PgCatalogRepository,
    coupons_repository: PgCouponsRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db, settings: StoreSettings) -> Self {
        Self {
            db,
            settings,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
            catalog_repository: PgCatalogRepository::new(),
            coupons_repository: PgCouponsRepository::new(),
        }
    }

    /// Price `cart` at `now`. An attached coupon only discounts while it still passes every rule.
    async fn summarize(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: &CartRecord,
        now: Timestamp,
    ) -> Result<CartSummary, CartsServiceError> {
        let items = self.items_repository.get_cart_items(tx, cart.uuid).await?;
        let subtotal = total_price(&items, now);

        let mut coupon = None;
        let mut discount = 0;

        if let Some(coupon_uuid) = cart.coupon_uuid {
            let record = self.coupons_repository.get_coupon(tx, coupon_uuid).await?;
            let already_used = self
                .coupons_repository
                .has_redeemed(tx, coupon_uuid, cart.customer_uuid)
                .await?;

            if record.is_valid(now, already_used, subtotal) {
                discount = record.discount_amount(subtotal);
                coupon = Some(AppliedCoupon {
                    uuid: record.uuid,
                    discount_display: record.discount_display(),
                    code: record.code,
                });
            }
        }

        Ok(CartSummary {
            cart_uuid: cart.uuid,
            lines: items
                .iter()
                .map(|item| CartLine::from_item(item, now))
                .collect(),
            item_count: item_count(&items),
            coupon,
            totals: CartTotals::compute(subtotal, discount, &self.settings),
        })
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn get_open_cart(
        &self,
        customer: CustomerUuid,
        now: Timestamp,
    ) -> Result<Option<CartSummary>, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let Some(cart) = self.carts_repository.get_open_cart(&mut tx, customer).await? else {
            return Ok(None);
        };

        let summary = self.summarize(&mut tx, &cart, now).await?;

        tx.commit().await?;

        Ok(Some(summary))
    }

    async fn item_count(&self, customer: CustomerUuid) -> Result<u64, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let count = self.items_repository.count_items(&mut tx, customer).await?;

        tx.commit().await?;

        Ok(count)
    }

    #[tracing::instrument(
        name = "carts.service.add_item",
        skip(self, item),
        fields(customer_uuid = %customer, product_uuid = %item.product_uuid, quantity = item.quantity),
        err
    )]
    async fn add_item(
        &self,
        customer: CustomerUuid,
        item: NewCartItem,
    ) -> Result<CartItemRecord, CartsServiceError> {
        if item.quantity == 0 {
            return Err(CartsServiceError::InvalidQuantity);
        }

        let selection = item.selection.normalized();

        let mut tx = self.db.begin().await?;

        let product = self
            .catalog_repository
            .get_product(&mut tx, item.product_uuid)
            .await
            .map_err(|error| match error {
                sqlx::Error::RowNotFound => CartsServiceError::ProductNotFound,
                error => error.into(),
            })?;

        let variant = if selection.is_empty() {
            None
        } else {
            let variant = self
                .catalog_repository
                .find_variant(&mut tx, product.uuid, &selection)
                .await?
                .ok_or(CartsServiceError::VariantNotFound)?;

            Some(variant.uuid)
        };

        let cart = self
            .carts_repository
            .get_or_create_open_cart(&mut tx, customer)
            .await?;

        let item_uuid = self
            .items_repository
            .upsert_cart_item(&mut tx, cart.uuid, product.uuid, variant, item.quantity)
            .await?;

        let added = self
            .items_repository
            .get_cart_item(&mut tx, cart.uuid, item_uuid)
            .await?;

        tx.commit().await?;

        info!(cart_uuid = %cart.uuid, item_uuid = %added.uuid, "added cart item");

        Ok(added)
    }

    #[tracing::instrument(
        name = "carts.service.update_item_quantity",
        skip(self),
        fields(customer_uuid = %customer, item_uuid = %item),
        err
    )]
    async fn update_item_quantity(
        &self,
        customer: CustomerUuid,
        item: CartItemUuid,
        quantity: u64,
    ) -> Result<(), CartsServiceError> {
        if quantity == 0 {
            return Err(CartsServiceError::InvalidQuantity);
        }

        let mut tx = self.db.begin().await?;

        let rows_affected = self
            .items_repository
            .update_quantity(&mut tx, customer, item, quantity)
            .await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::NotFound);
        }

        tx.commit().await?;

        info!("updated cart item quantity");

        Ok(())
    }

    #[tracing::instrument(
        name = "carts.service.remove_item",
        skip(self),
        fields(customer_uuid = %customer, item_uuid = %item),
        err
    )]
    async fn remove_item(
        &self,
        customer: CustomerUuid,
        item: CartItemUuid,
    ) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self
            .items_repository
            .delete_cart_item(&mut tx, customer, item)
            .await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::NotFound);
        }

        tx.commit().await?;

        info!("removed cart item");

        Ok(())
    }

    #[tracing::instrument(
        name = "carts.service.apply_coupon",
        skip(self),
        fields(customer_uuid = %customer),
        err
    )]
    async fn apply_coupon(
        &self,
        customer: CustomerUuid,
        code: &str,
        now: Timestamp,
    ) -> Result<CouponApplication, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self
            .carts_repository
            .lock_open_cart(&mut tx, customer)
            .await?
            .ok_or(CartsServiceError::NoOpenCart)?;

        let coupon = self
            .coupons_repository
            .get_coupon_by_code(&mut tx, code.trim())
            .await
            .map_err(|error| match error {
                sqlx::Error::RowNotFound => CartsServiceError::CouponNotFound,
                error => error.into(),
            })?;

        let items = self
            .items_repository
            .get_cart_items(&mut tx, cart.uuid)
            .await?;
        let subtotal = total_price(&items, now);

        let already_used = self
            .coupons_repository
            .has_redeemed(&mut tx, coupon.uuid, customer)
            .await?;

        coupon
            .check(now, already_used, subtotal)
            .map_err(CartsServiceError::CouponRejected)?;

        self.carts_repository
            .set_coupon(&mut tx, cart.uuid, Some(coupon.uuid))
            .await?;

        tx.commit().await?;

        let totals = CartTotals::compute(subtotal, coupon.discount_amount(subtotal), &self.settings);

        info!(coupon_uuid = %coupon.uuid, discount = totals.discount, "applied coupon");

        Ok(CouponApplication {
            coupon_uuid: coupon.uuid,
            discount_display: coupon.discount_display(),
            code: coupon.code,
            discount: totals.discount,
            subtotal,
            new_subtotal: totals.discounted_subtotal(),
            new_total: totals.grand_total,
        })
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// The customer's open cart priced at `now`, or `None` without one.
    async fn get_open_cart(
        &self,
        customer: CustomerUuid,
        now: Timestamp,
    ) -> Result<Option<CartSummary>, CartsServiceError>;

    /// Sum of quantities in the open cart; zero without one.
    async fn item_count(&self, customer: CustomerUuid) -> Result<u64, CartsServiceError>;

    /// Add a line to the open cart, creating the cart if needed.
    ///
    /// Adding a product and variant already in the cart increases that line's quantity.
    async fn add_item(
        &self,
        customer: CustomerUuid,
        item: NewCartItem,
    ) -> Result<CartItemRecord, CartsServiceError>;

    async fn update_item_quantity(
        &self,
        customer: CustomerUuid,
        item: CartItemUuid,
        quantity: u64,
    ) -> Result<(), CartsServiceError>;

    async fn remove_item(
        &self,
        customer: CustomerUuid,
        item: CartItemUuid,
    ) -> Result<(), CartsServiceError>;

    /// Attach a coupon to the open cart after checking it, without consuming a use.
    async fn apply_coupon(
        &self,
        customer: CustomerUuid,
        code: &str,
        now: Timestamp,
    ) -> Result<CouponApplication, CartsServiceError>;
}
