//! Catalog service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::catalog::{
        data::{NewProduct, NewVariant},
        errors::CatalogServiceError,
        pricing::validate_prices,
        records::{ProductRecord, ProductUuid, VariantRecord},
        repository::PgCatalogRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCatalogService {
    db: Db,
    repository: PgCatalogRepository,
}

impl PgCatalogService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCatalogRepository::new(),
        }
    }
}

#[async_trait]
impl CatalogService for PgCatalogService {
    #[tracing::instrument(
        name = "catalog.service.create_product",
        skip(self, product),
        fields(product_uuid = %product.uuid),
        err
    )]
    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, CatalogServiceError> {
        validate_prices(
            product.price,
            product.discounted_price,
            product.flash_sale.as_ref(),
        )?;

        let mut tx = self.db.begin().await?;

        let created = self.repository.create_product(&mut tx, &product).await?;

        tx.commit().await?;

        info!(price = created.price, "created product");

        Ok(created)
    }

    async fn get_product(&self, product: ProductUuid) -> Result<ProductRecord, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let product = self.repository.get_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(product)
    }

    #[tracing::instrument(
        name = "catalog.service.create_variant",
        skip(self, variant),
        fields(product_uuid = %variant.product_uuid, variant_uuid = %variant.uuid),
        err
    )]
    async fn create_variant(
        &self,
        variant: NewVariant,
    ) -> Result<VariantRecord, CatalogServiceError> {
        let variant = NewVariant {
            attributes: variant.attributes.normalized(),
            ..variant
        };

        let mut tx = self.db.begin().await?;

        let created = self.repository.create_variant(&mut tx, &variant).await?;

        tx.commit().await?;

        info!(variant = %created.attributes, "created variant");

        Ok(created)
    }

    async fn list_variants(
        &self,
        product: ProductUuid,
    ) -> Result<Vec<VariantRecord>, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let variants = self.repository.list_variants(&mut tx, product).await?;

        tx.commit().await?;

        Ok(variants)
    }
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Creates a product after checking its price fields.
    async fn create_product(&self, product: NewProduct)
    -> Result<ProductRecord, CatalogServiceError>;

    /// Retrieve a single product.
    async fn get_product(&self, product: ProductUuid) -> Result<ProductRecord, CatalogServiceError>;

    /// Creates a variant. Each attribute combination may exist once per product.
    async fn create_variant(&self, variant: NewVariant)
    -> Result<VariantRecord, CatalogServiceError>;

    /// All variants of a product, oldest first.
    async fn list_variants(
        &self,
        product: ProductUuid,
    ) -> Result<Vec<VariantRecord>, CatalogServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::{SignedDuration, Timestamp};
    use testresult::TestResult;

    use crate::{
        domain::catalog::{
            pricing::PriceError,
            records::{FlashSale, VariantUuid},
            variants::VariantAttributes,
        },
        test::TestContext,
    };

    use super::*;

    fn new_product(price: u64) -> NewProduct {
        NewProduct {
            uuid: ProductUuid::new(),
            name: "Rice Cooker".to_string(),
            price,
            discounted_price: None,
            flash_sale: None,
            in_stock: true,
        }
    }

    #[tokio::test]
    async fn create_product_round_trips_price_fields() -> TestResult {
        let ctx = TestContext::new().await;
        let now = Timestamp::now();

        let sale = FlashSale {
            price: 700_00,
            starts_at: now - SignedDuration::from_hours(1),
            ends_at: now + SignedDuration::from_hours(1),
        };

        let created = ctx
            .catalog
            .create_product(NewProduct {
                discounted_price: Some(900_00),
                flash_sale: Some(sale),
                ..new_product(1_000_00)
            })
            .await?;

        let fetched = ctx.catalog.get_product(created.uuid).await?;

        assert_eq!(fetched.price, 1_000_00);
        assert_eq!(fetched.discounted_price, Some(900_00));
        assert_eq!(fetched.flash_sale.map(|sale| sale.price), Some(700_00));
        assert_eq!(fetched.current_price(now), 700_00);

        Ok(())
    }

    #[tokio::test]
    async fn create_product_rejects_discount_above_list() {
        let ctx = TestContext::new().await;

        let result = ctx
            .catalog
            .create_product(NewProduct {
                discounted_price: Some(2_00),
                ..new_product(1_00)
            })
            .await;

        assert!(
            matches!(
                result,
                Err(CatalogServiceError::InvalidPrice(PriceError::DiscountAboveList))
            ),
            "expected InvalidPrice, got {result:?}"
        );
    }

    #[tokio::test]
    async fn get_product_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.catalog.get_product(ProductUuid::new()).await;

        assert!(
            matches!(result, Err(CatalogServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn duplicate_variant_combination_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.catalog.create_product(new_product(10_00)).await?;

        let attributes = VariantAttributes {
            color: Some("Red".to_string()),
            ..VariantAttributes::default()
        };

        ctx.catalog
            .create_variant(NewVariant {
                uuid: VariantUuid::new(),
                product_uuid: product.uuid,
                attributes: attributes.clone(),
                stock_quantity: 3,
            })
            .await?;

        let result = ctx
            .catalog
            .create_variant(NewVariant {
                uuid: VariantUuid::new(),
                product_uuid: product.uuid,
                attributes,
                stock_quantity: 1,
            })
            .await;

        assert!(
            matches!(result, Err(CatalogServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn variant_for_unknown_product_returns_invalid_reference() {
        let ctx = TestContext::new().await;

        let result = ctx
            .catalog
            .create_variant(NewVariant {
                uuid: VariantUuid::new(),
                product_uuid: ProductUuid::new(),
                attributes: VariantAttributes::default(),
                stock_quantity: 0,
            })
            .await;

        assert!(
            matches!(result, Err(CatalogServiceError::InvalidReference)),
            "expected InvalidReference, got {result:?}"
        );
    }

    #[tokio::test]
    async fn list_variants_returns_variants_in_creation_order() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.catalog.create_product(new_product(10_00)).await?;

        for size in ["S", "M"] {
            ctx.catalog
                .create_variant(NewVariant {
                    uuid: VariantUuid::new(),
                    product_uuid: product.uuid,
                    attributes: VariantAttributes {
                        size: Some(size.to_string()),
                        ..VariantAttributes::default()
                    },
                    stock_quantity: 5,
                })
                .await?;
        }

        let variants = ctx.catalog.list_variants(product.uuid).await?;
        let sizes: Vec<_> = variants
            .iter()
            .filter_map(|variant| variant.attributes.size.as_deref())
            .collect();

        assert_eq!(sizes, vec!["S", "M"]);

        Ok(())
    }
}
