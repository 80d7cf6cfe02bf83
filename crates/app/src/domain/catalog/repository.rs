//! Catalog Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    database::{
        amount_to_i64, try_get_amount, try_get_optional_amount, try_get_quantity,
    },
    domain::catalog::{
        data::{NewProduct, NewVariant},
        records::{FlashSale, ProductRecord, ProductUuid, VariantRecord, VariantUuid},
        variants::VariantAttributes,
    },
};

const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const CREATE_VARIANT_SQL: &str = include_str!("sql/create_variant.sql");
const LIST_VARIANTS_SQL: &str = include_str!("sql/list_variants.sql");
const FIND_VARIANT_SQL: &str = include_str!("sql/find_variant.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCatalogRepository;

impl PgCatalogRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: &NewProduct,
    ) -> Result<ProductRecord, sqlx::Error> {
        let flash_sale_price = product
            .flash_sale
            .map(|sale| amount_to_i64(sale.price, "flash_sale_price"))
            .transpose()?;

        let discounted_price = product
            .discounted_price
            .map(|price| amount_to_i64(price, "discounted_price"))
            .transpose()?;

        query_as::<Postgres, ProductRecord>(CREATE_PRODUCT_SQL)
            .bind(product.uuid.into_uuid())
            .bind(&product.name)
            .bind(amount_to_i64(product.price, "price")?)
            .bind(discounted_price)
            .bind(flash_sale_price)
            .bind(product.flash_sale.map(|sale| SqlxTimestamp::from(sale.starts_at)))
            .bind(product.flash_sale.map(|sale| SqlxTimestamp::from(sale.ends_at)))
            .bind(product.in_stock)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_variant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: &NewVariant,
    ) -> Result<VariantRecord, sqlx::Error> {
        query_as::<Postgres, VariantRecord>(CREATE_VARIANT_SQL)
            .bind(variant.uuid.into_uuid())
            .bind(variant.product_uuid.into_uuid())
            .bind(variant.attributes.color.as_deref())
            .bind(variant.attributes.size.as_deref())
            .bind(variant.attributes.brand.as_deref())
            .bind(variant.attributes.capacity.as_deref())
            .bind(amount_to_i64(variant.stock_quantity, "stock_quantity")?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_variants(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<Vec<VariantRecord>, sqlx::Error> {
        query_as::<Postgres, VariantRecord>(LIST_VARIANTS_SQL)
            .bind(product.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    /// First variant of `product` matching every attribute present in `selection`.
    pub(crate) async fn find_variant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        selection: &VariantAttributes,
    ) -> Result<Option<VariantRecord>, sqlx::Error> {
        query_as::<Postgres, VariantRecord>(FIND_VARIANT_SQL)
            .bind(product.into_uuid())
            .bind(selection.color.as_deref())
            .bind(selection.size.as_deref())
            .bind(selection.brand.as_deref())
            .bind(selection.capacity.as_deref())
            .fetch_optional(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        try_get_product(row, "")
    }
}

/// Read a product from columns named `{prefix}{column}`, for queries that join products.
pub(crate) fn try_get_product(row: &PgRow, prefix: &str) -> sqlx::Result<ProductRecord> {
    let column = |name: &str| format!("{prefix}{name}");

    let flash_sale_price = try_get_optional_amount(row, &column("flash_sale_price"))?;
    let flash_sale_start =
        row.try_get::<Option<SqlxTimestamp>, _>(column("flash_sale_start").as_str())?;
    let flash_sale_end =
        row.try_get::<Option<SqlxTimestamp>, _>(column("flash_sale_end").as_str())?;

    let flash_sale = match (flash_sale_price, flash_sale_start, flash_sale_end) {
        (Some(price), Some(starts_at), Some(ends_at)) => Some(FlashSale {
            price,
            starts_at: starts_at.to_jiff(),
            ends_at: ends_at.to_jiff(),
        }),
        _ => None,
    };

    Ok(ProductRecord {
        uuid: ProductUuid::from_uuid(row.try_get(column("uuid").as_str())?),
        name: row.try_get(column("name").as_str())?,
        price: try_get_amount(row, &column("price"))?,
        discounted_price: try_get_optional_amount(row, &column("discounted_price"))?,
        flash_sale,
        in_stock: row.try_get(column("in_stock").as_str())?,
        created_at: row
            .try_get::<SqlxTimestamp, _>(column("created_at").as_str())?
            .to_jiff(),
        updated_at: row
            .try_get::<SqlxTimestamp, _>(column("updated_at").as_str())?
            .to_jiff(),
    })
}

impl<'r> FromRow<'r, PgRow> for VariantRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: VariantUuid::from_uuid(row.try_get("uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            attributes: VariantAttributes {
                color: row.try_get("color")?,
                size: row.try_get("size")?,
                brand: row.try_get("brand")?,
                capacity: row.try_get("capacity")?,
            },
            stock_quantity: try_get_quantity(row, "stock_quantity")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
