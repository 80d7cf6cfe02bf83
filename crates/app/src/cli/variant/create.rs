use clap::Args;
use storefront_app::domain::catalog::{
    CatalogService, PgCatalogService,
    data::NewVariant,
    records::{ProductUuid, VariantUuid},
    variants::VariantAttributes,
};
use uuid::Uuid;

use crate::cli::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct CreateVariantArgs {
    /// Product the variant belongs to
    #[arg(long)]
    product: Uuid,

    #[arg(long)]
    color: Option<String>,

    #[arg(long)]
    size: Option<String>,

    #[arg(long)]
    brand: Option<String>,

    #[arg(long)]
    capacity: Option<String>,

    #[arg(long, default_value_t = 0)]
    stock: u64,

    /// Optional variant UUID; generated when omitted
    #[arg(long)]
    uuid: Option<Uuid>,

    #[command(flatten)]
    database: DatabaseArgs,
}

pub(crate) async fn run(args: CreateVariantArgs) -> Result<(), String> {
    let attributes = VariantAttributes {
        color: args.color,
        size: args.size,
        brand: args.brand,
        capacity: args.capacity,
    }
    .normalized();

    if attributes.is_empty() {
        return Err("a variant needs at least one of --color, --size, --brand or --capacity".into());
    }

    let service = PgCatalogService::new(args.database.connect().await?);

    let variant = service
        .create_variant(NewVariant {
            uuid: args.uuid.map_or_else(VariantUuid::new, VariantUuid::from_uuid),
            product_uuid: ProductUuid::from_uuid(args.product),
            attributes,
            stock_quantity: args.stock,
        })
        .await
        .map_err(|error| format!("failed to create variant: {error}"))?;

    println!("variant_uuid: {}", variant.uuid);

    for (attribute, value) in variant.attributes.labels() {
        println!("{attribute}: {value}");
    }

    Ok(())
}
