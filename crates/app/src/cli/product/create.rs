use clap::Args;
use storefront_app::{
    domain::{
        catalog::{
            CatalogService, PgCatalogService,
            data::NewProduct,
            records::{FlashSale, ProductUuid},
        },
        coupons::instant::parse_instant,
    },
    money::{format_taka, parse_amount},
};
use uuid::Uuid;

use crate::cli::{DatabaseArgs, StoreZoneArgs};

#[derive(Debug, Args)]
pub(crate) struct CreateProductArgs {
    #[arg(long)]
    name: String,

    /// Regular price in taka, e.g. `1250` or `99.50`
    #[arg(long, value_parser = parse_amount)]
    price: u64,

    /// Standing discounted price in taka
    #[arg(long, value_parser = parse_amount)]
    discounted_price: Option<u64>,

    /// Flash sale price in taka; needs `--flash-sale-start` and `--flash-sale-end`
    #[arg(long, value_parser = parse_amount, requires_all = ["flash_sale_start", "flash_sale_end"])]
    flash_sale_price: Option<u64>,

    #[arg(long, requires = "flash_sale_price")]
    flash_sale_start: Option<String>,

    #[arg(long, requires = "flash_sale_price")]
    flash_sale_end: Option<String>,

    /// List the product as out of stock
    #[arg(long)]
    out_of_stock: bool,

    /// Optional product UUID; generated when omitted
    #[arg(long)]
    uuid: Option<Uuid>,

    #[command(flatten)]
    zone: StoreZoneArgs,

    #[command(flatten)]
    database: DatabaseArgs,
}

pub(crate) async fn run(args: CreateProductArgs) -> Result<(), String> {
    let zone = args.zone.time_zone()?;

    let flash_sale = match (
        args.flash_sale_price,
        args.flash_sale_start,
        args.flash_sale_end,
    ) {
        (Some(price), Some(start), Some(end)) => Some(FlashSale {
            price,
            starts_at: parse_instant(&start, &zone).map_err(|error| error.to_string())?,
            ends_at: parse_instant(&end, &zone).map_err(|error| error.to_string())?,
        }),
        _ => None,
    };

    let service = PgCatalogService::new(args.database.connect().await?);

    let product = service
        .create_product(NewProduct {
            uuid: args.uuid.map_or_else(ProductUuid::new, ProductUuid::from_uuid),
            name: args.name,
            price: args.price,
            discounted_price: args.discounted_price,
            flash_sale,
            in_stock: !args.out_of_stock,
        })
        .await
        .map_err(|error| format!("failed to create product: {error}"))?;

    println!("product_uuid: {}", product.uuid);
    println!("product_name: {}", product.name);
    println!("price: {}", format_taka(product.price));

    Ok(())
}
