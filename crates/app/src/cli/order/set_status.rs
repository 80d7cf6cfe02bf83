use clap::Args;
use jiff::Timestamp;
use storefront_app::{
    domain::orders::{
        OrdersService, PgOrdersService,
        records::{OrderStatus, OrderUuid},
    },
    settings::StoreSettings,
};
use uuid::Uuid;

use crate::cli::{DatabaseArgs, StoreZoneArgs};

#[derive(Debug, Args)]
pub(crate) struct SetStatusArgs {
    #[arg(long)]
    order: Uuid,

    /// One of pending, paid, processing, shipped, delivered or cancelled
    #[arg(long)]
    status: OrderStatus,

    #[command(flatten)]
    zone: StoreZoneArgs,

    #[command(flatten)]
    database: DatabaseArgs,
}

pub(crate) async fn run(args: SetStatusArgs) -> Result<(), String> {
    let settings = StoreSettings {
        utc_offset: args.zone.offset()?,
        ..StoreSettings::default()
    };

    let service = PgOrdersService::new(args.database.connect().await?, settings);

    let order = service
        .update_status(OrderUuid::from_uuid(args.order), args.status, Timestamp::now())
        .await
        .map_err(|error| format!("failed to update order: {error}"))?;

    println!("order_uuid: {}", order.uuid);
    println!("order_number: {}", order.order_number);
    println!("status: {}", order.status);

    Ok(())
}
