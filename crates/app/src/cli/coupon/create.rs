use clap::Args;
use storefront_app::{
    domain::coupons::{
        CouponsService, PgCouponsService,
        data::NewCoupon,
        instant::parse_instant,
        records::{CouponDiscount, CouponUuid},
    },
    money::parse_amount,
};
use uuid::Uuid;

use crate::cli::{DatabaseArgs, StoreZoneArgs};

#[derive(Debug, Args)]
pub(crate) struct CreateCouponArgs {
    /// Code shoppers enter, at most 20 characters
    #[arg(long)]
    code: String,

    /// Whole-percent discount
    #[arg(long, conflicts_with = "fixed_amount", value_parser = clap::value_parser!(u8).range(0..=100))]
    percentage: Option<u8>,

    /// Fixed discount in taka
    #[arg(long, value_parser = parse_amount)]
    fixed_amount: Option<u64>,

    /// Start of the validity window; an offset-less value is store time
    #[arg(long)]
    valid_from: String,

    /// End of the validity window, inclusive
    #[arg(long)]
    valid_to: String,

    /// Total uses allowed across all customers; 0 is unlimited
    #[arg(long, default_value_t = 0)]
    max_uses: u64,

    /// Minimum cart total in taka
    #[arg(long, value_parser = parse_amount)]
    minimum_purchase: Option<u64>,

    /// Optional coupon UUID; generated when omitted
    #[arg(long)]
    uuid: Option<Uuid>,

    #[command(flatten)]
    zone: StoreZoneArgs,

    #[command(flatten)]
    database: DatabaseArgs,
}

pub(crate) async fn run(args: CreateCouponArgs) -> Result<(), String> {
    let zone = args.zone.time_zone()?;

    let discount = match (args.percentage, args.fixed_amount) {
        (Some(percent), _) => Some(CouponDiscount::Percentage(percent)),
        (None, Some(amount)) => Some(CouponDiscount::FixedAmount(amount)),
        (None, None) => None,
    };

    let coupon = NewCoupon {
        uuid: args.uuid.map_or_else(CouponUuid::new, CouponUuid::from_uuid),
        code: args.code,
        discount,
        valid_from: parse_instant(&args.valid_from, &zone).map_err(|error| error.to_string())?,
        valid_to: parse_instant(&args.valid_to, &zone).map_err(|error| error.to_string())?,
        max_uses: args.max_uses,
        minimum_purchase_amount: args.minimum_purchase,
    };

    let service = PgCouponsService::new(args.database.connect().await?);

    let created = service
        .create_coupon(coupon)
        .await
        .map_err(|error| format!("failed to create coupon: {error}"))?;

    println!("coupon_uuid: {}", created.uuid);
    println!("code: {}", created.code);
    println!("discount: {}", created.discount_display());
    println!("valid: {} .. {}", created.valid_from, created.valid_to);

    Ok(())
}
