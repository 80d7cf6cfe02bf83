use clap::{Args, Parser, Subcommand};
use jiff::tz::{Offset, TimeZone};
use storefront_app::{
    database::{self, Db},
    settings::DEFAULT_UTC_OFFSET_HOURS,
};

mod coupon;
mod db;
mod location;
mod order;
mod product;
mod variant;

#[derive(Debug, Parser)]
#[command(name = "storefront-app", about = "Storefront administration CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Db(db::DbCommand),
    Location(location::LocationCommand),
    Product(product::ProductCommand),
    Variant(variant::VariantCommand),
    Coupon(coupon::CouponCommand),
    Order(order::OrderCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Db(command) => db::run(command).await,
            Commands::Location(command) => location::run(command).await,
            Commands::Product(command) => product::run(command).await,
            Commands::Variant(command) => variant::run(command).await,
            Commands::Coupon(command) => coupon::run(command).await,
            Commands::Order(command) => order::run(command).await,
        }
    }
}

#[derive(Debug, Args)]
pub(crate) struct DatabaseArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

impl DatabaseArgs {
    pub(crate) async fn connect(&self) -> Result<Db, String> {
        database::connect(&self.database_url)
            .await
            .map(Db::new)
            .map_err(|error| format!("failed to connect to database: {error}"))
    }
}

#[derive(Debug, Args)]
pub(crate) struct StoreZoneArgs {
    /// Store offset from UTC, used for timestamps given without one
    #[arg(
        long,
        env = "STORE_UTC_OFFSET_HOURS",
        default_value_t = DEFAULT_UTC_OFFSET_HOURS,
        allow_hyphen_values = true
    )]
    utc_offset_hours: i8,
}

impl StoreZoneArgs {
    pub(crate) fn offset(&self) -> Result<Offset, String> {
        Offset::from_hours(self.utc_offset_hours)
            .map_err(|error| format!("invalid store offset: {error}"))
    }

    pub(crate) fn time_zone(&self) -> Result<TimeZone, String> {
        self.offset().map(TimeZone::fixed)
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, error::ErrorKind};

    use super::*;

    const DB: [&str; 2] = ["--database-url", "postgres://localhost/storefront"];

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_location_create_division() {
        let args = ["storefront-app", "location", "create-division", "--name", "Dhaka"];
        let cli = Cli::try_parse_from(args.into_iter().chain(DB));

        assert!(matches!(
            cli.map(|cli| cli.command),
            Ok(Commands::Location(_))
        ));
    }

    #[test]
    fn coupon_cannot_be_both_percentage_and_fixed() {
        let args = [
            "storefront-app",
            "coupon",
            "create",
            "--code",
            "SAVE10",
            "--percentage",
            "10",
            "--fixed-amount",
            "100",
            "--valid-from",
            "2026-01-01 00:00",
            "--valid-to",
            "2026-02-01 00:00",
        ];

        let error = Cli::try_parse_from(args.into_iter().chain(DB))
            .err()
            .map(|error| error.kind());

        assert_eq!(error, Some(ErrorKind::ArgumentConflict));
    }

    #[test]
    fn percentage_above_one_hundred_is_rejected() {
        let args = [
            "storefront-app",
            "coupon",
            "create",
            "--code",
            "TOOMUCH",
            "--percentage",
            "101",
            "--valid-from",
            "2026-01-01 00:00",
            "--valid-to",
            "2026-02-01 00:00",
        ];

        let error = Cli::try_parse_from(args.into_iter().chain(DB))
            .err()
            .map(|error| error.kind());

        assert_eq!(error, Some(ErrorKind::ValueValidation));
    }

    #[test]
    fn parses_order_set_status() {
        let order = "0195f2a4-8c2e-7b61-9a4d-3f5e6a7b8c9d";
        let args = [
            "storefront-app",
            "order",
            "set-status",
            "--order",
            order,
            "--status",
            "shipped",
        ];

        let cli = Cli::try_parse_from(args.into_iter().chain(DB));

        assert!(matches!(cli.map(|cli| cli.command), Ok(Commands::Order(_))));
    }

    #[test]
    fn unknown_order_status_is_rejected() {
        let args = [
            "storefront-app",
            "order",
            "set-status",
            "--order",
            "0195f2a4-8c2e-7b61-9a4d-3f5e6a7b8c9d",
            "--status",
            "lost",
        ];

        let error = Cli::try_parse_from(args.into_iter().chain(DB))
            .err()
            .map(|error| error.kind());

        assert_eq!(error, Some(ErrorKind::ValueValidation));
    }

    #[test]
    fn store_offset_accepts_negative_hours() -> Result<(), String> {
        let zone = StoreZoneArgs {
            utc_offset_hours: -5,
        }
        .time_zone()?;

        assert_eq!(
            zone.to_fixed_offset().map_err(|error| error.to_string())?,
            Offset::constant(-5)
        );

        Ok(())
    }
}
