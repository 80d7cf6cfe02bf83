use clap::Args;
use storefront_app::domain::locations::{
    LocationsService, PgLocationsService,
    records::{AreaUuid, CityUuid, DivisionUuid},
};
use uuid::Uuid;

use crate::cli::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct CreateDivisionArgs {
    #[arg(long)]
    name: String,

    /// Optional division UUID; generated when omitted
    #[arg(long)]
    uuid: Option<Uuid>,

    #[command(flatten)]
    database: DatabaseArgs,
}

#[derive(Debug, Args)]
pub(crate) struct CreateCityArgs {
    #[arg(long)]
    name: String,

    /// Division the city belongs to
    #[arg(long)]
    division: Uuid,

    /// Optional city UUID; generated when omitted
    #[arg(long)]
    uuid: Option<Uuid>,

    #[command(flatten)]
    database: DatabaseArgs,
}

#[derive(Debug, Args)]
pub(crate) struct CreateAreaArgs {
    #[arg(long)]
    name: String,

    /// City the area belongs to
    #[arg(long)]
    city: Uuid,

    /// Optional area UUID; generated when omitted
    #[arg(long)]
    uuid: Option<Uuid>,

    #[command(flatten)]
    database: DatabaseArgs,
}

pub(crate) async fn division(args: CreateDivisionArgs) -> Result<(), String> {
    let service = PgLocationsService::new(args.database.connect().await?);

    let division = service
        .create_division(
            args.uuid.map_or_else(DivisionUuid::new, DivisionUuid::from_uuid),
            &args.name,
        )
        .await
        .map_err(|error| format!("failed to create division: {error}"))?;

    println!("division_uuid: {}", division.uuid);
    println!("division_name: {}", division.name);

    Ok(())
}

pub(crate) async fn city(args: CreateCityArgs) -> Result<(), String> {
    let service = PgLocationsService::new(args.database.connect().await?);

    let city = service
        .create_city(
            args.uuid.map_or_else(CityUuid::new, CityUuid::from_uuid),
            DivisionUuid::from_uuid(args.division),
            &args.name,
        )
        .await
        .map_err(|error| format!("failed to create city: {error}"))?;

    println!("city_uuid: {}", city.uuid);
    println!("city_name: {}", city.name);

    Ok(())
}

pub(crate) async fn area(args: CreateAreaArgs) -> Result<(), String> {
    let service = PgLocationsService::new(args.database.connect().await?);

    let area = service
        .create_area(
            args.uuid.map_or_else(AreaUuid::new, AreaUuid::from_uuid),
            CityUuid::from_uuid(args.city),
            &args.name,
        )
        .await
        .map_err(|error| format!("failed to create area: {error}"))?;

    println!("area_uuid: {}", area.uuid);
    println!("area_name: {}", area.name);

    Ok(())
}
