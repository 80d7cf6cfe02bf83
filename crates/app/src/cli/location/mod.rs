use clap::{Args, Subcommand};

mod create;

#[derive(Debug, Args)]
pub(crate) struct LocationCommand {
    #[command(subcommand)]
    command: LocationSubcommand,
}

#[derive(Debug, Subcommand)]
enum LocationSubcommand {
    CreateDivision(create::CreateDivisionArgs),
    CreateCity(create::CreateCityArgs),
    CreateArea(create::CreateAreaArgs),
}

pub(crate) async fn run(command: LocationCommand) -> Result<(), String> {
    match command.command {
        LocationSubcommand::CreateDivision(args) => create::division(args).await,
        LocationSubcommand::CreateCity(args) => create::city(args).await,
        LocationSubcommand::CreateArea(args) => create::area(args).await,
    }
}
