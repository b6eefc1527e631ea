use crate::commands::{Cli, Commands};
use crate::inspect::{list_tracks, locate_sector};
use anyhow::Result;
use clap::Parser;

mod commands;
mod error;
mod inspect;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init()?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Tracks(cmd) => list_tracks(cmd).await?,
        Commands::Locate(cmd) => locate_sector(cmd).await?,
    }

    Ok(())
}
