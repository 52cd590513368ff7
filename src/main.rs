mod aggregation;
mod cli;
mod client;
mod config;
mod error;
mod identifier;
mod model;
mod output;
mod session;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    output::print_banner();

    let cli = Cli::parse();
    info!("Starting Carenage dashboard");
    cli.execute().await?;

    Ok(())
}
