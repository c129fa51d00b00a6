mod app;
mod cli;
mod config;
mod effects;
mod logging;
mod render;

use clap::Parser;
use litsearch_logging::lit_info;

use crate::app::StartMode;
use crate::cli::Cli;
use crate::config::ClientConfig;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = ClientConfig::resolve(&cli)?;

    logging::initialize(
        config.log_destination,
        litsearch_logging::parse_level(&config.log_level),
    );
    lit_info!(
        "litsearch starting api={} poll_interval_ms={}",
        config.api_base_url,
        config.poll_interval_ms
    );

    app::run(&config, StartMode::from_cli(&cli)).await
}
