// Item lab - main.rs
// Loads configuration, installs logging and serves the HTTP API.

use clap::Parser;

use itemlab::cli::Cli;
use itemlab::config::load_config;
use itemlab::logging::init_tracing;
use itemlab::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = cli.apply(load_config()?);
    config.validate()?;
    init_tracing(&config.log_level);

    tracing::info!(
        model_path = %config.model_path,
        seed_items = config.seed_items,
        "Config loaded"
    );

    server::run(config).await
}
