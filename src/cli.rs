use clap::Parser;

use crate::config::LabConfig;

/// Item lab HTTP server
#[derive(Parser, Debug)]
#[command(
    name = "itemlab",
    version,
    about = "In-memory item CRUD and linear-regression prediction API"
)]
pub struct Cli {
    /// Host/IP to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind
    #[arg(long)]
    pub port: Option<u16>,

    /// Model file to load (created if missing)
    #[arg(long)]
    pub model_path: Option<String>,

    /// Start with an empty item store
    #[arg(long)]
    pub no_seed: bool,
}

impl Cli {
    /// Command-line flags win over file and environment configuration.
    pub fn apply(&self, mut config: LabConfig) -> LabConfig {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(path) = &self.model_path {
            config.model_path = path.clone();
        }
        if self.no_seed {
            config.seed_items = false;
        }
        config
    }
}
