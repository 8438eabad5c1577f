// Runtime configuration for the item lab.
// Defaults, then itemlab.toml, then ITEMLAB_* environment variables.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::training::TrainingConfig;

pub const CONFIG_FILE: &str = "itemlab.toml";
pub const ENV_PREFIX: &str = "ITEMLAB_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_model_path")]
    pub model_path: String,
    #[serde(default = "default_seed_items")]
    pub seed_items: bool,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub training: TrainingConfig,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_model_path() -> String {
    "models/model.json".to_string()
}

fn default_seed_items() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LabConfig {
    fn default() -> Self {
        LabConfig {
            host: default_host(),
            port: default_port(),
            model_path: default_model_path(),
            seed_items: default_seed_items(),
            log_level: default_log_level(),
            training: TrainingConfig::default(),
        }
    }
}

impl LabConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn validate(&self) -> Result<(), figment::Error> {
        if self.port == 0 {
            return Err(figment::Error::from("port must be non-zero"));
        }
        if self.model_path.trim().is_empty() {
            return Err(figment::Error::from("model_path cannot be empty"));
        }
        if self.training.samples < 10 {
            return Err(figment::Error::from("training.samples must be at least 10"));
        }
        let fraction = self.training.test_fraction;
        if fraction.is_nan() || fraction <= 0.0 || fraction >= 1.0 {
            return Err(figment::Error::from(
                "training.test_fraction must be between 0 and 1",
            ));
        }
        if self.training.noise_std.is_nan() || self.training.noise_std < 0.0 {
            return Err(figment::Error::from("training.noise_std must be non-negative"));
        }
        Ok(())
    }
}

pub fn figment() -> Figment {
    Figment::from(Serialized::defaults(LabConfig::default()))
        .merge(Toml::file(CONFIG_FILE))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

pub fn load_config() -> Result<LabConfig, figment::Error> {
    let config: LabConfig = figment().extract()?;
    config.validate()?;
    Ok(config)
}
