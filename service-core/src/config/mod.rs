use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_json")]
    pub log_json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_json() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: default_log_json(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::load_from("configuration")
    }

    /// Load from an optional configuration file (any format the `config` crate
    /// recognises by extension) layered under `APP__*` environment variables.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let config = Cfg::builder()
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
