// Copyright (c) James Kassemi, SC, US. All rights reserved.

use std::path::PathBuf;

use config::{Config, ConfigError};
use serde::{Deserialize, Serialize};

/// Run configuration, loaded from `config.toml` plus `ABT_`-prefixed
/// environment variables. Environment overrides the file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RunConfig {
    /// Delimited review input file.
    pub input_file: PathBuf,
    /// Root directory the output tables and catalog live under.
    pub output_root: PathBuf,
    #[serde(default = "default_catalog_database")]
    pub catalog_database: String,
    #[serde(default = "default_trend_table")]
    pub trend_table: String,
    #[serde(default = "default_product_table")]
    pub product_table: String,
    #[serde(default = "default_version")]
    pub version: String,
    /// Rank-error bound for approximate medians.
    #[serde(default = "default_quantile_epsilon")]
    pub quantile_epsilon: f64,
}

fn default_catalog_database() -> String {
    "amzn-music-reviews-curated".to_string()
}

fn default_trend_table() -> String {
    "time_related_review_trend".to_string()
}

fn default_product_table() -> String {
    "product_statistics".to_string()
}

fn default_version() -> String {
    "v1".to_string()
}

fn default_quantile_epsilon() -> f64 {
    0.001
}

impl RunConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(config::File::with_name("config.toml").required(false))
            .add_source(config::Environment::with_prefix("ABT"))
            .build()?;
        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input_file.as_os_str().is_empty() {
            return Err(ConfigError::Message("input_file is required".to_string()));
        }
        if self.output_root.as_os_str().is_empty() {
            return Err(ConfigError::Message("output_root is required".to_string()));
        }
        if self.version.is_empty() {
            return Err(ConfigError::Message("version must be non-empty".to_string()));
        }
        if !(self.quantile_epsilon > 0.0 && self.quantile_epsilon <= 0.5) {
            return Err(ConfigError::Message(
                "quantile_epsilon must be in (0, 0.5]".to_string(),
            ));
        }
        Ok(())
    }
}
