use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::services::composer::SUPPLEMENTARY_LIMIT;
use crate::services::recency::RedisRecencyStore;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read environment: {0}")]
    Env(#[from] envy::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Service configuration, read from `LUNCH_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,
    /// Redis recency backend; in-memory when unset
    #[serde(default)]
    pub redis_url: Option<String>,
    #[serde(default = "default_recency_key_prefix")]
    pub recency_key_prefix: String,
    #[serde(default)]
    pub recency_ttl_secs: Option<u64>,
    /// Fixed seed for reproducible selection
    #[serde(default)]
    pub rng_seed: Option<u64>,
    #[serde(default = "default_supplementary_limit")]
    pub supplementary_limit: usize,
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("data/templates.json")
}

fn default_recency_key_prefix() -> String {
    RedisRecencyStore::DEFAULT_KEY_PREFIX.to_string()
}

fn default_supplementary_limit() -> usize {
    SUPPLEMENTARY_LIMIT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            redis_url: None,
            recency_key_prefix: default_recency_key_prefix(),
            recency_ttl_secs: None,
            rng_seed: None,
            supplementary_limit: default_supplementary_limit(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Builds a config from arbitrary `(key, value)` pairs using the same
    /// `LUNCH_` prefix as the process environment.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config: Config = envy::prefixed("LUNCH_").from_iter(vars)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.supplementary_limit == 0 {
            return Err(ConfigError::Invalid(
                "LUNCH_SUPPLEMENTARY_LIMIT must be greater than 0".to_string(),
            ));
        }
        if self.recency_key_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "LUNCH_RECENCY_KEY_PREFIX must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
