use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::services::recency::RecencyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Recency store error: {0}")]
    Recency(#[from] RecencyError),
}

pub type Result<T> = std::result::Result<T, AppError>;
