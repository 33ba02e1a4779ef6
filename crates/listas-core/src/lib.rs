//! Shared domain types and configuration for the price-list pipeline.

pub mod app_config;
pub mod config;
pub mod pricing;
pub mod products;
pub mod providers;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use pricing::{MarginRule, PricingConfig, RoundingMode};
pub use products::{PricedProduct, ProductRecord, DEFAULT_CATEGORY};
pub use providers::{load_providers, ProviderConfig, ProvidersFile};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read providers file {path}: {source}")]
    ProvidersFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse providers file: {0}")]
    ProvidersFileParse(#[source] serde_yaml::Error),

    #[error("invalid providers configuration: {0}")]
    Validation(String),
}
