use std::path::PathBuf;

use crate::pricing::PricingConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub providers_path: PathBuf,
    /// Root of the exported chat messages, one sub-directory per provider slug.
    pub inbox_dir: PathBuf,
    /// Destination for broadcast text, spreadsheets and raw list captures.
    pub output_dir: PathBuf,
    pub public_catalog_path: PathBuf,
    pub private_catalog_path: PathBuf,
    pub pricing: PricingConfig,
    /// Minimum message length (chars) for the completeness check and the
    /// emergency filter fallback.
    pub min_message_chars: usize,
    pub emergency_fallback: bool,
}
