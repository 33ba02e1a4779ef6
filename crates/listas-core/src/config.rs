use std::str::FromStr;

use rust_decimal::Decimal;

use crate::app_config::{AppConfig, Environment};
use crate::pricing::{MarginRule, PricingConfig, RoundingMode};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so an empty environment yields the
/// production pricing formula and the conventional `./inbox`, `./output`
/// and `./public` layout.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_decimal = |var: &str, raw: &str| -> Result<Decimal, ConfigError> {
        let value = Decimal::from_str(raw.trim()).map_err(|e| invalid(var, e.to_string()))?;
        if value <= Decimal::ZERO {
            return Err(invalid(var, format!("must be positive, got {value}")));
        }
        Ok(value)
    };

    let env = parse_environment(&or_default("LISTAS_ENV", "development"))?;
    let log_level = or_default("LISTAS_LOG_LEVEL", "info");

    let providers_path = PathBuf::from(or_default(
        "LISTAS_PROVIDERS_PATH",
        "./config/providers.yaml",
    ));
    let inbox_dir = PathBuf::from(or_default("LISTAS_INBOX_DIR", "./inbox"));
    let output_dir = PathBuf::from(or_default("LISTAS_OUTPUT_DIR", "./output"));
    let public_catalog_path = PathBuf::from(or_default(
        "LISTAS_PUBLIC_CATALOG_PATH",
        "./public/productos_ram.json",
    ));
    let private_catalog_path = PathBuf::from(or_default(
        "LISTAS_PRIVATE_CATALOG_PATH",
        "./output/productos_ram_privado.json",
    ));

    // A markup, when given, replaces the divisor: the two are alternative
    // spellings of the same margin step.
    let margin = match lookup("LISTAS_PRICE_MARKUP") {
        Ok(raw) => MarginRule::Markup(parse_decimal("LISTAS_PRICE_MARKUP", &raw)?),
        Err(_) => MarginRule::Divisor(parse_decimal(
            "LISTAS_PRICE_MARGIN_DIVISOR",
            &or_default("LISTAS_PRICE_MARGIN_DIVISOR", "0.9"),
        )?),
    };

    let fee_raw = or_default("LISTAS_PRICE_FLAT_FEE_USD", "20");
    let flat_fee_usd = Decimal::from_str(fee_raw.trim())
        .map_err(|e| invalid("LISTAS_PRICE_FLAT_FEE_USD", e.to_string()))?;
    if flat_fee_usd.is_sign_negative() {
        return Err(invalid(
            "LISTAS_PRICE_FLAT_FEE_USD",
            format!("must not be negative, got {flat_fee_usd}"),
        ));
    }

    let rounding = RoundingMode::from_str(&or_default("LISTAS_PRICE_ROUNDING", "nearest"))
        .map_err(|reason| invalid("LISTAS_PRICE_ROUNDING", reason))?;

    let min_message_chars = or_default("LISTAS_MIN_MESSAGE_CHARS", "500")
        .parse::<usize>()
        .map_err(|e| invalid("LISTAS_MIN_MESSAGE_CHARS", e.to_string()))?;

    let emergency_fallback = parse_bool(
        "LISTAS_EMERGENCY_FALLBACK",
        &or_default("LISTAS_EMERGENCY_FALLBACK", "true"),
    )?;

    Ok(AppConfig {
        env,
        log_level,
        providers_path,
        inbox_dir,
        output_dir,
        public_catalog_path,
        private_catalog_path,
        pricing: PricingConfig {
            margin,
            flat_fee_usd,
            rounding,
        },
        min_message_chars,
        emergency_fallback,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "LISTAS_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected a boolean, got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
