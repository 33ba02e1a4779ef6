use std::collections::HashMap;
use std::env::VarError;
use std::path::Path;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("unknown").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "LISTAS_ENV"));
}

#[test]
fn build_app_config_succeeds_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.providers_path, Path::new("./config/providers.yaml"));
    assert_eq!(cfg.inbox_dir, Path::new("./inbox"));
    assert_eq!(cfg.output_dir, Path::new("./output"));
    assert_eq!(
        cfg.public_catalog_path,
        Path::new("./public/productos_ram.json")
    );
    assert_eq!(
        cfg.private_catalog_path,
        Path::new("./output/productos_ram_privado.json")
    );
    assert_eq!(cfg.pricing, PricingConfig::default());
    assert_eq!(cfg.min_message_chars, 500);
    assert!(cfg.emergency_fallback);
}

#[test]
fn markup_overrides_divisor() {
    let mut map = HashMap::new();
    map.insert("LISTAS_PRICE_MARGIN_DIVISOR", "0.8");
    map.insert("LISTAS_PRICE_MARKUP", "1.18");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.pricing.margin, MarginRule::Markup(Decimal::new(118, 2)));
}

#[test]
fn divisor_override_is_used_without_markup() {
    let mut map = HashMap::new();
    map.insert("LISTAS_PRICE_MARGIN_DIVISOR", "0.85");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.pricing.margin, MarginRule::Divisor(Decimal::new(85, 2)));
}

#[test]
fn zero_divisor_is_rejected() {
    let mut map = HashMap::new();
    map.insert("LISTAS_PRICE_MARGIN_DIVISOR", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LISTAS_PRICE_MARGIN_DIVISOR"),
        "expected InvalidEnvVar(LISTAS_PRICE_MARGIN_DIVISOR), got: {result:?}"
    );
}

#[test]
fn non_numeric_markup_is_rejected() {
    let mut map = HashMap::new();
    map.insert("LISTAS_PRICE_MARKUP", "eighteen");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LISTAS_PRICE_MARKUP"),
        "expected InvalidEnvVar(LISTAS_PRICE_MARKUP), got: {result:?}"
    );
}

#[test]
fn flat_fee_override() {
    let mut map = HashMap::new();
    map.insert("LISTAS_PRICE_FLAT_FEE_USD", "25");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.pricing.flat_fee_usd, Decimal::from(25));
}

#[test]
fn negative_flat_fee_is_rejected() {
    let mut map = HashMap::new();
    map.insert("LISTAS_PRICE_FLAT_FEE_USD", "-5");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LISTAS_PRICE_FLAT_FEE_USD"),
        "expected InvalidEnvVar(LISTAS_PRICE_FLAT_FEE_USD), got: {result:?}"
    );
}

#[test]
fn rounding_ceiling_override() {
    let mut map = HashMap::new();
    map.insert("LISTAS_PRICE_ROUNDING", "ceiling");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.pricing.rounding, RoundingMode::Ceiling);
}

#[test]
fn rounding_invalid_is_rejected() {
    let mut map = HashMap::new();
    map.insert("LISTAS_PRICE_ROUNDING", "floor");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LISTAS_PRICE_ROUNDING"),
        "expected InvalidEnvVar(LISTAS_PRICE_ROUNDING), got: {result:?}"
    );
}

#[test]
fn min_message_chars_invalid_is_rejected() {
    let mut map = HashMap::new();
    map.insert("LISTAS_MIN_MESSAGE_CHARS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LISTAS_MIN_MESSAGE_CHARS"),
        "expected InvalidEnvVar(LISTAS_MIN_MESSAGE_CHARS), got: {result:?}"
    );
}

#[test]
fn emergency_fallback_can_be_disabled() {
    let mut map = HashMap::new();
    map.insert("LISTAS_EMERGENCY_FALLBACK", "off");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(!cfg.emergency_fallback);
}

#[test]
fn emergency_fallback_rejects_garbage() {
    let mut map = HashMap::new();
    map.insert("LISTAS_EMERGENCY_FALLBACK", "maybe");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LISTAS_EMERGENCY_FALLBACK"),
        "expected InvalidEnvVar(LISTAS_EMERGENCY_FALLBACK), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_on_invalid_listas_env() {
    let mut map = HashMap::new();
    map.insert("LISTAS_ENV", "producton");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LISTAS_ENV"),
        "expected InvalidEnvVar(LISTAS_ENV), got: {result:?}"
    );
}
