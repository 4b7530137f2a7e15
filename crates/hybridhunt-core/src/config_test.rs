use std::collections::HashMap;
use std::env::VarError;

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
fn parse_environment_known_values() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "HH_ENV"));
}

#[test]
fn build_app_config_defaults_from_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.catalog_path.to_str(), Some("./config/catalog.yaml"));
    assert_eq!(cfg.share_max_ids, 20);
    assert_eq!(cfg.default_sort, SortKey::EffectivePrice);
    assert_eq!(cfg.rate_limit_per_minute, 120);
}

#[test]
fn build_app_config_applies_overrides() {
    let map = HashMap::from([
        ("HH_ENV", "production"),
        ("HH_BIND_ADDR", "127.0.0.1:8080"),
        ("HH_LOG_LEVEL", "debug"),
        ("HH_CATALOG_PATH", "/srv/catalog.yaml"),
        ("HH_SHARE_MAX_IDS", "5"),
        ("HH_DEFAULT_SORT", "distance"),
        ("HH_RATE_LIMIT_PER_MINUTE", "30"),
    ]);
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.bind_addr.port(), 8080);
    assert_eq!(cfg.log_level, "debug");
    assert_eq!(cfg.catalog_path.to_str(), Some("/srv/catalog.yaml"));
    assert_eq!(cfg.share_max_ids, 5);
    assert_eq!(cfg.default_sort, SortKey::Distance);
    assert_eq!(cfg.rate_limit_per_minute, 30);
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let map = HashMap::from([("HH_BIND_ADDR", "not-a-socket-addr")]);
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "HH_BIND_ADDR"),
        "expected InvalidEnvVar(HH_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_zero_share_max_ids() {
    let map = HashMap::from([("HH_SHARE_MAX_IDS", "0")]);
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "HH_SHARE_MAX_IDS"),
        "expected InvalidEnvVar(HH_SHARE_MAX_IDS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_unknown_default_sort() {
    let map = HashMap::from([("HH_DEFAULT_SORT", "rating")]);
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "HH_DEFAULT_SORT"),
        "expected InvalidEnvVar(HH_DEFAULT_SORT), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_non_numeric_rate_limit() {
    let map = HashMap::from([("HH_RATE_LIMIT_PER_MINUTE", "lots")]);
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "HH_RATE_LIMIT_PER_MINUTE"),
        "expected InvalidEnvVar(HH_RATE_LIMIT_PER_MINUTE), got: {result:?}"
    );
}

#[test]
fn debug_output_lists_fields() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let debug = format!("{cfg:?}");
    assert!(debug.contains("catalog_path"));
    assert!(debug.contains("EffectivePrice"));
}
