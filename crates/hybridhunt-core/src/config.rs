use crate::app_config::{AppConfig, Environment};
use crate::rank::SortKey;
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
/// Every variable has a default, so an empty environment yields a usable
/// development config.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let env = parse_environment(&or_default("HH_ENV", "development"))?;

    let bind_addr = or_default("HH_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("HH_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("HH_LOG_LEVEL", "info");
    let catalog_path = PathBuf::from(or_default("HH_CATALOG_PATH", "./config/catalog.yaml"));

    let share_max_ids = or_default("HH_SHARE_MAX_IDS", "20")
        .parse::<usize>()
        .map_err(|e| invalid("HH_SHARE_MAX_IDS", e.to_string()))?;
    if share_max_ids == 0 {
        return Err(invalid("HH_SHARE_MAX_IDS", "must be at least 1".to_string()));
    }

    let default_sort = or_default("HH_DEFAULT_SORT", "effective_price")
        .parse::<SortKey>()
        .map_err(|e| invalid("HH_DEFAULT_SORT", e.to_string()))?;

    let rate_limit_per_minute = or_default("HH_RATE_LIMIT_PER_MINUTE", "120")
        .parse::<u32>()
        .map_err(|e| invalid("HH_RATE_LIMIT_PER_MINUTE", e.to_string()))?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        catalog_path,
        share_max_ids,
        default_sort,
        rate_limit_per_minute,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "production" => Ok(Environment::Production),
        "test" => Ok(Environment::Test),
        other => Err(ConfigError::InvalidEnvVar {
            var: "HH_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
