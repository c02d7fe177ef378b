use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const MAX_PAGE_SIZE: u32 = 250;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
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
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing is decoupled from the real environment so tests can drive it
/// with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let store_domain = require("SHOPIFY_STORE_DOMAIN")?;
    let storefront_token = require("SHOPIFY_STOREFRONT_TOKEN")?;

    let env = parse_environment(&or_default("MISIMA_ENV", "development"));

    let bind_addr = parse_addr("MISIMA_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("MISIMA_LOG_LEVEL", "info");
    let storefront_api_version = or_default("MISIMA_STOREFRONT_API_VERSION", "2024-01");

    let collection_handle = or_default("MISIMA_COLLECTION_HANDLE", "all");
    let collection_page_size = page_bounded(
        "MISIMA_COLLECTION_PAGE_SIZE",
        parse_u32("MISIMA_COLLECTION_PAGE_SIZE", "100")?,
    )?;
    let recommended_count = page_bounded(
        "MISIMA_RECOMMENDED_COUNT",
        parse_u32("MISIMA_RECOMMENDED_COUNT", "6")?,
    )?;

    let request_timeout_secs = parse_u64("MISIMA_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("MISIMA_USER_AGENT", "misima/0.1 (storefront)");
    let max_retries = parse_u32("MISIMA_MAX_RETRIES", "3")?;
    let retry_backoff_base_secs = parse_u64("MISIMA_RETRY_BACKOFF_BASE_SECS", "1")?;
    let rate_limit_per_minute = parse_usize("MISIMA_RATE_LIMIT_PER_MINUTE", "120")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        store_domain,
        storefront_token,
        storefront_api_version,
        collection_handle,
        collection_page_size,
        recommended_count,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_secs,
        rate_limit_per_minute,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
/// The Storefront API serves at most 250 nodes per connection.
fn page_bounded(var: &str, value: u32) -> Result<u32, ConfigError> {
    if (1..=MAX_PAGE_SIZE).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("{value} is outside 1..={MAX_PAGE_SIZE}"),
        })
    }
}

fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
