use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
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
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so an empty environment yields a config that
/// crawls `https://books.toscrape.com`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    // Validated by `SiteConfig::new` in the scraper, which also sees CLI overrides.
    let root_url = or_default("BOOKSCRAPE_ROOT_URL", "https://books.toscrape.com")
        .trim()
        .trim_end_matches('/')
        .to_string();

    let catalog_segment = or_default("BOOKSCRAPE_CATALOG_SEGMENT", "catalogue")
        .trim_matches('/')
        .to_string();
    if catalog_segment.is_empty() {
        return Err(invalid(
            "BOOKSCRAPE_CATALOG_SEGMENT",
            "catalog segment must not be empty".to_string(),
        ));
    }

    let currency_symbol = or_default("BOOKSCRAPE_CURRENCY_SYMBOL", "£");
    let log_level = or_default("BOOKSCRAPE_LOG_LEVEL", "info");

    let request_timeout_secs = parse_u64("BOOKSCRAPE_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default(
        "BOOKSCRAPE_USER_AGENT",
        "bookscrape/0.1 (catalog-extraction)",
    );
    let max_concurrent_requests = parse_usize("BOOKSCRAPE_MAX_CONCURRENT_REQUESTS", "8")?;
    if max_concurrent_requests == 0 {
        return Err(invalid(
            "BOOKSCRAPE_MAX_CONCURRENT_REQUESTS",
            "must be at least 1".to_string(),
        ));
    }
    let inter_request_delay_ms = parse_u64("BOOKSCRAPE_INTER_REQUEST_DELAY_MS", "250")?;
    let max_retries = parse_u32("BOOKSCRAPE_MAX_RETRIES", "2")?;
    let retry_backoff_base_secs = parse_u64("BOOKSCRAPE_RETRY_BACKOFF_BASE_SECS", "1")?;
    let max_listing_pages = parse_usize("BOOKSCRAPE_MAX_LISTING_PAGES", "200")?;

    Ok(AppConfig {
        root_url,
        catalog_segment,
        currency_symbol,
        log_level,
        request_timeout_secs,
        user_agent,
        max_concurrent_requests,
        inter_request_delay_ms,
        max_retries,
        retry_backoff_base_secs,
        max_listing_pages,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
