#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Absolute site root without a trailing slash, e.g. `"https://books.toscrape.com"`.
    pub root_url: String,
    /// Path segment under which every catalog page lives, e.g. `"catalogue"`.
    pub catalog_segment: String,
    pub currency_symbol: String,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_concurrent_requests: usize,
    pub inter_request_delay_ms: u64,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
    pub max_listing_pages: usize,
}
