use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by {domain} (retry after {retry_after_secs}s)")]
    RateLimited {
        domain: String,
        retry_after_secs: u64,
    },

    #[error("page not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("no element matching {selector} on {url}")]
    SelectorNotFound { url: String, selector: String },

    #[error("field {field} is not a valid number: \"{value}\"")]
    MalformedNumber { field: &'static str, value: String },

    #[error("field {field} is empty")]
    MissingField { field: &'static str },

    #[error("pagination limit reached for {root_url}: exceeded {max_pages} listing pages")]
    PaginationLimit { root_url: String, max_pages: usize },
}

impl ScraperError {
    /// Returns `true` for errors raised by the fetch layer rather than by
    /// extraction or normalization.
    #[must_use]
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Self::Http(_)
                | Self::RateLimited { .. }
                | Self::NotFound { .. }
                | Self::UnexpectedStatus { .. }
        )
    }
}
