use std::future::Future;

use crate::error::ScraperError;

/// Anything that can turn a page URL into its HTML body.
///
/// [`crate::CatalogClient`] is the HTTP implementation; tests serve fixture
/// pages from memory.
pub trait PageSource {
    fn fetch_page(&self, url: &str) -> impl Future<Output = Result<String, ScraperError>>;
}
