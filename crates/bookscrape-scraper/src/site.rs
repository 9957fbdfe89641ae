//! Site root, catalog segment, and link resolution for catalog pages.
//!
//! Relative links on the catalog do not share a common base: the first
//! listing page (the site root) links to `catalogue/<item>/index.html` and
//! `catalogue/page-2.html`, while every later listing page already lives under
//! `/catalogue/` and links to `<item>/index.html` and `page-3.html`. Links are
//! therefore resolved with two rules instead of standard base-URL joining:
//!
//! - href contains the catalog segment → `<root>/<href>`
//! - otherwise → `<root>/<segment>/<href>`

use crate::error::ScraperError;

/// Seed configuration for one crawl: the site root and the catalog segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    root_url: String,
    catalog_segment: String,
    host: String,
}

impl SiteConfig {
    /// Creates a site config from an absolute root URL and a catalog segment.
    ///
    /// Trailing slashes on the root and surrounding slashes on the segment
    /// are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] if `root_url` is not an absolute
    /// http(s) URL with a host, or if `catalog_segment` is empty.
    pub fn new(root_url: &str, catalog_segment: &str) -> Result<Self, ScraperError> {
        let root_url = root_url.trim().trim_end_matches('/');
        let parsed = reqwest::Url::parse(root_url).map_err(|e| ScraperError::InvalidUrl {
            url: root_url.to_owned(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ScraperError::InvalidUrl {
                url: root_url.to_owned(),
                reason: format!("unsupported scheme {}", parsed.scheme()),
            });
        }
        let host = parsed
            .host_str()
            .ok_or_else(|| ScraperError::InvalidUrl {
                url: root_url.to_owned(),
                reason: "root URL has no host".to_owned(),
            })?
            .to_owned();

        let catalog_segment = catalog_segment.trim().trim_matches('/');
        if catalog_segment.is_empty() {
            return Err(ScraperError::InvalidUrl {
                url: root_url.to_owned(),
                reason: "catalog segment is empty".to_owned(),
            });
        }

        Ok(Self {
            root_url: root_url.to_owned(),
            catalog_segment: catalog_segment.to_owned(),
            host,
        })
    }

    /// Builds the site config from the application config.
    ///
    /// # Errors
    ///
    /// See [`SiteConfig::new`].
    pub fn from_config(config: &bookscrape_core::AppConfig) -> Result<Self, ScraperError> {
        Self::new(&config.root_url, &config.catalog_segment)
    }

    #[must_use]
    pub fn root_url(&self) -> &str {
        &self.root_url
    }

    #[must_use]
    pub fn catalog_segment(&self) -> &str {
        &self.catalog_segment
    }

    /// Resolves an href found on a listing page to an absolute URL using the
    /// two catalog rules described in the module docs.
    #[must_use]
    pub fn resolve(&self, href: &str) -> String {
        let href = href.trim().trim_start_matches('/');
        if href.contains(self.catalog_segment.as_str()) {
            format!("{}/{href}", self.root_url)
        } else {
            format!("{}/{}/{href}", self.root_url, self.catalog_segment)
        }
    }

    /// Returns `true` if `url` points at the same host as the site root.
    #[must_use]
    pub fn is_on_site(&self, url: &str) -> bool {
        reqwest::Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.eq_ignore_ascii_case(&self.host)))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn books() -> SiteConfig {
        SiteConfig::new("https://books.toscrape.com", "catalogue").unwrap()
    }

    #[test]
    fn resolves_href_that_already_contains_segment() {
        assert_eq!(
            books().resolve("catalogue/foo.html"),
            "https://books.toscrape.com/catalogue/foo.html"
        );
    }

    #[test]
    fn resolves_href_without_segment_under_catalog() {
        assert_eq!(
            books().resolve("foo.html"),
            "https://books.toscrape.com/catalogue/foo.html"
        );
    }

    #[test]
    fn resolves_item_links_from_first_and_later_listing_pages_identically() {
        let site = books();
        assert_eq!(
            site.resolve("catalogue/a-light-in-the-attic_1000/index.html"),
            site.resolve("a-light-in-the-attic_1000/index.html")
        );
    }

    #[test]
    fn resolves_next_page_links() {
        let site = books();
        assert_eq!(
            site.resolve("catalogue/page-2.html"),
            "https://books.toscrape.com/catalogue/page-2.html"
        );
        assert_eq!(
            site.resolve("page-3.html"),
            "https://books.toscrape.com/catalogue/page-3.html"
        );
    }

    #[test]
    fn segment_match_is_a_substring_check() {
        // "catalogue" anywhere in the href selects the root-prefix rule.
        assert_eq!(
            books().resolve("old-catalogue-item.html"),
            "https://books.toscrape.com/old-catalogue-item.html"
        );
    }

    #[test]
    fn root_trailing_slash_and_leading_href_slash_do_not_double() {
        let site = SiteConfig::new("https://books.toscrape.com/", "/catalogue/").unwrap();
        assert_eq!(site.root_url(), "https://books.toscrape.com");
        assert_eq!(site.catalog_segment(), "catalogue");
        assert_eq!(
            site.resolve("/catalogue/foo.html"),
            "https://books.toscrape.com/catalogue/foo.html"
        );
    }

    #[test]
    fn rejects_relative_root() {
        let err = SiteConfig::new("books.toscrape.com", "catalogue").unwrap_err();
        assert!(
            matches!(err, ScraperError::InvalidUrl { .. }),
            "expected InvalidUrl, got: {err:?}"
        );
    }

    #[test]
    fn rejects_root_with_whitespace_in_host() {
        let err = SiteConfig::new("https://a b", "catalogue").unwrap_err();
        assert!(
            matches!(err, ScraperError::InvalidUrl { ref url, .. } if url == "https://a b"),
            "expected InvalidUrl, got: {err:?}"
        );
    }

    #[test]
    fn rejects_non_http_root() {
        let err = SiteConfig::new("ftp://books.toscrape.com", "catalogue").unwrap_err();
        assert!(matches!(err, ScraperError::InvalidUrl { .. }));
    }

    #[test]
    fn rejects_empty_segment() {
        let err = SiteConfig::new("https://books.toscrape.com", "/").unwrap_err();
        assert!(matches!(err, ScraperError::InvalidUrl { .. }));
    }

    #[test]
    fn is_on_site_compares_hosts() {
        let site = books();
        assert!(site.is_on_site("https://books.toscrape.com/catalogue/page-2.html"));
        assert!(site.is_on_site("http://BOOKS.toscrape.com/index.html"));
        assert!(!site.is_on_site("https://quotes.toscrape.com/page/2/"));
        assert!(!site.is_on_site("not a url"));
    }
}
