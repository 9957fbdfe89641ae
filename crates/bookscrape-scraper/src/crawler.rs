//! Two-stage crawl: listing pages in sequence, their detail pages concurrently.
//!
//! Each listing page is fetched only after the previous one has been parsed,
//! because its URL comes from the previous page's next link. Detail pages
//! found on a listing page are fetched, extracted, and normalized with up to
//! `max_concurrent_requests` in flight, and each finished record goes straight
//! to the sink.
//!
//! A failure on one page (fetch, missing element, bad number) is recorded in
//! the [`CrawlReport`] and the crawl carries on. Only a sink error aborts it.

use std::time::Duration;

use bookscrape_core::NormalizedRecord;
use futures::stream::{self, StreamExt};
use scraper::Html;

use crate::detail::process_detail_page;
use crate::error::ScraperError;
use crate::frontier::{Frontier, PageKind, VisitRequest};
use crate::listing::process_listing_page;
use crate::normalize::normalize_record;
use crate::sink::RecordSink;
use crate::site::SiteConfig;
use crate::source::PageSource;

#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Upper bound on detail pages in flight at once.
    pub max_concurrent_requests: usize,
    /// Pause between consecutive listing pages.
    pub inter_request_delay_ms: u64,
    /// Listing pages visited before pagination is cut off.
    pub max_listing_pages: usize,
    pub currency_symbol: String,
}

impl CrawlOptions {
    #[must_use]
    pub fn from_config(config: &bookscrape_core::AppConfig) -> Self {
        Self {
            max_concurrent_requests: config.max_concurrent_requests,
            inter_request_delay_ms: config.inter_request_delay_ms,
            max_listing_pages: config.max_listing_pages,
            currency_symbol: config.currency_symbol.clone(),
        }
    }
}

/// A page that produced no output, and why.
#[derive(Debug)]
pub struct PageFailure {
    pub url: String,
    pub kind: PageKind,
    pub error: ScraperError,
}

#[derive(Debug, Default)]
pub struct CrawlReport {
    pub records_written: usize,
    pub listing_pages_visited: usize,
    pub detail_pages_visited: usize,
    pub failures: Vec<PageFailure>,
}

impl CrawlReport {
    /// `true` when every visited page produced its output.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    fn record_failure(&mut self, url: String, kind: PageKind, error: ScraperError) {
        tracing::warn!(url = %url, kind = %kind, error = %error, "skipping page");
        self.failures.push(PageFailure { url, kind, error });
    }
}

pub struct Crawler<'a, S> {
    source: &'a S,
    site: &'a SiteConfig,
    options: CrawlOptions,
}

impl<'a, S: PageSource> Crawler<'a, S> {
    #[must_use]
    pub fn new(source: &'a S, site: &'a SiteConfig, options: CrawlOptions) -> Self {
        Self {
            source,
            site,
            options,
        }
    }

    /// Crawls every listing page reachable from the site root and every detail
    /// page they link to, delivering normalized records to `sink`.
    ///
    /// # Errors
    ///
    /// Returns the sink's error if it rejects a record. Page-level failures
    /// are collected in the returned report instead.
    pub async fn run<K: RecordSink>(&self, sink: &mut K) -> Result<CrawlReport, K::Error> {
        let mut frontier = Frontier::seeded(self.site);
        let mut report = CrawlReport::default();

        while let Some(listing_url) = frontier.next_listing() {
            if report.listing_pages_visited >= self.options.max_listing_pages {
                report.record_failure(
                    listing_url,
                    PageKind::Listing,
                    ScraperError::PaginationLimit {
                        root_url: self.site.root_url().to_owned(),
                        max_pages: self.options.max_listing_pages,
                    },
                );
                break;
            }

            if report.listing_pages_visited > 0 && self.options.inter_request_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.options.inter_request_delay_ms))
                    .await;
            }
            report.listing_pages_visited += 1;

            match self.visit_listing(&listing_url).await {
                Ok(requests) => {
                    let accepted = frontier.extend(self.site, requests);
                    tracing::info!(
                        url = %listing_url,
                        page = report.listing_pages_visited,
                        queued = accepted,
                        "processed listing page"
                    );
                }
                Err(error) => report.record_failure(listing_url, PageKind::Listing, error),
            }

            self.visit_details(frontier.drain_details(), sink, &mut report)
                .await?;
        }

        tracing::info!(
            records = report.records_written,
            listing_pages = report.listing_pages_visited,
            detail_pages = report.detail_pages_visited,
            failures = report.failures.len(),
            "crawl finished"
        );
        Ok(report)
    }

    /// Fetches one detail page and returns its normalized record.
    ///
    /// # Errors
    ///
    /// Propagates fetch, extraction, and normalization errors for the page.
    pub async fn scrape_detail(&self, url: &str) -> Result<NormalizedRecord, ScraperError> {
        let html = self.source.fetch_page(url).await?;
        let raw = process_detail_page(&Html::parse_document(&html), url)?;
        normalize_record(raw, &self.options.currency_symbol)
    }

    async fn visit_listing(&self, url: &str) -> Result<Vec<VisitRequest>, ScraperError> {
        let html = self.source.fetch_page(url).await?;
        process_listing_page(&Html::parse_document(&html), self.site, url)
    }

    async fn visit_details<K: RecordSink>(
        &self,
        urls: Vec<String>,
        sink: &mut K,
        report: &mut CrawlReport,
    ) -> Result<(), K::Error> {
        let mut outcomes = stream::iter(urls)
            .map(|url| async move {
                let result = self.scrape_detail(&url).await;
                (url, result)
            })
            .buffer_unordered(self.options.max_concurrent_requests.max(1));

        while let Some((url, result)) = outcomes.next().await {
            report.detail_pages_visited += 1;
            match result {
                Ok(record) => {
                    tracing::debug!(url = %url, "normalized record");
                    sink.accept(record)?;
                    report.records_written += 1;
                }
                Err(error) => report.record_failure(url, PageKind::Detail, error),
            }
        }

        Ok(())
    }
}
