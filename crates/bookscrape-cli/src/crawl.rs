//! Command handlers for `crawl` and `page`.
//!
//! Page-level failures are logged and summarized rather than propagated, so
//! a crawl that loses some pages still exits successfully with the records
//! it did collect.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use bookscrape_core::AppConfig;
use bookscrape_scraper::{
    CatalogClient, CrawlOptions, CrawlReport, Crawler, PageSource, SiteConfig,
};

use crate::output::{JsonArraySink, JsonLinesSink};
use crate::OutputFormat;

/// Applies `crawl` flags on top of the environment-derived config.
///
/// # Errors
///
/// Returns an error if `concurrency` or `max_pages` is zero.
pub(crate) fn apply_overrides(
    config: &mut AppConfig,
    root_url: Option<String>,
    max_pages: Option<usize>,
    concurrency: Option<usize>,
) -> anyhow::Result<()> {
    if let Some(root_url) = root_url {
        config.root_url = root_url.trim().trim_end_matches('/').to_owned();
    }
    if let Some(max_pages) = max_pages {
        anyhow::ensure!(max_pages > 0, "--max-pages must be at least 1");
        config.max_listing_pages = max_pages;
    }
    if let Some(concurrency) = concurrency {
        anyhow::ensure!(concurrency > 0, "--concurrency must be at least 1");
        config.max_concurrent_requests = concurrency;
    }
    Ok(())
}

/// Crawls the whole catalog and writes every normalized record to `output`
/// (stdout when `None`).
///
/// With `dry_run` the resolved settings are printed and nothing is fetched.
///
/// # Errors
///
/// Returns an error if the root URL is invalid, the HTTP client cannot be
/// built, or the output cannot be written.
pub(crate) async fn run_crawl(
    config: &AppConfig,
    output: Option<&Path>,
    format: OutputFormat,
    dry_run: bool,
) -> anyhow::Result<()> {
    let site = SiteConfig::from_config(config).context("invalid crawl root")?;

    if dry_run {
        println!("[dry-run] would crawl {}", site.root_url());
        println!("  catalog segment:      {}", site.catalog_segment());
        println!("  max listing pages:    {}", config.max_listing_pages);
        println!("  concurrent requests:  {}", config.max_concurrent_requests);
        println!("  listing page delay:   {} ms", config.inter_request_delay_ms);
        println!(
            "  output:               {} ({format:?})",
            output.map_or_else(|| "stdout".to_owned(), |p| p.display().to_string())
        );
        return Ok(());
    }

    let client = CatalogClient::from_config(config).context("failed to build HTTP client")?;
    let crawler = Crawler::new(&client, &site, CrawlOptions::from_config(config));
    let writer = open_output(output)?;

    tracing::info!(root = %site.root_url(), ?format, "starting crawl");
    let report = write_records(&crawler, writer, format).await?;

    log_summary(&report);
    Ok(())
}

/// Fetches one detail page and prints its normalized record as pretty JSON.
///
/// # Errors
///
/// Returns an error if the page cannot be fetched, extracted, or normalized.
pub(crate) async fn run_page(config: &AppConfig, url: &str) -> anyhow::Result<()> {
    let site = SiteConfig::from_config(config).context("invalid crawl root")?;
    let client = CatalogClient::from_config(config).context("failed to build HTTP client")?;
    let crawler = Crawler::new(&client, &site, CrawlOptions::from_config(config));

    let record = crawler
        .scrape_detail(url)
        .await
        .with_context(|| format!("failed to scrape {url}"))?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

/// Runs the crawl into a sink of the requested format over `writer`.
///
/// The sink is always finished, so records accepted before a write error are
/// still flushed.
async fn write_records<S: PageSource, W: Write>(
    crawler: &Crawler<'_, S>,
    writer: W,
    format: OutputFormat,
) -> anyhow::Result<CrawlReport> {
    match format {
        OutputFormat::Jsonl => {
            let mut sink = JsonLinesSink::new(writer);
            let outcome = crawler.run(&mut sink).await;
            let flushed = sink.finish();
            match (outcome, flushed) {
                (Ok(report), Ok(_)) => Ok(report),
                (Ok(_), Err(err)) => Err(err).context("failed to flush output"),
                (Err(err), flushed) => {
                    if let Err(flush_err) = flushed {
                        tracing::warn!(error = %flush_err, "failed to flush partial output");
                    }
                    Err(err).context("failed to write record")
                }
            }
        }
        OutputFormat::Json => {
            let mut sink = JsonArraySink::new(writer);
            let report = crawler.run(&mut sink).await.context("failed to write record")?;
            sink.finish().context("failed to write output")?;
            Ok(report)
        }
    }
}

fn open_output(output: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}

fn log_summary(report: &CrawlReport) {
    if report.is_complete() {
        tracing::info!(
            records = report.records_written,
            listing_pages = report.listing_pages_visited,
            detail_pages = report.detail_pages_visited,
            "crawl complete"
        );
        return;
    }

    tracing::warn!(
        records = report.records_written,
        failures = report.failures.len(),
        "crawl finished with failures"
    );
    for failure in &report.failures {
        tracing::warn!(url = %failure.url, kind = %failure.kind, error = %failure.error, "failed page");
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use bookscrape_scraper::ScraperError;

    use super::*;

    const ROOT: &str = "https://books.toscrape.com";
    const DETAIL_PAGE: &str =
        include_str!("../../bookscrape-scraper/tests/fixtures/detail_page.html");

    /// Serves a one-page catalog with two books from memory.
    struct FixtureSource {
        pages: HashMap<String, String>,
    }

    impl FixtureSource {
        fn two_books() -> Self {
            let listing = r#"<html><body><ol>
                <li><article class="product_pod"><h3><a href="catalogue/a_1/index.html">A</a></h3></article></li>
                <li><article class="product_pod"><h3><a href="catalogue/b_2/index.html">B</a></h3></article></li>
            </ol></body></html>"#;
            let pages = [
                (ROOT.to_owned(), listing.to_owned()),
                (format!("{ROOT}/catalogue/a_1/index.html"), DETAIL_PAGE.to_owned()),
                (format!("{ROOT}/catalogue/b_2/index.html"), DETAIL_PAGE.to_owned()),
            ];
            Self {
                pages: pages.into_iter().collect(),
            }
        }
    }

    impl PageSource for FixtureSource {
        async fn fetch_page(&self, url: &str) -> Result<String, ScraperError> {
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| ScraperError::NotFound {
                    url: url.to_owned(),
                })
        }
    }

    /// Rejects every write and counts flushes.
    struct BrokenPipe {
        flushes: Arc<AtomicUsize>,
    }

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "reader went away"))
        }

        fn flush(&mut self) -> io::Result<()> {
            self.flushes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn crawl_options() -> CrawlOptions {
        CrawlOptions {
            max_concurrent_requests: 2,
            inter_request_delay_ms: 0,
            max_listing_pages: 5,
            currency_symbol: "£".to_owned(),
        }
    }

    #[tokio::test]
    async fn write_records_emits_one_line_per_record() {
        let source = FixtureSource::two_books();
        let site = SiteConfig::new(ROOT, "catalogue").unwrap();
        let crawler = Crawler::new(&source, &site, crawl_options());

        let mut out = Vec::new();
        let report = write_records(&crawler, &mut out, OutputFormat::Jsonl)
            .await
            .unwrap();

        assert!(report.is_complete(), "unexpected failures: {:?}", report.failures);
        assert_eq!(report.records_written, 2);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 2);
    }

    #[tokio::test]
    async fn write_records_flushes_output_when_a_write_fails() {
        let source = FixtureSource::two_books();
        let site = SiteConfig::new(ROOT, "catalogue").unwrap();
        let crawler = Crawler::new(&source, &site, crawl_options());
        let flushes = Arc::new(AtomicUsize::new(0));
        let writer = BrokenPipe {
            flushes: Arc::clone(&flushes),
        };

        let result = write_records(&crawler, writer, OutputFormat::Jsonl).await;

        assert!(result.is_err(), "expected write error, got: {result:?}");
        assert_eq!(flushes.load(Ordering::SeqCst), 1);
    }

    fn base_config() -> AppConfig {
        AppConfig {
            root_url: "https://books.toscrape.com".to_owned(),
            catalog_segment: "catalogue".to_owned(),
            currency_symbol: "£".to_owned(),
            log_level: "info".to_owned(),
            request_timeout_secs: 30,
            user_agent: "bookscrape-test/0.1".to_owned(),
            max_concurrent_requests: 8,
            inter_request_delay_ms: 250,
            max_retries: 2,
            retry_backoff_base_secs: 1,
            max_listing_pages: 200,
        }
    }

    #[test]
    fn overrides_replace_config_values() {
        let mut config = base_config();
        apply_overrides(
            &mut config,
            Some("http://localhost:8080/".to_owned()),
            Some(3),
            Some(2),
        )
        .unwrap();
        assert_eq!(config.root_url, "http://localhost:8080");
        assert_eq!(config.max_listing_pages, 3);
        assert_eq!(config.max_concurrent_requests, 2);
    }

    #[test]
    fn absent_overrides_keep_config_values() {
        let mut config = base_config();
        apply_overrides(&mut config, None, None, None).unwrap();
        assert_eq!(config.root_url, "https://books.toscrape.com");
        assert_eq!(config.max_listing_pages, 200);
    }

    #[test]
    fn zero_concurrency_override_is_rejected() {
        let mut config = base_config();
        let err = apply_overrides(&mut config, None, None, Some(0)).unwrap_err();
        assert!(err.to_string().contains("--concurrency"));
    }

    #[test]
    fn zero_max_pages_override_is_rejected() {
        let mut config = base_config();
        assert!(apply_overrides(&mut config, None, Some(0), None).is_err());
    }

    #[tokio::test]
    async fn dry_run_rejects_relative_root_without_fetching() {
        let mut config = base_config();
        config.root_url = "books.toscrape.com".to_owned();
        let result = run_crawl(&config, None, OutputFormat::Jsonl, true).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn dry_run_succeeds_for_valid_config() {
        let config = base_config();
        let result = run_crawl(&config, None, OutputFormat::Json, true).await;
        assert!(result.is_ok(), "expected Ok, got: {result:?}");
    }
}
