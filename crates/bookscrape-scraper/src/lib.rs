pub mod client;
pub mod crawler;
pub mod detail;
pub mod error;
pub mod frontier;
pub mod listing;
pub mod normalize;
mod rate_limit;
mod selectors;
pub mod sink;
pub mod site;
pub mod source;

pub use client::CatalogClient;
pub use crawler::{CrawlOptions, CrawlReport, Crawler, PageFailure};
pub use detail::process_detail_page;
pub use error::ScraperError;
pub use frontier::{Frontier, PageKind, VisitRequest};
pub use listing::process_listing_page;
pub use normalize::normalize_record;
pub use sink::RecordSink;
pub use site::SiteConfig;
pub use source::PageSource;
