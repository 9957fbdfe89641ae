//! Listing-page extraction: item links and the next-page link.

use scraper::Html;

use crate::error::ScraperError;
use crate::frontier::VisitRequest;
use crate::selectors::{
    NEXT_PAGE_LINK_SEL, PRODUCT_POD, PRODUCT_POD_LINK, PRODUCT_POD_LINK_SEL, PRODUCT_POD_SEL,
};
use crate::site::SiteConfig;

/// Extracts the visit requests a listing page emits.
///
/// The result holds one detail request per `article.product_pod` in document
/// order, followed by a listing request for the `li.next` link when the page
/// has one. A page without a next link is the last listing page.
///
/// # Errors
///
/// Returns [`ScraperError::SelectorNotFound`] if a product container has no
/// title anchor with an `href`.
pub fn process_listing_page(
    document: &Html,
    site: &SiteConfig,
    page_url: &str,
) -> Result<Vec<VisitRequest>, ScraperError> {
    let mut requests = Vec::new();

    for pod in document.select(&PRODUCT_POD_SEL) {
        let href = pod
            .select(&PRODUCT_POD_LINK_SEL)
            .next()
            .and_then(|anchor| anchor.value().attr("href"))
            .ok_or_else(|| ScraperError::SelectorNotFound {
                url: page_url.to_owned(),
                selector: format!("{PRODUCT_POD} {PRODUCT_POD_LINK}[href]"),
            })?;
        requests.push(VisitRequest::detail(site.resolve(href)));
    }

    let next_href = document
        .select(&NEXT_PAGE_LINK_SEL)
        .next()
        .and_then(|anchor| anchor.value().attr("href"));
    if let Some(href) = next_href {
        requests.push(VisitRequest::listing(site.resolve(href)));
    }

    Ok(requests)
}
