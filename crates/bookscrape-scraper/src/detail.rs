//! Detail-page extraction into a [`RawRecord`].
//!
//! Values are returned as the markup holds them; trimming and coercion are
//! left to [`crate::normalize`].

use bookscrape_core::RawRecord;
use scraper::{ElementRef, Html, Selector};

use crate::error::ScraperError;
use crate::selectors::{
    element_text, next_sibling_named, prev_sibling_named, ACTIVE_BREADCRUMB,
    ACTIVE_BREADCRUMB_SEL, ANCHOR_SEL, AVAILABILITY_PARAGRAPH, AVAILABILITY_PARAGRAPH_SEL,
    DESCRIPTION_ANCHOR_SEL, PRICE, PRICE_SEL, TABLE_CELL_SEL, TABLE_ROW, TABLE_ROW_SEL, TITLE,
    TITLE_SEL,
};

/// Record fields held by the product information table, by row index.
///
/// The table is read positionally. Header cells are never consulted, so a
/// site-side reordering or an inserted row silently shifts every value after
/// it. Only the row count is checked.
pub const PRODUCT_TABLE_FIELDS: [&str; 7] = [
    "upc",
    "product_type",
    "price_excluding_tax",
    "price_including_tax",
    "tax",
    "availability",
    "num_reviews",
];

/// Extracts exactly one [`RawRecord`] from a detail page.
///
/// `description` is `None` when the page has no paragraph after the
/// product-description header; every other field is required.
///
/// # Errors
///
/// Returns [`ScraperError::SelectorNotFound`] if any required element is
/// missing from the page.
pub fn process_detail_page(document: &Html, source_url: &str) -> Result<RawRecord, ScraperError> {
    let not_found = |selector: &str| ScraperError::SelectorNotFound {
        url: source_url.to_owned(),
        selector: selector.to_owned(),
    };

    let [upc, product_type, price_excluding_tax, price_including_tax, tax, availability, num_reviews] =
        product_table(document, source_url)?;

    let title = first_text(document, &TITLE_SEL).ok_or_else(|| not_found(TITLE))?;

    let stars = document
        .select(&AVAILABILITY_PARAGRAPH_SEL)
        .next()
        .and_then(|paragraph| next_sibling_named(paragraph, "p"))
        .and_then(|rating| rating.value().attr("class"))
        .map(str::to_owned)
        .ok_or_else(|| not_found(&format!("{AVAILABILITY_PARAGRAPH} ~ p[class]")))?;

    let category = document
        .select(&ACTIVE_BREADCRUMB_SEL)
        .next()
        .and_then(|active| prev_sibling_named(active, "li"))
        .and_then(|crumb| crumb.select(&ANCHOR_SEL).next())
        .map(element_text)
        .ok_or_else(|| not_found(&format!("li + {ACTIVE_BREADCRUMB} (preceding li a)")))?;

    let description = document
        .select(&DESCRIPTION_ANCHOR_SEL)
        .next()
        .and_then(|anchor| next_sibling_named(anchor, "p"))
        .map(element_text);

    let price = first_text(document, &PRICE_SEL).ok_or_else(|| not_found(PRICE))?;

    Ok(RawRecord {
        url: source_url.to_owned(),
        title,
        upc,
        product_type,
        price_excluding_tax,
        price_including_tax,
        tax,
        availability,
        num_reviews,
        stars,
        category,
        description,
        price,
    })
}

/// Reads the first `td` of each of the first seven `table tr` rows, in
/// [`PRODUCT_TABLE_FIELDS`] order.
fn product_table(
    document: &Html,
    source_url: &str,
) -> Result<[String; PRODUCT_TABLE_FIELDS.len()], ScraperError> {
    let rows: Vec<ElementRef<'_>> = document.select(&TABLE_ROW_SEL).collect();
    let mut cells: [String; PRODUCT_TABLE_FIELDS.len()] = Default::default();

    for (index, field) in PRODUCT_TABLE_FIELDS.iter().enumerate() {
        let cell = rows
            .get(index)
            .and_then(|row| row.select(&TABLE_CELL_SEL).next())
            .ok_or_else(|| ScraperError::SelectorNotFound {
                url: source_url.to_owned(),
                selector: format!("{TABLE_ROW}:nth-of-type({}) td ({field})", index + 1),
            })?;
        cells[index] = element_text(cell);
    }

    Ok(cells)
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document.select(selector).next().map(element_text)
}
