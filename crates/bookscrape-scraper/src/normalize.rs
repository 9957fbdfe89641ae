//! Normalization from [`RawRecord`] to [`NormalizedRecord`].
//!
//! Every field is trimmed first. Text fields stay text (`category` and
//! `product_type` are lower-cased), prices become `f64`, stock and review
//! counts become integers, and the rating word becomes a 0–5 number.

use bookscrape_core::{NormalizedRecord, RawRecord};

use crate::error::ScraperError;

/// Normalizes a raw record into its typed form.
///
/// `currency_symbol` is removed from the four price fields before parsing.
///
/// # Errors
///
/// - [`ScraperError::MissingField`] if a required field is empty after trimming.
/// - [`ScraperError::MalformedNumber`] if a price, the stock count, or the
///   review count is not numeric.
pub fn normalize_record(
    raw: RawRecord,
    currency_symbol: &str,
) -> Result<NormalizedRecord, ScraperError> {
    let url = required("url", &raw.url)?;
    let title = required("title", &raw.title)?;
    let upc = required("upc", &raw.upc)?;
    let product_type = required("product_type", &raw.product_type)?.to_lowercase();
    let category = required("category", &raw.category)?.to_lowercase();

    let price_excluding_tax =
        parse_price("price_excluding_tax", &raw.price_excluding_tax, currency_symbol)?;
    let price_including_tax =
        parse_price("price_including_tax", &raw.price_including_tax, currency_symbol)?;
    let tax = parse_price("tax", &raw.tax, currency_symbol)?;
    let price = parse_price("price", &raw.price, currency_symbol)?;

    let availability = parse_availability(raw.availability.trim())?;
    let num_reviews = parse_count("num_reviews", required("num_reviews", &raw.num_reviews)?)?;
    let stars = parse_stars(raw.stars.trim());

    let description = raw
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_owned);

    Ok(NormalizedRecord {
        url: url.to_owned(),
        title: title.to_owned(),
        upc: upc.to_owned(),
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

/// Trims `value` and rejects it if nothing is left.
fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ScraperError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ScraperError::MissingField { field });
    }
    Ok(trimmed)
}

/// Parses a currency amount such as `"£51.77"`.
fn parse_price(
    field: &'static str,
    value: &str,
    currency_symbol: &str,
) -> Result<f64, ScraperError> {
    let trimmed = required(field, value)?;
    let amount = if currency_symbol.is_empty() {
        trimmed.to_owned()
    } else {
        trimmed.replace(currency_symbol, "")
    };
    amount
        .trim()
        .parse::<f64>()
        .map_err(|_| ScraperError::MalformedNumber {
            field,
            value: trimmed.to_owned(),
        })
}

/// Parses the stock count out of text like `"In stock (22 available)"`.
///
/// Text without a `(` carries no count and yields `0`.
fn parse_availability(value: &str) -> Result<u32, ScraperError> {
    let Some(count_piece) = value.split('(').nth(1) else {
        return Ok(0);
    };
    let token = count_piece.split_whitespace().next().unwrap_or_default();
    token
        .parse::<u32>()
        .map_err(|_| ScraperError::MalformedNumber {
            field: "availability",
            value: value.to_owned(),
        })
}

fn parse_count(field: &'static str, value: &str) -> Result<u32, ScraperError> {
    value
        .parse::<u32>()
        .map_err(|_| ScraperError::MalformedNumber {
            field,
            value: value.to_owned(),
        })
}

/// Maps the rating class (e.g. `"star-rating Three"`) to a number.
///
/// Only the second whitespace-separated token is read. A word outside
/// `zero`..`five`, or a class with a single token, leaves the rating unset.
fn parse_stars(value: &str) -> Option<u8> {
    let word = value.split_whitespace().nth(1)?.to_lowercase();
    match word.as_str() {
        "zero" => Some(0),
        "one" => Some(1),
        "two" => Some(2),
        "three" => Some(3),
        "four" => Some(4),
        "five" => Some(5),
        _ => None,
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
