use serde::{Deserialize, Serialize};

/// One catalog item exactly as extracted from its detail page.
///
/// Every field except `url` is markup text that has not been trimmed or
/// coerced. `url` is the fully resolved address the page was fetched from and
/// identifies the item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub url: String,
    pub title: String,
    pub upc: String,
    pub product_type: String,
    pub price_excluding_tax: String,
    pub price_including_tax: String,
    pub tax: String,
    pub availability: String,
    pub num_reviews: String,
    /// Class attribute of the rating element, e.g. `"star-rating Three"`.
    pub stars: String,
    pub category: String,
    /// Absent on pages that carry no product description.
    pub description: Option<String>,
    pub price: String,
}

/// A catalog item after normalization, ready for the output sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub url: String,
    pub title: String,
    pub upc: String,
    /// Lower-cased, e.g. `"books"`.
    pub product_type: String,
    pub price_excluding_tax: f64,
    pub price_including_tax: f64,
    pub tax: f64,
    /// Units in stock; `0` when the page states no count.
    pub availability: u32,
    pub num_reviews: u32,
    /// Rating from `0` to `5`. `None` when the rating word on the page is not
    /// one of `zero`..`five`.
    pub stars: Option<u8>,
    /// Lower-cased breadcrumb category, e.g. `"poetry"`.
    pub category: String,
    pub description: Option<String>,
    pub price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NormalizedRecord {
        NormalizedRecord {
            url: "https://books.toscrape.com/catalogue/a-light-in-the-attic_1000/index.html"
                .to_owned(),
            title: "A Light in the Attic".to_owned(),
            upc: "a897fe39b1053632".to_owned(),
            product_type: "books".to_owned(),
            price_excluding_tax: 51.77,
            price_including_tax: 51.77,
            tax: 0.0,
            availability: 22,
            num_reviews: 0,
            stars: Some(3),
            category: "poetry".to_owned(),
            description: None,
            price: 51.77,
        }
    }

    #[test]
    fn serializes_with_field_names_and_null_for_unset_stars() {
        let mut record = sample();
        record.stars = None;
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["upc"], "a897fe39b1053632");
        assert_eq!(value["availability"], 22);
        assert!(value["stars"].is_null());
        assert!(value["description"].is_null());
    }
}
