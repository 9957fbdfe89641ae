//! CSS selectors for the catalog markup, compiled once.

use std::sync::LazyLock;

use scraper::{ElementRef, Selector};

pub(crate) const PRODUCT_POD: &str = "article.product_pod";
pub(crate) const PRODUCT_POD_LINK: &str = "h3 a";
pub(crate) const NEXT_PAGE_LINK: &str = "li.next a";

pub(crate) const TABLE_ROW: &str = "table tr";
pub(crate) const TABLE_CELL: &str = "td";
pub(crate) const TITLE: &str = "div.product_main h1";
pub(crate) const AVAILABILITY_PARAGRAPH: &str = "p.instock.availability";
pub(crate) const ACTIVE_BREADCRUMB: &str = "li.active";
pub(crate) const ANCHOR: &str = "a";
pub(crate) const DESCRIPTION_ANCHOR: &str = "div#product_description";
pub(crate) const PRICE: &str = "p.price_color";

fn compile(css: &'static str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

pub(crate) static PRODUCT_POD_SEL: LazyLock<Selector> = LazyLock::new(|| compile(PRODUCT_POD));
pub(crate) static PRODUCT_POD_LINK_SEL: LazyLock<Selector> =
    LazyLock::new(|| compile(PRODUCT_POD_LINK));
pub(crate) static NEXT_PAGE_LINK_SEL: LazyLock<Selector> =
    LazyLock::new(|| compile(NEXT_PAGE_LINK));

pub(crate) static TABLE_ROW_SEL: LazyLock<Selector> = LazyLock::new(|| compile(TABLE_ROW));
pub(crate) static TABLE_CELL_SEL: LazyLock<Selector> = LazyLock::new(|| compile(TABLE_CELL));
pub(crate) static TITLE_SEL: LazyLock<Selector> = LazyLock::new(|| compile(TITLE));
pub(crate) static AVAILABILITY_PARAGRAPH_SEL: LazyLock<Selector> =
    LazyLock::new(|| compile(AVAILABILITY_PARAGRAPH));
pub(crate) static ACTIVE_BREADCRUMB_SEL: LazyLock<Selector> =
    LazyLock::new(|| compile(ACTIVE_BREADCRUMB));
pub(crate) static ANCHOR_SEL: LazyLock<Selector> = LazyLock::new(|| compile(ANCHOR));
pub(crate) static DESCRIPTION_ANCHOR_SEL: LazyLock<Selector> =
    LazyLock::new(|| compile(DESCRIPTION_ANCHOR));
pub(crate) static PRICE_SEL: LazyLock<Selector> = LazyLock::new(|| compile(PRICE));

/// First text node directly under `element`, untrimmed.
///
/// Text inside nested child elements is not included, so
/// `<td>£51.77<small>incl.</small></td>` yields `"£51.77"`. An element with
/// no direct text yields an empty string.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element
        .children()
        .find_map(|child| child.value().as_text().map(|text| String::from(&**text)))
        .unwrap_or_default()
}

/// First element sibling after `element` with the given tag name.
pub(crate) fn next_sibling_named<'a>(element: ElementRef<'a>, name: &str) -> Option<ElementRef<'a>> {
    element
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sibling| sibling.value().name() == name)
}

/// Nearest element sibling before `element` with the given tag name.
pub(crate) fn prev_sibling_named<'a>(element: ElementRef<'a>, name: &str) -> Option<ElementRef<'a>> {
    element
        .prev_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sibling| sibling.value().name() == name)
}
