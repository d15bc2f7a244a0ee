pub mod caption;
pub mod columns;
pub mod page;
pub mod rows;
pub mod text;
pub mod types;

use scraper::ElementRef;

pub use caption::{parse_caption, CaptionInterpreter, DashCaptions};
pub use page::{extract_page, extract_page_with, parse_html};
pub use types::*;

// Pipeline per table: caption → category/range, thead → day columns,
// tbody + day columns → activity records.

/// Direct children of `parent` with the given tag name.
pub(crate) fn child_elements<'a>(
    parent: ElementRef<'a>,
    name: &'a str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |e| e.value().name() == name)
}

/// Normalized text content of an element and its descendants.
pub(crate) fn element_text(el: ElementRef) -> String {
    text::clean(&el.text().collect::<String>())
}

#[cfg(test)]
pub(crate) mod testing {
    use scraper::{ElementRef, Html, Selector};

    pub const DAYS_OF_THE_WEEK: [&str; 7] = [
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
        "Sunday",
    ];

    pub fn week() -> Vec<String> {
        DAYS_OF_THE_WEEK.iter().map(|d| d.to_string()).collect()
    }

    pub fn first<'a>(doc: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
        let selector = Selector::parse(selector).unwrap();
        doc.select(&selector).next()
    }
}
