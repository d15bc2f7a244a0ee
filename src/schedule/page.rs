use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::caption::{CaptionInterpreter, DashCaptions};
use super::columns::day_columns;
use super::rows::extract_rows;
use super::types::{ExtractError, PageResult, TimeBlock};
use super::{child_elements, element_text};

static H1: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1").unwrap());
static TABLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("table").unwrap());

/// Parse raw markup and extract its schedule.
pub fn parse_html(html: &str, url: &str) -> Result<PageResult, ExtractError> {
    let doc = Html::parse_document(html);
    extract_page(&doc, url)
}

pub fn extract_page(doc: &Html, url: &str) -> Result<PageResult, ExtractError> {
    extract_page_with(doc, url, &DashCaptions)
}

/// Extract every schedule table on the page, in document order.
///
/// Only a missing location heading fails the page; anything missing inside
/// a table degrades to empty fields for that table.
pub fn extract_page_with(
    doc: &Html,
    url: &str,
    captions: &dyn CaptionInterpreter,
) -> Result<PageResult, ExtractError> {
    let location = doc
        .select(&H1)
        .next()
        .map(|h1| h1.text().collect::<String>().trim().to_string())
        .filter(|l| !l.is_empty())
        .ok_or_else(|| ExtractError::MissingLocation {
            url: url.to_string(),
        })?;

    let time_blocks: Vec<TimeBlock> = doc
        .select(&TABLE)
        .map(|table| extract_table(table, &location, captions))
        .collect();

    debug!(
        url,
        location = %location,
        tables = time_blocks.len(),
        activities = time_blocks.iter().map(|b| b.activities.len()).sum::<usize>(),
        "extracted page"
    );

    Ok(PageResult {
        location,
        url: url.to_string(),
        time_blocks,
    })
}

fn extract_table(
    table: ElementRef,
    location: &str,
    captions: &dyn CaptionInterpreter,
) -> TimeBlock {
    let caption = child_elements(table, "caption")
        .next()
        .map(|c| captions.interpret(&element_text(c)))
        .unwrap_or_else(|| captions.interpret(""));
    if caption.is_empty() {
        debug!(location, "table caption missing or not recognised");
    }

    let days = day_columns(child_elements(table, "thead").next());
    let activities = extract_rows(child_elements(table, "tbody").next(), location, &days);

    TimeBlock::new(caption, activities)
}

// ── Tests ──
