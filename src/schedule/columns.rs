use scraper::ElementRef;
use tracing::debug;

use super::{child_elements, element_text};

/// Header layout with a blank corner cell above the activity labels.
const CORNER_LAYOUT_CELLS: usize = 8;

/// Day labels for each data column, taken from the first header row.
pub fn day_columns(thead: Option<ElementRef>) -> Vec<String> {
    let Some(tr) = thead.and_then(|t| child_elements(t, "tr").next()) else {
        return Vec::new();
    };

    let mut days: Vec<String> = child_elements(tr, "th").map(element_text).collect();

    if days.len() == CORNER_LAYOUT_CELLS {
        let corner = days.remove(0);
        if !corner.is_empty() {
            debug!(corner = %corner, "dropped non-blank corner header cell");
        }
    }
    days
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::testing::{first, DAYS_OF_THE_WEEK};
    use scraper::Html;

    fn columns(markup: &str) -> Vec<String> {
        let doc = Html::parse_fragment(&format!("<table>{}</table>", markup));
        day_columns(first(&doc, "thead"))
    }

    #[test]
    fn empty_heads() {
        assert!(day_columns(None).is_empty());
        assert!(columns("<thead></thead>").is_empty());
        assert!(columns("<thead><tr></tr></thead>").is_empty());
        assert_eq!(columns("<thead><tr><th></th></tr></thead>"), vec![""]);
    }

    #[test]
    fn no_blank_first_col() {
        let got = columns(
            "<thead><tr><th>Monday</th><th>Tuesday</th><th>Wednesday</th><th>Thursday</th>\
             <th>Friday</th><th>Saturday</th><th>Sunday</th></tr></thead>",
        );
        assert_eq!(got, DAYS_OF_THE_WEEK);
    }

    #[test]
    fn blank_first_col() {
        let got = columns(
            "<thead><tr><th></th><th>Monday</th><th>Tuesday</th><th>Wednesday</th><th>Thursday</th>\
             <th>Friday</th><th>Saturday</th><th>Sunday</th></tr></thead>",
        );
        assert_eq!(got, DAYS_OF_THE_WEEK);
    }

    #[test]
    fn only_first_row_counts() {
        let got = columns(
            "<thead><tr><th>Mon</th><th>Tue</th></tr><tr><th>ignored</th></tr></thead>",
        );
        assert_eq!(got, vec!["Mon", "Tue"]);
    }
}
