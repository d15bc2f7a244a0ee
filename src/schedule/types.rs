use serde::{Deserialize, Serialize};

/// Validity period of a schedule table, e.g. "January 28" to "March 21".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

/// What a table caption says about the table, beyond the location.
///
/// `ParsedCaption::default()` is the "nothing recognised" result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCaption {
    pub category: Option<String>,
    pub range: Option<DateRange>,
}

impl ParsedCaption {
    pub fn category(category: &str) -> Self {
        ParsedCaption {
            category: Some(category.to_string()),
            range: None,
        }
    }

    pub fn with_range(category: &str, start: &str, end: &str) -> Self {
        ParsedCaption {
            category: Some(category.to_string()),
            range: Some(DateRange {
                start: start.to_string(),
                end: end.to_string(),
            }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.range.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub location: String,
    pub activity: String,
    pub day: String,
    pub time_slots: String,
}

/// One schedule table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBlock {
    pub category: Option<String>,
    pub time_block_start: Option<String>,
    pub time_block_end: Option<String>,
    pub activities: Vec<ActivityRecord>,
}

impl TimeBlock {
    pub fn new(caption: ParsedCaption, activities: Vec<ActivityRecord>) -> Self {
        let (time_block_start, time_block_end) = match caption.range {
            Some(DateRange { start, end }) => (Some(start), Some(end)),
            None => (None, None),
        };
        TimeBlock {
            category: caption.category,
            time_block_start,
            time_block_end,
            activities,
        }
    }
}

/// Everything extracted from one facility page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    pub location: String,
    pub url: String,
    pub time_blocks: Vec<TimeBlock>,
}

impl PageResult {
    /// All records on the page, in table order then row/column order.
    pub fn activities(&self) -> impl Iterator<Item = &ActivityRecord> {
        self.time_blocks.iter().flat_map(|b| &b.activities)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("malformed page {url}: no <h1> heading naming the location")]
    MissingLocation { url: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_block_flattens_range() {
        let block = TimeBlock::new(
            ParsedCaption::with_range("sports", "March 17", "June 22"),
            vec![],
        );
        assert_eq!(block.category.as_deref(), Some("sports"));
        assert_eq!(block.time_block_start.as_deref(), Some("March 17"));
        assert_eq!(block.time_block_end.as_deref(), Some("June 22"));
    }

    #[test]
    fn empty_caption_serializes_nulls() {
        let block = TimeBlock::new(ParsedCaption::default(), vec![]);
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "category": null,
                "time_block_start": null,
                "time_block_end": null,
                "activities": [],
            })
        );
    }
}
