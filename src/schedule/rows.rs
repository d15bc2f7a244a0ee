use scraper::ElementRef;
use tracing::warn;

use super::types::ActivityRecord;
use super::{child_elements, element_text};

const UNAVAILABLE: &str = "n/a";

/// Walk body rows and emit one record per available (activity, day) slot.
///
/// Cells past the last known day column are dropped with a warning.
pub fn extract_rows(
    tbody: Option<ElementRef>,
    location: &str,
    days: &[String],
) -> Vec<ActivityRecord> {
    let Some(tbody) = tbody else {
        return Vec::new();
    };

    let mut records = Vec::new();

    for tr in child_elements(tbody, "tr") {
        let Some(label) = child_elements(tr, "th").next() else {
            continue;
        };
        let activity = element_text(label);

        let cells: Vec<ElementRef> = child_elements(tr, "td").collect();
        if cells.len() > days.len() {
            warn!(
                location,
                activity = %activity,
                cells = cells.len(),
                days = days.len(),
                "row has more cells than day columns; dropping the excess"
            );
        }

        for (cell, day) in cells.into_iter().zip(days) {
            let time_slots = element_text(cell);
            if time_slots == UNAVAILABLE {
                continue;
            }
            records.push(ActivityRecord {
                location: location.to_string(),
                activity: activity.clone(),
                day: day.clone(),
                time_slots: time_slots.replace("Noon", "12pm"),
            });
        }
    }

    records
}

// ── Tests ──
