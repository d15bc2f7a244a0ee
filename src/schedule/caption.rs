use tracing::debug;

use super::types::ParsedCaption;

const SEGMENT_SEP: &str = " - ";
const RANGE_SEP: &str = " to ";

/// Turns a table caption into a category and optional date range.
pub trait CaptionInterpreter {
    fn interpret(&self, caption: &str) -> ParsedCaption;
}

/// Free-text captions of the form `Location - [..] - Category [- Start to End]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DashCaptions;

impl CaptionInterpreter for DashCaptions {
    fn interpret(&self, caption: &str) -> ParsedCaption {
        parse_caption(caption)
    }
}

/// Classify a normalized caption by its number of `" - "` segments.
/// The first segment is always the location and is ignored here.
pub fn parse_caption(caption: &str) -> ParsedCaption {
    let segments: Vec<&str> = caption.split(SEGMENT_SEP).collect();

    match segments.as_slice() {
        // Walter Baker Sports Centre - Weight and cardio room
        [_, category] => ParsedCaption::category(category),

        // Minto Recreation Complex - Barrhaven - Weight and cardio room
        // Walter Baker Sports Centre - swim and aquafit - January 28 to March 21
        [_, category, tail] => {
            let range: Vec<&str> = tail.split(RANGE_SEP).collect();
            match range.as_slice() {
                [_] => ParsedCaption::category(tail),
                [start, end] => ParsedCaption::with_range(category, start, end),
                _ => unplaced(caption),
            }
        }

        // Minto Recreation Complex - Barrhaven - sports - March 17 to June 22
        // TODO: a location with more than one dash in its name still falls through to {}
        [_, _, category, period] => match period.split(RANGE_SEP).collect::<Vec<_>>().as_slice() {
            [start, end] => ParsedCaption::with_range(category, start, end),
            _ => unplaced(caption),
        },

        _ => ParsedCaption::default(),
    }
}

fn unplaced(caption: &str) -> ParsedCaption {
    debug!(caption, "caption date range not recognised");
    ParsedCaption::default()
}

// ── Tests ──
