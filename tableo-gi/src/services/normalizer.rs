//! Guest normalization
//!
//! Maps loosely-typed candidate tuples into the canonical guest shape,
//! dropping tuples with no usable name or table. Table text is kept
//! verbatim so named tables survive; seats keep their leading digit run
//! when one exists.

use crate::models::{GuestCandidate, NormalizedGuest};
use serde_json::Value;

/// Normalize a batch of candidates, dropping invalid ones
///
/// Output order follows input order; the duplicate resolver depends on it.
pub fn normalize(candidates: &[GuestCandidate]) -> Vec<NormalizedGuest> {
    candidates.iter().filter_map(normalize_one).collect()
}

/// Normalize one candidate, or drop it
///
/// Name and table are required non-empty after trimming. Seat is optional.
pub fn normalize_one(candidate: &GuestCandidate) -> Option<NormalizedGuest> {
    let guest_name = loose_text(candidate.guest_name.as_ref())?;
    let table_number = loose_text(candidate.table_number.as_ref())?;

    let seat_number = candidate
        .seat_number
        .as_ref()
        .and_then(|v| loose_text(Some(v)))
        .map(|seat| seat_policy(&seat));

    Some(NormalizedGuest {
        guest_name,
        table_number,
        seat_number,
    })
}

/// Convert a loose JSON value to trimmed non-empty text
///
/// Strings are trimmed; numbers stringified (extraction services return
/// table numbers as either). Anything else is unusable.
fn loose_text(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Seat policy: leading digit run when one exists, else verbatim text
fn seat_policy(seat: &str) -> String {
    let digits: String = seat.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        seat.to_string()
    } else {
        digits
    }
}
