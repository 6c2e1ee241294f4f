//! Heuristic parser for simple delimited guest lists
//!
//! Deterministic, non-AI path for the common case: a small CSV/TXT file
//! with name/table/seat columns. Anything it cannot read with confidence
//! is reported as `NotParseable`, which routes the file to the fallback
//! extraction service. `NotParseable` is an expected branch, not a fault.
//!
//! Expected shapes:
//! - `Nom,Table,Place` / `Name,Table,Seat` headers (French or English)
//! - headerless `name,table[,seat]` positional rows
//! - semicolon-, comma- or pipe-delimited

use crate::models::GuestCandidate;

/// Maximum content size for the local path; larger files go to extraction
pub const MAX_SIMPLE_BYTES: usize = 50_000;

/// Maximum line count for the local path
pub const MAX_SIMPLE_LINES: usize = 1000;

/// Delimiters in detection priority order
const DELIMITERS: [char; 3] = [';', ',', '|'];

/// Header keywords for the name column (French and English)
const NAME_KEYWORDS: [&str; 4] = ["nom", "name", "invité", "guest"];

/// Header keywords for the seat column
const SEAT_KEYWORDS: [&str; 3] = ["place", "seat", "siège"];

/// Outcome of a local parse attempt
///
/// Two-variant result rather than an error: complex files are a frequent,
/// normal input for which the answer is "use the fallback".
#[derive(Debug, Clone, PartialEq)]
pub enum LocalParse {
    /// At least one valid candidate was extracted
    Parsed(Vec<GuestCandidate>),
    /// Format too complex or ambiguous for the heuristics
    NotParseable,
}

/// Whether a file qualifies for the local parser at all
///
/// Only csv/txt content within size and line-count caps is attempted;
/// spreadsheets are flattened to delimited text before this check.
pub fn is_simple_file(filename: &str, content: &str) -> bool {
    let extension = filename.rsplit('.').next().unwrap_or("").to_lowercase();
    if extension != "csv" && extension != "txt" {
        return false;
    }

    if content.len() > MAX_SIMPLE_BYTES {
        return false;
    }

    if content.lines().count() > MAX_SIMPLE_LINES {
        return false;
    }

    true
}

/// Attempt to parse delimited guest-list content
///
/// Pure function of its input: identical bytes yield identical output.
pub fn try_parse(content: &str) -> LocalParse {
    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        return LocalParse::NotParseable;
    }

    let first_line = lines[0];
    let Some(delimiter) = detect_delimiter(first_line) else {
        return LocalParse::NotParseable;
    };

    let header = detect_header(first_line);

    let (name_idx, table_idx, seat_idx) = if header {
        match resolve_columns(first_line, delimiter) {
            Some(roles) => roles,
            None => return LocalParse::NotParseable,
        }
    } else {
        // No header: assume positional order name, table, seat (optional)
        (0, 1, Some(2))
    };

    let data_lines = if header { &lines[1..] } else { &lines[..] };
    let required_columns = name_idx.max(table_idx) + 1;

    let mut candidates = Vec::new();

    for line in data_lines {
        let columns: Vec<String> = line
            .split(delimiter)
            .map(|col| strip_quotes(col.trim()).trim().to_string())
            .collect();

        // A short row cannot satisfy the detected roles; skip it without
        // aborting the rest of the file
        if columns.len() < required_columns {
            continue;
        }

        let name = columns[name_idx].as_str();
        let table = columns[table_idx].as_str();

        if name.is_empty() || table.is_empty() {
            continue;
        }

        let seat = seat_idx
            .and_then(|idx| columns.get(idx))
            .map(|s| seat_value(s))
            .filter(|s| !s.is_empty());

        candidates.push(GuestCandidate::from_fields(name, table, seat.as_deref()));
    }

    if candidates.is_empty() {
        return LocalParse::NotParseable;
    }

    LocalParse::Parsed(candidates)
}

/// Pick the delimiter by presence in the first line, priority `;` > `,` > `|`
fn detect_delimiter(first_line: &str) -> Option<char> {
    DELIMITERS.iter().copied().find(|d| first_line.contains(*d))
}

/// Case-insensitive keyword match deciding whether the first line is a header
fn detect_header(first_line: &str) -> bool {
    let lowered = first_line.to_lowercase();
    NAME_KEYWORDS
        .iter()
        .chain(SEAT_KEYWORDS.iter())
        .chain(["table"].iter())
        .any(|kw| lowered.contains(kw))
}

/// Resolve column roles from a header line
///
/// Each role takes the first matching column, predicates evaluated in
/// order. The table role excludes columns that also look like seat/place
/// ("Place à table" must not claim the table role). Returns None when name
/// or table cannot be resolved.
fn resolve_columns(header_line: &str, delimiter: char) -> Option<(usize, usize, Option<usize>)> {
    let headers: Vec<String> = header_line
        .split(delimiter)
        .map(|h| strip_quotes(h.trim()).trim().to_lowercase())
        .collect();

    let name_idx = headers
        .iter()
        .position(|h| NAME_KEYWORDS.iter().any(|kw| h.contains(kw)))?;

    let table_idx = headers
        .iter()
        .position(|h| h.contains("table") && !SEAT_KEYWORDS.iter().any(|kw| h.contains(kw)))?;

    let seat_idx = headers
        .iter()
        .position(|h| SEAT_KEYWORDS.iter().any(|kw| h.contains(kw)));

    Some((name_idx, table_idx, seat_idx))
}

/// Strip one pair of surrounding double quotes, if present
fn strip_quotes(field: &str) -> &str {
    field
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(field)
}

/// Seat policy: leading digit run when one exists, else verbatim text
fn seat_value(seat: &str) -> String {
    let digits: String = seat.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        seat.to_string()
    } else {
        digits
    }
}
