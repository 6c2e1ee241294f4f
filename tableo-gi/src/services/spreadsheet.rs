//! Upload flattening
//!
//! Spreadsheet uploads (Excel family) are flattened to comma-delimited
//! text from their first sheet before any parsing; csv/txt uploads are
//! decoded as UTF-8. Downstream stages only ever see delimited text.

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;
use thiserror::Error;

/// Accepted upload extensions (lowercase, no dot)
pub const ALLOWED_EXTENSIONS: [&str; 8] = [
    "csv", "xlsx", "xls", "xlsm", "xlsb", "xltx", "xltm", "txt",
];

/// Spreadsheet extensions needing workbook flattening
const SPREADSHEET_EXTENSIONS: [&str; 6] = ["xlsx", "xls", "xlsm", "xlsb", "xltx", "xltm"];

#[derive(Debug, Error)]
pub enum SpreadsheetError {
    /// Workbook could not be opened or its first sheet read
    #[error("Could not read spreadsheet: {0}")]
    Unreadable(String),
}

/// Lowercase extension of an uploaded filename
pub fn file_extension(filename: &str) -> Option<String> {
    let (stem, extension) = filename.rsplit_once('.')?;
    if stem.is_empty() {
        return None;
    }
    Some(extension.to_lowercase())
}

/// Whether the upload extension is on the allow-list
pub fn is_allowed_extension(extension: &str) -> bool {
    ALLOWED_EXTENSIONS.contains(&extension)
}

/// Whether the extension denotes a spreadsheet format
pub fn is_spreadsheet(extension: &str) -> bool {
    SPREADSHEET_EXTENSIONS.contains(&extension)
}

/// Flatten uploaded bytes to delimited text
///
/// Spreadsheets are reduced to their first sheet as comma-delimited lines;
/// text uploads pass through with lossy UTF-8 decoding.
pub fn flatten_upload(extension: &str, bytes: &[u8]) -> Result<String, SpreadsheetError> {
    if is_spreadsheet(extension) {
        flatten_workbook(bytes)
    } else {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

/// Read the first sheet of a workbook as comma-delimited text
fn flatten_workbook(bytes: &[u8]) -> Result<String, SpreadsheetError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| SpreadsheetError::Unreadable(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SpreadsheetError::Unreadable("workbook contains no sheets".to_string()))?
        .map_err(|e| SpreadsheetError::Unreadable(e.to_string()))?;

    let mut lines = Vec::with_capacity(range.height());
    for row in range.rows() {
        let cells: Vec<String> = row.iter().map(|cell| csv_field(cell_text(cell))).collect();
        lines.push(cells.join(","));
    }

    Ok(lines.join("\n"))
}

/// Cell value as display text
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => {
            // Whole floats print without the trailing ".0" Excel hides
            if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        // Raw Excel date serial; guest lists should not contain these in
        // role columns, and text round-trips are all the parser needs
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}

/// Quote a field when it would break the comma-delimited line
fn csv_field(text: String) -> String {
    if text.contains(',') || text.contains('"') || text.contains('\n') {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text
    }
}
