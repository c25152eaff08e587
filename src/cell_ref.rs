//! Utilities for parsing and formatting Excel-style cell references.

/// Parse a cell reference like "A1" into (col, row) where col and row are 0-indexed.
#[must_use]
pub fn parse_cell_ref(cell_ref: &str) -> Option<(u32, u32)> {
    let mut col: u32 = 0;
    let mut row: u32 = 0;
    let mut saw_col = false;
    let mut saw_row = false;

    for ch in cell_ref.trim().chars() {
        if ch == '$' {
            continue;
        }
        if ch.is_ascii_alphabetic() {
            let upper = ch.to_ascii_uppercase();
            col = col * 26 + (upper as u32 - 'A' as u32 + 1);
            saw_col = true;
        } else if ch.is_ascii_digit() {
            row = row * 10 + (ch as u32 - '0' as u32);
            saw_row = true;
        } else {
            return None;
        }
    }

    if !saw_col || !saw_row {
        return None;
    }

    Some((col.saturating_sub(1), row.saturating_sub(1)))
}

/// Parse a cell reference like "A1" into (col, row) with defaults.
///
/// Returns `(0, 0)` if parsing fails. For callers that don't need to
/// distinguish invalid input from cell A1.
#[must_use]
pub fn parse_cell_ref_or_default(ref_str: &str) -> (u32, u32) {
    parse_cell_ref(ref_str).unwrap_or((0, 0))
}

/// Convert a 0-indexed column number to its letter form (0 -> "A", 26 -> "AA").
#[must_use]
pub fn col_to_letter(col: u32) -> String {
    let mut out = String::new();
    let mut n = col;
    loop {
        let rem = n % 26;
        out.insert(0, char::from(b'A' + u8::try_from(rem).unwrap_or(0)));
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    out
}

/// Format a 0-indexed (row, col) pair as an "A1" reference.
#[must_use]
pub fn format_cell_ref(row: u32, col: u32) -> String {
    format!("{}{}", col_to_letter(col), row + 1)
}
