//! Placeholder-tag substitution across a sheet's cell grid.
//!
//! A parameter named `note` is marked in the template as the literal token
//! `{{ note }}`. Substitution is one complete pass over the sheet per
//! token, so applying parameters in schema order is deterministic.

use crate::types::{CellValue, Sheet};

/// The placeholder token for a parameter name: `{{ name }}`.
#[must_use]
pub fn placeholder_token(name: &str) -> String {
    format!("{{{{ {name} }}}}")
}

/// Replace `token` in every text cell of `sheet`.
///
/// A cell whose trimmed value equals the token exactly takes `replacement`
/// as its whole value, with numeric coercion so purely numeric fields render
/// as spreadsheet numbers. A cell merely containing the token gets a literal
/// substring replacement and stays text. A substituted cell loses its
/// formula.
///
/// Returns the number of cells touched; a token that appears nowhere is a
/// no-op and leaves the sheet untouched.
pub fn substitute(sheet: &mut Sheet, token: &str, replacement: &str) -> usize {
    let mut touched = 0;

    for cd in &mut sheet.cells {
        let Some(text) = cd.cell.as_text().map(str::to_owned) else {
            continue;
        };
        if !text.contains(token) {
            continue;
        }

        if text.trim() == token {
            cd.cell.value = coerce_value(replacement);
        } else {
            cd.cell.value = CellValue::Text(text.replace(token, replacement));
        }
        cd.cell.formula = None;
        touched += 1;
    }

    touched
}

/// Numeric coercion for exact-match replacement: all digits becomes an
/// integer-valued number, digits with a single decimal point becomes a
/// float, anything else stays text.
fn coerce_value(raw: &str) -> CellValue {
    if is_all_digits(raw) {
        if let Ok(n) = raw.parse::<f64>() {
            return CellValue::Number(n);
        }
    } else if is_decimal(raw) {
        if let Ok(n) = raw.parse::<f64>() {
            return CellValue::Number(n);
        }
    }
    CellValue::Text(raw.to_string())
}

fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Digits containing exactly one `.` (e.g. "3.14", ".5"). Signs and
/// exponents stay text, matching the exact-match coercion contract.
fn is_decimal(s: &str) -> bool {
    match s.split_once('.') {
        Some((int_part, frac_part)) => {
            let rest = format!("{int_part}{frac_part}");
            is_all_digits(&rest)
        }
        None => false,
    }
}
