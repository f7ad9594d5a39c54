//! List validation rules and the range formulas that back them

use serde::Serialize;

/// Zero-based column of the lookup sheet holding the selectable names
pub const LOOKUP_VALUE_COLUMN: usize = 1;

/// A list validation attached to a single cell of the template sheet.
///
/// Rows and columns are zero-based worksheet coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListValidation {
    pub row: u32,
    pub col: u16,
    /// Source range, without the leading `=`
    pub formula: String,
    pub allow_blank: bool,
}

impl ListValidation {
    pub fn new(row: u32, col: u16, formula: impl Into<String>) -> Self {
        Self {
            row,
            col,
            formula: formula.into(),
            allow_blank: true,
        }
    }

    /// Cell reference in A1 notation, e.g. `C2`
    pub fn cell_ref(&self) -> String {
        format!("{}{}", column_index_to_letter(self.col as usize), self.row + 1)
    }
}

/// Absolute reference to the lookup names: one header row, then `entry_count`
/// data rows, so the range is always rows 2 through `entry_count + 1`.
///
/// Examples:
/// - `("GenderMapping", 3)` → `GenderMapping!$B$2:$B$4`
/// - `("GenderMapping", 1)` → `GenderMapping!$B$2:$B$2`
pub fn list_range_formula(sheet_name: &str, entry_count: usize) -> String {
    let col = column_index_to_letter(LOOKUP_VALUE_COLUMN);
    let last_row = entry_count + 1;
    format!(
        "{}!${col}$2:${col}${last_row}",
        quote_sheet_name(sheet_name)
    )
}

/// Quote a sheet name for use in a formula when Excel requires it
pub fn quote_sheet_name(name: &str) -> String {
    let plain = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        name.to_string()
    } else {
        format!("'{}'", name.replace('\'', "''"))
    }
}

/// Convert a zero-based column index to an Excel column letter
///
/// Examples:
/// - 0 → A
/// - 25 → Z
/// - 26 → AA
pub fn column_index_to_letter(index: usize) -> String {
    let mut result = String::new();
    let mut idx = index;

    loop {
        let remainder = idx % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if idx < 26 {
            break;
        }
        idx = idx / 26 - 1;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_for_three_entries() {
        assert_eq!(
            list_range_formula("GenderMapping", 3),
            "GenderMapping!$B$2:$B$4"
        );
    }

    #[test]
    fn test_range_for_single_entry() {
        assert_eq!(
            list_range_formula("GenderMapping", 1),
            "GenderMapping!$B$2:$B$2"
        );
    }

    #[test]
    fn test_range_quotes_sheet_with_space() {
        assert_eq!(
            list_range_formula("Gender Mapping", 2),
            "'Gender Mapping'!$B$2:$B$3"
        );
    }

    #[test]
    fn test_quote_sheet_name() {
        assert_eq!(quote_sheet_name("Lookup_1"), "Lookup_1");
        assert_eq!(quote_sheet_name("1Lookup"), "'1Lookup'");
        assert_eq!(quote_sheet_name("Bob's"), "'Bob''s'");
        assert_eq!(quote_sheet_name("Géneros"), "'Géneros'");
    }

    #[test]
    fn test_column_index_to_letter() {
        assert_eq!(column_index_to_letter(0), "A");
        assert_eq!(column_index_to_letter(1), "B");
        assert_eq!(column_index_to_letter(25), "Z");
        assert_eq!(column_index_to_letter(26), "AA");
        assert_eq!(column_index_to_letter(701), "ZZ");
    }

    #[test]
    fn test_cell_ref() {
        let validation = ListValidation::new(1, 2, "GenderMapping!$B$2:$B$4");
        assert_eq!(validation.cell_ref(), "C2");
        assert!(validation.allow_blank);
    }
}
