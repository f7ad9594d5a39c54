//! Template parser: uploaded .xlsx bytes → preview records
//!
//! Columns are read by position (1st = name, 2nd = email, 3rd = gender), not
//! by header text. Renamed headers are tolerated; reordered columns are not
//! detected and will misalign. A header that differs from the expected schema
//! is logged as a warning.

use crate::error::{TemplateError, TemplateResult};
use crate::types::{CellValue, PreviewRecord};
use calamine::{open_workbook_from_rs, Data, Range, Reader, SheetVisible, Xlsx};
use std::collections::BTreeSet;
use std::io::Cursor;
use tracing::{debug, warn};

type XlsxBytes = Xlsx<Cursor<Vec<u8>>>;

impl From<&Data> for CellValue {
    fn from(cell: &Data) -> Self {
        match cell {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::text(s.as_str()),
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Bool(b) => CellValue::Boolean(*b),
            Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::text(s.as_str()),
            Data::Error(e) => CellValue::Text(e.to_string()),
        }
    }
}

/// Visibility of a sheet as recorded in the workbook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetVisibility {
    Visible,
    Hidden,
    VeryHidden,
}

/// Reads preview records from the named sheet of an uploaded workbook
pub struct TemplateParser {
    sheet_name: String,
    expected_headers: Vec<String>,
}

impl TemplateParser {
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            expected_headers: Vec::new(),
        }
    }

    /// Warn when the uploaded header row differs from these headers
    pub fn with_expected_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expected_headers = headers.into_iter().map(Into::into).collect();
        self
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    /// Decode `bytes` and return one record per stored row after the header row
    pub fn parse(&self, bytes: &[u8]) -> TemplateResult<Vec<PreviewRecord>> {
        let mut workbook = open(bytes)?;

        if !workbook
            .sheet_names()
            .iter()
            .any(|name| name == &self.sheet_name)
        {
            return Err(TemplateError::SheetNotFound(self.sheet_name.clone()));
        }

        // Rows that hold at least one cell element, formatted blanks
        // included. The value range drops blanks, so it can't tell a kept
        // fill-in row from a missing one.
        let mut present_rows = BTreeSet::new();
        {
            let mut reader = workbook.worksheet_cells_reader(&self.sheet_name)?;
            while let Some(cell) = reader.next_cell()? {
                present_rows.insert(cell.get_position().0);
            }
        }
        let range = workbook.worksheet_range(&self.sheet_name)?;

        self.check_headers(&range);

        let records: Vec<PreviewRecord> = present_rows
            .into_iter()
            .filter(|&row| row > 0)
            .map(|row| PreviewRecord {
                name: cell_at(&range, row, 0),
                email: cell_at(&range, row, 1),
                gender: cell_at(&range, row, 2),
            })
            .collect();

        debug!(
            sheet = %self.sheet_name,
            records = records.len(),
            "parsed template sheet"
        );
        Ok(records)
    }

    fn check_headers(&self, range: &Range<Data>) {
        for (col, expected) in self.expected_headers.iter().enumerate() {
            let found = cell_at(range, 0, col as u32);
            if found.to_string() != *expected {
                warn!(
                    column = col + 1,
                    expected = %expected,
                    found = %found,
                    "header differs from template; columns are read by position"
                );
            }
        }
    }
}

fn open(bytes: &[u8]) -> TemplateResult<XlsxBytes> {
    open_workbook_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e: calamine::XlsxError| TemplateError::Decoding(e.to_string()))
}

fn cell_at(range: &Range<Data>, row: u32, col: u32) -> CellValue {
    range
        .get_value((row, col))
        .map(CellValue::from)
        .unwrap_or_default()
}

/// Sheet names with their visibility, in workbook order
pub fn sheet_visibility(bytes: &[u8]) -> TemplateResult<Vec<(String, SheetVisibility)>> {
    let workbook = open(bytes)?;
    Ok(workbook
        .sheets_metadata()
        .iter()
        .map(|sheet| {
            let visibility = match sheet.visible {
                SheetVisible::Visible => SheetVisibility::Visible,
                SheetVisible::Hidden => SheetVisibility::Hidden,
                SheetVisible::VeryHidden => SheetVisibility::VeryHidden,
            };
            (sheet.name.clone(), visibility)
        })
        .collect())
}
