//! Template builder: config + sample rows → .xlsx bytes

use super::validation::{list_range_formula, ListValidation};
use crate::config::{TemplateConfig, XLSX_CONTENT_TYPE};
use crate::error::{TemplateError, TemplateResult};
use crate::types::{CellValue, TemplateRow};
use rust_xlsxwriter::{DataValidation, Format, FormatAlign, Formula, Workbook, Worksheet};
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// Contents of one worksheet, before encoding
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetLayout {
    pub name: String,
    pub hidden: bool,
    pub headers: Vec<String>,
    /// Display width per column; `None` keeps Excel's default
    pub widths: Vec<Option<f64>>,
    pub rows: Vec<Vec<CellValue>>,
}

/// Everything the encoder writes: the visible template sheet, the hidden
/// lookup sheet and one list validation per constrained data cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateLayout {
    pub template: SheetLayout,
    pub lookup: SheetLayout,
    pub validations: Vec<ListValidation>,
}

impl TemplateLayout {
    /// Encode the layout as an .xlsx workbook
    pub fn encode(&self) -> TemplateResult<Vec<u8>> {
        let mut workbook = Workbook::new();

        let header_format = Format::new()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter);
        // Blank data cells are written with this format so the fill-in rows
        // stay inside the sheet dimension.
        let body_format = Format::new().set_unlocked();

        let worksheet = workbook.add_worksheet();
        write_sheet(
            worksheet,
            &self.template,
            Some(&header_format),
            Some(&body_format),
        )?;
        for validation in &self.validations {
            let rule = DataValidation::new()
                .allow_list_formula(Formula::new(validation.formula.as_str()))
                .ignore_blank(validation.allow_blank);
            worksheet.add_data_validation(
                validation.row,
                validation.col,
                validation.row,
                validation.col,
                &rule,
            )?;
        }

        let worksheet = workbook.add_worksheet();
        write_sheet(worksheet, &self.lookup, None, None)?;
        worksheet.set_hidden(self.lookup.hidden);

        let bytes = workbook.save_to_buffer()?;
        debug!(
            bytes = bytes.len(),
            rows = self.template.rows.len(),
            validations = self.validations.len(),
            "encoded template workbook"
        );
        Ok(bytes)
    }
}

fn write_sheet(
    worksheet: &mut Worksheet,
    sheet: &SheetLayout,
    header_format: Option<&Format>,
    body_format: Option<&Format>,
) -> TemplateResult<()> {
    worksheet.set_name(&sheet.name)?;

    for (col_idx, width) in sheet.widths.iter().enumerate() {
        if let Some(width) = width {
            worksheet.set_column_width(col_idx as u16, *width)?;
        }
    }

    // Header row (row 0)
    for (col_idx, header) in sheet.headers.iter().enumerate() {
        match header_format {
            Some(format) => {
                worksheet.write_string_with_format(0, col_idx as u16, header, format)?
            }
            None => worksheet.write_string(0, col_idx as u16, header)?,
        };
    }

    // Data rows start at row 1 (Excel row 2)
    for (row_idx, row) in sheet.rows.iter().enumerate() {
        let excel_row = row_idx as u32 + 1;
        for (col_idx, value) in row.iter().enumerate() {
            write_cell(worksheet, excel_row, col_idx as u16, value, body_format)?;
        }
    }

    Ok(())
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &CellValue,
    format: Option<&Format>,
) -> TemplateResult<()> {
    match (value, format) {
        (CellValue::Empty, Some(format)) => {
            worksheet.write_blank(row, col, format)?;
        }
        (CellValue::Empty, None) => {}
        (CellValue::Text(s), Some(format)) => {
            worksheet.write_string_with_format(row, col, s, format)?;
        }
        (CellValue::Text(s), None) => {
            worksheet.write_string(row, col, s)?;
        }
        (CellValue::Number(n), Some(format)) => {
            worksheet.write_number_with_format(row, col, *n, format)?;
        }
        (CellValue::Number(n), None) => {
            worksheet.write_number(row, col, *n)?;
        }
        (CellValue::Boolean(b), Some(format)) => {
            worksheet.write_boolean_with_format(row, col, *b, format)?;
        }
        (CellValue::Boolean(b), None) => {
            worksheet.write_boolean(row, col, *b)?;
        }
    }
    Ok(())
}

/// Builds the downloadable roster template
pub struct TemplateBuilder<'a> {
    config: &'a TemplateConfig,
}

impl<'a> TemplateBuilder<'a> {
    pub fn new(config: &'a TemplateConfig) -> Self {
        Self { config }
    }

    /// Lay out the workbook for `rows` without encoding it
    pub fn layout(&self, rows: &[TemplateRow]) -> TemplateResult<TemplateLayout> {
        let config = self.config;
        config.validate()?;

        let columns = config.schema.columns();
        let template = SheetLayout {
            name: config.sheet_name.clone(),
            hidden: false,
            headers: columns.iter().map(|col| col.header.clone()).collect(),
            widths: columns.iter().map(|col| Some(col.width)).collect(),
            rows: rows
                .iter()
                .map(|row| {
                    columns
                        .iter()
                        .map(|col| CellValue::text(row.get(&col.key)))
                        .collect()
                })
                .collect(),
        };

        let lookup = SheetLayout {
            name: config.lookup_sheet_name.clone(),
            hidden: true,
            headers: vec!["ID".to_string(), "Name".to_string()],
            widths: vec![None, None],
            rows: config
                .lookup
                .entries()
                .iter()
                .map(|entry| vec![CellValue::Number(entry.id as f64), CellValue::text(&entry.name)])
                .collect(),
        };

        let constrained_col = config.schema.position(&config.constrained_key).ok_or_else(|| {
            TemplateError::InvalidTemplate(format!(
                "constrained column '{}' is not in the schema",
                config.constrained_key
            ))
        })?;
        let formula = list_range_formula(&lookup.name, config.lookup.len());
        let validations = (0..rows.len())
            .map(|row_idx| {
                ListValidation::new(row_idx as u32 + 1, constrained_col as u16, formula.clone())
            })
            .collect();

        Ok(TemplateLayout {
            template,
            lookup,
            validations,
        })
    }

    /// Build the template workbook bytes
    pub fn build(&self, rows: &[TemplateRow]) -> TemplateResult<Vec<u8>> {
        self.layout(rows)?.encode()
    }

    /// Build the template and wrap it for delivery under the configured file name
    pub fn download(&self, rows: &[TemplateRow]) -> TemplateResult<TemplateDownload> {
        let bytes = self.build(rows)?;
        Ok(TemplateDownload {
            file_name: self.config.file_name.clone(),
            content_type: XLSX_CONTENT_TYPE,
            bytes,
        })
    }
}

/// A generated template ready to hand to the user.
///
/// Consumed by whichever delivery path uses it, so the buffer is released
/// as soon as it has been written out.
#[derive(Debug)]
pub struct TemplateDownload {
    file_name: String,
    content_type: &'static str,
    bytes: Vec<u8>,
}

impl TemplateDownload {
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> &'static str {
        self.content_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// `Content-Disposition` header value for HTTP delivery
    pub fn content_disposition(&self) -> String {
        format!(
            "attachment; filename=\"{}\"",
            self.file_name.replace('"', "")
        )
    }

    /// Write into `dir` under the download's file name, returning the path
    pub fn save_in(self, dir: &Path) -> TemplateResult<std::path::PathBuf> {
        let path = dir.join(&self.file_name);
        self.save_as(&path)?;
        Ok(path)
    }

    pub fn save_as(self, path: &Path) -> TemplateResult<()> {
        std::fs::write(path, &self.bytes)?;
        Ok(())
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{default_sample_rows, LookupSet};

    #[test]
    fn test_layout_default_template() {
        let config = TemplateConfig::default();
        let layout = TemplateBuilder::new(&config)
            .layout(&default_sample_rows())
            .unwrap();

        assert_eq!(layout.template.name, "Template");
        assert!(!layout.template.hidden);
        assert_eq!(layout.template.headers, vec!["Name", "Email", "Gender"]);
        assert_eq!(layout.template.widths, vec![Some(20.0), Some(30.0), Some(15.0)]);
        assert_eq!(layout.template.rows.len(), 4);
        assert_eq!(layout.template.rows[3], vec![CellValue::Empty; 3]);

        assert_eq!(layout.lookup.name, "GenderMapping");
        assert!(layout.lookup.hidden);
        assert_eq!(layout.lookup.headers, vec!["ID", "Name"]);
        assert_eq!(
            layout.lookup.rows[1],
            vec![CellValue::Number(2.0), CellValue::text("Female")]
        );
    }

    #[test]
    fn test_one_validation_per_data_cell() {
        let config = TemplateConfig::default();
        let layout = TemplateBuilder::new(&config)
            .layout(&default_sample_rows())
            .unwrap();

        let cells: Vec<String> = layout.validations.iter().map(|v| v.cell_ref()).collect();
        assert_eq!(cells, vec!["C2", "C3", "C4", "C5"]);
        for validation in &layout.validations {
            assert_eq!(validation.formula, "GenderMapping!$B$2:$B$4");
            assert!(validation.allow_blank);
        }
    }

    #[test]
    fn test_validation_range_tracks_lookup_size() {
        let config = TemplateConfig {
            lookup: LookupSet::from_names(["Only"]),
            ..Default::default()
        };
        let layout = TemplateBuilder::new(&config)
            .layout(&default_sample_rows())
            .unwrap();
        assert_eq!(layout.validations[0].formula, "GenderMapping!$B$2:$B$2");
        assert_eq!(layout.lookup.rows.len(), 1);
    }

    #[test]
    fn test_no_rows_no_validations() {
        let config = TemplateConfig::default();
        let layout = TemplateBuilder::new(&config).layout(&[]).unwrap();
        assert!(layout.validations.is_empty());
        assert!(layout.template.rows.is_empty());
    }

    #[test]
    fn test_build_produces_zip_container() {
        let config = TemplateConfig::default();
        let bytes = TemplateBuilder::new(&config)
            .build(&default_sample_rows())
            .unwrap();
        // .xlsx is a zip archive
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_invalid_config_fails_before_encoding() {
        let config = TemplateConfig {
            lookup: LookupSet::new(vec![]),
            ..Default::default()
        };
        let result = TemplateBuilder::new(&config).build(&default_sample_rows());
        assert!(matches!(result, Err(TemplateError::InvalidTemplate(_))));
    }

    #[test]
    fn test_download_metadata() {
        let config = TemplateConfig::default();
        let download = TemplateBuilder::new(&config)
            .download(&default_sample_rows())
            .unwrap();
        assert_eq!(download.file_name(), "user_template.xlsx");
        assert_eq!(
            download.content_type(),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
        assert_eq!(
            download.content_disposition(),
            "attachment; filename=\"user_template.xlsx\""
        );
        assert!(!download.is_empty());
    }
}
