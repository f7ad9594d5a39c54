use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

//==============================================================================
// Lookup Set (backs the list validation dropdown)
//==============================================================================

/// One selectable value of the constrained column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupEntry {
    pub id: u32,
    pub name: String,
}

impl LookupEntry {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Ordered lookup entries, written to the hidden sheet in this order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LookupSet {
    entries: Vec<LookupEntry>,
}

impl LookupSet {
    pub fn new(entries: Vec<LookupEntry>) -> Self {
        Self { entries }
    }

    /// Build a set from names, assigning sequential 1-based ids
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = names
            .into_iter()
            .enumerate()
            .map(|(idx, name)| LookupEntry::new(idx as u32 + 1, name))
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[LookupEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve the id for a cell value by exact name match
    pub fn id_for(&self, value: &CellValue) -> Option<u32> {
        match value {
            CellValue::Text(name) => self
                .entries
                .iter()
                .find(|entry| entry.name == *name)
                .map(|entry| entry.id),
            _ => None,
        }
    }
}

impl Default for LookupSet {
    fn default() -> Self {
        Self::from_names(["Male", "Female", "Others"])
    }
}

//==============================================================================
// Template Schema
//==============================================================================

/// Column descriptor of the visible template sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub header: String,
    pub key: String,
    pub width: f64,
}

impl ColumnSpec {
    pub fn new(header: impl Into<String>, key: impl Into<String>, width: f64) -> Self {
        Self {
            header: header.into(),
            key: key.into(),
            width,
        }
    }
}

/// Ordered columns of the template sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateSchema {
    columns: Vec<ColumnSpec>,
}

impl TemplateSchema {
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Zero-based position of the column with the given key
    pub fn position(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|col| col.key == key)
    }

    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|col| col.header.as_str()).collect()
    }
}

impl Default for TemplateSchema {
    fn default() -> Self {
        Self::new(vec![
            ColumnSpec::new("Name", "name", 20.0),
            ColumnSpec::new("Email", "email", 30.0),
            ColumnSpec::new("Gender", "gender", 15.0),
        ])
    }
}

//==============================================================================
// Template Rows
//==============================================================================

/// Column key -> cell text. Missing keys read as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateRow {
    values: HashMap<String, String>,
}

impl TemplateRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> &str {
        self.values.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn is_blank(&self) -> bool {
        self.values.values().all(|v| v.is_empty())
    }
}

/// The sample rows shipped in the downloadable template, ending with a blank
/// fill-in row.
pub fn default_sample_rows() -> Vec<TemplateRow> {
    let people = [
        ("John Doe", "john.doe@example.com", "Male"),
        ("Jane Smith", "jane.smith@example.com", "Female"),
        ("Alex Johnson", "alex.j@example.com", "Others"),
        ("", "", ""),
    ];
    people
        .iter()
        .map(|(name, email, gender)| {
            TemplateRow::new()
                .with("name", *name)
                .with("email", *email)
                .with("gender", *gender)
        })
        .collect()
}

//==============================================================================
// Cell Values & Preview Records
//==============================================================================

/// Raw cell content as declared in the file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Boolean(bool),
}

impl CellValue {
    /// Text cell, or `Empty` for the empty string (Excel does not store those)
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::text(s)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Boolean(b) => write!(f, "{b}"),
        }
    }
}

/// One uploaded row, read positionally from the first three cells
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreviewRecord {
    pub name: CellValue,
    pub email: CellValue,
    pub gender: CellValue,
}

impl PreviewRecord {
    pub fn new(
        name: impl Into<CellValue>,
        email: impl Into<CellValue>,
        gender: impl Into<CellValue>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            gender: gender.into(),
        }
    }

    /// The record a template row is expected to decode to: the first three
    /// schema columns, in schema order.
    pub fn from_row(row: &TemplateRow, schema: &TemplateSchema) -> Self {
        let mut cells = schema
            .columns()
            .iter()
            .map(|col| CellValue::text(row.get(&col.key)));
        Self {
            name: cells.next().unwrap_or_default(),
            email: cells.next().unwrap_or_default(),
            gender: cells.next().unwrap_or_default(),
        }
    }
}

/// A preview record with the gender id resolved for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewRow {
    #[serde(flatten)]
    pub record: PreviewRecord,
    pub gender_id: Option<u32>,
}

impl PreviewRow {
    pub fn resolve(record: PreviewRecord, lookup: &LookupSet) -> Self {
        let gender_id = lookup.id_for(&record.gender);
        Self { record, gender_id }
    }

    /// Gender cell as shown in the preview table, e.g. `Male (1)`
    pub fn gender_label(&self) -> String {
        match self.gender_id {
            Some(id) => format!("{} ({})", self.record.gender, id),
            None => format!("{} ()", self.record.gender),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lookup_is_sequential() {
        let lookup = LookupSet::default();
        let ids: Vec<u32> = lookup.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(lookup.entries()[2].name, "Others");
    }

    #[test]
    fn test_lookup_id_for_exact_match_only() {
        let lookup = LookupSet::default();
        assert_eq!(lookup.id_for(&CellValue::text("Female")), Some(2));
        assert_eq!(lookup.id_for(&CellValue::text("female")), None);
        assert_eq!(lookup.id_for(&CellValue::Number(1.0)), None);
        assert_eq!(lookup.id_for(&CellValue::Empty), None);
    }

    #[test]
    fn test_schema_position() {
        let schema = TemplateSchema::default();
        assert_eq!(schema.position("gender"), Some(2));
        assert_eq!(schema.position("age"), None);
        assert_eq!(schema.headers(), vec!["Name", "Email", "Gender"]);
    }

    #[test]
    fn test_template_row_missing_key_is_empty() {
        let row = TemplateRow::new().with("name", "Ada");
        assert_eq!(row.get("name"), "Ada");
        assert_eq!(row.get("email"), "");
        assert!(!row.is_blank());
        assert!(TemplateRow::new().with("name", "").is_blank());
    }

    #[test]
    fn test_default_sample_rows_end_with_blank_row() {
        let rows = default_sample_rows();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].get("email"), "john.doe@example.com");
        assert!(rows[3].is_blank());
    }

    #[test]
    fn test_cell_value_text_empty_string() {
        assert_eq!(CellValue::text(""), CellValue::Empty);
        assert_eq!(CellValue::text("x"), CellValue::Text("x".to_string()));
    }

    #[test]
    fn test_cell_value_display() {
        assert_eq!(CellValue::Number(3.0).to_string(), "3");
        assert_eq!(CellValue::Number(2.5).to_string(), "2.5");
        assert_eq!(CellValue::Boolean(true).to_string(), "true");
        assert_eq!(CellValue::Empty.to_string(), "");
    }

    #[test]
    fn test_cell_value_serialize_tagged() {
        let json = serde_json::to_string(&CellValue::text("Male")).unwrap();
        assert_eq!(json, r#"{"type":"text","value":"Male"}"#);
        let json = serde_json::to_string(&CellValue::Empty).unwrap();
        assert_eq!(json, r#"{"type":"empty"}"#);
    }

    #[test]
    fn test_preview_row_gender_label() {
        let lookup = LookupSet::default();
        let row = PreviewRow::resolve(PreviewRecord::new("A", "a@b.c", "Others"), &lookup);
        assert_eq!(row.gender_id, Some(3));
        assert_eq!(row.gender_label(), "Others (3)");

        let row = PreviewRow::resolve(PreviewRecord::new("A", "a@b.c", "Unknown"), &lookup);
        assert_eq!(row.gender_label(), "Unknown ()");
    }

    #[test]
    fn test_preview_record_from_row_follows_schema_order() {
        let schema = TemplateSchema::default();
        let row = TemplateRow::new()
            .with("gender", "Male")
            .with("name", "John")
            .with("email", "j@x.io");
        let record = PreviewRecord::from_row(&row, &schema);
        assert_eq!(record, PreviewRecord::new("John", "j@x.io", "Male"));
    }
}
