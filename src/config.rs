//! Template configuration
//!
//! Everything the builder and parser need is carried by [`TemplateConfig`]
//! and passed in explicitly. The defaults reproduce the shipped roster
//! template; a YAML file may override any field.

use crate::error::{TemplateError, TemplateResult};
use crate::types::{default_sample_rows, LookupSet, TemplateRow, TemplateSchema};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

pub const DEFAULT_SHEET_NAME: &str = "Template";
pub const DEFAULT_LOOKUP_SHEET_NAME: &str = "GenderMapping";
pub const DEFAULT_FILE_NAME: &str = "user_template.xlsx";
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const XLSX_EXTENSION: &str = ".xlsx";

/// Excel's limit on worksheet name length
const MAX_SHEET_NAME_LEN: usize = 31;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    pub sheet_name: String,
    pub lookup_sheet_name: String,
    pub file_name: String,
    /// Schema key of the column restricted to lookup names
    pub constrained_key: String,
    pub schema: TemplateSchema,
    pub lookup: LookupSet,
    pub sample_rows: Vec<TemplateRow>,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            lookup_sheet_name: DEFAULT_LOOKUP_SHEET_NAME.to_string(),
            file_name: DEFAULT_FILE_NAME.to_string(),
            constrained_key: "gender".to_string(),
            schema: TemplateSchema::default(),
            lookup: LookupSet::default(),
            sample_rows: default_sample_rows(),
        }
    }
}

impl TemplateConfig {
    /// Parse a YAML config; missing fields keep their defaults
    pub fn from_yaml_str(content: &str) -> TemplateResult<Self> {
        let config: TemplateConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: &Path) -> TemplateResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load from `path` when given, defaults otherwise
    pub fn load(path: Option<&Path>) -> TemplateResult<Self> {
        match path {
            Some(path) => Self::from_yaml_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> TemplateResult<()> {
        validate_sheet_name(&self.sheet_name)?;
        validate_sheet_name(&self.lookup_sheet_name)?;
        // Excel compares sheet names case-insensitively
        if self.sheet_name.eq_ignore_ascii_case(&self.lookup_sheet_name) {
            return Err(invalid(format!(
                "template and lookup sheets share the name '{}'",
                self.sheet_name
            )));
        }

        if self.schema.columns().is_empty() {
            return Err(invalid("schema has no columns"));
        }
        let mut keys = HashSet::new();
        for col in self.schema.columns() {
            if !keys.insert(col.key.as_str()) {
                return Err(invalid(format!("duplicate column key '{}'", col.key)));
            }
        }
        if self.schema.position(&self.constrained_key).is_none() {
            return Err(invalid(format!(
                "constrained column '{}' is not in the schema",
                self.constrained_key
            )));
        }

        if self.lookup.is_empty() {
            return Err(invalid("lookup set is empty"));
        }
        let mut names = HashSet::new();
        for (idx, entry) in self.lookup.entries().iter().enumerate() {
            if entry.id as usize != idx + 1 {
                return Err(invalid(format!(
                    "lookup id {} at position {} is not sequential",
                    entry.id,
                    idx + 1
                )));
            }
            if !names.insert(entry.name.as_str()) {
                return Err(invalid(format!("duplicate lookup name '{}'", entry.name)));
            }
        }

        Ok(())
    }
}

fn validate_sheet_name(name: &str) -> TemplateResult<()> {
    if name.is_empty() || name.chars().count() > MAX_SHEET_NAME_LEN {
        return Err(invalid(format!(
            "sheet name '{name}' must be 1-{MAX_SHEET_NAME_LEN} characters"
        )));
    }
    if name.contains(['[', ']', ':', '*', '?', '/', '\\'])
        || name.starts_with('\'')
        || name.ends_with('\'')
    {
        return Err(invalid(format!(
            "sheet name '{name}' contains a character Excel rejects"
        )));
    }
    Ok(())
}

fn invalid(message: impl Into<String>) -> TemplateError {
    TemplateError::InvalidTemplate(message.into())
}
