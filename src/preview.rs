//! Preview session: the rows shown after a file is dropped

use crate::error::TemplateResult;
use crate::excel::TemplateParser;
use crate::types::{LookupSet, PreviewRecord, PreviewRow};
use crate::upload::{accept_drop, DroppedFile};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

/// Holds the current preview. A successful load replaces it entirely; a
/// failed load leaves it as it was.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PreviewSession {
    rows: Vec<PreviewRow>,
    source: Option<String>,
    loaded_at: Option<DateTime<Utc>>,
}

impl PreviewSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gatekeep, parse and swap in the rows of a dropped file
    pub fn load(
        &mut self,
        files: Vec<DroppedFile>,
        parser: &TemplateParser,
        lookup: &LookupSet,
    ) -> TemplateResult<usize> {
        let file = accept_drop(files)?;
        let records = parser.parse(&file.bytes)?;
        Ok(self.replace(file.name, records, lookup))
    }

    /// Swap in already-parsed records
    pub fn replace(
        &mut self,
        source: impl Into<String>,
        records: Vec<PreviewRecord>,
        lookup: &LookupSet,
    ) -> usize {
        let source = source.into();
        self.rows = records
            .into_iter()
            .map(|record| PreviewRow::resolve(record, lookup))
            .collect();
        info!(source = %source, rows = self.rows.len(), "preview loaded");
        self.source = Some(source);
        self.loaded_at = Some(Utc::now());
        self.rows.len()
    }

    pub fn reset(&mut self) {
        self.rows.clear();
        self.source = None;
        self.loaded_at = None;
    }

    pub fn rows(&self) -> &[PreviewRow] {
        &self.rows
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TemplateConfig;
    use crate::error::TemplateError;
    use crate::excel::TemplateBuilder;
    use crate::types::default_sample_rows;

    fn template_file() -> DroppedFile {
        let config = TemplateConfig::default();
        let bytes = TemplateBuilder::new(&config)
            .build(&default_sample_rows())
            .unwrap();
        DroppedFile::new("user_template.xlsx", bytes)
    }

    #[test]
    fn test_load_then_reset() {
        let lookup = LookupSet::default();
        let parser = TemplateParser::new("Template");
        let mut session = PreviewSession::new();

        let count = session.load(vec![template_file()], &parser, &lookup).unwrap();
        assert_eq!(count, 4);
        assert_eq!(session.source(), Some("user_template.xlsx"));
        assert!(session.loaded_at().is_some());
        assert_eq!(session.rows()[1].gender_id, Some(2));
        assert_eq!(session.rows()[3].gender_id, None);

        session.reset();
        assert!(session.is_empty());
        assert!(session.source().is_none());
    }

    #[test]
    fn test_failed_load_keeps_previous_rows() {
        let lookup = LookupSet::default();
        let parser = TemplateParser::new("Template");
        let mut session = PreviewSession::new();
        session.load(vec![template_file()], &parser, &lookup).unwrap();

        let bad_type = session.load(
            vec![DroppedFile::new("data.csv", vec![])],
            &parser,
            &lookup,
        );
        assert!(matches!(bad_type, Err(TemplateError::InvalidFileType(_))));

        let corrupt = session.load(
            vec![DroppedFile::new("data.xlsx", b"corrupt".to_vec())],
            &parser,
            &lookup,
        );
        assert!(matches!(corrupt, Err(TemplateError::Decoding(_))));

        assert_eq!(session.rows().len(), 4);
        assert_eq!(session.source(), Some("user_template.xlsx"));
    }

    #[test]
    fn test_new_load_replaces_rows() {
        let lookup = LookupSet::default();
        let mut session = PreviewSession::new();
        session.replace("a.xlsx", vec![PreviewRecord::new("A", "", ""); 3], &lookup);
        session.replace("b.xlsx", vec![PreviewRecord::new("B", "", "Male")], &lookup);

        assert_eq!(session.rows().len(), 1);
        assert_eq!(session.rows()[0].gender_id, Some(1));
        assert_eq!(session.source(), Some("b.xlsx"));
    }
}
