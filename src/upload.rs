//! Upload gatekeeper
//!
//! The only check is the filename suffix. Content is not sniffed and there is
//! no size limit; a renamed non-xlsx file passes here and fails later with a
//! decoding error.

use crate::config::XLSX_EXTENSION;
use crate::error::{TemplateError, TemplateResult};
use std::path::Path;
use tracing::debug;

pub const REJECTION_MESSAGE: &str = "Please upload an Excel file (.xlsx)";

/// A file handed over by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl DroppedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a local file, checking its name before touching its contents
    pub fn from_path(path: &Path) -> TemplateResult<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        check_extension(&name)?;
        let bytes = std::fs::read(path)?;
        Ok(Self { name, bytes })
    }
}

/// Accept the first dropped file if its name ends in `.xlsx`
pub fn accept_drop(files: Vec<DroppedFile>) -> TemplateResult<DroppedFile> {
    let mut files = files.into_iter();
    let file = files
        .next()
        .ok_or_else(|| TemplateError::InvalidFileType(REJECTION_MESSAGE.to_string()))?;

    let ignored = files.count();
    if ignored > 0 {
        debug!(ignored, accepted = %file.name, "extra dropped files ignored");
    }

    check_extension(&file.name)?;
    Ok(file)
}

/// Case-sensitive suffix check, e.g. `data.XLSX` is rejected
pub fn check_extension(name: &str) -> TemplateResult<()> {
    if name.ends_with(XLSX_EXTENSION) {
        Ok(())
    } else {
        Err(TemplateError::InvalidFileType(REJECTION_MESSAGE.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_xlsx_regardless_of_content() {
        let file = accept_drop(vec![DroppedFile::new("data.xlsx", b"junk".to_vec())]).unwrap();
        assert_eq!(file.name, "data.xlsx");
        assert_eq!(file.bytes, b"junk");
    }

    #[test]
    fn test_rejects_csv() {
        let result = accept_drop(vec![DroppedFile::new("data.csv", b"a,b".to_vec())]);
        match result {
            Err(TemplateError::InvalidFileType(msg)) => assert_eq!(msg, REJECTION_MESSAGE),
            other => panic!("expected InvalidFileType, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_empty_drop() {
        assert!(matches!(
            accept_drop(vec![]),
            Err(TemplateError::InvalidFileType(_))
        ));
    }

    #[test]
    fn test_only_first_file_counts() {
        let files = vec![
            DroppedFile::new("notes.txt", vec![]),
            DroppedFile::new("data.xlsx", vec![]),
        ];
        assert!(accept_drop(files).is_err());

        let files = vec![
            DroppedFile::new("data.xlsx", vec![1]),
            DroppedFile::new("notes.txt", vec![2]),
        ];
        assert_eq!(accept_drop(files).unwrap().bytes, vec![1]);
    }

    #[test]
    fn test_extension_is_case_sensitive() {
        assert!(check_extension("DATA.XLSX").is_err());
        assert!(check_extension("data.xls").is_err());
        assert!(check_extension("archive.xlsx.zip").is_err());
        assert!(check_extension("roster.xlsx").is_ok());
    }

    #[test]
    fn test_from_path_rejects_before_reading() {
        // The file does not exist; the name check must fail first.
        let result = DroppedFile::from_path(Path::new("/nonexistent/data.csv"));
        assert!(matches!(result, Err(TemplateError::InvalidFileType(_))));

        let result = DroppedFile::from_path(Path::new("/nonexistent/data.xlsx"));
        assert!(matches!(result, Err(TemplateError::Io(_))));
    }
}
