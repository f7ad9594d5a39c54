use thiserror::Error;

pub type TemplateResult<T> = Result<T, TemplateError>;

#[derive(Error, Debug)]
pub enum TemplateError {
    /// Dropped file rejected by the filename check, before any decode.
    #[error("Invalid file type: {0}")]
    InvalidFileType(String),

    #[error("No \"{0}\" sheet found in the file")]
    SheetNotFound(String),

    #[error("Error reading the file: {0}")]
    Decoding(String),

    #[error("Failed to generate template: {0}")]
    Encoding(String),

    #[error("Invalid template configuration: {0}")]
    InvalidTemplate(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parsing error: {0}")]
    Config(#[from] serde_yaml::Error),
}

impl TemplateError {
    /// True for failures caused by the uploaded file rather than by this program.
    pub fn is_upload_error(&self) -> bool {
        matches!(
            self,
            TemplateError::InvalidFileType(_)
                | TemplateError::SheetNotFound(_)
                | TemplateError::Decoding(_)
        )
    }
}

impl From<calamine::XlsxError> for TemplateError {
    fn from(e: calamine::XlsxError) -> Self {
        TemplateError::Decoding(e.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for TemplateError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        TemplateError::Encoding(e.to_string())
    }
}
