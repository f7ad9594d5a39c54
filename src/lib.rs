//! Roster - Excel template generation and upload preview
//!
//! Builds a spreadsheet template whose "Gender" column is restricted, cell by
//! cell, to the names on a hidden lookup sheet, and reads filled-in copies
//! back into preview records.
//!
//! # Example
//!
//! ```no_run
//! use roster_template::config::TemplateConfig;
//! use roster_template::excel::{TemplateBuilder, TemplateParser};
//!
//! let config = TemplateConfig::default();
//! let bytes = TemplateBuilder::new(&config).build(&config.sample_rows)?;
//!
//! let records = TemplateParser::new(&config.sheet_name).parse(&bytes)?;
//! println!("Rows: {}", records.len());
//! # Ok::<(), roster_template::error::TemplateError>(())
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod excel;
pub mod preview;
pub mod types;
pub mod upload;

// Re-export commonly used types
pub use config::TemplateConfig;
pub use error::{TemplateError, TemplateResult};
pub use types::{CellValue, LookupEntry, LookupSet, PreviewRecord, PreviewRow, TemplateRow};
