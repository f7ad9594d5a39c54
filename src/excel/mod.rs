//! Excel template module
//!
//! Bidirectional mapping between roster rows and .xlsx workbooks:
//! - Build: schema + sample rows + lookup set → .xlsx with a hidden lookup
//!   sheet and per-cell list validation
//! - Parse: uploaded .xlsx → preview records

mod builder;
mod parser;
pub mod validation;

pub use builder::{SheetLayout, TemplateBuilder, TemplateDownload, TemplateLayout};
pub use parser::{sheet_visibility, SheetVisibility, TemplateParser};
pub use validation::{list_range_formula, ListValidation};
