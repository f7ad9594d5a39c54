//! CLI command handlers

pub mod commands;

pub use commands::{lookup, preview, template};
