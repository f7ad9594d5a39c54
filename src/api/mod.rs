//! Roster API Server module
//!
//! HTTP surface for the template download and upload preview.
//! Run with `roster-server`.

pub mod handlers;
pub mod server;

pub use server::{build_router, run_api_server};
