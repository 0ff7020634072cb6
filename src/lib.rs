//! drawlab — daily lottery pick generation, scoring, and reporting.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod engine;
pub mod picks;
pub mod store;
pub mod ingest;
pub mod notify;
