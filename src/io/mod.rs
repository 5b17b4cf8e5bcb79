//! Input/output helpers.
//!
//! - TSV ingest + normalization (`ingest`)
//! - view exports (CSV/JSON) (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
