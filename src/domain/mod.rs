//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - parsed batch rows and filter state (`BatchRow`, `FilterState`)
//! - weekly aggregate outputs (`WeeklyAggregate`, `Summary`)
//! - the week-number to Monday mapping (`week`)

pub mod types;
pub mod week;

pub use types::*;
