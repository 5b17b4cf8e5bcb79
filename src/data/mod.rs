//! Data sources.
//!
//! - the embedded distribution table (`dataset`)
//! - best-effort Gemini summaries of the visible rows (`insight`)

pub mod dataset;
pub mod insight;

pub use dataset::*;
pub use insight::*;
