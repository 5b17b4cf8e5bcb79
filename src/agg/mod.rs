//! Aggregation core.
//!
//! - continuous per-week series (`weekly`)
//! - stat-card summary over the visible rows (`summary`)

pub mod summary;
pub mod weekly;

pub use summary::*;
pub use weekly::*;
