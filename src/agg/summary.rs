//! Headline stats over the visible rows.

use crate::domain::{BatchRow, Summary};

/// Compute the stat-card numbers for the day-filtered rows.
///
/// Values are left unrounded here; presentation picks its own precision
/// (whole kg for the total, 3 decimals for the mean).
pub fn summarize(rows: &[BatchRow]) -> Summary {
    let total_weight: f64 = rows.iter().map(|row| row.total_weight).sum();
    let mean_weight_per_part = if rows.is_empty() {
        0.0
    } else {
        rows.iter().map(|row| row.weight_per_part).sum::<f64>() / rows.len() as f64
    };

    Summary {
        total_weight,
        mean_weight_per_part,
        row_count: rows.len(),
    }
}
