//! Export the current view to files.
//!
//! Two formats, both meant to be easy to consume downstream:
//! - the day-filtered detail rows as CSV (spreadsheets, scripts)
//! - the weekly series as JSON (schema defined by `domain::WeeklyFile`)

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{week, BatchRow, FilterState, PerPartMode, WeeklyAggregate, WeeklyEntry, WeeklyFile};
use crate::error::AppError;

/// Write the filtered detail rows to a CSV file.
pub fn write_rows_csv(path: &Path, rows: &[BatchRow]) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::usage(format!("Failed to create export CSV '{}': {e}", path.display())))?;

    // Header
    writeln!(
        file,
        "date,week,day,product,part_type,weight_per_part,parts_count,total_weight"
    )
    .map_err(|e| AppError::usage(format!("Failed to write export CSV header: {e}")))?;

    for row in rows {
        writeln!(
            file,
            "{},{},{},{},{},{:.3},{},{:.2}",
            row.date,
            row.week,
            row.day,
            row.product,
            row.part_type,
            row.weight_per_part,
            row.parts_count,
            row.total_weight,
        )
        .map_err(|e| AppError::usage(format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

/// Write the weekly series to a JSON file.
pub fn write_weekly_json(
    path: &Path,
    weekly: &[WeeklyAggregate],
    filter: &FilterState,
    per_part: PerPartMode,
) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::usage(format!("Failed to create weekly JSON '{}': {e}", path.display())))?;

    let weeks = weekly
        .iter()
        .map(|agg| WeeklyEntry {
            week: agg.week,
            monday: week::monday_of_week(agg.week),
            total_weight: agg.total_weight,
            weight_per_part: agg.weight_per_part,
            distinct_days: agg.distinct_days,
        })
        .collect();

    let doc = WeeklyFile {
        tool: "agro".to_string(),
        product: filter.product.clone(),
        part_type: filter.part_type.clone(),
        per_part,
        weeks,
    };

    serde_json::to_writer_pretty(file, &doc)
        .map_err(|e| AppError::usage(format!("Failed to write weekly JSON: {e}")))?;

    Ok(())
}
