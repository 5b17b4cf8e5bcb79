//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - filtered and aggregated in-memory on every selection change
//! - exported to JSON/CSV
//! - rendered by both the CLI reports and the TUI

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Part-type value accepted by the filter that matches every row.
pub const PART_TYPE_ALL: &str = "Totale";

/// Weekday codes a distribution can fall on: Tuesday and Friday.
pub const DAY_CODES: [&str; 2] = ["2", "5"];

/// One distribution batch, as parsed from the embedded TSV.
///
/// Rows are parsed once at startup and never mutated afterwards. Text
/// fields keep whatever the source table contains; numeric fields have
/// already been through Italian-locale parsing, with unparseable cells
/// degraded to `0.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRow {
    /// Calendar date as printed in the source table (display only).
    pub date: String,
    /// Part-type code (`PI` = whole share, `MP` = half share).
    pub part_type: String,
    /// Product name, free text.
    pub product: String,
    /// Weight of one part, in kg.
    pub weight_per_part: f64,
    /// Number of parts distributed. Fractional counts occur in the source.
    pub parts_count: f64,
    /// Total distributed weight in kg. This comes from its own column and
    /// is not required to equal `weight_per_part * parts_count`.
    pub total_weight: f64,
    /// Week number in the 2025 labeling scheme, kept string-encoded so the
    /// detail table can echo the source verbatim.
    pub week: String,
    /// Weekday code (`2` = Tuesday, `5` = Friday).
    pub day: String,
}

/// The active filter selection.
///
/// Owned by the shell (CLI flags or TUI state) and handed to the pipeline
/// on every recomputation; the core never mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterState {
    /// Product name; empty until the user picks one.
    pub product: String,
    /// Part-type code; empty until picked, [`PART_TYPE_ALL`] matches all.
    pub part_type: String,
    /// Weekday code; empty means both days, otherwise `2` or `5`.
    pub day: String,
}

impl FilterState {
    /// A view exists only once both product and part type are chosen.
    pub fn is_active(&self) -> bool {
        !self.product.is_empty() && !self.part_type.is_empty()
    }

    /// Product and part-type match, day ignored.
    ///
    /// This is the subset the weekly chart aggregates, so that switching the
    /// day filter re-scales bars instead of dropping weeks from the axis.
    pub fn matches_base(&self, row: &BatchRow) -> bool {
        row.product == self.product
            && (self.part_type == PART_TYPE_ALL || row.part_type == self.part_type)
    }

    /// Full match including the day filter (detail table, summary, insights).
    pub fn matches_day(&self, row: &BatchRow) -> bool {
        self.matches_base(row) && (self.day.is_empty() || row.day == self.day)
    }
}

/// Human-readable label for a part-type code.
pub fn part_type_label(code: &str) -> &str {
    match code {
        "PI" => "Parte Intera",
        "MP" => "Mezza Parte",
        PART_TYPE_ALL => "Tutti i tipi",
        other => other,
    }
}

/// Human-readable label for a weekday code.
pub fn day_label(code: &str) -> &str {
    match code {
        "" => "Tutti i giorni (2 e 5)",
        "2" => "Martedì",
        "5" => "Venerdì",
        other => other,
    }
}

/// How the weekly `weight_per_part` aggregate is derived.
///
/// Historically the dashboard showed the arithmetic mean of the per-row
/// values, which over-counts light rows when part counts differ a lot
/// inside one week. The weighted alternative is kept behind an explicit
/// switch rather than silently changing the numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PerPartMode {
    /// Arithmetic mean of the per-row `weight_per_part` values (default).
    Mean,
    /// Total weight divided by total parts (`Σ total_weight / Σ parts_count`).
    Ratio,
}

impl PerPartMode {
    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            PerPartMode::Mean => "media",
            PerPartMode::Ratio => "rapporto",
        }
    }
}

/// Which weekly series a chart shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    TotalWeight,
    WeightPerPart,
}

impl Metric {
    pub fn display_name(self) -> &'static str {
        match self {
            Metric::TotalWeight => "peso totale (kg)",
            Metric::WeightPerPart => "peso per parte (kg)",
        }
    }

    /// The other metric (chart toggle).
    pub fn toggled(self) -> Self {
        match self {
            Metric::TotalWeight => Metric::WeightPerPart,
            Metric::WeightPerPart => Metric::TotalWeight,
        }
    }
}

/// One week of the aggregate series.
///
/// The series is continuous: every week between the dataset's first and
/// last week is present, zero-filled where the selection has no rows.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyAggregate {
    /// Week number in the 2025 labeling scheme.
    pub week: u32,
    /// Sum of `total_weight` over the week, rounded to 2 decimals.
    pub total_weight: f64,
    /// Weekly per-part weight per [`PerPartMode`], rounded to 3 decimals.
    pub weight_per_part: f64,
    /// Distinct weekday codes seen in the week (0, 1 or 2).
    pub distinct_days: u8,
}

impl WeeklyAggregate {
    /// Value of the chosen metric for this week.
    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::TotalWeight => self.total_weight,
            Metric::WeightPerPart => self.weight_per_part,
        }
    }
}

/// Headline numbers over the day-filtered rows (the stat cards).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    /// Sum of `total_weight` across the visible rows, in kg.
    pub total_weight: f64,
    /// Arithmetic mean of `weight_per_part` across the visible rows, in kg.
    pub mean_weight_per_part: f64,
    /// Number of visible rows.
    pub row_count: usize,
}

/// A saved weekly-series file (JSON).
///
/// The "portable" representation of one aggregation run: the selection it
/// was computed for plus the full gap-filled series, with each week's
/// Monday resolved so downstream scripts don't need the calendar mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyFile {
    pub tool: String,
    pub product: String,
    pub part_type: String,
    pub per_part: PerPartMode,
    pub weeks: Vec<WeeklyEntry>,
}

/// One week as stored in a [`WeeklyFile`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyEntry {
    pub week: u32,
    /// Monday that begins the week (ISO date).
    pub monday: NaiveDate,
    pub total_weight: f64,
    pub weight_per_part: f64,
    pub distinct_days: u8,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct ViewConfig {
    pub filter: FilterState,
    pub per_part: PerPartMode,

    pub chart: bool,
    pub chart_width: usize,
    pub chart_height: usize,

    pub export_rows: Option<PathBuf>,
    pub export_weekly: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(product: &str, part_type: &str, day: &str) -> BatchRow {
        BatchRow {
            date: "07/01/2025".to_string(),
            part_type: part_type.to_string(),
            product: product.to_string(),
            weight_per_part: 1.0,
            parts_count: 10.0,
            total_weight: 10.0,
            week: "2".to_string(),
            day: day.to_string(),
        }
    }

    #[test]
    fn filter_inactive_until_product_and_part_type_set() {
        let mut filter = FilterState::default();
        assert!(!filter.is_active());
        filter.product = "Patate".to_string();
        assert!(!filter.is_active());
        filter.part_type = "PI".to_string();
        assert!(filter.is_active());
    }

    #[test]
    fn part_type_all_matches_every_part_type() {
        let filter = FilterState {
            product: "Patate".to_string(),
            part_type: PART_TYPE_ALL.to_string(),
            day: String::new(),
        };
        assert!(filter.matches_base(&row("Patate", "PI", "2")));
        assert!(filter.matches_base(&row("Patate", "MP", "5")));
        assert!(!filter.matches_base(&row("Carote", "PI", "2")));
    }

    #[test]
    fn day_filter_applies_only_to_full_match() {
        let filter = FilterState {
            product: "Patate".to_string(),
            part_type: "PI".to_string(),
            day: "2".to_string(),
        };
        let friday = row("Patate", "PI", "5");
        assert!(filter.matches_base(&friday));
        assert!(!filter.matches_day(&friday));
        assert!(filter.matches_day(&row("Patate", "PI", "2")));
    }

    #[test]
    fn empty_day_matches_both_days() {
        let filter = FilterState {
            product: "Patate".to_string(),
            part_type: "PI".to_string(),
            day: String::new(),
        };
        assert!(filter.matches_day(&row("Patate", "PI", "2")));
        assert!(filter.matches_day(&row("Patate", "PI", "5")));
    }

    #[test]
    fn labels_cover_known_codes() {
        assert_eq!(part_type_label("PI"), "Parte Intera");
        assert_eq!(part_type_label("MP"), "Mezza Parte");
        assert_eq!(part_type_label("Totale"), "Tutti i tipi");
        assert_eq!(part_type_label("XX"), "XX");
        assert_eq!(day_label("2"), "Martedì");
        assert_eq!(day_label("5"), "Venerdì");
    }

    #[test]
    fn metric_toggle_round_trips() {
        assert_eq!(Metric::TotalWeight.toggled(), Metric::WeightPerPart);
        assert_eq!(Metric::WeightPerPart.toggled(), Metric::TotalWeight);
    }
}
