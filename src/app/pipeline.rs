//! Shared view-building logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! filter -> weekly aggregation -> summary
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).
//!
//! Two row subsets come out of one filter:
//!
//! - `base`: product + part-type matches, day filter ignored. This feeds
//!   the weekly series, so toggling the day re-scales bars instead of
//!   changing the chart's week axis.
//! - `visible`: `base` narrowed by the day filter. This feeds the detail
//!   table, the summary cards and the insight prompt.

use crate::agg;
use crate::data::Dataset;
use crate::domain::{BatchRow, FilterState, PerPartMode, Summary, WeeklyAggregate};

/// All computed outputs for one filter selection.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewOutput {
    /// Product + part-type subset, day filter not applied.
    pub base: Vec<BatchRow>,
    /// Fully filtered rows.
    pub visible: Vec<BatchRow>,
    /// Continuous weekly series over the full dataset's week span.
    pub weekly: Vec<WeeklyAggregate>,
    /// Stat-card numbers over `visible`.
    pub summary: Summary,
}

impl ViewOutput {
    fn empty() -> Self {
        Self {
            base: Vec::new(),
            visible: Vec::new(),
            weekly: Vec::new(),
            summary: Summary::default(),
        }
    }
}

/// Build the whole dashboard view for one immutable filter snapshot.
///
/// Pure and recomputed in full on every selection change; nothing is
/// cached. An inactive filter (product or part type unset) yields the
/// empty view.
pub fn build_view(dataset: &Dataset, filter: &FilterState, per_part: PerPartMode) -> ViewOutput {
    if !filter.is_active() {
        return ViewOutput::empty();
    }

    let base: Vec<BatchRow> = dataset
        .rows
        .iter()
        .filter(|row| filter.matches_base(row))
        .cloned()
        .collect();
    let visible: Vec<BatchRow> = base
        .iter()
        .filter(|row| filter.matches_day(row))
        .cloned()
        .collect();

    let weekly = agg::weekly_series(&base, &dataset.rows, per_part);
    let summary = agg::summarize(&visible);

    ViewOutput {
        base,
        visible,
        weekly,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TSV: &str = "Data\tTipo Parte\tProdotto\tPeso Per Parte\tParti\tPeso Totale\tSettimana\tGiorno\n\
        07/01/2025\tPI\tPatate\t2,0\t10\t20,0\t2\t2\n\
        10/01/2025\tPI\tPatate\t2,0\t10\t20,0\t2\t5\n\
        14/01/2025\tMP\tPatate\t1,0\t10\t10,0\t3\t2\n\
        14/01/2025\tPI\tCarote\t1,0\t10\t10,0\t3\t2\n\
        28/01/2025\tPI\tPatate\t2,0\t10\t20,0\t5\t2\n";

    fn filter(product: &str, part_type: &str, day: &str) -> FilterState {
        FilterState {
            product: product.to_string(),
            part_type: part_type.to_string(),
            day: day.to_string(),
        }
    }

    #[test]
    fn inactive_filter_yields_the_empty_view() {
        let dataset = Dataset::from_tsv(TSV);
        let view = build_view(&dataset, &FilterState::default(), PerPartMode::Mean);
        assert!(view.base.is_empty());
        assert!(view.visible.is_empty());
        assert!(view.weekly.is_empty());
        assert_eq!(view.summary.row_count, 0);
    }

    #[test]
    fn day_filter_narrows_visible_but_not_the_chart() {
        let dataset = Dataset::from_tsv(TSV);
        let view = build_view(&dataset, &filter("Patate", "PI", "2"), PerPartMode::Mean);

        // Both week-2 deliveries feed the chart, only Tuesday is visible.
        assert_eq!(view.base.len(), 3);
        assert_eq!(view.visible.len(), 2);
        assert_eq!(view.weekly[0].week, 2);
        assert_eq!(view.weekly[0].total_weight, 40.0);
        assert_eq!(view.weekly[0].distinct_days, 2);
        assert_eq!(view.summary.total_weight, 40.0);
    }

    #[test]
    fn totale_includes_all_part_types() {
        let dataset = Dataset::from_tsv(TSV);
        let view = build_view(&dataset, &filter("Patate", "Totale", ""), PerPartMode::Mean);
        assert_eq!(view.base.len(), 4);
        // Week 3 mixes PI and MP rows of the product.
        assert_eq!(view.weekly[1].week, 3);
        assert_eq!(view.weekly[1].total_weight, 10.0);
    }

    #[test]
    fn axis_comes_from_the_full_dataset() {
        let dataset = Dataset::from_tsv(TSV);
        let view = build_view(&dataset, &filter("Carote", "PI", ""), PerPartMode::Mean);

        // Carote only exists in week 3, but the axis spans weeks 2..=5.
        let weeks: Vec<u32> = view.weekly.iter().map(|a| a.week).collect();
        assert_eq!(weeks, vec![2, 3, 4, 5]);
        assert_eq!(view.weekly[0].total_weight, 0.0);
        assert_eq!(view.weekly[1].total_weight, 10.0);
    }

    #[test]
    fn rebuilding_the_same_selection_is_identical() {
        let dataset = Dataset::from_tsv(TSV);
        let selection = filter("Patate", "PI", "");
        let a = build_view(&dataset, &selection, PerPartMode::Mean);
        let b = build_view(&dataset, &selection, PerPartMode::Mean);
        assert_eq!(a, b);
    }

    #[test]
    fn unknown_product_yields_zeroed_series_not_failure() {
        let dataset = Dataset::from_tsv(TSV);
        let view = build_view(&dataset, &filter("Zucca", "PI", ""), PerPartMode::Mean);
        assert!(view.base.is_empty());
        assert!(view.weekly.iter().all(|a| a.total_weight == 0.0));
        assert_eq!(view.weekly.len(), 4);
    }
}
