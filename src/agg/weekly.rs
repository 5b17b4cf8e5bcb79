//! Weekly aggregation.
//!
//! Turns the product+part-type subset into one value per week for the
//! charts. Two properties matter here:
//!
//! - **Continuous axis**: the series spans the *full dataset's* week range,
//!   zero-filled where the subset has no rows, so every selection charts
//!   against the same unbroken week axis.
//! - **Stable rounding**: `total_weight` is rounded to 2 decimals and
//!   `weight_per_part` to 3 (half away from zero), so the CLI tables, the
//!   TUI and the JSON export all show identical numbers.
//!
//! The day filter is deliberately *not* applied to the input subset; see
//! `app::pipeline` for how the two row subsets are derived.

use std::collections::{HashMap, HashSet};

use crate::domain::{week, BatchRow, PerPartMode, WeeklyAggregate};

#[derive(Debug, Default)]
struct WeekAcc {
    total: f64,
    per_part_sum: f64,
    parts_sum: f64,
    rows: usize,
    days: HashSet<String>,
}

impl WeekAcc {
    fn weight_per_part(&self, mode: PerPartMode) -> f64 {
        match mode {
            PerPartMode::Mean => {
                if self.rows == 0 {
                    0.0
                } else {
                    self.per_part_sum / self.rows as f64
                }
            }
            PerPartMode::Ratio => {
                if self.parts_sum == 0.0 {
                    0.0
                } else {
                    self.total / self.parts_sum
                }
            }
        }
    }
}

/// Aggregate `subset` into one entry per week.
///
/// The axis is fixed by `full`: every week between the full dataset's
/// first and last parseable week appears exactly once, in ascending order.
/// Weeks the subset never touches come out zeroed with `distinct_days: 0`.
/// Rows whose week cell doesn't parse cannot be placed and are skipped.
pub fn weekly_series(
    subset: &[BatchRow],
    full: &[BatchRow],
    per_part: PerPartMode,
) -> Vec<WeeklyAggregate> {
    let Some((lo, hi)) = week_span(full) else {
        return Vec::new();
    };

    let mut acc: HashMap<u32, WeekAcc> = HashMap::new();
    for row in subset {
        let Some(week) = scheme_week(&row.week) else { continue };
        let slot = acc.entry(week).or_default();
        slot.total += row.total_weight;
        slot.per_part_sum += row.weight_per_part;
        slot.parts_sum += row.parts_count;
        slot.rows += 1;
        slot.days.insert(row.day.clone());
    }

    (lo..=hi)
        .map(|week| match acc.get(&week) {
            Some(slot) => WeeklyAggregate {
                week,
                total_weight: round2(slot.total),
                weight_per_part: round3(slot.weight_per_part(per_part)),
                distinct_days: distinct_day_count(&slot.days),
            },
            None => WeeklyAggregate {
                week,
                total_weight: 0.0,
                weight_per_part: 0.0,
                distinct_days: 0,
            },
        })
        .collect()
}

/// First and last parseable week across `rows`, if any.
pub fn week_span(rows: &[BatchRow]) -> Option<(u32, u32)> {
    let mut span: Option<(u32, u32)> = None;
    for row in rows {
        let Some(week) = scheme_week(&row.week) else { continue };
        span = Some(match span {
            Some((lo, hi)) => (lo.min(week), hi.max(week)),
            None => (week, week),
        });
    }
    span
}

/// Parse a week cell into the labeling scheme. Anything that is not a
/// plain number in the scheme's range cannot be placed on the axis.
fn scheme_week(raw: &str) -> Option<u32> {
    let week = raw.trim().parse::<u32>().ok()?;
    week::in_scheme(week).then_some(week)
}

fn distinct_day_count(days: &HashSet<String>) -> u8 {
    u8::try_from(days.len()).unwrap_or(u8::MAX)
}

/// Round to 2 decimals, half away from zero.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round to 3 decimals, half away from zero.
fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(product: &str, week: &str, day: &str, wpp: f64, parts: f64, total: f64) -> BatchRow {
        BatchRow {
            date: String::new(),
            part_type: "PI".to_string(),
            product: product.to_string(),
            weight_per_part: wpp,
            parts_count: parts,
            total_weight: total,
            week: week.to_string(),
            day: day.to_string(),
        }
    }

    #[test]
    fn axis_spans_the_full_dataset_and_gap_fills() {
        let full = vec![
            row("Patate", "2", "2", 2.0, 10.0, 20.0),
            row("Carote", "3", "2", 1.0, 10.0, 10.0),
            row("Patate", "4", "5", 2.0, 10.0, 20.0),
            row("Patate", "6", "2", 2.0, 10.0, 20.0),
        ];
        let subset: Vec<BatchRow> = full.iter().filter(|r| r.product == "Patate").cloned().collect();

        let series = weekly_series(&subset, &full, PerPartMode::Mean);

        let weeks: Vec<u32> = series.iter().map(|a| a.week).collect();
        assert_eq!(weeks, vec![2, 3, 4, 5, 6]);

        // Week 3 exists only for another product, week 5 not at all: both
        // must still appear, zeroed.
        for gap in [&series[1], &series[3]] {
            assert_eq!(gap.total_weight, 0.0);
            assert_eq!(gap.weight_per_part, 0.0);
            assert_eq!(gap.distinct_days, 0);
        }
        assert_eq!(series[0].distinct_days, 1);
    }

    #[test]
    fn wide_axis_stays_continuous_for_a_narrow_subset() {
        let full = vec![
            row("Altro", "2", "2", 1.0, 1.0, 1.0),
            row("Patate", "10", "5", 2.0, 10.0, 20.0),
            row("Altro", "51", "2", 1.0, 1.0, 1.0),
        ];
        let subset = vec![full[1].clone()];

        let series = weekly_series(&subset, &full, PerPartMode::Mean);

        assert_eq!(series.len(), 50);
        assert!(series.windows(2).all(|w| w[1].week == w[0].week + 1));
        let nonzero: Vec<&WeeklyAggregate> =
            series.iter().filter(|a| a.total_weight != 0.0).collect();
        assert_eq!(nonzero.len(), 1);
        assert_eq!(nonzero[0].week, 10);
    }

    #[test]
    fn one_week_accumulates_across_days() {
        let rows = vec![
            row("Patate", "7", "2", 2.0, 100.0, 200.0),
            row("Patate", "7", "5", 3.0, 50.0, 150.0),
        ];
        let series = weekly_series(&rows, &rows, PerPartMode::Mean);

        assert_eq!(series.len(), 1);
        let agg = &series[0];
        assert_eq!(agg.week, 7);
        assert_eq!(agg.total_weight, 350.0);
        assert_eq!(agg.weight_per_part, 2.5);
        assert_eq!(agg.distinct_days, 2);
    }

    #[test]
    fn mean_and_ratio_policies_differ() {
        // Mean of per-row values: (1.0 + 2.0) / 2 = 1.5
        // Weighted by parts:      (10 + 60) / (10 + 30) = 1.75
        let rows = vec![
            row("Patate", "9", "2", 1.0, 10.0, 10.0),
            row("Patate", "9", "2", 2.0, 30.0, 60.0),
        ];
        let mean = weekly_series(&rows, &rows, PerPartMode::Mean);
        let ratio = weekly_series(&rows, &rows, PerPartMode::Ratio);

        assert_eq!(mean[0].weight_per_part, 1.5);
        assert_eq!(ratio[0].weight_per_part, 1.75);
        // The total is policy-independent.
        assert_eq!(mean[0].total_weight, ratio[0].total_weight);
    }

    #[test]
    fn ratio_with_zero_parts_degrades_to_zero() {
        let rows = vec![row("Patate", "9", "2", 1.5, 0.0, 12.0)];
        let series = weekly_series(&rows, &rows, PerPartMode::Ratio);
        assert_eq!(series[0].weight_per_part, 0.0);
        assert_eq!(series[0].total_weight, 12.0);
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        // 0.375 is exactly representable, so *100 lands exactly on 37.5.
        let rows = vec![row("Patate", "5", "2", 0.0625, 1.0, 0.375)];
        let series = weekly_series(&rows, &rows, PerPartMode::Mean);
        assert_eq!(series[0].total_weight, 0.38);
        assert_eq!(series[0].weight_per_part, 0.063);

        let negative = vec![row("Patate", "5", "2", -0.0625, 1.0, -0.375)];
        let series = weekly_series(&negative, &negative, PerPartMode::Mean);
        assert_eq!(series[0].total_weight, -0.38);
        assert_eq!(series[0].weight_per_part, -0.063);
    }

    #[test]
    fn unplaceable_weeks_are_skipped() {
        let full = vec![
            row("Patate", "2", "2", 2.0, 10.0, 20.0),
            row("Patate", "", "2", 2.0, 10.0, 20.0),
            row("Patate", "abc", "2", 2.0, 10.0, 20.0),
            row("Patate", "0", "2", 2.0, 10.0, 20.0),
            row("Patate", "54", "2", 2.0, 10.0, 20.0),
            row("Patate", "3", "5", 2.0, 10.0, 20.0),
        ];
        let series = weekly_series(&full, &full, PerPartMode::Mean);

        let weeks: Vec<u32> = series.iter().map(|a| a.week).collect();
        assert_eq!(weeks, vec![2, 3]);
        // Only the two placeable rows contribute.
        assert_eq!(series[0].total_weight, 20.0);
        assert_eq!(series[1].total_weight, 20.0);
    }

    #[test]
    fn empty_input_yields_empty_series() {
        assert!(weekly_series(&[], &[], PerPartMode::Mean).is_empty());

        // A full dataset with no parseable weeks has no axis either.
        let full = vec![row("Patate", "n/d", "2", 2.0, 10.0, 20.0)];
        assert!(weekly_series(&full, &full, PerPartMode::Mean).is_empty());
    }

    #[test]
    fn series_is_deterministic() {
        let full = vec![
            row("Patate", "2", "2", 2.0, 10.0, 20.0),
            row("Patate", "8", "5", 1.0, 5.0, 5.0),
            row("Patate", "5", "2", 3.0, 7.0, 21.0),
        ];
        let a = weekly_series(&full, &full, PerPartMode::Mean);
        let b = weekly_series(&full, &full, PerPartMode::Mean);
        assert_eq!(a, b);
        assert_eq!(a.len(), 7);
    }

    #[test]
    fn week_span_ignores_unparseable_cells() {
        let rows = vec![
            row("Patate", "x", "2", 1.0, 1.0, 1.0),
            row("Patate", "12", "2", 1.0, 1.0, 1.0),
            row("Patate", "4", "2", 1.0, 1.0, 1.0),
        ];
        assert_eq!(week_span(&rows), Some((4, 12)));
        assert_eq!(week_span(&[]), None);
    }
}
