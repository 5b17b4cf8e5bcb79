//! ASCII weekly bar charts for terminal output.
//!
//! This is intentionally "dumb" (fixed-size char grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Bar fill encodes the distinct-day count of each week, mirroring the
//! shading the TUI chart uses:
//! - `#`: two distribution days in the week
//! - `+`: a single distribution day
//! - gap weeks stay empty but keep their slot on the axis

use crate::domain::{Metric, WeeklyAggregate};

/// Render the weekly series as a bar chart.
pub fn render_weekly_bars(
    weekly: &[WeeklyAggregate],
    metric: Metric,
    width: usize,
    height: usize,
) -> String {
    let Some((first, last)) = weekly.first().zip(weekly.last()) else {
        return format!("Grafico: {} | nessuna settimana\n", metric.display_name());
    };

    let width = width.max(10);
    let height = height.max(4);

    let n = weekly.len();
    let bar_w = (width / n).max(1);
    let plot_w = bar_w * n;
    // Bars keep a one-column gap when there is room for it.
    let fill_w = if bar_w >= 2 { bar_w - 1 } else { 1 };

    let max = weekly
        .iter()
        .map(|agg| agg.metric(metric))
        .fold(0.0_f64, f64::max);

    let mut grid = vec![vec![' '; plot_w]; height];
    for (i, agg) in weekly.iter().enumerate() {
        let value = agg.metric(metric);
        let rows = bar_rows(value, max, height);
        if rows == 0 {
            continue;
        }
        let ch = if agg.distinct_days >= 2 { '#' } else { '+' };
        for level in 1..=rows {
            let row = height - level;
            for col in 0..fill_w {
                grid[row][i * bar_w + col] = ch;
            }
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Grafico: {} | settimane=[{}, {}] | max={max:.2}\n",
        metric.display_name(),
        first.week,
        last.week,
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out.push_str(&"-".repeat(plot_w));
    out.push('\n');
    out.push_str(&week_labels(weekly, bar_w, plot_w));
    out.push('\n');
    out.push_str("# 2 giorni  + 1 giorno\n");

    out
}

/// Bar height in rows. Nonzero values always get at least one row so thin
/// weeks don't vanish from the chart.
fn bar_rows(value: f64, max: f64, height: usize) -> usize {
    if !(value > 0.0) || !(max > 0.0) {
        return 0;
    }
    let rows = (value / max * height as f64).round() as usize;
    rows.clamp(1, height)
}

/// X-axis labels (`S02`, `S04`, ...), thinned so they never collide.
fn week_labels(weekly: &[WeeklyAggregate], bar_w: usize, plot_w: usize) -> String {
    let mut row = vec![' '; plot_w];
    let stride = 2.max(4_usize.div_ceil(bar_w));

    for (i, agg) in weekly.iter().enumerate() {
        if i % stride != 0 {
            continue;
        }
        let label = format!("S{:02}", agg.week);
        let start = i * bar_w;
        if start + label.len() > plot_w {
            break;
        }
        for (offset, ch) in label.chars().enumerate() {
            row[start + offset] = ch;
        }
    }

    row.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agg(week: u32, total: f64, days: u8) -> WeeklyAggregate {
        WeeklyAggregate {
            week,
            total_weight: total,
            weight_per_part: total / 10.0,
            distinct_days: days,
        }
    }

    #[test]
    fn bars_golden_snapshot_small() {
        let weekly = vec![agg(2, 10.0, 2), agg(3, 0.0, 0), agg(4, 5.0, 1)];
        let txt = render_weekly_bars(&weekly, Metric::TotalWeight, 12, 4);
        let expected = concat!(
            "Grafico: peso totale (kg) | settimane=[2, 4] | max=10.00\n",
            "###         \n",
            "###         \n",
            "###     +++ \n",
            "###     +++ \n",
            "------------\n",
            "S02     S04 \n",
            "# 2 giorni  + 1 giorno\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn empty_series_renders_a_placeholder() {
        let txt = render_weekly_bars(&[], Metric::TotalWeight, 40, 10);
        assert_eq!(txt, "Grafico: peso totale (kg) | nessuna settimana\n");
    }

    #[test]
    fn all_zero_series_renders_an_empty_grid() {
        let weekly = vec![agg(2, 0.0, 0), agg(3, 0.0, 0)];
        let txt = render_weekly_bars(&weekly, Metric::TotalWeight, 10, 4);
        assert!(txt.contains("max=0.00"));
        assert!(!txt.contains('#'));
        assert!(!txt.contains('+'));
    }

    #[test]
    fn tiny_nonzero_bars_keep_one_row() {
        let weekly = vec![agg(2, 100.0, 2), agg(3, 0.1, 1)];
        let txt = render_weekly_bars(&weekly, Metric::TotalWeight, 10, 6);
        // The 0.1 bar would round to zero rows; it must still show up.
        assert!(txt.contains('+'));
    }

    #[test]
    fn metric_switch_changes_the_header() {
        let weekly = vec![agg(2, 10.0, 2)];
        let txt = render_weekly_bars(&weekly, Metric::WeightPerPart, 10, 4);
        assert!(txt.starts_with("Grafico: peso per parte (kg)"));
        assert!(txt.contains("max=1.00"));
    }
}
