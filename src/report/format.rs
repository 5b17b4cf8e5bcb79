//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the aggregation code stays clean and testable
//! - output changes are localized (important for future snapshot tests)
//!
//! The line-oriented helpers (`weekly_lines`, `detail_lines`) exist so the
//! TUI can render the exact same tables the CLI prints.

use crate::app::pipeline::ViewOutput;
use crate::domain::{
    day_label, part_type_label, week, BatchRow, FilterState, PerPartMode, WeeklyAggregate,
};

/// Format the run header: selection, week span, headline numbers.
pub fn format_run_summary(view: &ViewOutput, filter: &FilterState, per_part: PerPartMode) -> String {
    let mut out = String::new();

    out.push_str("=== agro - Distribuzione Arvaia 2025 ===\n");
    out.push_str(&format!("Prodotto: {}\n", filter.product));
    out.push_str(&format!(
        "Tipo parte: {} ({})\n",
        filter.part_type,
        part_type_label(&filter.part_type)
    ));
    out.push_str(&format!("Giorno: {}\n", day_label(&filter.day)));
    out.push_str(&format!("Policy peso/parte: {}\n", per_part.display_name()));

    match (view.weekly.first(), view.weekly.last()) {
        (Some(first), Some(last)) => {
            out.push_str(&format!(
                "Settimane: {}-{} (prima settimana da lunedì {})\n",
                first.week,
                last.week,
                week::monday_label(first.week)
            ));
        }
        _ => out.push_str("Settimane: nessuna\n"),
    }

    out.push_str(&format!(
        "Visibile: n={} su {} | peso totale={:.0} kg | media/parte={:.3} kg\n",
        view.summary.row_count,
        view.base.len(),
        view.summary.total_weight,
        view.summary.mean_weight_per_part,
    ));

    out
}

/// Weekly aggregate table, one line per week of the continuous axis.
pub fn weekly_lines(weekly: &[WeeklyAggregate]) -> Vec<String> {
    let mut lines = Vec::with_capacity(weekly.len() + 2);

    lines.push(
        format!(
            "{:<17} {:>13} {:>15} {:>6}",
            "settimana", "peso tot (kg)", "peso/parte (kg)", "giorni"
        )
        .trim_end()
        .to_string(),
    );
    lines.push(
        format!("{:-<17} {:-<13} {:-<15} {:-<6}", "", "", "", "")
            .trim_end()
            .to_string(),
    );

    if weekly.is_empty() {
        lines.push("(nessuna settimana)".to_string());
        return lines;
    }

    for agg in weekly {
        lines.push(
            format!(
                "{:<17} {:>13.2} {:>15.3} {:>6}",
                week::long_label(agg.week),
                agg.total_weight,
                agg.weight_per_part,
                agg.distinct_days,
            )
            .trim_end()
            .to_string(),
        );
    }

    lines
}

pub fn format_weekly_table(weekly: &[WeeklyAggregate]) -> String {
    let mut out = weekly_lines(weekly).join("\n");
    out.push('\n');
    out
}

/// Detail table over the visible rows, echoing the source cells.
pub fn detail_lines(rows: &[BatchRow]) -> Vec<String> {
    let mut lines = Vec::with_capacity(rows.len() + 2);

    lines.push(
        format!(
            "{:<10} {:>5} {:>6} {:>5} {:>10} {:>8} {:>9}",
            "data", "sett.", "giorno", "tipo", "peso/parte", "parti", "peso tot"
        )
        .trim_end()
        .to_string(),
    );
    lines.push(
        format!(
            "{:-<10} {:-<5} {:-<6} {:-<5} {:-<10} {:-<8} {:-<9}",
            "", "", "", "", "", "", ""
        )
        .trim_end()
        .to_string(),
    );

    if rows.is_empty() {
        lines.push("(nessuna riga)".to_string());
        return lines;
    }

    for row in rows {
        lines.push(
            format!(
                "{:<10} {:>5} {:>6} {:>5} {:>10.3} {:>8} {:>9.2}",
                row.date,
                row.week,
                row.day,
                row.part_type,
                row.weight_per_part,
                row.parts_count,
                row.total_weight,
            )
            .trim_end()
            .to_string(),
        );
    }

    lines
}

pub fn format_detail_table(rows: &[BatchRow]) -> String {
    let mut out = detail_lines(rows).join("\n");
    out.push('\n');
    out
}
