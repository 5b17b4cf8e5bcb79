//! TSV ingest and normalization.
//!
//! This module turns the raw tab-separated distribution export into clean
//! `BatchRow`s that are safe to filter and aggregate.
//!
//! Design goals:
//! - **Column-order independence**: cells are located by header name, not
//!   by position, so re-exported tables with permuted columns still load
//! - **Locale-aware numerics**: Italian decimal commas and thousands dots
//!   (`1.234,56` means `1234.56`)
//! - **Silent degradation**: a missing or malformed cell becomes `""` or
//!   `0.0`; the dashboard must always render, never error on a bad row
//! - **Deterministic behavior**: same text in, same rows out; no I/O here

use csv::StringRecord;

use crate::domain::BatchRow;

/// Column indices resolved from the header row. `None` means the column is
/// absent from this export and every cell degrades to its default.
#[derive(Debug, Clone, Default)]
struct Columns {
    date: Option<usize>,
    part_type: Option<usize>,
    product: Option<usize>,
    weight_per_part: Option<usize>,
    parts_count: Option<usize>,
    total_weight: Option<usize>,
    week: Option<usize>,
    day: Option<usize>,
}

/// Parse the distribution table from TSV text.
///
/// Never fails: unreadable headers or records simply produce fewer rows.
/// Blank lines are skipped; short records leave their missing cells at the
/// defaults.
pub fn parse_distribution_tsv(text: &str) -> Vec<BatchRow> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        // The source is a plain spreadsheet export; a literal quote is data.
        .quoting(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(_) => return Vec::new(),
    };
    let columns = resolve_columns(&headers);

    let mut rows = Vec::new();
    for result in reader.records() {
        let Ok(record) = result else { continue };
        rows.push(row_from_record(&record, &columns));
    }
    rows
}

/// Locate each semantic column in the header row.
///
/// An exact (trimmed, lowercased) match wins; otherwise the first header
/// *containing* the key is used, which keeps decorated exports such as
/// `"Peso Totale (kg)"` working. Note that `peso per parte` must be probed
/// before a bare `parte` would be, hence per-key resolution rather than a
/// generic header map.
fn resolve_columns(headers: &StringRecord) -> Columns {
    let names: Vec<String> = headers.iter().map(normalize_header_name).collect();
    let find = |key: &str| -> Option<usize> {
        names
            .iter()
            .position(|name| name == key)
            .or_else(|| names.iter().position(|name| name.contains(key)))
    };

    Columns {
        date: find("data"),
        part_type: find("tipo parte"),
        product: find("prodotto"),
        weight_per_part: find("peso per parte"),
        parts_count: find("parti"),
        total_weight: find("peso totale"),
        week: find("settimana"),
        day: find("giorno"),
    }
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet tools sometimes emit UTF-8 with a BOM prefix on the first
    // header (e.g. "﻿Data"). If we don't strip it, that column silently
    // resolves as missing.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_lowercase()
}

fn row_from_record(record: &StringRecord, columns: &Columns) -> BatchRow {
    BatchRow {
        date: text_at(record, columns.date),
        part_type: text_at(record, columns.part_type),
        product: text_at(record, columns.product),
        weight_per_part: number_at(record, columns.weight_per_part),
        parts_count: number_at(record, columns.parts_count),
        total_weight: number_at(record, columns.total_weight),
        week: text_at(record, columns.week),
        day: text_at(record, columns.day),
    }
}

fn text_at(record: &StringRecord, idx: Option<usize>) -> String {
    idx.and_then(|i| record.get(i)).unwrap_or("").to_string()
}

fn number_at(record: &StringRecord, idx: Option<usize>) -> f64 {
    idx.and_then(|i| record.get(i))
        .map(parse_italian_number)
        .unwrap_or(0.0)
}

/// Parse an Italian-locale decimal: dots are thousands separators, the
/// comma is the decimal mark (`1.234,56` parses to `1234.56`).
///
/// Empty or non-numeric input yields `0.0` so a bad cell can never take
/// the dashboard down.
pub fn parse_italian_number(raw: &str) -> f64 {
    let cleaned = raw.trim().replace('.', "").replace(',', ".");
    if cleaned.is_empty() {
        return 0.0;
    }
    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}
