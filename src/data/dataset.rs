//! The embedded 2025 distribution table.
//!
//! The dashboard is self-contained: the TSV export is compiled into the
//! binary and parsed exactly once at startup. There is no file or network
//! I/O on the data path, which keeps every run reproducible.

use crate::domain::BatchRow;
use crate::io::ingest::parse_distribution_tsv;

/// Raw TSV export of the 2025 distribution calendar.
pub const RAW_TSV: &str = include_str!("../../data/distribuzione_2025.tsv");

/// The parsed read-only table plus the distinct values that back the
/// filter controls.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub rows: Vec<BatchRow>,
    /// Distinct product names, sorted, blanks dropped.
    pub products: Vec<String>,
    /// Distinct part-type codes, sorted, blanks dropped.
    pub part_types: Vec<String>,
}

impl Dataset {
    /// Parse the embedded table.
    pub fn embedded() -> Self {
        Self::from_tsv(RAW_TSV)
    }

    /// Parse arbitrary TSV text into a dataset. The embedded path and the
    /// tests go through the same code.
    pub fn from_tsv(text: &str) -> Self {
        let rows = parse_distribution_tsv(text);
        let products = distinct(rows.iter().map(|row| row.product.as_str()));
        let part_types = distinct(rows.iter().map(|row| row.part_type.as_str()));
        Self {
            rows,
            products,
            part_types,
        }
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = values
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect();
    out.sort();
    out.dedup();
    out
}
