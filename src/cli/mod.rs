//! Command-line parsing for the distribution dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the aggregation code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::PerPartMode;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "agro", version, about = "Dashboard Distribuzione Agricola 2025 (Arvaia)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the run summary, weekly table, charts, and the detail rows.
    Report(ViewArgs),
    /// Print the weekly aggregate table only (useful for scripting).
    Weeks(ViewArgs),
    /// List products, part types, and day codes in the embedded dataset.
    List,
    /// Summarize the visible rows through the Gemini insight service.
    Insights(ViewArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same underlying view pipeline as `agro report`, but
    /// renders in a terminal UI using Ratatui.
    Tui(TuiArgs),
}

/// Common selection and output options for the report-like subcommands.
#[derive(Debug, Parser, Clone)]
pub struct ViewArgs {
    /// Product to analyze (see `agro list` for valid names).
    #[arg(short = 'p', long)]
    pub product: Option<String>,

    /// Part-type code: PI, MP, or "Totale" for all.
    #[arg(short = 't', long, default_value = "Totale")]
    pub part_type: String,

    /// Distribution day: 2 (Tuesday) or 5 (Friday); omit for both.
    #[arg(short = 'g', long = "day", value_parser = ["2", "5"])]
    pub day: Option<String>,

    /// Weekly weight-per-part aggregation policy.
    #[arg(long, value_enum, default_value_t = PerPartMode::Mean)]
    pub per_part: PerPartMode,

    /// Render ASCII charts in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub chart: bool,

    /// Disable the terminal charts.
    #[arg(long)]
    pub no_chart: bool,

    /// Chart width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Chart height (rows).
    #[arg(long, default_value_t = 16)]
    pub height: usize,

    /// Export the visible detail rows to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the weekly series to JSON.
    #[arg(long = "export-weekly")]
    pub export_weekly: Option<PathBuf>,
}

/// Options for the TUI.
#[derive(Debug, Parser, Clone)]
pub struct TuiArgs {
    /// Weekly weight-per-part aggregation policy at startup.
    #[arg(long, value_enum, default_value_t = PerPartMode::Mean)]
    pub per_part: PerPartMode,
}
