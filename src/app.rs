//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads the embedded dataset
//! - builds the filtered view (weekly series + visible rows + summary)
//! - prints reports/charts or launches the TUI
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, ViewArgs};
use crate::data::{Dataset, InsightClient};
use crate::domain::{FilterState, Metric, ViewConfig, DAY_CODES};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `agro` binary.
pub fn run() -> Result<(), AppError> {
    // We want `agro` and `agro --per-part ratio` to behave like `agro tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Report(args) => handle_view(args, OutputMode::Full),
        Command::Weeks(args) => handle_view(args, OutputMode::WeeksOnly),
        Command::List => handle_list(),
        Command::Insights(args) => handle_insights(args),
        Command::Tui(args) => crate::tui::run(args),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Full,
    WeeksOnly,
}

fn handle_view(args: ViewArgs, mode: OutputMode) -> Result<(), AppError> {
    let config = view_config_from_args(&args)?;
    let dataset = Dataset::embedded();
    let view = pipeline::build_view(&dataset, &config.filter, config.per_part);

    if view.base.is_empty() {
        return Err(AppError::empty_selection(format!(
            "Nessuna riga per prodotto '{}' (tipo {}). Prova `agro list`.",
            config.filter.product, config.filter.part_type
        )));
    }

    match mode {
        OutputMode::Full => {
            println!(
                "{}",
                crate::report::format_run_summary(&view, &config.filter, config.per_part)
            );
            println!("{}", crate::report::format_weekly_table(&view.weekly));

            if config.chart {
                for metric in [Metric::TotalWeight, Metric::WeightPerPart] {
                    let chart = crate::plot::render_weekly_bars(
                        &view.weekly,
                        metric,
                        config.chart_width,
                        config.chart_height,
                    );
                    println!("{chart}");
                }
            }

            println!("{}", crate::report::format_detail_table(&view.visible));
        }
        OutputMode::WeeksOnly => {
            println!("{}", crate::report::format_weekly_table(&view.weekly));
        }
    }

    // Optional exports.
    if let Some(path) = &config.export_rows {
        crate::io::export::write_rows_csv(path, &view.visible)?;
    }
    if let Some(path) = &config.export_weekly {
        crate::io::export::write_weekly_json(path, &view.weekly, &config.filter, config.per_part)?;
    }

    Ok(())
}

fn handle_list() -> Result<(), AppError> {
    let dataset = Dataset::embedded();

    println!("Prodotti:");
    for product in &dataset.products {
        println!("  {product}");
    }
    println!("Tipi parte:");
    for part_type in &dataset.part_types {
        println!("  {part_type}");
    }
    println!("Giorni: {}", DAY_CODES.join(", "));

    Ok(())
}

fn handle_insights(args: ViewArgs) -> Result<(), AppError> {
    let config = view_config_from_args(&args)?;
    let client = InsightClient::from_env()?;

    let dataset = Dataset::embedded();
    let view = pipeline::build_view(&dataset, &config.filter, config.per_part);

    println!("{}", client.summarize(&view.visible));
    Ok(())
}

pub fn view_config_from_args(args: &ViewArgs) -> Result<ViewConfig, AppError> {
    let product = args
        .product
        .clone()
        .ok_or_else(|| AppError::usage("Missing product: pass `-p <name>` (see `agro list`)."))?;

    Ok(ViewConfig {
        filter: FilterState {
            product,
            part_type: args.part_type.clone(),
            day: args.day.clone().unwrap_or_default(),
        },
        per_part: args.per_part,
        chart: args.chart && !args.no_chart,
        chart_width: args.width,
        chart_height: args.height,
        export_rows: args.export.clone(),
        export_weekly: args.export_weekly.clone(),
    })
}

/// Rewrite argv so `agro` defaults to `agro tui`.
///
/// Rules:
/// - `agro`                      -> `agro tui`
/// - `agro --per-part ratio ...` -> `agro tui --per-part ratio ...`
/// - `agro --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(
        arg1.as_str(),
        "report" | "weeks" | "list" | "insights" | "tui"
    );
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
