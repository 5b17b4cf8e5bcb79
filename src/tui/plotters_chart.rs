//! Plotters-powered weekly bar chart widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `BarChart` widget?
//! - proper numeric axes (the week axis is continuous, not categorical)
//! - easy to extend later (legend, annotations, exportable PNG/SVG backends, etc.)
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters::style::Color as _;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::domain::{Metric, WeeklyAggregate};

/// A lightweight, render-only chart description.
///
/// The widget is intentionally data-driven: the series and bounds are
/// computed outside the render call. This keeps `render()` focused on
/// drawing and makes the data prep testable on its own.
pub struct WeeklyBarsChart<'a> {
    /// The continuous weekly series (gap weeks included).
    pub weeks: &'a [WeeklyAggregate],
    /// Which per-week value the bars encode.
    pub metric: Metric,
    /// X bounds (week numbers, padded by half a bar).
    pub x_bounds: [f64; 2],
    /// Y bounds (kg).
    pub y_bounds: [f64; 2],
    /// Y-axis caption.
    pub y_label: String,
    /// Formatting of y tick labels.
    pub fmt_y: fn(f64) -> String,
}

impl Widget for WeeklyBarsChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Area grafico troppo piccola (ridimensiona il terminale).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let x0 = self.x_bounds[0];
        let x1 = self.x_bounds[1];
        let y0 = self.y_bounds[0];
        let y1 = self.y_bounds[1];

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        // `plotters-ratatui-backend` draws Plotters primitives via Ratatui's
        // `Canvas` widget, which ultimately writes to the terminal buffer.
        //
        // We delegate rendering to the crate-provided widget helper to avoid
        // coupling our code to its internal backend types.
        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                // Small margins keep the chart readable without wasting space.
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Axes + tick labels.
            //
            // We disable the mesh lines to reduce visual clutter in
            // low-resolution terminal rendering; the axes + labels are enough.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc("settimana")
                .y_desc(&self.y_label)
                .x_labels(8)
                .y_labels(5)
                .x_label_formatter(&fmt_week_tick)
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            // One filled rectangle per nonzero week. Gap weeks keep their
            // slot on the axis but draw nothing.
            chart.draw_series(
                self.weeks
                    .iter()
                    .filter(|agg| agg.metric(self.metric) > 0.0)
                    .map(|agg| {
                        let x = f64::from(agg.week);
                        let value = agg.metric(self.metric);
                        Rectangle::new(
                            [(x - 0.4, 0.0), (x + 0.4, value)],
                            bar_color(self.metric, agg.distinct_days).filled(),
                        )
                    }),
            )?;

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Bar fill color: emerald for totals, blue for per-part weight; the
/// darker shade marks weeks with both distribution days.
fn bar_color(metric: Metric, distinct_days: u8) -> RGBColor {
    match (metric, distinct_days >= 2) {
        (Metric::TotalWeight, true) => RGBColor(4, 120, 87),
        (Metric::TotalWeight, false) => RGBColor(52, 211, 153),
        (Metric::WeightPerPart, true) => RGBColor(29, 78, 216),
        (Metric::WeightPerPart, false) => RGBColor(96, 165, 250),
    }
}

fn fmt_week_tick(v: &f64) -> String {
    format!("S{:02}", v.round() as i64)
}
