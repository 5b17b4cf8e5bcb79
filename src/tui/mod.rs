//! Ratatui-based terminal UI.
//!
//! The TUI provides a settings panel for cycling product, part type, and
//! distribution day, then renders the weekly bar chart, the visible batch
//! rows, and (on request) a Gemini summary of the selection.

use std::io;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Terminal,
};

use crate::cli::TuiArgs;
use crate::data::{Dataset, InsightClient, FALLBACK_ERROR};
use crate::domain::{
    day_label, part_type_label, FilterState, Metric, PerPartMode, WeeklyAggregate, DAY_CODES,
    PART_TYPE_ALL,
};
use crate::error::AppError;

mod plotters_chart;

use plotters_chart::WeeklyBarsChart;

/// Start the TUI.
pub fn run(args: TuiArgs) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(&args);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    dataset: Dataset,
    filter: FilterState,
    per_part: PerPartMode,
    metric: Metric,
    selected_field: usize,
    status: String,
    view: crate::app::pipeline::ViewOutput,
    insight: Option<String>,
    insight_rx: Option<Receiver<String>>,
    insight_client: Option<InsightClient>,
}

impl App {
    fn new(args: &TuiArgs) -> Self {
        let dataset = Dataset::embedded();
        let filter = FilterState::default();
        let view = crate::app::pipeline::build_view(&dataset, &filter, args.per_part);
        Self {
            dataset,
            filter,
            per_part: args.per_part,
            metric: Metric::TotalWeight,
            selected_field: 0,
            status: "Scegli prodotto e tipo parte con ←/→.".to_string(),
            view,
            insight: None,
            insight_rx: None,
            // Missing API key is fine here: `i` reports it in the status bar.
            insight_client: InsightClient::from_env().ok(),
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if self.poll_insight() {
                needs_redraw = true;
                continue;
            }

            // The 100ms poll doubles as the cadence for picking up a pending
            // insight answer, so the worker never has to touch the terminal.
            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::runtime(format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::runtime(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => {
                if self.selected_field > 0 {
                    self.selected_field -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected_field < 2 {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Char('m') => {
                self.metric = self.metric.toggled();
                self.status = format!("metrica: {}", self.metric.display_name());
            }
            KeyCode::Char('p') => {
                self.per_part = match self.per_part {
                    PerPartMode::Mean => PerPartMode::Ratio,
                    PerPartMode::Ratio => PerPartMode::Mean,
                };
                self.rebuild();
                self.status = format!("policy peso/parte: {}", self.per_part.display_name());
            }
            KeyCode::Char('r') => {
                self.filter = FilterState::default();
                self.rebuild();
                self.status = "Filtri azzerati.".to_string();
            }
            KeyCode::Char('i') => self.request_insight(),
            KeyCode::Char('e') => self.export_view(),
            _ => {}
        }

        false
    }

    /// Cycle the selected filter field through its options, wrapping at both
    /// ends. Every option list starts with the empty string so a field can
    /// always be cleared by cycling.
    fn adjust_field(&mut self, delta: i32) {
        let options = self.field_options();
        if options.is_empty() {
            return;
        }

        let position = options
            .iter()
            .position(|option| option.as_str() == self.field_value())
            .unwrap_or(0) as i32;
        let next = (position + delta).rem_euclid(options.len() as i32) as usize;
        let value = options[next].clone();

        match self.selected_field {
            0 => {
                self.filter.product = value;
                self.status = format!("prodotto: {}", display_or_dash(&self.filter.product));
            }
            1 => {
                self.filter.part_type = value;
                self.status = format!("tipo parte: {}", part_type_display(&self.filter.part_type));
            }
            _ => {
                self.filter.day = value;
                self.status = format!("giorno: {}", day_label(&self.filter.day));
            }
        }
        self.rebuild();
    }

    fn field_options(&self) -> Vec<String> {
        match self.selected_field {
            0 => std::iter::once(String::new())
                .chain(self.dataset.products.iter().cloned())
                .collect(),
            1 => std::iter::once(String::new())
                .chain(self.dataset.part_types.iter().cloned())
                .chain(std::iter::once(PART_TYPE_ALL.to_string()))
                .collect(),
            _ => std::iter::once(String::new())
                .chain(DAY_CODES.iter().map(|code| (*code).to_string()))
                .collect(),
        }
    }

    fn field_value(&self) -> &str {
        match self.selected_field {
            0 => &self.filter.product,
            1 => &self.filter.part_type,
            _ => &self.filter.day,
        }
    }

    fn rebuild(&mut self) {
        self.view = crate::app::pipeline::build_view(&self.dataset, &self.filter, self.per_part);
    }

    /// Run the Gemini call on a worker thread; the event loop polls for the
    /// answer so the UI stays responsive while the request is in flight.
    fn request_insight(&mut self) {
        let Some(client) = &self.insight_client else {
            self.status = "GEMINI_API_KEY non configurata: analisi non disponibile.".to_string();
            return;
        };
        if self.insight_rx.is_some() {
            self.status = "Analisi già in corso...".to_string();
            return;
        }

        let client = client.clone();
        let rows = self.view.visible.clone();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(client.summarize(&rows));
        });
        self.insight_rx = Some(rx);
        self.status = "Generazione analisi...".to_string();
    }

    /// Returns `true` when a pending insight just resolved.
    fn poll_insight(&mut self) -> bool {
        let Some(rx) = &self.insight_rx else {
            return false;
        };
        match rx.try_recv() {
            Ok(text) => {
                self.insight = Some(text);
                self.insight_rx = None;
                self.status = "Analisi aggiornata.".to_string();
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                // Worker died without sending; degrade like the HTTP path.
                self.insight = Some(FALLBACK_ERROR.to_string());
                self.insight_rx = None;
                self.status = "Analisi non riuscita.".to_string();
                true
            }
        }
    }

    fn export_view(&mut self) {
        if !self.filter.is_active() {
            self.status = "Nessuna vista da esportare: scegli prima un prodotto.".to_string();
            return;
        }

        let rows_path = Path::new("agro_dettaglio.csv");
        let weekly_path = Path::new("agro_settimane.json");
        let result = crate::io::write_rows_csv(rows_path, &self.view.visible).and_then(|()| {
            crate::io::write_weekly_json(weekly_path, &self.view.weekly, &self.filter, self.per_part)
        });
        self.status = match result {
            Ok(()) => "Export: agro_dettaglio.csv + agro_settimane.json".to_string(),
            Err(err) => format!("Export fallito: {err}"),
        };
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("agro", Style::default().fg(Color::Cyan)),
            Span::raw(" — Distribuzione Arvaia 2025"),
        ]));

        lines.push(Line::from(Span::styled(
            format!(
                "prodotto: {} | tipo: {} | giorno: {} | policy: {} | metrica: {}",
                display_or_dash(&self.filter.product),
                part_type_display(&self.filter.part_type),
                day_label(&self.filter.day),
                self.per_part.display_name(),
                self.metric.display_name(),
            ),
            Style::default().fg(Color::Gray),
        )));

        if self.filter.is_active() {
            lines.push(Line::from(Span::styled(
                format!(
                    "righe visibili: {} | peso totale: {:.0} kg | media/parte: {:.3} kg",
                    self.view.summary.row_count,
                    self.view.summary.total_weight,
                    self.view.summary.mean_weight_per_part,
                ),
                Style::default().fg(Color::Gray),
            )));
        }

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        // The insight panel exists only once an answer arrived; the chart
        // absorbs the spare rows the rest of the time.
        let mut constraints = vec![Constraint::Min(0)];
        if self.insight.is_some() {
            constraints.push(Constraint::Length(6));
        }
        constraints.push(Constraint::Length(12));
        constraints.push(Constraint::Length(5));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        let mut next = 0;
        self.draw_chart(frame, chunks[next]);
        next += 1;
        if self.insight.is_some() {
            self.draw_insight(frame, chunks[next]);
            next += 1;
        }
        self.draw_table(frame, chunks[next]);
        self.draw_settings(frame, chunks[next + 1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default()
            .title(format!("Trend settimanale — {}", self.metric.display_name()))
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        if !self.filter.is_active() {
            let msg = Paragraph::new("Scegli un prodotto e un tipo di parte per visualizzare i dati.")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        }

        let Some((x_bounds, y_bounds)) = chart_bounds(&self.view.weekly, self.metric) else {
            let msg = Paragraph::new("Nessuna settimana nel dataset.")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        };

        let fmt_y = match self.metric {
            Metric::TotalWeight => fmt_axis_y_total as fn(f64) -> String,
            Metric::WeightPerPart => fmt_axis_y_per_part,
        };

        let (chart_rect, insets) = chart_layout(inner);
        let widget = WeeklyBarsChart {
            weeks: &self.view.weekly,
            metric: self.metric,
            x_bounds,
            y_bounds,
            y_label: "kg".to_string(),
            fmt_y,
        };

        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, inner, chart_rect, insets, x_bounds, y_bounds, fmt_y);
        }
    }

    fn draw_insight(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let Some(text) = &self.insight else {
            return;
        };
        let p = Paragraph::new(text.as_str())
            .wrap(Wrap { trim: true })
            .block(Block::default().title("Analisi (Gemini)").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_table(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = crate::report::detail_lines(&self.view.visible)
            .into_iter()
            .map(ListItem::new)
            .collect();

        let list = List::new(items).block(
            Block::default()
                .title(format!("Dettaglio ({} righe)", self.view.visible.len()))
                .borders(Borders::ALL),
        );
        frame.render_widget(list, area);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut items = Vec::new();
        items.push(ListItem::new(format!(
            "Prodotto:   {}",
            display_or_dash(&self.filter.product)
        )));
        items.push(ListItem::new(format!(
            "Tipo parte: {}",
            part_type_display(&self.filter.part_type)
        )));
        items.push(ListItem::new(format!("Giorno:     {}", day_label(&self.filter.day))));

        let list = List::new(items)
            .block(Block::default().title("Filtri").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ campo  ←/→ valore  m metrica  p policy  r reset  i analisi  e export  q esci";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Chart bounds for the weekly series, or `None` when there is nothing to
/// plot. X spans the week axis padded by half a bar; Y runs from zero with
/// 5% headroom above the tallest bar.
fn chart_bounds(weekly: &[WeeklyAggregate], metric: Metric) -> Option<([f64; 2], [f64; 2])> {
    let first = weekly.first()?;
    let last = weekly.last()?;
    let x_bounds = [f64::from(first.week) - 0.5, f64::from(last.week) + 0.5];

    let max = weekly
        .iter()
        .map(|agg| agg.metric(metric))
        .fold(0.0_f64, f64::max);
    let y_max = if max > 0.0 { max * 1.05 } else { 1.0 };

    Some((x_bounds, [0.0, y_max]))
}

fn display_or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}

/// `PI (Parte Intera)`, `Totale (Tutti i tipi)`, or `-` when unset.
fn part_type_display(code: &str) -> String {
    if code.is_empty() {
        "-".to_string()
    } else {
        format!("{code} ({})", part_type_label(code))
    }
}

fn fmt_axis_y_total(v: f64) -> String {
    format!("{v:.0}")
}

fn fmt_axis_y_per_part(v: f64) -> String {
    format!("{v:.2}")
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 8,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10
        || inner.height <= insets.top + insets.bottom + 5
    {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    fmt_y: fn(f64) -> String,
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x_val = x_bounds[0] + u * (x_bounds[1] - x_bounds[0]);
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = format!("S{:02}", x_val.round() as u32);
        let label_len = label.len() as u16;
        let start = x.saturating_sub((label.len() / 2) as u16);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = fmt_y(y_val);
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label.len() as u16);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let x_label = Paragraph::new("settimana")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }

    let y_label = Paragraph::new("kg")
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}
