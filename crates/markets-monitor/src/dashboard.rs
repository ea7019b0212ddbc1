//! TUI Dashboard using ratatui.

use chrono::{Datelike, NaiveDate};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use markets_core::error::{DashboardResult, DataError};
use markets_core::types::Dataset;
use markets_views::{
    fx_view, group_series, stock_view, FxDefaults, FxQuery, FxView, Page, Series, SeriesPoint,
    StockDefaults, StockQuery, StockView, ViewState,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset as ChartDataset, GraphType, Paragraph, Tabs},
    Frame, Terminal,
};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Days the start of the stock range moves per `+`/`-` press.
pub const SHIFT_DAYS: i64 = 30;

/// Log lines kept for the messages panel.
const MAX_MESSAGES: usize = 100;

/// Shortest input poll interval.
const MIN_REFRESH_MS: u64 = 16;

const PALETTE: [Color; 7] = [
    Color::Cyan,
    Color::Yellow,
    Color::Magenta,
    Color::Green,
    Color::LightRed,
    Color::LightBlue,
    Color::White,
];

/// What the run loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardAction {
    None,
    Reload,
    Quit,
}

/// Dashboard state.
pub struct DashboardState {
    pub page: Page,
    /// `None` when the warehouse could not be reached
    pub dataset: Option<Arc<Dataset>>,
    pub load_error: Option<String>,
    pub stock_query: StockQuery,
    pub fx_query: FxQuery,
    pub stock_defaults: StockDefaults,
    pub fx_defaults: FxDefaults,
    pub messages: Vec<String>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(StockDefaults::default(), FxDefaults::default())
    }
}

impl DashboardState {
    pub fn new(stock_defaults: StockDefaults, fx_defaults: FxDefaults) -> Self {
        Self {
            page: Page::default(),
            dataset: None,
            load_error: None,
            stock_query: StockQuery::default(),
            fx_query: FxQuery::default(),
            stock_defaults,
            fx_defaults,
            messages: Vec::new(),
        }
    }

    /// Install the outcome of a dataset load.
    pub fn set_dataset(&mut self, loaded: Result<Arc<Dataset>, DataError>) {
        match loaded {
            Ok(dataset) => {
                self.push_message(format!(
                    "Loaded {} stock rows and {} FX rows",
                    dataset.stocks.len(),
                    dataset.fx.len()
                ));
                self.dataset = Some(dataset);
                self.load_error = None;
            }
            Err(e) => {
                warn!(error = %e, "Dataset load failed");
                self.push_message(format!("Load failed: {e}"));
                self.dataset = None;
                self.load_error = Some(e.to_string());
            }
        }
    }

    pub fn stock_view(&self) -> StockView {
        stock_view(
            self.dataset.as_deref(),
            &self.stock_query,
            &self.stock_defaults,
        )
    }

    pub fn fx_view(&self) -> FxView {
        fx_view(self.dataset.as_deref(), &self.fx_query, &self.fx_defaults)
    }

    /// Apply a key press.
    pub fn handle_key(&mut self, code: KeyCode) -> DashboardAction {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return DashboardAction::Quit,
            KeyCode::Char('r') => return DashboardAction::Reload,
            KeyCode::Tab | KeyCode::BackTab => self.page = self.page.next(),
            KeyCode::Char('m') if self.page == Page::StockPrices => {
                self.stock_query.metric = self.stock_query.metric.next();
            }
            KeyCode::Char(c @ '1'..='9') => {
                let index = (c as usize) - ('1' as usize);
                match self.page {
                    Page::StockPrices => self.toggle_ticker(index),
                    Page::FxRates => self.toggle_currency(index),
                }
            }
            KeyCode::Char('+') if self.page == Page::StockPrices => self.shift_start(SHIFT_DAYS),
            KeyCode::Char('-') if self.page == Page::StockPrices => self.shift_start(-SHIFT_DAYS),
            _ => {}
        }
        DashboardAction::None
    }

    fn toggle_ticker(&mut self, index: usize) {
        let Some(resolved) = self.stock_view().query else {
            return;
        };
        if let Some(ticker) = resolved.available.get(index) {
            self.stock_query.toggle_ticker(ticker, &resolved.tickers);
        }
    }

    fn toggle_currency(&mut self, index: usize) {
        if let Some(currency) = self.fx_defaults.currencies.get(index).cloned() {
            self.fx_query.toggle_currency(&currency, &self.fx_defaults);
        }
    }

    fn shift_start(&mut self, days: i64) {
        if let Some(resolved) = self.stock_view().query {
            self.stock_query
                .shift_start(&resolved.range, days, resolved.bounds);
        }
    }

    fn push_message(&mut self, message: String) {
        self.messages.push(message);
        if self.messages.len() > MAX_MESSAGES {
            let excess = self.messages.len() - MAX_MESSAGES;
            self.messages.drain(..excess);
        }
    }
}

/// TUI Dashboard.
pub struct Dashboard {
    refresh_ms: u64,
}

impl Dashboard {
    /// Create a new dashboard polling input every `refresh_ms`, at least
    /// 16 ms.
    pub fn new(refresh_ms: u64) -> Self {
        Self {
            refresh_ms: refresh_ms.max(MIN_REFRESH_MS),
        }
    }

    /// Run the dashboard until the user quits. `reload` is called on `r`.
    pub fn run<F>(&self, state: &mut DashboardState, mut reload: F) -> DashboardResult<()>
    where
        F: FnMut() -> Result<Arc<Dataset>, DataError>,
    {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let res = self.run_loop(&mut terminal, state, &mut reload);

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        Ok(res?)
    }

    fn run_loop<F>(
        &self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        state: &mut DashboardState,
        reload: &mut F,
    ) -> io::Result<()>
    where
        F: FnMut() -> Result<Arc<Dataset>, DataError>,
    {
        loop {
            terminal.draw(|f| self.ui(f, state))?;

            if event::poll(Duration::from_millis(self.refresh_ms))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    match state.handle_key(key.code) {
                        DashboardAction::Quit => return Ok(()),
                        DashboardAction::Reload => {
                            info!("Reloading dataset");
                            state.set_dataset(reload());
                        }
                        DashboardAction::None => {}
                    }
                }
            }
        }
    }

    fn ui(&self, frame: &mut Frame, state: &DashboardState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3), // Pages
                Constraint::Length(4), // Controls
                Constraint::Min(10),   // Chart
                Constraint::Length(6), // Messages
            ])
            .split(frame.area());

        self.render_tabs(frame, chunks[0], state);
        match state.page {
            Page::StockPrices => {
                let view = state.stock_view();
                self.render_stock_controls(frame, chunks[1], state, &view);
                self.render_chart(frame, chunks[2], state.page, &view.state, view.metric.column());
            }
            Page::FxRates => {
                let view = state.fx_view();
                self.render_fx_controls(frame, chunks[1], &view);
                self.render_chart(frame, chunks[2], state.page, &view.state, "VALUE");
            }
        }
        self.render_messages(frame, chunks[3], state);
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect, state: &DashboardState) {
        let titles: Vec<&str> = Page::all().iter().map(|p| p.title()).collect();
        let tabs = Tabs::new(titles)
            .select(state.page.index())
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Markets | Tab: page, r: reload, q: quit"),
            );
        frame.render_widget(tabs, area);
    }

    fn render_stock_controls(
        &self,
        frame: &mut Frame,
        area: Rect,
        state: &DashboardState,
        view: &StockView,
    ) {
        let mut lines = Vec::new();
        match &view.query {
            Some(query) => {
                lines.push(Line::from(vec![
                    Span::raw("Range: "),
                    Span::styled(query.range.to_string(), Style::default().fg(Color::White)),
                    Span::raw("  |  Metric: "),
                    Span::styled(
                        view.metric.to_string(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  (m: metric, +/-: start)"),
                ]));
                lines.push(toggle_line(&query.available, &query.tickers));
            }
            None => lines.push(Line::from(Span::raw(format!(
                "Metric: {}",
                state.stock_query.metric
            )))),
        }

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(Page::StockPrices.subheader()),
        );
        frame.render_widget(paragraph, area);
    }

    fn render_fx_controls(&self, frame: &mut Frame, area: Rect, view: &FxView) {
        let paragraph = Paragraph::new(vec![toggle_line(&view.options, &view.selected)]).block(
            Block::default()
                .borders(Borders::ALL)
                .title(Page::FxRates.subheader()),
        );
        frame.render_widget(paragraph, area);
    }

    fn render_chart<P>(
        &self,
        frame: &mut Frame,
        area: Rect,
        page: Page,
        state: &ViewState<P>,
        y_title: &str,
    ) where
        P: SeriesPoint,
    {
        let block = Block::default().borders(Borders::ALL).title(page.title());

        if let Some(message) = state.message() {
            let color = match state {
                ViewState::Unavailable(_) => Color::Red,
                _ => Color::DarkGray,
            };
            let paragraph = Paragraph::new(Span::styled(message, Style::default().fg(color)))
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let series = group_series(state.rows());
        let data: Vec<Vec<(f64, f64)>> = series.iter().map(chart_points).collect();
        let Some(((x_min, x_max), (y_min, y_max))) = chart_bounds(&series) else {
            frame.render_widget(Paragraph::new("No values to draw.").block(block), area);
            return;
        };

        let datasets: Vec<ChartDataset> = series
            .iter()
            .zip(data.iter())
            .enumerate()
            .map(|(i, (s, points))| {
                ChartDataset::default()
                    .name(s.key.clone())
                    .marker(symbols::Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(PALETTE[i % PALETTE.len()]))
                    .data(points)
            })
            .collect();

        let chart = Chart::new(datasets)
            .block(block)
            .x_axis(
                Axis::default()
                    .title("DATE")
                    .bounds([x_min, x_max])
                    .labels(vec![
                        Span::raw(date_label(x_min)),
                        Span::raw(date_label(x_max)),
                    ]),
            )
            .y_axis(
                Axis::default()
                    .title(y_title.to_string())
                    .bounds([y_min, y_max])
                    .labels(vec![
                        Span::raw(format!("{y_min:.2}")),
                        Span::raw(format!("{y_max:.2}")),
                    ]),
            );
        frame.render_widget(chart, area);
    }

    fn render_messages(&self, frame: &mut Frame, area: Rect, state: &DashboardState) {
        let mut messages: Vec<Line> = Vec::new();
        if let Some(error) = &state.load_error {
            messages.push(Line::from(Span::styled(
                error.as_str(),
                Style::default().fg(Color::Red),
            )));
        }
        messages.extend(
            state
                .messages
                .iter()
                .rev()
                .take(3)
                .map(|m| Line::from(m.as_str())),
        );

        let paragraph =
            Paragraph::new(messages).block(Block::default().borders(Borders::ALL).title("Log"));
        frame.render_widget(paragraph, area);
    }
}

fn toggle_line(options: &[String], selected: &[String]) -> Line<'static> {
    let spans: Vec<Span> = options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let style = if selected.contains(option) {
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Span::styled(format!("[{}] {}  ", i + 1, option), style)
        })
        .collect();
    Line::from(spans)
}

fn chart_points(series: &Series) -> Vec<(f64, f64)> {
    series
        .points
        .iter()
        .map(|(date, y)| (date.num_days_from_ce() as f64, *y))
        .collect()
}

fn chart_bounds(series: &[Series]) -> Option<((f64, f64), (f64, f64))> {
    let mut x: Option<(f64, f64)> = None;
    let mut y: Option<(f64, f64)> = None;
    for s in series {
        for (date, value) in &s.points {
            let day = date.num_days_from_ce() as f64;
            x = Some(x.map_or((day, day), |(lo, hi)| (lo.min(day), hi.max(day))));
        }
        if let Some((lo, hi)) = s.y_bounds() {
            y = Some(y.map_or((lo, hi), |(a, b)| (a.min(lo), b.max(hi))));
        }
    }
    let (x, (y_lo, y_hi)) = (x?, y?);
    // Flat lines still need a non-zero span.
    let pad = ((y_hi - y_lo) * 0.05).max(f64::EPSILON.max(y_hi.abs() * 0.01));
    Some((x, (y_lo - pad, y_hi + pad)))
}

fn date_label(days_from_ce: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(days_from_ce as i32)
        .map(|d| d.to_string())
        .unwrap_or_default()
}
