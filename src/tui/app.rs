use anyhow::Result;
use chrono::{Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use rusqlite::Connection;
use std::collections::HashSet;

use crate::config::AppConfig;
use crate::db::repository::{AchievementRepo, EntryRepo, GoalRepo, StatsRepo};
use crate::models::entry::validate_weight_kg;
use crate::models::{Achievement, Goal, Progress, Streak, Trend, TrendPoint, WeightEntry};
use crate::tui::events::{Event, EventHandler};
use crate::tui::theme;
use crate::tui::widgets::{achievements, chart, goal, header, history, statusbar, streak};
use crate::utils::format::{format_delta, format_weight, progress_bar};

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Dashboard,
    Stats,
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    LogInput,
}

pub struct App {
    pub view: View,
    pub config: AppConfig,
    pub focus_idx: usize,
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub input_error: Option<String>, // shown in the log popup on bad input
    pub flash: Option<String>,       // transient unlock banner
    pub flash_ticks: u8,

    // Cached state (refreshed on load/action)
    pub today: NaiveDate,
    pub entries: Vec<WeightEntry>,
    pub entry_count: u64,
    pub goal_progress: Option<(Goal, Progress)>,
    pub streak: Streak,
    pub trend: Trend,
    pub logged_days: HashSet<NaiveDate>,
    pub series: Vec<TrendPoint>,
    pub unlocked: Vec<Achievement>,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        App {
            view: View::Dashboard,
            config,
            focus_idx: 0,
            should_quit: false,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            input_error: None,
            flash: None,
            flash_ticks: 0,
            today: Local::now().date_naive(),
            entries: Vec::new(),
            entry_count: 0,
            goal_progress: None,
            streak: Streak::default(),
            trend: Trend::default(),
            logged_days: HashSet::new(),
            series: Vec::new(),
            unlocked: Vec::new(),
        }
    }

    pub fn load(&mut self, conn: &Connection) -> Result<()> {
        self.today = Local::now().date_naive();

        self.entries = EntryRepo::get_recent(conn, self.config.display.history_limit.max(20))?;
        self.entry_count = EntryRepo::count(conn)?;
        self.goal_progress = StatsRepo::goal_progress(conn)?;
        self.streak = StatsRepo::streaks(conn, self.today)?;
        self.trend = StatsRepo::trend(conn, self.today)?;
        self.logged_days = EntryRepo::distinct_dates(conn)?.into_iter().collect();
        self.series = EntryRepo::daily_series(conn, self.today - chrono::Duration::days(29))?;
        self.unlocked = AchievementRepo::unlocked(conn)?;

        if self.focus_idx >= self.entries.len() {
            self.focus_idx = self.entries.len().saturating_sub(1);
        }
        Ok(())
    }

    pub fn tick(&mut self) {
        if self.flash_ticks > 0 {
            self.flash_ticks -= 1;
            if self.flash_ticks == 0 {
                self.flash = None;
            }
        }
    }

    pub fn handle_key(&mut self, key: crossterm::event::KeyEvent, conn: &Connection) {
        // Only handle actual key presses — ignore release/repeat events from some terminals
        if key.kind != KeyEventKind::Press {
            return;
        }
        match self.input_mode {
            InputMode::LogInput => self.handle_log_input(key, conn),
            InputMode::Normal => self.handle_normal_key(key, conn),
        }
    }

    fn handle_normal_key(&mut self, key: crossterm::event::KeyEvent, conn: &Connection) {
        match self.view {
            View::Dashboard => self.handle_dashboard_key(key, conn),
            View::Stats => self.handle_stats_key(key),
            View::Help => self.handle_help_key(key),
        }
    }

    fn handle_dashboard_key(&mut self, key: crossterm::event::KeyEvent, conn: &Connection) {
        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('l') => {
                self.input_mode = InputMode::LogInput;
                self.input_buffer.clear();
                self.input_error = None;
            }
            KeyCode::Char('x') => {
                self.delete_focused(conn);
            }
            KeyCode::Char('s') => {
                self.view = View::Stats;
            }
            KeyCode::Char('?') => {
                self.view = View::Help;
            }
            KeyCode::Up => {
                if self.focus_idx > 0 {
                    self.focus_idx -= 1;
                }
            }
            KeyCode::Down => {
                if self.focus_idx + 1 < self.entries.len() {
                    self.focus_idx += 1;
                }
            }
            _ => {}
        }
    }

    fn handle_stats_key(&mut self, key: crossterm::event::KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('s') => {
                self.view = View::Dashboard;
            }
            _ => {}
        }
    }

    fn handle_help_key(&mut self, key: crossterm::event::KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('?') => {
                self.view = View::Dashboard;
            }
            _ => {}
        }
    }

    fn handle_log_input(&mut self, key: crossterm::event::KeyEvent, conn: &Connection) {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.input_buffer.clear();
                self.input_error = None;
            }
            KeyCode::Enter => {
                let trimmed = self.input_buffer.trim().to_string();
                if trimmed.is_empty() {
                    self.input_error =
                        Some(format!("Enter your weight in {}", self.config.display.unit));
                    return;
                }
                match trimmed.parse::<f64>() {
                    Ok(value) => {
                        let kg = self.config.display.unit.to_kg(value);
                        match validate_weight_kg(kg) {
                            Ok(kg) => {
                                self.submit_weight(conn, kg);
                                self.input_mode = InputMode::Normal;
                                self.input_buffer.clear();
                                self.input_error = None;
                            }
                            Err(e) => {
                                self.input_error = Some(e.to_string());
                            }
                        }
                    }
                    Err(_) => {
                        self.input_error = Some(format!("'{}' is not a valid number", trimmed));
                    }
                }
            }
            KeyCode::Backspace => {
                self.input_buffer.pop();
                self.input_error = None;
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => {
                self.input_buffer.push(c);
                self.input_error = None;
            }
            _ => {}
        }
    }

    fn submit_weight(&mut self, conn: &Connection, kg: f64) {
        let _ = EntryRepo::add(conn, self.today, kg, None);

        if let Ok(Some((goal, progress))) = StatsRepo::goal_progress(conn) {
            if progress.is_complete() && !goal.is_completed() {
                let _ = GoalRepo::mark_completed(conn, goal.id);
            }
        }

        if let Ok(fresh) = AchievementRepo::refresh(conn, self.today) {
            if let Some(kind) = fresh.last() {
                self.flash = Some(format!("◆ Achievement unlocked: {}", kind.title()));
                self.flash_ticks = 10; // ~5s at the 500ms tick
            }
        }

        let _ = self.load(conn);
    }

    fn delete_focused(&mut self, conn: &Connection) {
        if let Some(entry) = self.entries.get(self.focus_idx) {
            let _ = EntryRepo::delete(conn, entry.id);
            let _ = self.load(conn);
        }
    }

    pub fn draw(&self, frame: &mut Frame) {
        match self.view {
            View::Dashboard => self.draw_dashboard(frame),
            View::Stats => self.draw_stats(frame),
            View::Help => {
                self.draw_dashboard(frame);
                self.draw_help_overlay(frame);
            }
        }

        if self.input_mode == InputMode::LogInput {
            self.draw_log_input(frame);
        }
    }

    fn draw_dashboard(&self, frame: &mut Frame) {
        let area = frame.area();

        // Clear background
        frame.render_widget(Block::default().style(theme::base()), area);

        let outer_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // header
                Constraint::Min(0),    // body
                Constraint::Length(1), // status bar
            ])
            .split(area);

        header::render(frame, outer_chunks[0], self.config.display.unit);

        if let Some(flash) = &self.flash {
            let banner = Paragraph::new(Line::from(Span::styled(
                format!("  {}", flash),
                theme::teal().add_modifier(Modifier::BOLD),
            )));
            frame.render_widget(banner, outer_chunks[2]);
        } else {
            statusbar::render(frame, outer_chunks[2]);
        }

        // Body split into columns
        let body = outer_chunks[1];
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(body);

        let left_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),    // history
                Constraint::Length(7), // goal
            ])
            .split(columns[0]);

        history::render(
            frame,
            left_chunks[0],
            &self.entries,
            self.focus_idx,
            self.config.display.unit,
        );
        goal::render(
            frame,
            left_chunks[1],
            self.goal_progress.as_ref(),
            self.config.display.unit,
        );

        let right_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(9), // chart
                Constraint::Length(8), // streak
                Constraint::Min(0),    // badges
            ])
            .split(columns[1]);

        chart::render(
            frame,
            right_chunks[0],
            &self.series,
            self.config.display.unit,
        );
        streak::render(frame, right_chunks[1], &self.streak, &self.logged_days);
        achievements::render(frame, right_chunks[2], &self.unlocked);
    }

    fn draw_stats(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(theme::base()), area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        let title = Paragraph::new(Line::from(vec![
            Span::styled("  Stats  ", theme::teal().add_modifier(Modifier::BOLD)),
            Span::styled("  [Esc] back", theme::dim()),
        ]));
        frame.render_widget(title, chunks[0]);

        let unit = self.config.display.unit;
        let mut lines = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("  Streak (current):  ", theme::dim()),
                Span::styled(
                    format!("{} days", self.streak.current),
                    theme::green().add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("  Streak (best):     ", theme::dim()),
                Span::styled(format!("{} days", self.streak.best), theme::green()),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("  Entries:           ", theme::dim()),
                Span::styled(format!("{}", self.entry_count), theme::bold()),
            ]),
        ];

        if let Some(entry) = self.entries.first() {
            lines.push(Line::from(vec![
                Span::styled("  Current weight:    ", theme::dim()),
                Span::styled(format_weight(entry.value, unit), theme::bold()),
                Span::styled(format!("  ({})", entry.recorded_on), theme::dim()),
            ]));
            if let Some(bmi) = self.config.bmi(entry.value) {
                lines.push(Line::from(vec![
                    Span::styled("  BMI:               ", theme::dim()),
                    Span::styled(format!("{:.1}", bmi), theme::amber()),
                ]));
            }
        }

        lines.push(Line::from(""));
        let change_line = |label: &str, change: Option<f64>| {
            let value = match change {
                Some(d) => Span::styled(format_delta(d, unit), theme::amber()),
                None => Span::styled("not enough data".to_string(), theme::dim()),
            };
            Line::from(vec![
                Span::styled(format!("  {:<19}", label), theme::dim()),
                value,
            ])
        };
        lines.push(change_line("7-day change:", self.trend.change_7d));
        lines.push(change_line("30-day change:", self.trend.change_30d));
        lines.push(Line::from(vec![
            Span::styled("  Trend:             ", theme::dim()),
            Span::styled(self.trend.direction(), theme::bold()),
        ]));

        if let Some((_, progress)) = &self.goal_progress {
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("  Goal:              ", theme::dim()),
                Span::styled(progress_bar(progress.fraction, 16), theme::teal()),
                Span::styled(format!("  {}%", progress.percent()), theme::bold()),
            ]));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("  Last 30 Days", theme::teal())));
        lines.push(Line::from(""));

        if self.series.len() >= 2 {
            let min = self.series.iter().map(|p| p.value).fold(f64::INFINITY, f64::min);
            let max = self
                .series
                .iter()
                .map(|p| p.value)
                .fold(f64::NEG_INFINITY, f64::max);
            let span = (max - min).max(0.1);
            for point in &self.series {
                let filled = (((point.value - min) / span) * 12.0).round() as usize;
                let bar = format!(
                    "{}{}",
                    "█".repeat(filled.max(1)),
                    "░".repeat(12usize.saturating_sub(filled.max(1)))
                );
                lines.push(Line::from(vec![
                    Span::styled(format!("  {}  ", point.date), theme::dim()),
                    Span::styled(bar, theme::teal()),
                    Span::styled(
                        format!("  {}", format_weight(point.value, unit)),
                        theme::dim(),
                    ),
                ]));
            }
        } else {
            lines.push(Line::from(Span::styled(
                "  (need at least two days of entries)",
                theme::dim(),
            )));
        }

        let paragraph = Paragraph::new(lines);
        frame.render_widget(paragraph, chunks[1]);
    }

    fn draw_help_overlay(&self, frame: &mut Frame) {
        let area = frame.area();

        let popup_area = Rect {
            x: area.width / 4,
            y: area.height / 4,
            width: area.width / 2,
            height: area.height / 2,
        };

        frame.render_widget(Clear, popup_area);

        let help_text = vec![
            Line::from(Span::styled(
                "  Keybindings",
                theme::teal().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("  [l]          ", theme::teal()),
                Span::styled("Log today's weight", theme::dim()),
            ]),
            Line::from(vec![
                Span::styled("  [x]          ", theme::teal()),
                Span::styled("Delete focused entry", theme::dim()),
            ]),
            Line::from(vec![
                Span::styled("  [s]          ", theme::teal()),
                Span::styled("Stats view", theme::dim()),
            ]),
            Line::from(vec![
                Span::styled("  [↑ ↓]        ", theme::teal()),
                Span::styled("Navigate history", theme::dim()),
            ]),
            Line::from(vec![
                Span::styled("  [?]          ", theme::teal()),
                Span::styled("Toggle help", theme::dim()),
            ]),
            Line::from(vec![
                Span::styled("  [Esc]        ", theme::teal()),
                Span::styled("Quit", theme::dim()),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "  Backdating and notes: `libra log --date --note`",
                theme::dim(),
            )),
        ];

        let block = Block::default()
            .title(Span::styled(" Help ", theme::teal()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::teal())
            .style(theme::surface());

        let paragraph = Paragraph::new(help_text).block(block);
        frame.render_widget(paragraph, popup_area);
    }

    fn draw_log_input(&self, frame: &mut Frame) {
        let area = frame.area();
        let height = if self.input_error.is_some() { 7 } else { 5 };

        let popup_area = Rect {
            x: area.width / 4,
            y: area.height / 2 - 3,
            width: area.width / 2,
            height,
        };

        frame.render_widget(Clear, popup_area);

        let mut text = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    format!("  Today's weight ({}): ", self.config.display.unit),
                    theme::dim(),
                ),
                Span::styled(
                    self.input_buffer.as_str(),
                    theme::teal().add_modifier(Modifier::BOLD),
                ),
                Span::styled("█", theme::amber()), // block cursor
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "  Type a number, then [Enter]  ·  [Esc] cancel",
                theme::dim(),
            )),
        ];

        if let Some(err) = &self.input_error {
            text.push(Line::from(""));
            text.push(Line::from(Span::styled(format!("  ✗ {}", err), theme::red())));
        }

        let border_style = if self.input_error.is_some() {
            theme::red()
        } else {
            theme::amber()
        };

        let block = Block::default()
            .title(Span::styled(" Log Weight ", theme::teal()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .style(theme::surface());

        let paragraph = Paragraph::new(text).block(block);
        frame.render_widget(paragraph, popup_area);
    }
}

/// Run the TUI event loop.
pub fn run(conn: Connection, config: AppConfig) -> Result<()> {
    let mut app = App::new(config);
    app.load(&conn)?;

    let mut terminal = ratatui::init();
    let events = EventHandler::new(500);

    loop {
        terminal.draw(|frame| app.draw(frame))?;

        match events.next()? {
            Event::Key(key) => {
                app.handle_key(key, &conn);
                if app.should_quit {
                    break;
                }
            }
            Event::Tick => {
                app.tick();
            }
        }
    }

    ratatui::restore();
    Ok(())
}
