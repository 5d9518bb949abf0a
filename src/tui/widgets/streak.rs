use chrono::{Days, Local, NaiveDate};
use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use std::collections::HashSet;

use crate::models::Streak;
use crate::tui::theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    streak: &Streak,
    logged_days: &HashSet<NaiveDate>,
) {
    let block = Block::default()
        .title(Span::styled(" Streak ", theme::teal()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(ratatui::style::Style::default().fg(theme::BORDER))
        .style(theme::surface());

    // One dot per day, last 7 days, oldest first.
    let today = Local::now().date_naive();
    let mut dot_spans = vec![Span::styled("  ", theme::dim())];
    for back in (0..7).rev() {
        let day = today.checked_sub_days(Days::new(back)).unwrap_or(today);
        let (dot, style) = if logged_days.contains(&day) {
            ("●", theme::green().add_modifier(Modifier::BOLD))
        } else if day == today {
            ("◌", theme::amber())
        } else {
            ("○", theme::dim())
        };
        dot_spans.push(Span::styled(dot, style));
        dot_spans.push(Span::styled("  ", theme::dim()));
    }

    // Streak bar, filled proportional to streak/30.
    let bar_len = 12usize;
    let ratio = (streak.current as f64 / 30.0).min(1.0);
    let filled = (ratio * bar_len as f64).round() as usize;
    let empty = bar_len.saturating_sub(filled);
    let bar = format!("{}{}", "█".repeat(filled), "░".repeat(empty));

    let streak_line = Line::from(vec![
        Span::styled("  ", theme::dim()),
        Span::styled(bar, theme::green()),
        Span::styled(
            format!("  {} days", streak.current),
            theme::green().add_modifier(Modifier::BOLD),
        ),
    ]);

    let meta_line = Line::from(Span::styled(
        format!("  Best: {}", streak.best),
        theme::dim(),
    ));

    let text = vec![
        Line::from(""),
        Line::from(dot_spans),
        Line::from(""),
        streak_line,
        meta_line,
    ];
    let paragraph = Paragraph::new(text).block(block);
    frame.render_widget(paragraph, area);
}
