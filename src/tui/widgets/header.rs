use chrono::Local;
use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::Unit;
use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, unit: Unit) {
    let today = Local::now();
    let date_str = today.format("%A, %b %d, %Y").to_string();

    let title_line = Line::from(vec![
        Span::styled("  ♎  ", theme::teal().add_modifier(Modifier::BOLD)),
        Span::styled("libra", theme::teal()),
    ]);

    let date_line = Line::from(vec![
        Span::styled(&date_str, theme::dim()),
        Span::styled("  ·  ", theme::dim()),
        Span::styled(format!("unit: {}", unit), theme::amber()),
    ]);

    let text = vec![title_line, Line::from(""), date_line];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::teal().add_modifier(Modifier::BOLD))
        .style(theme::base());

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
