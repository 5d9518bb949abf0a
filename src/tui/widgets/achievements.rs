use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::{Achievement, AchievementKind};
use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, unlocked: &[Achievement]) {
    let total = AchievementKind::all().len();

    let block = Block::default()
        .title(Span::styled(" Badges ", theme::teal()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(ratatui::style::Style::default().fg(theme::BORDER))
        .style(theme::surface());

    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  ", theme::dim()),
            Span::styled(
                format!("{} / {} unlocked", unlocked.len(), total),
                theme::bold(),
            ),
        ]),
    ];

    // Show the most recent unlocks that fit.
    let visible = area.height.saturating_sub(4) as usize;
    for a in unlocked.iter().rev().take(visible) {
        lines.push(Line::from(vec![
            Span::styled("  ◆ ", theme::teal()),
            Span::styled(a.kind.title(), theme::dim()),
        ]));
    }

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}
