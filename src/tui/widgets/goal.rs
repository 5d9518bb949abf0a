use chrono::Local;
use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::{Goal, Progress, Unit};
use crate::tui::theme;
use crate::utils::format::{format_weight, progress_bar};

pub fn render(
    frame: &mut Frame,
    area: Rect,
    goal_progress: Option<&(Goal, Progress)>,
    unit: Unit,
) {
    let block = Block::default()
        .title(Span::styled(" Goal ", theme::teal()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(ratatui::style::Style::default().fg(theme::BORDER))
        .style(theme::surface());

    let Some((goal, progress)) = goal_progress else {
        let paragraph = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "  No goal set — `libra goal set <target>`",
                theme::dim(),
            )),
        ])
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    };

    let range_line = Line::from(vec![
        Span::styled("  ", theme::dim()),
        Span::styled(format_weight(goal.start_weight, unit), theme::dim()),
        Span::styled("  →  ", theme::dim()),
        Span::styled(
            format_weight(goal.target_weight, unit),
            theme::bold(),
        ),
        Span::styled(
            format!("   ({})", goal.direction().display_name()),
            theme::dim(),
        ),
    ]);

    let bar_style = if progress.is_complete() {
        theme::green().add_modifier(Modifier::BOLD)
    } else {
        theme::teal()
    };
    let bar_line = Line::from(vec![
        Span::styled("  ", theme::dim()),
        Span::styled(progress_bar(progress.fraction, 18), bar_style),
        Span::styled(
            format!("  {}%", progress.percent()),
            theme::bold(),
        ),
    ]);

    let detail_line = if progress.is_complete() {
        Line::from(Span::styled("  ★ Goal reached", theme::green()))
    } else {
        let mut spans = vec![Span::styled(
            format!("  {} to go", format_weight(progress.remaining, unit)),
            theme::dim(),
        )];
        if let Some(by) = goal.target_date {
            let days_left = (by - Local::now().date_naive()).num_days();
            let (text, style) = if days_left >= 0 {
                (format!("  ·  {} days left", days_left), theme::dim())
            } else {
                ("  ·  deadline passed".to_string(), theme::amber())
            };
            spans.push(Span::styled(text, style));
        }
        Line::from(spans)
    };

    let text = vec![Line::from(""), range_line, Line::from(""), bar_line, detail_line];
    let paragraph = Paragraph::new(text).block(block);
    frame.render_widget(paragraph, area);
}
