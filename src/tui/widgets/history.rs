use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem},
    Frame,
};

use crate::models::{Unit, WeightEntry};
use crate::tui::theme;
use crate::utils::format::{format_delta, format_weight};

pub fn render(
    frame: &mut Frame,
    area: Rect,
    entries: &[WeightEntry],
    focused_idx: usize,
    unit: Unit,
) {
    let block = Block::default()
        .title(Span::styled(" History ", theme::teal()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(ratatui::style::Style::default().fg(theme::BORDER))
        .style(theme::surface());

    if entries.is_empty() {
        let empty = List::new(vec![ListItem::new(Line::from(Span::styled(
            "  No entries yet — press [l] to log",
            theme::dim(),
        )))])
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let is_focused = i == focused_idx;

            // Delta against the next-older entry (entries are newest-first).
            let delta_span = match entries.get(i + 1) {
                Some(prev) => {
                    let d = entry.value - prev.value;
                    let style = if d < -0.05 {
                        theme::green()
                    } else if d > 0.05 {
                        theme::amber()
                    } else {
                        theme::dim()
                    };
                    Span::styled(format!("  {}", format_delta(d, unit)), style)
                }
                None => Span::styled("", theme::dim()),
            };

            let date_style = if is_focused {
                theme::teal().add_modifier(Modifier::BOLD)
            } else {
                theme::dim()
            };

            let mut spans = vec![
                Span::styled(format!("  {}", entry.recorded_on), date_style),
                Span::styled(
                    format!("  {:>9}", format_weight(entry.value, unit)),
                    theme::bold(),
                ),
                delta_span,
            ];
            if let Some(note) = &entry.note {
                spans.push(Span::styled(format!("  {}", note), theme::dim()));
            }

            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}
