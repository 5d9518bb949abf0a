use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Sparkline},
    Frame,
};

use crate::models::{TrendPoint, Unit};
use crate::tui::theme;
use crate::utils::format::format_weight;

/// 30-day weight sparkline. Values are normalized onto the sparkline's
/// integer scale; the min/max labels underneath carry the real numbers.
pub fn render(frame: &mut Frame, area: Rect, series: &[TrendPoint], unit: Unit) {
    let block = Block::default()
        .title(Span::styled(" Last 30 Days ", theme::teal()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(ratatui::style::Style::default().fg(theme::BORDER))
        .style(theme::surface());

    if series.len() < 2 {
        let paragraph = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "  Log a few days to see the trend",
                theme::dim(),
            )),
        ])
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let min = series.iter().map(|p| p.value).fold(f64::INFINITY, f64::min);
    let max = series
        .iter()
        .map(|p| p.value)
        .fold(f64::NEG_INFINITY, f64::max);
    let span = (max - min).max(0.1);

    let data: Vec<u64> = series
        .iter()
        .map(|p| (((p.value - min) / span) * 100.0).round() as u64 + 1)
        .collect();

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height < 2 {
        return;
    }

    let spark_area = Rect {
        x: inner.x + 2,
        y: inner.y,
        width: inner.width.saturating_sub(4),
        height: inner.height.saturating_sub(1),
    };
    let sparkline = Sparkline::default()
        .data(&data)
        .style(theme::teal());
    frame.render_widget(sparkline, spark_area);

    let label_area = Rect {
        x: inner.x,
        y: inner.y + inner.height - 1,
        width: inner.width,
        height: 1,
    };
    let labels = Paragraph::new(Line::from(vec![
        Span::styled(
            format!("  low {}", format_weight(min, unit)),
            theme::dim(),
        ),
        Span::styled("  ·  ", theme::dim()),
        Span::styled(
            format!("high {}", format_weight(max, unit)),
            theme::dim(),
        ),
    ]));
    frame.render_widget(labels, label_area);
}
