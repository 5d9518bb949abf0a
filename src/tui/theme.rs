use ratatui::style::{Color, Modifier, Style};

pub const BG: Color = Color::Rgb(14, 17, 20);
pub const SURFACE: Color = Color::Rgb(22, 27, 32);
pub const BORDER: Color = Color::Rgb(44, 54, 63);
pub const TEXT: Color = Color::Rgb(205, 214, 219);
pub const TEXT_DIM: Color = Color::Rgb(108, 122, 132);
pub const TEAL: Color = Color::Rgb(86, 182, 194);
pub const GREEN: Color = Color::Rgb(112, 168, 110);
pub const AMBER: Color = Color::Rgb(214, 153, 76);
pub const RED: Color = Color::Rgb(190, 88, 74);

pub fn base() -> Style {
    Style::default().fg(TEXT).bg(BG)
}

pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn teal() -> Style {
    Style::default().fg(TEAL)
}

pub fn green() -> Style {
    Style::default().fg(GREEN)
}

pub fn amber() -> Style {
    Style::default().fg(AMBER)
}

pub fn red() -> Style {
    Style::default().fg(RED)
}

pub fn bold() -> Style {
    Style::default().fg(TEXT).add_modifier(Modifier::BOLD)
}

pub fn surface() -> Style {
    Style::default().fg(TEXT).bg(SURFACE)
}
