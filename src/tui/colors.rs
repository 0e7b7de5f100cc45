use ratatui::style::Color;

pub const HEADER_BG: Color = Color::Rgb(0, 95, 135);
pub const SELECTED_BG: Color = Color::Rgb(60, 60, 80);
pub const ALT_ROW_BG: Color = Color::Rgb(25, 25, 35);

pub fn color_for_rating(vote_average: Option<f64>) -> Color {
    match vote_average {
        Some(v) if v >= 7.5 => Color::Green,
        Some(v) if v >= 6.0 => Color::Yellow,
        Some(v) if v > 0.0 => Color::LightRed,
        _ => Color::DarkGray,
    }
}

/// Gold, silver, bronze, then plain
pub fn color_for_rank(rank: usize) -> Color {
    match rank {
        1 => Color::Rgb(255, 215, 0),
        2 => Color::Rgb(192, 192, 192),
        3 => Color::Rgb(205, 127, 50),
        _ => Color::Gray,
    }
}
