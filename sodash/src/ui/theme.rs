//! Shared UI theme constants.

use ratatui::style::Color;

use crate::poller::PollStatus;

// Scrollbar colors
pub const SB_ARROW: Color = Color::Rgb(170, 170, 180);
pub const SB_TRACK: Color = Color::Rgb(170, 170, 180);
pub const SB_THUMB: Color = Color::Rgb(170, 170, 180);

pub const HEADER_FG: Color = Color::Cyan;
pub const SELECTED_BG: Color = Color::Rgb(45, 55, 75);

const SERIES: [Color; 8] = [
    Color::Cyan,
    Color::Green,
    Color::Yellow,
    Color::Magenta,
    Color::Blue,
    Color::LightRed,
    Color::LightGreen,
    Color::LightBlue,
];

/// Stable color for the n-th series of a chart.
pub fn series_color(i: usize) -> Color {
    SERIES[i % SERIES.len()]
}

/// Green / yellow / red by load percentage.
pub fn load_color(pct: f64) -> Color {
    match pct {
        x if x < 25.0 => Color::Green,
        x if x < 60.0 => Color::Yellow,
        _ => Color::Red,
    }
}

/// Gauge color for a fill percentage.
pub fn fill_color(pct: f64) -> Color {
    if pct < 70.0 {
        Color::Green
    } else if pct < 90.0 {
        Color::Yellow
    } else {
        Color::Red
    }
}

pub fn status_glyph(s: PollStatus) -> (&'static str, Color) {
    match s {
        PollStatus::Idle => ("·", Color::DarkGray),
        PollStatus::Loading => ("…", Color::Yellow),
        PollStatus::Ready => ("●", Color::Green),
        PollStatus::Error => ("✗", Color::Red),
    }
}
