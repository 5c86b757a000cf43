//! Memory and swap gauges over a used-GB chart.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::Gauge,
};

use crate::cards::memory::{fmt_gb, usage_percent, MemoryCard, RAM, SWAP};
use crate::types::MemoryStats;
use crate::ui::card_frame;
use crate::ui::chart::draw_series_chart;

fn gauge<'a>(name: &str, m: &MemoryStats, color: Color) -> Gauge<'a> {
    let pct = usage_percent(m.used_gb, m.total_gb, m.usage_percent);
    Gauge::default()
        .gauge_style(Style::default().fg(color))
        .ratio((pct / 100.0).clamp(0.0, 1.0))
        .label(format!(
            "{name} {} / {} ({pct:.1}%)",
            fmt_gb(m.used_gb),
            fmt_gb(m.total_gb)
        ))
}

pub fn draw_mem(f: &mut ratatui::Frame<'_>, area: Rect, card: &MemoryCard) {
    let Some((snap, inner)) = card_frame(f, area, "Memory", card.poller.view()) else {
        return;
    };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    f.render_widget(gauge("RAM ", &snap.ram, Color::Magenta), rows[0]);
    f.render_widget(gauge("Swap", &snap.swap, Color::Yellow), rows[1]);

    let y_max = snap.ram.total_gb.max(snap.swap.total_gb);
    let legend = [
        (RAM.to_string(), "r".to_string(), "ram GB".to_string()),
        (SWAP.to_string(), "w".to_string(), "swap GB".to_string()),
    ];
    draw_series_chart(f, rows[2], &card.chart, y_max, &legend);
}
