//! Process status distribution as horizontal bars.

use ratatui::{
    layout::{Direction, Rect},
    style::{Color, Style},
    widgets::{Bar, BarChart, BarGroup},
};

use crate::cards::StatusCard;
use crate::ui::card_frame;
use crate::ui::theme::series_color;

pub fn draw_status(f: &mut ratatui::Frame<'_>, area: Rect, card: &StatusCard) {
    let title = format!("Process status ({})", card.total());
    let Some((_, inner)) = card_frame(f, area, &title, card.poller.view()) else {
        return;
    };
    let bars: Vec<Bar> = card
        .counts
        .iter()
        .enumerate()
        .take(inner.height as usize)
        .map(|(i, (name, n))| {
            Bar::default()
                .label(name.clone().into())
                .value(*n)
                .style(Style::default().fg(series_color(i)))
                .value_style(Style::default().fg(Color::Black).bg(series_color(i)))
        })
        .collect();
    let chart = BarChart::default()
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .data(BarGroup::default().bars(&bars));
    f.render_widget(chart, inner);
}
