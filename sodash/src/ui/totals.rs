//! Process and thread count sparklines.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Sparkline},
};

use crate::cards::totals::{TotalsCard, PROCESSES, THREADS};
use crate::ui::card_frame;

pub fn draw_totals(f: &mut ratatui::Frame<'_>, area: Rect, card: &TotalsCard) {
    let Some((_, inner)) = card_frame(f, area, "System totals", card.poller.view()) else {
        return;
    };
    let (procs, threads) = card.current().unwrap_or((0, 0));
    let halves = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
        .split(inner);

    for ((key, now, color), slot) in [
        (PROCESSES, procs, Color::Cyan),
        (THREADS, threads, Color::Green),
    ]
    .into_iter()
    .zip(halves.iter())
    {
        let data = card.chart.history.sparkline(key, slot.width as usize);
        let spark = Sparkline::default()
            .block(Block::default().title(format!("{key}: {now}")))
            .data(&data)
            .style(Style::default().fg(color));
        f.render_widget(spark, *slot);
    }
}
