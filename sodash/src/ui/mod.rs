//! UI module root: exposes drawing functions for individual panels.

pub mod chart;
pub mod cpu;
pub mod directory;
pub mod filesystem;
pub mod header;
pub mod mem;
pub mod processes;
pub mod status;
pub mod theme;
pub mod totals;
pub mod util;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
};

use crate::poller::CardView;

/// Draw a bordered card and hand back its snapshot and inner area. Cards
/// without data get a loading or error placeholder and `None`.
pub fn card_frame<'a, S>(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    title: &str,
    view: CardView<'a, S>,
) -> Option<(&'a S, Rect)> {
    let (title, body) = match view {
        CardView::Data { snapshot, stale } => {
            let t = if stale {
                format!("{title} [stale]")
            } else {
                title.to_string()
            };
            (t, Ok(snapshot))
        }
        CardView::Loading => (title.to_string(), Err(("loading…".to_string(), Color::DarkGray))),
        CardView::Failed(msg) => (title.to_string(), Err((format!("error: {msg}"), Color::Red))),
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);
    match body {
        Ok(s) => Some((s, inner)),
        Err((text, color)) => {
            f.render_widget(Paragraph::new(text).style(Style::default().fg(color)), inner);
            None
        }
    }
}
