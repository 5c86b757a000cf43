//! Top header with the backend URL and one status glyph per card.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::cards::Dashboard;
use crate::ui::theme::status_glyph;

pub fn draw_header(f: &mut ratatui::Frame<'_>, area: Rect, dash: &Dashboard, searching: bool) {
    let mut spans = vec![
        Span::styled("sodash", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!(" — {} |", dash.client.base())),
    ];
    for (name, status) in dash.statuses() {
        let (glyph, color) = status_glyph(status);
        spans.push(Span::raw(format!(" {name} ")));
        spans.push(Span::styled(glyph, Style::default().fg(color)));
    }
    let hint = if searching {
        "  (typing search: Enter/Esc to finish)"
    } else {
        "  (press 'q' to quit)"
    };
    spans.push(Span::raw(hint));
    f.render_widget(
        Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::NONE)),
        area,
    );
}
