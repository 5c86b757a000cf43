//! Partition cards with per-mount gauge and title line.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, Gauge},
};

use crate::cards::filesystem::{used_ratio, FilesystemCard};
use crate::cards::memory::fmt_gb;
use crate::ui::card_frame;
use crate::ui::theme::fill_color;
use crate::ui::util::{inset, truncate_middle};

pub fn draw_filesystem(f: &mut ratatui::Frame<'_>, area: Rect, card: &FilesystemCard) {
    let Some((_, inner)) = card_frame(f, area, "Filesystem", card.poller.view()) else {
        return;
    };
    if inner.height < 3 {
        return;
    }
    let parts = card.partitions();

    let per_part_h = 3u16;
    let max_cards = (inner.height / per_part_h).min(parts.len() as u16) as usize;
    let constraints: Vec<Constraint> = (0..max_cards)
        .map(|_| Constraint::Length(per_part_h))
        .collect();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (p, slot) in parts.iter().zip(rows.iter()) {
        let ratio = used_ratio(p);
        let pct = ratio * 100.0;
        let name_w = (slot.width.saturating_sub(6)) as usize / 2;
        let title = format!(
            "{} {} [{}]  {} / {}  ({pct:.0}%)",
            truncate_middle(&p.mountpoint, name_w),
            truncate_middle(&p.device, name_w / 2),
            p.fs_type,
            fmt_gb(p.used_gb),
            fmt_gb(p.total_gb),
        );
        f.render_widget(Block::default().borders(Borders::ALL).title(title), *slot);

        let inner_card = inset(*slot);
        if inner_card.height == 0 {
            continue;
        }
        let gauge_rect = Rect {
            x: inner_card.x,
            y: inner_card.y + inner_card.height / 2,
            width: inner_card.width,
            height: 1,
        };
        let g = Gauge::default()
            .ratio(ratio)
            .label(format!("free {}", fmt_gb(p.free_gb)))
            .gauge_style(Style::default().fg(fill_color(pct)));
        f.render_widget(g, gauge_rect);
    }
}
