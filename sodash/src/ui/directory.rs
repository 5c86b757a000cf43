//! Directory listing with a cursor and sortable columns.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Cell, Row, Table},
};

use crate::cards::directory::{DirSortKey, DirectoryCard};
use crate::ui::card_frame;
use crate::ui::theme::{HEADER_FG, SELECTED_BG};
use crate::ui::util::{human, truncate_middle};

const COLS: [(DirSortKey, &str, Constraint); 4] = [
    (DirSortKey::Name, "Name", Constraint::Min(12)),
    (DirSortKey::Size, "Size", Constraint::Length(9)),
    (DirSortKey::Permissions, "Perms", Constraint::Length(11)),
    (DirSortKey::Type, "Type", Constraint::Length(5)),
];

pub fn draw_directory(f: &mut ratatui::Frame<'_>, area: Rect, card: &DirectoryCard) {
    let title = format!(
        "Directory: {}",
        truncate_middle(card.path(), area.width.saturating_sub(14) as usize)
    );
    let Some((_, inner)) = card_frame(f, area, &title, card.poller.view()) else {
        return;
    };
    let rows = card.sorted();
    let (key, dir) = card.sort();

    // keep the cursor on screen
    let viewport = inner.height.saturating_sub(1).max(1) as usize;
    let offset = card.cursor().saturating_sub(viewport - 1);

    let body = rows
        .iter()
        .enumerate()
        .skip(offset)
        .take(viewport)
        .map(|(i, e)| {
            let name = if e.is_dir {
                format!("{}/", e.name)
            } else {
                e.name.clone()
            };
            let size = e.size_human.clone().unwrap_or_else(|| human(e.size));
            let style = match (i == card.cursor(), e.is_dir) {
                (true, _) => Style::default().bg(SELECTED_BG).add_modifier(Modifier::BOLD),
                (false, true) => Style::default().fg(Color::Blue),
                (false, false) => Style::default(),
            };
            Row::new(vec![
                Cell::from(name),
                Cell::from(size),
                Cell::from(e.permissions.clone().unwrap_or_else(|| "-".into())),
                Cell::from(if e.is_dir { "dir" } else { "file" }),
            ])
            .style(style)
        });

    let header = Row::new(COLS.iter().map(|(k, label, _)| {
        if *k == key {
            format!("{label} {}", dir.indicator())
        } else {
            label.to_string()
        }
    }))
    .style(Style::default().fg(HEADER_FG).add_modifier(Modifier::BOLD));

    let widths: Vec<Constraint> = COLS.iter().map(|(_, _, c)| *c).collect();
    let table = Table::new(body, widths).header(header).column_spacing(1);
    f.render_widget(table, inner);
}
