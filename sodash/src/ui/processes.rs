//! Process table with per-cell coloring, sorting, search, paging and a scrollbar,
//! plus the detail pane for the selected process.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::style::Modifier;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
};

use crate::cards::ProcessCard;
use crate::table::ProcSortKey;
use crate::types::ProcessRecord;
use crate::ui::card_frame;
use crate::ui::theme::{load_color, HEADER_FG, SB_ARROW, SB_THUMB, SB_TRACK, SELECTED_BG};
use crate::ui::util::{human, truncate_middle};

// Keep the header widths here so drawing and hit-testing match.
const COLS: [(ProcSortKey, &str, Constraint); 7] = [
    (ProcSortKey::Pid, "PID", Constraint::Length(8)),
    (ProcSortKey::Name, "Name", Constraint::Percentage(30)),
    (ProcSortKey::User, "User", Constraint::Length(10)),
    (ProcSortKey::Status, "Status", Constraint::Length(10)),
    (ProcSortKey::Cpu, "CPU %", Constraint::Length(8)),
    (ProcSortKey::Memory, "Mem MB", Constraint::Length(9)),
    (ProcSortKey::Threads, "Thr", Constraint::Length(6)),
];

/// Table body area inside the card: below the title border, above the two
/// footer lines, minus the scrollbar column.
fn content_area(area: Rect) -> Rect {
    Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(4),
        height: area.height.saturating_sub(4),
    }
}

fn row_for(p: &ProcessRecord, selected: bool, peak_cpu: f64) -> Row<'static> {
    let cpu_fg = load_color(p.cpu_percent);
    let style = if selected {
        Style::default().bg(SELECTED_BG).add_modifier(Modifier::BOLD)
    } else if p.cpu_percent > 0.0 && (p.cpu_percent - peak_cpu).abs() < f64::EPSILON {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Row::new(vec![
        Cell::from(p.pid.to_string()).style(Style::default().fg(Color::DarkGray)),
        Cell::from(p.name.clone()),
        Cell::from(p.user_name.clone()),
        Cell::from(p.status.clone()),
        Cell::from(format!("{:>5.1}", p.cpu_percent)).style(Style::default().fg(cpu_fg)),
        Cell::from(format!("{:>7.1}", p.memory_rss_mb)),
        Cell::from(p.threads.to_string()),
    ])
    .style(style)
}

pub fn draw_processes(f: &mut ratatui::Frame<'_>, area: Rect, card: &ProcessCard) {
    let filtered = card.filtered_sorted();
    let total = card.records().len();
    let title = if card.table.search_term().is_empty() {
        format!("Processes ({total} total)")
    } else {
        format!("Processes ({} of {total} match)", filtered.len())
    };
    let Some((_, inner)) = card_frame(f, area, &title, card.poller.view()) else {
        return;
    };
    if inner.height < 3 || inner.width < 3 {
        return;
    }
    let content = content_area(area);

    let shown = card.table.displayed(&filtered);
    let (key, dir) = card.table.sort();

    // Scroll so that the selection stays in view
    let viewport_rows = content.height.saturating_sub(1).max(1) as usize;
    let selected_ix = card.selected_index();
    let offset = selected_ix
        .map(|i| i.saturating_sub(viewport_rows - 1))
        .unwrap_or(0);

    let peak_cpu = shown.iter().map(|p| p.cpu_percent).fold(0.0_f64, f64::max);
    let rows = shown
        .iter()
        .enumerate()
        .skip(offset)
        .take(viewport_rows)
        .map(|(i, p)| row_for(p, Some(i) == selected_ix, peak_cpu));

    let header = Row::new(COLS.iter().map(|(k, label, _)| {
        if *k == key {
            format!("{label} {}", dir.indicator())
        } else {
            label.to_string()
        }
    }))
    .style(Style::default().fg(HEADER_FG).add_modifier(Modifier::BOLD));

    let widths: Vec<Constraint> = COLS.iter().map(|(_, _, c)| *c).collect();
    let table = Table::new(rows, widths).header(header).column_spacing(1);
    f.render_widget(table, content);

    draw_scrollbar(
        f,
        Rect {
            x: inner.x + inner.width.saturating_sub(1),
            y: content.y,
            width: 1,
            height: content.height,
        },
        shown.len(),
        viewport_rows,
        offset,
    );

    // Footer: paging, then search
    let paging = if card.table.show_all() {
        format!("showing all {} · a: page", filtered.len())
    } else if card.table.can_load_more(filtered.len()) {
        let next = card
            .table
            .remaining(filtered.len())
            .min(card.table.page_increment());
        format!(
            "showing {} of {} · l: load {next} more · a: show all",
            shown.len(),
            filtered.len()
        )
    } else {
        format!("showing {} of {}", shown.len(), filtered.len())
    };
    let search = if card.table.search_term().is_empty() {
        Line::from(Span::styled(
            "/ search · Enter: details",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(vec![
            Span::styled("search: ", Style::default().fg(Color::DarkGray)),
            Span::styled(card.table.search_term().to_string(), Style::default().fg(Color::Yellow)),
        ])
    };
    let footer = Rect {
        x: inner.x,
        y: content.y + content.height,
        width: inner.width,
        height: 2.min(inner.height.saturating_sub(content.height)),
    };
    f.render_widget(Paragraph::new(vec![Line::from(paging), search]), footer);
}

fn draw_scrollbar(
    f: &mut ratatui::Frame<'_>,
    scroll_area: Rect,
    total_rows: usize,
    viewport_rows: usize,
    offset: usize,
) {
    if scroll_area.height < 3 {
        return;
    }
    let track = (scroll_area.height - 2) as usize;
    let total = total_rows.max(1);
    let view = viewport_rows.clamp(1, total);
    let max_off = total.saturating_sub(view);

    let thumb_len = (track * view).div_ceil(total).max(1).min(track);
    let thumb_top = if max_off == 0 {
        0
    } else {
        ((track - thumb_len) * offset.min(max_off) + max_off / 2) / max_off
    };

    let mut lines: Vec<Line> = Vec::with_capacity(scroll_area.height as usize);
    lines.push(Line::from(Span::styled("▲", Style::default().fg(SB_ARROW))));
    for i in 0..track {
        if i >= thumb_top && i < thumb_top + thumb_len {
            lines.push(Line::from(Span::styled("█", Style::default().fg(SB_THUMB))));
        } else {
            lines.push(Line::from(Span::styled("│", Style::default().fg(SB_TRACK))));
        }
    }
    lines.push(Line::from(Span::styled("▼", Style::default().fg(SB_ARROW))));
    f.render_widget(Paragraph::new(lines), scroll_area);
}

/// Returns the column whose header was left-clicked, if any.
pub fn processes_handle_mouse(mouse: MouseEvent, area: Rect) -> Option<ProcSortKey> {
    if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
        return None;
    }
    let content = content_area(area);
    if content.height == 0 || content.width == 0 {
        return None;
    }
    let header_area = Rect {
        height: 1,
        ..content
    };
    let inside_header = mouse.row == header_area.y
        && mouse.column >= header_area.x
        && mouse.column < header_area.x + header_area.width;
    if !inside_header {
        return None;
    }

    // Split header into the same columns
    let widths: Vec<Constraint> = COLS.iter().map(|(_, _, c)| *c).collect();
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .spacing(1)
        .split(header_area);
    COLS.iter()
        .zip(cols.iter())
        .find(|(_, r)| mouse.column >= r.x && mouse.column < r.x + r.width)
        .map(|((k, _, _), _)| *k)
}

pub fn draw_process_detail(f: &mut ratatui::Frame<'_>, area: Rect, card: &ProcessCard) {
    let Some(detail) = card.detail.as_ref() else {
        return;
    };
    let Some(p) = card.selected_record() else {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("PID {} (x to close)", detail.pid));
        f.render_widget(
            Paragraph::new("process is no longer listed").block(block),
            area,
        );
        return;
    };

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let dim = Style::default().fg(Color::DarkGray);
    let kv = |k: &str, v: String| {
        Line::from(vec![Span::styled(format!("{k:<10}"), dim), Span::raw(v)])
    };
    let width = halves[0].width.saturating_sub(12) as usize;
    let mut lines = vec![
        kv("name", p.name.clone()),
        kv("user", p.user_name.clone()),
        kv("status", p.status.clone()),
        kv("ppid", p.ppid.to_string()),
        kv("nice/prio", format!("{} / {}", p.nice, p.priority)),
        kv("started", p.create_time_iso.clone().unwrap_or_else(|| "N/A".into())),
        kv(
            "exe",
            truncate_middle(p.executable_path.as_deref().unwrap_or("N/A"), width),
        ),
        kv(
            "cmdline",
            truncate_middle(p.command_line.as_deref().unwrap_or("N/A"), width),
        ),
    ];
    for (k, v) in &p.memory_details_kb {
        lines.push(kv(k.as_str(), human((v * 1024.0) as u64)));
    }
    if !p.threads_detailed_info.is_empty() {
        let busiest = p
            .threads_detailed_info
            .iter()
            .map(|t| {
                let name = t.name.clone().unwrap_or_else(|| t.tid.to_string());
                format!("{name}:{:.1}%", t.cpu_usage)
            })
            .take(4)
            .collect::<Vec<_>>()
            .join(" ");
        lines.push(kv("threads", busiest));
    }
    let left = Block::default()
        .borders(Borders::ALL)
        .title(format!("PID {} (x to close)", p.pid));
    f.render_widget(
        Paragraph::new(lines).block(left).wrap(Wrap { trim: true }),
        halves[0],
    );

    let Some((io, inner)) = card_frame(f, halves[1], "I/O", detail.io.view()) else {
        return;
    };
    let s = &io.io_stats;
    let mut lines = vec![
        kv("read", format!("{} ({} calls)", human(s.read_bytes), s.syscr)),
        kv("written", format!("{} ({} calls)", human(s.write_bytes), s.syscw)),
        kv("rchar", human(s.rchar)),
        kv("wchar", human(s.wchar)),
        kv("cancelled", human(s.cancelled_write_bytes)),
        kv("open", format!("{} files", io.open_files.len())),
    ];
    let room = inner.height.saturating_sub(lines.len() as u16) as usize;
    let path_w = inner.width.saturating_sub(6) as usize;
    lines.extend(io.open_files.iter().take(room).map(|of| {
        let fd = of.fd().map(|n| n.to_string()).unwrap_or_else(|| "-".into());
        Line::from(vec![
            Span::styled(format!("{fd:>4} "), dim),
            Span::raw(truncate_middle(of.path(), path_w)),
        ])
    }));
    f.render_widget(Paragraph::new(lines), inner);
}
