//! CPU usage chart + per-core mini bars.

use ratatui::style::Modifier;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Sparkline},
};

use crate::cards::cpu::{core_key, CpuCard, OVERALL};
use crate::cards::fmt_pct;
use crate::ui::card_frame;
use crate::ui::chart::draw_series_chart;
use crate::ui::theme::load_color;
use crate::ui::util::inset;

pub fn draw_cpu_chart(f: &mut ratatui::Frame<'_>, area: Rect, card: &CpuCard) {
    let title = match card.poller.snapshot() {
        Some(s) => format!(
            "CPU (now: {} | idle: {})",
            fmt_pct(s.overall_usage_percent),
            fmt_pct(s.overall_idle_percent)
        ),
        None => "CPU".into(),
    };
    let Some((snap, inner)) = card_frame(f, area, &title, card.poller.view()) else {
        return;
    };

    let mut legend = vec![(OVERALL.to_string(), "o".to_string(), "overall".to_string())];
    legend.extend(
        snap.cores
            .iter()
            .filter(|c| c.id < 10)
            .map(|c| (core_key(c.id), c.id.to_string(), c.label())),
    );
    draw_series_chart(f, inner, &card.chart, 100.0, &legend);
}

pub fn draw_per_core_bars(f: &mut ratatui::Frame<'_>, area: Rect, card: &CpuCard) {
    let Some(snap) = card.poller.snapshot() else {
        f.render_widget(Block::default().borders(Borders::ALL).title("Per-core"), area);
        return;
    };
    let cores = if snap.number_of_cores > 0 {
        snap.number_of_cores
    } else {
        snap.cores.len() as u64
    };
    f.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Per-core ({cores})")),
        area,
    );

    let inner = inset(area);
    if inner.height == 0 {
        return;
    }

    let show_n = (inner.height as usize).min(snap.cores.len());
    let constraints: Vec<Constraint> = (0..show_n).map(|_| Constraint::Length(1)).collect();
    let vchunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (core, rect) in snap.cores.iter().zip(vchunks.iter()) {
        let hchunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(6), Constraint::Length(14)])
            .split(*rect);

        let key = core_key(core.id);
        let curr = core.usage_percent.clamp(0.0, 100.0);
        // compare against a sample a few polls back
        let older = card
            .chart
            .history
            .iter()
            .rev()
            .nth(5)
            .map(|p| p.get(&key))
            .unwrap_or(curr);
        let trend = if curr > older + 0.2 {
            "↑"
        } else if curr + 0.2 < older {
            "↓"
        } else {
            "╌"
        };

        let fg = load_color(curr);
        let hist = card
            .chart
            .history
            .sparkline(&key, hchunks[0].width as usize);
        let spark = Sparkline::default()
            .data(&hist)
            .max(100)
            .style(Style::default().fg(fg));
        f.render_widget(spark, hchunks[0]);

        let label = format!("{:<6}{}{:>6.1}%", core.label(), trend, curr);
        let style = if card.chart.visibility.is_visible(&key) {
            Style::default().fg(fg).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(fg).add_modifier(Modifier::DIM)
        };
        let line = Line::from(Span::styled(label, style));
        f.render_widget(Paragraph::new(line).right_aligned(), hchunks[1]);
    }
}
