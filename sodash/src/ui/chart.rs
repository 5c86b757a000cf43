//! Line chart of the visible series of a [`SeriesChart`], with a key legend.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph},
};

use crate::cards::SeriesChart;
use crate::ui::theme::series_color;

/// `legend` pairs each series key with the hotkey that toggles it and a label.
pub fn draw_series_chart(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    chart: &SeriesChart,
    y_max: f64,
    legend: &[(String, String, String)],
) {
    if area.height < 2 {
        return;
    }
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    // Colors follow first-seen order so hiding a series keeps the others' colors
    let points: Vec<(usize, &str, Vec<(f64, f64)>)> = chart
        .series()
        .iter()
        .enumerate()
        .filter(|(_, k)| chart.visibility.is_visible(k))
        .map(|(i, k)| (i, k.as_str(), chart.history.chart_points(k)))
        .collect();

    let datasets: Vec<Dataset> = points
        .iter()
        .map(|(i, key, data)| {
            Dataset::default()
                .name(key.to_string())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(series_color(*i)))
                .data(data)
        })
        .collect();

    let x_max = chart.history.capacity().saturating_sub(1).max(1) as f64;
    let y_max = if y_max > 0.0 { y_max } else { 1.0 };
    let widget = Chart::new(datasets)
        .x_axis(Axis::default().bounds([0.0, x_max]))
        .y_axis(
            Axis::default()
                .bounds([0.0, y_max])
                .labels(vec![Span::raw("0"), Span::raw(format!("{y_max:.0}"))]),
        );
    f.render_widget(widget, parts[0]);

    let mut spans = Vec::new();
    for (key, hotkey, label) in legend {
        let Some(i) = chart.series().iter().position(|k| k == key) else {
            continue;
        };
        let style = if chart.visibility.is_visible(key) {
            Style::default().fg(series_color(i))
        } else {
            Style::default().add_modifier(Modifier::DIM | Modifier::CROSSED_OUT)
        };
        spans.push(Span::styled(format!("[{hotkey}] {label} "), style));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), parts[1]);
}
