//! Time-series chart for an expanded node.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::NodeView;

/// Render the phase line chart for one expanded node.
///
/// X is seconds within the displayed day, labeled HH:MM; Y is the configured
/// temperature domain.
pub fn render(frame: &mut Frame, app: &App, node: &NodeView, area: Rect) {
    let Some(series) = &node.series else {
        return;
    };

    if series.is_empty() {
        let paragraph = Paragraph::new(" No chart data for this day")
            .style(Style::default().add_modifier(Modifier::DIM));
        frame.render_widget(paragraph, area);
        return;
    }

    // One point vector per phase; absent readings leave gaps.
    let mut points: [Vec<(f64, f64)>; 3] = [Vec::new(), Vec::new(), Vec::new()];
    for point in series {
        let x = seconds_of_day(point.timestamp);
        for (phase, value) in point.phases.iter().enumerate() {
            if let Some(value) = value {
                points[phase].push((x, *value));
            }
        }
    }

    let x_min = seconds_of_day(series[0].timestamp);
    let x_max = seconds_of_day(series[series.len() - 1].timestamp);
    let (x_min, x_max) = if x_max > x_min {
        (x_min, x_max)
    } else {
        (x_min, x_min + 1.0)
    };

    let names = ["A", "B", "C"];
    let datasets: Vec<Dataset> = points
        .iter()
        .enumerate()
        .filter(|(_, p)| !p.is_empty())
        .map(|(phase, p)| {
            Dataset::default()
                .name(names[phase])
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(app.theme.phase_colors[phase]))
                .data(p)
        })
        .collect();

    let x_labels = vec![
        Span::raw(format_clock(x_min)),
        Span::raw(format_clock((x_min + x_max) / 2.0)),
        Span::raw(format_clock(x_max)),
    ];
    let y_labels = vec![
        Span::raw(format!("{:.0}", app.config.chart_min)),
        Span::raw(format!(
            "{:.0}",
            (app.config.chart_min + app.config.chart_max) / 2.0
        )),
        Span::raw(format!("{:.0}", app.config.chart_max)),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::LEFT)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .x_axis(
            Axis::default()
                .bounds([x_min, x_max])
                .labels(x_labels)
                .style(Style::default().add_modifier(Modifier::DIM)),
        )
        .y_axis(
            Axis::default()
                .bounds([app.config.chart_min, app.config.chart_max])
                .labels(y_labels)
                .style(Style::default().add_modifier(Modifier::DIM)),
        );

    frame.render_widget(chart, area);
}

fn seconds_of_day(timestamp: chrono::NaiveDateTime) -> f64 {
    use chrono::Timelike;
    timestamp.time().num_seconds_from_midnight() as f64
}

fn format_clock(seconds: f64) -> String {
    let seconds = seconds.max(0.0) as u32;
    format!("{:02}:{:02}", seconds / 3600, (seconds % 3600) / 60)
}
