//! The node grid: one block per node with per-phase gauges.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::{AlertLevel, AlertStatus, NodeView};

use super::chart;

/// Height of a visible node block (borders plus two inner lines).
const NODE_HEIGHT: u16 = 4;
/// Height of an expanded node's chart.
const CHART_HEIGHT: u16 = 12;
/// Height of a hidden node's placeholder line.
const HIDDEN_HEIGHT: u16 = 1;

fn node_height(node: &NodeView) -> u16 {
    if !node.selected {
        HIDDEN_HEIGHT
    } else if node.expanded {
        NODE_HEIGHT + CHART_HEIGHT
    } else {
        NODE_HEIGHT
    }
}

/// Render the node grid, keeping the cursor node in view.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    if app.frame.nodes.is_empty() {
        let paragraph = Paragraph::new("No nodes. Waiting for data...")
            .style(Style::default().add_modifier(Modifier::DIM));
        frame.render_widget(paragraph, area);
        return;
    }

    adjust_scroll(app, area.height);

    let mut y = area.y;
    for (index, node) in app.frame.nodes.iter().enumerate().skip(app.scroll) {
        let height = node_height(node);
        if y + HIDDEN_HEIGHT > area.y + area.height {
            break;
        }
        let height = height.min(area.y + area.height - y);
        let node_area = Rect::new(area.x, y, area.width, height);
        render_node(frame, app, node, index == app.cursor, node_area);
        y += height;
    }
}

/// Keep the cursor node's block inside the viewport.
fn adjust_scroll(app: &mut App, viewport_height: u16) {
    if app.cursor < app.scroll {
        app.scroll = app.cursor;
        return;
    }

    // Walk forward until the cursor block fits, dropping rows from the top.
    loop {
        let used: u16 = app.frame.nodes[app.scroll..=app.cursor]
            .iter()
            .map(node_height)
            .sum();
        if used <= viewport_height || app.scroll == app.cursor {
            break;
        }
        app.scroll += 1;
    }
}

fn render_node(frame: &mut Frame, app: &App, node: &NodeView, is_cursor: bool, area: Rect) {
    if !node.selected {
        let style = if is_cursor {
            app.theme.selected
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        let line = Line::from(vec![
            Span::styled(format!(" {} ", node.label), style),
            Span::styled("(hidden)", Style::default().add_modifier(Modifier::DIM)),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let border_style = if is_cursor {
        Style::default().fg(app.theme.highlight)
    } else {
        Style::default().fg(app.theme.border)
    };

    let title = Line::from(vec![
        Span::styled(
            format!(" {} ", node.label),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {} ", node.alert.badge()),
            app.theme.alert_style(node.alert),
        ),
    ]);

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 {
        return;
    }

    let rows = Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).split(inner);

    // Row 0: the three phase gauges side by side.
    let columns = Layout::horizontal([
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
    ])
    .split(rows[0]);

    for (i, phase) in node.phases.iter().enumerate() {
        render_phase_gauge(frame, app, node, (b'A' + i as u8) as char, *phase, columns[i]);
    }

    // Row 1: thresholds.
    if rows.len() > 1 && rows[1].height > 0 {
        let thresholds = Paragraph::new(format!(
            " high {:.0}°C / over {:.0}°C",
            node.thresholds.high, node.thresholds.over
        ))
        .style(Style::default().add_modifier(Modifier::DIM));
        frame.render_widget(thresholds, rows[1]);
    }

    // Expanded nodes get their chart below the gauges.
    if node.expanded && area.height > NODE_HEIGHT {
        let chart_area = Rect::new(
            area.x,
            area.y + NODE_HEIGHT,
            area.width,
            area.height - NODE_HEIGHT,
        );
        chart::render(frame, app, node, chart_area);
    }
}

fn render_phase_gauge(
    frame: &mut Frame,
    app: &App,
    node: &NodeView,
    phase: char,
    value: Option<f64>,
    area: Rect,
) {
    match value {
        Some(value) => {
            let ratio = (value / app.config.bar_full_scale).clamp(0.0, 1.0);
            let level = if value >= node.thresholds.over {
                AlertLevel::Over
            } else if value >= node.thresholds.high {
                AlertLevel::High
            } else {
                AlertLevel::Normal
            };
            let gauge = Gauge::default()
                .ratio(ratio)
                .label(format!("{} {:.1}°C", phase, value))
                .gauge_style(app.theme.alert_style(AlertStatus::Reading(level)));
            frame.render_widget(gauge, area);
        }
        None => {
            let paragraph = Paragraph::new(format!("{} --", phase))
                .style(Style::default().add_modifier(Modifier::DIM));
            frame.render_widget(paragraph, area);
        }
    }
}
