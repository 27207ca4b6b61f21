//! Common UI components: header bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::{AlertLevel, AlertStatus};

/// Render the header bar with the fleet-wide alert overview.
///
/// Displays: worst-alert indicator, node counts per level, the day being
/// shown, and the sample count behind it.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    if app.frame.nodes.is_empty() {
        let line = Line::from(vec![
            Span::styled(
                " PHASEWATCH ",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("| Loading..."),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let mut normal = 0;
    let mut high = 0;
    let mut over = 0;
    let mut no_data = 0;

    for node in &app.frame.nodes {
        match node.alert {
            AlertStatus::Reading(AlertLevel::Normal) => normal += 1,
            AlertStatus::Reading(AlertLevel::High) => high += 1,
            AlertStatus::Reading(AlertLevel::Over) => over += 1,
            AlertStatus::NoData => no_data += 1,
        }
    }

    let worst = if over > 0 {
        AlertStatus::Reading(AlertLevel::Over)
    } else if high > 0 {
        AlertStatus::Reading(AlertLevel::High)
    } else if normal > 0 {
        AlertStatus::Reading(AlertLevel::Normal)
    } else {
        AlertStatus::NoData
    };

    let day = match app.frame.day {
        Some(day) => day.format("%Y-%m-%d").to_string(),
        None => "no data".to_string(),
    };

    let line = Line::from(vec![
        Span::styled(" ● ", app.theme.alert_style(worst)),
        Span::styled("PHASEWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(format!("{}", normal), Style::default().fg(app.theme.normal)),
        Span::raw(" ok "),
        if high > 0 {
            Span::styled(format!("{}", high), Style::default().fg(app.theme.high))
        } else {
            Span::styled("0", Style::default().add_modifier(Modifier::DIM))
        },
        Span::raw(" high "),
        if over > 0 {
            Span::styled(
                format!("{}", over),
                Style::default().fg(app.theme.over).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled("0", Style::default().add_modifier(Modifier::DIM))
        },
        Span::raw(" over "),
        if no_data > 0 {
            Span::styled(
                format!("{} no-data ", no_data),
                Style::default().add_modifier(Modifier::DIM),
            )
        } else {
            Span::raw("")
        },
        Span::raw("│ "),
        Span::styled(day, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!(" │ {} samples", app.frame.sample_count)),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the status bar: input prompt, status message, error, or keys.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    // An open numeric prompt owns the bar
    if let Some(prompt) = &app.input {
        let target = prompt
            .target
            .map(|id| format!(" for {}", id.label()))
            .unwrap_or_default();
        let paragraph = Paragraph::new(format!(
            " Enter {}{}: {}_ (Enter:apply Esc:cancel)",
            prompt.field.label(),
            target,
            prompt.buffer
        ))
        .style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    // Then temporary status messages
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let status = if let Some(ref err) = app.load_error {
        format!(" Error: {} | q:quit r:retry", err)
    } else if app.frame.nodes.is_empty() {
        " Loading... | q:quit".to_string()
    } else {
        let elapsed = app.frame.last_updated.elapsed();
        format!(
            " {} | Updated {:.1}s ago | ↑↓:select ←→:day Enter:chart Space:show/hide ?:help q:quit",
            app.source_description(),
            elapsed.as_secs_f64(),
        )
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the grid.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Navigation",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  ↑/↓ j/k     Move between nodes"),
        Line::from("  PgUp/PgDn   Jump 10 nodes"),
        Line::from("  Home/End    Jump to first/last"),
        Line::from("  ←/→ [ ]     Step displayed day"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Nodes",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  Enter g   Toggle chart"),
        Line::from("  Space     Show/hide node"),
        Line::from("  d         Remove node until next refresh"),
        Line::from("  +/-       Grow/shrink node count"),
        Line::from("  n         Set node count"),
        Line::from("  h         Set high threshold"),
        Line::from("  o         Set over threshold"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  r         Reload data"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 44u16.min(area.width.saturating_sub(4));
    let help_height = 28u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
