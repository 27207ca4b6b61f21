//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::{AlertLevel, AlertStatus};

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for the HIGH alert level.
    pub high: Color,
    /// Color for the OVER alert level.
    pub over: Color,
    /// Color for normal readings.
    pub normal: Color,
    /// Color for nodes without data.
    pub no_data: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for header text.
    pub header: Style,
    /// Style for the cursor row.
    pub selected: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
    /// Colors for the three phase chart lines, A/B/C.
    pub phase_colors: [Color; 3],
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            high: Color::Yellow,
            over: Color::Red,
            normal: Color::Green,
            no_data: Color::DarkGray,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
            phase_colors: [Color::Cyan, Color::Magenta, Color::Yellow],
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            high: Color::Yellow,
            over: Color::Red,
            normal: Color::Green,
            no_data: Color::Gray,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
            phase_colors: [Color::Blue, Color::Magenta, Color::DarkGray],
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        // Use terminal-light crate to detect background luminance
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Get style for an alert status
    pub fn alert_style(&self, status: AlertStatus) -> Style {
        match status {
            AlertStatus::NoData => Style::default().fg(self.no_data).add_modifier(Modifier::DIM),
            AlertStatus::Reading(AlertLevel::Normal) => Style::default().fg(self.normal),
            AlertStatus::Reading(AlertLevel::High) => Style::default().fg(self.high),
            AlertStatus::Reading(AlertLevel::Over) => {
                Style::default().fg(self.over).add_modifier(Modifier::BOLD)
            }
        }
    }
}
