//! Terminal rendering.
//!
//! - [`common`]: header bar, status bar, help overlay
//! - [`grid`]: the node grid with per-phase gauges
//! - [`chart`]: line charts for expanded nodes
//! - [`theme`]: light/dark styling with terminal auto-detection

pub mod chart;
pub mod common;
pub mod grid;
pub mod theme;

pub use theme::Theme;
