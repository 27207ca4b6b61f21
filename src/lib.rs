// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # phasewatch
//!
//! A diagnostic TUI and library for monitoring per-node phase temperatures
//! from a polled CSV feed.
//!
//! A Modbus logger (or any exporter) writes rows with a timestamp column and
//! phase columns named `Node{i}A`/`Node{i}B`/`Node{i}C`. phasewatch polls
//! those rows on a timer, maintains a dynamic set of monitored nodes,
//! evaluates each node's latest readings against per-node thresholds, and
//! renders status gauges plus optional time-series charts.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (state) │    │ (engine) │    │(render) │    │         │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘ │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ┌─────────┐                                                │
//! │  │ source  │◀── CsvFileSource | HttpSource | ChannelSource │
//! │  │ (input) │                                                │
//! │  └─────────┘                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: per-tick orchestration, operator-event queue, navigation
//! - **[`source`]**: row source abstraction ([`RowSource`] trait) with file
//!   polling, HTTP fetching, and channel-based input
//! - **[`data`]**: the node/session state engine - ingestion, downsampling,
//!   node registry reconciliation, thresholds, view state, alert evaluation
//! - **[`ui`]**: terminal rendering using ratatui - node grid, phase gauges,
//!   charts, and theme support
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Monitor a CSV file written by a logger
//! phasewatch --file phasewatch.csv
//!
//! # Poll a spreadsheet CSV export
//! phasewatch --url "https://example.com/feed?out=csv"
//! ```
//!
//! ### As a library with a file source
//!
//! ```
//! use phasewatch::{App, CsvFileSource, DashboardConfig};
//!
//! let source = Box::new(CsvFileSource::new("phasewatch.csv"));
//! let app = App::new(source, DashboardConfig::default());
//! ```
//!
//! ### As a library with a channel source (for embedding)
//!
//! ```
//! use phasewatch::{App, ChannelSource, DashboardConfig};
//!
//! // Create a channel for pushing row batches
//! let (tx, source) = ChannelSource::create("collector");
//! let app = App::new(Box::new(source), DashboardConfig::default());
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use config::DashboardConfig;
pub use data::{
    build_frame, AlertLevel, AlertStatus, DashboardFrame, DashboardState, DateOrder, Ingester,
    NodeId, NodeRegistry, OperatorEvent, Record, ThresholdKind, ThresholdPair,
};
pub use error::Error;
pub use source::{ChannelSource, CsvFileSource, RawRow, RawRows, RowSource};
#[cfg(feature = "remote")]
pub use source::HttpSource;
