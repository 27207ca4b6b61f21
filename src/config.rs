//! Dashboard configuration.
//!
//! Settings layer in the usual order: built-in defaults, then an optional
//! TOML file, then `PHASEWATCH_*` environment variables, then CLI flags
//! (applied by the binary on top of the loaded config).

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::ingest::DateOrder;
use crate::data::registry::NodeRegistry;
use crate::data::thresholds::{DEFAULT_HIGH, DEFAULT_OVER};

/// Display budget for one day's chart window.
pub const DEFAULT_DOWNSAMPLE_TARGET: usize = 4500;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Column names accepted as the timestamp column, tried in order.
    pub timestamp_candidates: Vec<String>,
    /// Day-first or month-first parsing for ambiguous dates.
    pub date_order: DateOrder,
    /// Raw phase values are divided by this (feed ships decidegrees).
    pub scale_divisor: f64,
    /// Maximum records per day window handed to the renderer.
    pub downsample_target: usize,
    /// Initial desired node count.
    pub node_count: u16,
    /// Default "high" threshold for new nodes (°C).
    pub high: f64,
    /// Default "over" threshold for new nodes (°C).
    pub over: f64,
    /// Full scale of the phase gauges (°C).
    pub bar_full_scale: f64,
    /// Chart Y-axis domain (°C).
    pub chart_min: f64,
    pub chart_max: f64,
    /// Refresh interval in milliseconds.
    pub refresh_ms: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            timestamp_candidates: vec!["Time".to_string(), "time".to_string()],
            date_order: DateOrder::default(),
            scale_divisor: 10.0,
            downsample_target: DEFAULT_DOWNSAMPLE_TARGET,
            node_count: 2,
            high: DEFAULT_HIGH,
            over: DEFAULT_OVER,
            bar_full_scale: 125.0,
            chart_min: 20.0,
            chart_max: 90.0,
            refresh_ms: 1000,
        }
    }
}

impl DashboardConfig {
    /// Load configuration from an optional TOML file plus environment
    /// overrides (`PHASEWATCH_NODE_COUNT=10` etc.).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }
        let settings = builder
            .add_source(config::Environment::with_prefix("PHASEWATCH"))
            .build()
            .context("failed to load configuration")?;

        let mut cfg: DashboardConfig = settings
            .try_deserialize()
            .context("invalid configuration")?;
        cfg.sanitize();
        Ok(cfg)
    }

    /// Clamp values the core relies on into their supported ranges.
    pub fn sanitize(&mut self) {
        self.node_count = NodeRegistry::clamp_count(self.node_count);
        self.downsample_target = self.downsample_target.max(1);
        if self.scale_divisor == 0.0 {
            self.scale_divisor = 1.0;
        }
        self.refresh_ms = self.refresh_ms.max(100);
    }
}
