//! The node/session state engine.
//!
//! ## Submodules
//!
//! - [`ingest`]: raw rows into timestamped [`Record`]s (tolerant per row)
//! - [`downsample`]: fixed-stride thinning to a chart display budget
//! - [`registry`]: node membership driven by the desired count
//! - [`thresholds`]: per-node alert bounds, synced to the registry
//! - [`view_state`]: per-node selection/expansion flags, synced likewise
//! - [`alert`]: severity from the latest readings vs. thresholds
//! - [`session`]: the persisted state aggregate, operator-event reducer,
//!   and the pure per-cycle frame recompute
//!
//! ## Cycle
//!
//! ```text
//! RawRows (source poll)
//!      │
//!      ▼
//! Ingester::ingest ──▶ Vec<Record>
//!      │                    │
//!      │   OperatorEvents ──┤
//!      ▼                    ▼
//! DashboardState::apply + reconcile ──▶ build_frame ──▶ DashboardFrame
//! ```

pub mod alert;
pub mod downsample;
pub mod ingest;
pub mod registry;
pub mod session;
pub mod thresholds;
pub mod view_state;

pub use alert::{AlertLevel, AlertStatus};
pub use downsample::downsample;
pub use ingest::{available_days, filter_day, DateOrder, Ingester, Record, TIMESTAMP_COLUMN};
pub use registry::{Node, NodeId, NodeRegistry, MAX_NODE_COUNT, MIN_NODE_COUNT};
pub use session::{
    build_frame, DashboardFrame, DashboardState, NodeView, OperatorEvent, SeriesPoint,
};
pub use thresholds::{ThresholdKind, ThresholdPair, ThresholdStore, DEFAULT_HIGH, DEFAULT_OVER};
pub use view_state::{ViewFlags, ViewStateController};
