//! Error taxonomy for the dashboard core.

use thiserror::Error;

use crate::data::registry::NodeId;

/// Errors raised by the dashboard core.
///
/// `Fetch` and `Schema` are fatal for the current refresh cycle only: the
/// app keeps the previous frame on screen and retries on the next tick.
/// `NodeNotFound` indicates a store operation against an id the registry
/// does not hold, which cannot happen while the reconcile-then-sync ordering
/// is respected.
#[derive(Debug, Error)]
pub enum Error {
    /// The upstream feed could not be fetched or was malformed.
    #[error("failed to fetch rows: {0}")]
    Fetch(String),

    /// No timestamp-bearing column was found in the fetched rows.
    #[error("no timestamp column found (tried: {tried})")]
    Schema { tried: String },

    /// A threshold or view-state operation referenced an absent node.
    #[error("unknown node: {0}")]
    NodeNotFound(NodeId),
}

pub type Result<T> = std::result::Result<T, Error>;
