//! Per-node alert thresholds.

use std::collections::BTreeMap;

use crate::data::registry::NodeId;
use crate::error::{Error, Result};

/// Default "high" threshold applied to newly created nodes (°C).
pub const DEFAULT_HIGH: f64 = 60.0;
/// Default "over" threshold applied to newly created nodes (°C).
pub const DEFAULT_OVER: f64 = 80.0;

/// Which bound of a [`ThresholdPair`] to mutate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdKind {
    High,
    Over,
}

/// The two alert bounds for one node.
///
/// No ordering is enforced between `high` and `over`; the evaluator checks
/// `over` first, so an inverted pair makes the High level unreachable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdPair {
    pub high: f64,
    pub over: f64,
}

impl Default for ThresholdPair {
    fn default() -> Self {
        Self {
            high: DEFAULT_HIGH,
            over: DEFAULT_OVER,
        }
    }
}

/// Threshold pairs keyed by node id, kept in lock-step with the registry.
#[derive(Debug, Clone, Default)]
pub struct ThresholdStore {
    entries: BTreeMap<NodeId, ThresholdPair>,
    defaults: ThresholdPair,
}

impl ThresholdStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose new entries start from the given pair instead of
    /// the built-in (60, 80) defaults.
    pub fn with_defaults(defaults: ThresholdPair) -> Self {
        Self {
            entries: BTreeMap::new(),
            defaults,
        }
    }

    /// Align the key set with the registry's present ids.
    ///
    /// Inserts a default pair for every newly present id and drops entries
    /// for ids no longer present. Must run after every reconcile and before
    /// alert evaluation.
    pub fn sync_with(&mut self, present: &[NodeId]) {
        self.entries.retain(|id, _| present.contains(id));
        for id in present {
            self.entries.entry(*id).or_insert(self.defaults);
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&ThresholdPair> {
        self.entries.get(&id)
    }

    /// Set one bound for one node.
    pub fn set(&mut self, id: NodeId, kind: ThresholdKind, value: f64) -> Result<()> {
        let pair = self.entries.get_mut(&id).ok_or(Error::NodeNotFound(id))?;
        match kind {
            ThresholdKind::High => pair.high = value,
            ThresholdKind::Over => pair.over = value,
        }
        Ok(())
    }

    pub fn ids(&self) -> Vec<NodeId> {
        self.entries.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
