//! Per-node display toggles.
//!
//! Selection ("show this node at all") and chart expansion are operator
//! state: they persist across refresh cycles and change only through
//! explicit events, unlike alert levels which are re-derived every cycle.

use std::collections::BTreeMap;

use crate::data::registry::NodeId;
use crate::error::{Error, Result};

/// Display flags for one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewFlags {
    /// Whether the node is rendered in the grid at all.
    pub selected: bool,
    /// Whether the node's time-series chart is shown.
    pub expanded: bool,
}

impl Default for ViewFlags {
    fn default() -> Self {
        Self {
            selected: true,
            expanded: false,
        }
    }
}

/// View flags keyed by node id, kept in lock-step with the registry.
#[derive(Debug, Clone, Default)]
pub struct ViewStateController {
    entries: BTreeMap<NodeId, ViewFlags>,
}

impl ViewStateController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Align the key set with the registry's present ids.
    ///
    /// New nodes start selected with their chart collapsed; entries for
    /// removed nodes are dropped.
    pub fn sync_with(&mut self, present: &[NodeId]) {
        self.entries.retain(|id, _| present.contains(id));
        for id in present {
            self.entries.entry(*id).or_default();
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&ViewFlags> {
        self.entries.get(&id)
    }

    pub fn is_selected(&self, id: NodeId) -> bool {
        self.entries.get(&id).map(|f| f.selected).unwrap_or(false)
    }

    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.entries.get(&id).map(|f| f.expanded).unwrap_or(false)
    }

    pub fn set_selected(&mut self, id: NodeId, selected: bool) -> Result<()> {
        let flags = self.entries.get_mut(&id).ok_or(Error::NodeNotFound(id))?;
        flags.selected = selected;
        Ok(())
    }

    /// Flip the chart-expanded flag for one node.
    ///
    /// Returns the new value.
    pub fn toggle_expanded(&mut self, id: NodeId) -> Result<bool> {
        let flags = self.entries.get_mut(&id).ok_or(Error::NodeNotFound(id))?;
        flags.expanded = !flags.expanded;
        Ok(flags.expanded)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_on_creation() {
        let mut view = ViewStateController::new();
        view.sync_with(&[NodeId(1)]);
        assert!(view.is_selected(NodeId(1)));
        assert!(!view.is_expanded(NodeId(1)));
    }

    #[test]
    fn test_toggle_expanded_flips() {
        let mut view = ViewStateController::new();
        view.sync_with(&[NodeId(1)]);
        assert!(view.toggle_expanded(NodeId(1)).unwrap());
        assert!(view.is_expanded(NodeId(1)));
        assert!(!view.toggle_expanded(NodeId(1)).unwrap());
        assert!(!view.is_expanded(NodeId(1)));
    }

    #[test]
    fn test_sync_prunes_and_redefaults() {
        let mut view = ViewStateController::new();
        view.sync_with(&[NodeId(1), NodeId(2)]);
        view.set_selected(NodeId(2), false).unwrap();
        view.toggle_expanded(NodeId(2)).unwrap();

        view.sync_with(&[NodeId(1)]);
        assert!(view.get(NodeId(2)).is_none());

        view.sync_with(&[NodeId(1), NodeId(2)]);
        assert_eq!(view.get(NodeId(2)), Some(&ViewFlags::default()));
    }

    #[test]
    fn test_toggle_unknown_node_fails() {
        let mut view = ViewStateController::new();
        assert!(matches!(
            view.toggle_expanded(NodeId(4)),
            Err(Error::NodeNotFound(NodeId(4)))
        ));
    }
}
