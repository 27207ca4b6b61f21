//! Node membership and field bindings.
//!
//! The registry is the single owner of node identity. Nodes exist exactly
//! for the ordinals `1..=desired_count`, and each node's three phase column
//! bindings are a fixed function of its ordinal for its entire lifetime.
//! The threshold and view-state stores key off the ids held here and are
//! re-synced after every reconcile.

use std::collections::BTreeMap;
use std::fmt;

/// Smallest allowed desired node count.
pub const MIN_NODE_COUNT: u16 = 1;
/// Largest allowed desired node count.
pub const MAX_NODE_COUNT: u16 = 60;

/// Identifier of a monitored node: its 1-based ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u16);

impl NodeId {
    /// Display label, zero-padded to two digits ("Node 01" .. "Node 60").
    pub fn label(&self) -> String {
        format!("Node {:02}", self.0)
    }

    /// The three phase column names bound to this node.
    ///
    /// Column naming follows the upstream feed convention: `Node{i}A`,
    /// `Node{i}B`, `Node{i}C` (no zero padding in the column names).
    pub fn phase_columns(&self) -> [String; 3] {
        [
            format!("Node{}A", self.0),
            format!("Node{}B", self.0),
            format!("Node{}C", self.0),
        ]
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A monitored node with its phase column bindings.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    /// Ordered bindings for phases A, B, C.
    pub bindings: [String; 3],
}

impl Node {
    fn for_ordinal(id: NodeId) -> Self {
        Self {
            bindings: id.phase_columns(),
            id,
        }
    }
}

/// Owns the set of present nodes.
///
/// Membership is driven solely by the operator's desired count via
/// [`NodeRegistry::reconcile`]; [`NodeRegistry::remove`] supports explicit
/// removal, after which the node returns (with default bindings) on the next
/// reconcile if its ordinal is still in range.
#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    nodes: BTreeMap<NodeId, Node>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamp a requested desired count into the supported range.
    pub fn clamp_count(desired: u16) -> u16 {
        desired.clamp(MIN_NODE_COUNT, MAX_NODE_COUNT)
    }

    /// Bring membership in line with the desired count.
    ///
    /// Adds nodes for every ordinal in `1..=desired` not yet present and
    /// removes every node whose ordinal exceeds `desired`. Idempotent: a
    /// second call with the same count changes nothing.
    pub fn reconcile(&mut self, desired: u16) {
        let desired = Self::clamp_count(desired);

        self.nodes.retain(|id, _| id.0 <= desired);

        for ordinal in 1..=desired {
            let id = NodeId(ordinal);
            self.nodes.entry(id).or_insert_with(|| Node::for_ordinal(id));
        }
    }

    /// Explicitly remove a node regardless of the desired count.
    ///
    /// Returns true if the node was present.
    pub fn remove(&mut self, id: NodeId) -> bool {
        self.nodes.remove(&id).is_some()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Present node ids in ascending ordinal order.
    pub fn present_ids(&self) -> Vec<NodeId> {
        self.nodes.keys().copied().collect()
    }

    /// Present nodes in ascending ordinal order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
