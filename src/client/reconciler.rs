//! # Map Replica
//!
//! The client-side mirror of one document's graph. Local `nodes`/`edges`
//! are the single source of UI truth; both mutation paths flow through the
//! same `apply` rules the server uses:
//!
//! 1. **Local-origin**: a user action mutates the replica synchronously
//!    (optimistic, never rolled back), then the equivalent operation is
//!    queued for the hub.
//! 2. **Remote-origin**: an operation relayed by the hub is applied with
//!    idempotent add/merge semantics, so duplicate delivery is harmless.

use crate::shared::graph::{Edge, MapDocument, Node};
use crate::shared::operation::{self, Operation};

/// Local replica of a document's nodes and edges
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapReplica {
    /// Node records, id-unique, append-ordered
    pub nodes: Vec<Node>,
    /// Edge records, id-unique, append-ordered
    pub edges: Vec<Edge>,
}

impl MapReplica {
    /// Create an empty replica
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace local state with a full snapshot from the hub
    pub fn load_snapshot(&mut self, map: &MapDocument) {
        self.nodes = map.nodes.clone();
        self.edges = map.edges.clone();
    }

    /// Apply one operation, local- or remote-origin alike
    pub fn apply(&mut self, op: &Operation) {
        operation::apply(&mut self.nodes, &mut self.edges, op);
    }

    /// Look up a node by id
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Look up an edge by id
    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// Drop all local state (used on disconnect)
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }
}
