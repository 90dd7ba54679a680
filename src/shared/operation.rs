/**
 * Operation Protocol
 *
 * This module defines the vocabulary of graph mutations exchanged between
 * clients and the collaboration hub, and the mutation rules for applying
 * them to a node/edge set.
 *
 * # Wire Shape
 *
 * Operations serialize as `{"type": "<KIND>", "payload": {...}}` with the
 * kind discriminators `NODE_ADD`, `NODE_MOVE`, `NODE_EDIT`, `NODE_UPDATE`,
 * `NODE_DELETE`, `EDGE_ADD`, `EDGE_UPDATE`, `EDGE_DELETE`.
 *
 * # Apply Semantics
 *
 * One `apply` function implements the mutation table and is used by both
 * mutation paths: the hub's persistence cycle and the client replica's
 * local/remote apply. Adds are idempotent (duplicate delivery is harmless),
 * edits shallow-merge, deletes cascade. Operations carry no sequence
 * numbers or vector clocks; convergence relies on "apply as received".
 */
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::shared::graph::{Edge, Node};

/// A single, self-contained graph mutation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload")]
pub enum Operation {
    /// Insert a node if its id is absent, else ignore
    #[serde(rename = "NODE_ADD")]
    NodeAdd(Node),
    /// Overwrite a node's position fields only
    #[serde(rename = "NODE_MOVE")]
    NodeMove(NodeMove),
    /// Shallow-merge the present fields onto an existing node
    #[serde(rename = "NODE_EDIT")]
    NodeEdit(NodePatch),
    /// Replace a node wholesale by id (legacy full update)
    #[serde(rename = "NODE_UPDATE")]
    NodeUpdate(Node),
    /// Remove a node and every edge touching it
    #[serde(rename = "NODE_DELETE")]
    NodeDelete(Target),
    /// Insert an edge if its id is absent, else ignore
    #[serde(rename = "EDGE_ADD")]
    EdgeAdd(Edge),
    /// Shallow-merge the present fields onto an existing edge
    #[serde(rename = "EDGE_UPDATE")]
    EdgeUpdate(EdgePatch),
    /// Remove an edge by id
    #[serde(rename = "EDGE_DELETE")]
    EdgeDelete(Target),
}

/// Position-only update payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeMove {
    pub id: String,
    pub x: f64,
    pub y: f64,
}

/// Id-only payload for deletes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Target {
    pub id: String,
}

/// Partial node update
///
/// Only fields present in the payload are written; everything else on the
/// node is left untouched. A present `style` replaces the node's style map
/// wholesale rather than merging key-by-key.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NodePatch {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<Map<String, Value>>,
}

impl NodePatch {
    /// Patch that changes only the content field
    pub fn content(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: Some(content.into()),
            ..Self::default()
        }
    }
}

/// Partial edge update
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EdgePatch {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Operation {
    /// The id of the node or edge this operation targets
    pub fn target_id(&self) -> &str {
        match self {
            Operation::NodeAdd(node) | Operation::NodeUpdate(node) => &node.id,
            Operation::NodeMove(mv) => &mv.id,
            Operation::NodeEdit(patch) => &patch.id,
            Operation::NodeDelete(t) | Operation::EdgeDelete(t) => &t.id,
            Operation::EdgeAdd(edge) => &edge.id,
            Operation::EdgeUpdate(patch) => &patch.id,
        }
    }
}

/// Apply one operation to a node/edge set
///
/// This is the single implementation of the mutation table, shared by the
/// server's load-apply-save cycle and the client replica so that the
/// local-origin and remote-origin paths cannot diverge.
///
/// Operations targeting an unknown id are silent no-ops: with no operation
/// ordering across connections, an edit can legitimately arrive after the
/// delete that removed its target.
pub fn apply(nodes: &mut Vec<Node>, edges: &mut Vec<Edge>, operation: &Operation) {
    match operation {
        Operation::NodeAdd(node) => {
            if !nodes.iter().any(|n| n.id == node.id) {
                nodes.push(node.clone());
            }
        }
        Operation::NodeMove(mv) => {
            if let Some(node) = nodes.iter_mut().find(|n| n.id == mv.id) {
                node.x = mv.x;
                node.y = mv.y;
            }
        }
        Operation::NodeEdit(patch) => {
            if let Some(node) = nodes.iter_mut().find(|n| n.id == patch.id) {
                merge_node(node, patch);
            }
        }
        Operation::NodeUpdate(replacement) => {
            if let Some(node) = nodes.iter_mut().find(|n| n.id == replacement.id) {
                *node = replacement.clone();
            }
        }
        Operation::NodeDelete(target) => {
            nodes.retain(|n| n.id != target.id);
            // Cascade: drop every edge touching the deleted node, now, never lazily
            edges.retain(|e| e.source != target.id && e.target != target.id);
        }
        Operation::EdgeAdd(edge) => {
            if !edges.iter().any(|e| e.id == edge.id) {
                edges.push(edge.clone());
            }
        }
        Operation::EdgeUpdate(patch) => {
            if let Some(edge) = edges.iter_mut().find(|e| e.id == patch.id) {
                if let Some(source) = &patch.source {
                    edge.source = source.clone();
                }
                if let Some(target) = &patch.target {
                    edge.target = target.clone();
                }
                if let Some(color) = &patch.color {
                    edge.color = Some(color.clone());
                }
            }
        }
        Operation::EdgeDelete(target) => {
            edges.retain(|e| e.id != target.id);
        }
    }
}

fn merge_node(node: &mut Node, patch: &NodePatch) {
    if let Some(content) = &patch.content {
        node.content = content.clone();
    }
    if let Some(x) = patch.x {
        node.x = x;
    }
    if let Some(y) = patch.y {
        node.y = y;
    }
    if let Some(width) = patch.width {
        node.width = Some(width);
    }
    if let Some(height) = patch.height {
        node.height = Some(height);
    }
    if let Some(node_type) = &patch.node_type {
        node.node_type = node_type.clone();
    }
    if let Some(style) = &patch.style {
        node.style = style.clone();
    }
}
