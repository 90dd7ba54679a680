/**
 * Graph Data Model
 *
 * This module defines the persisted representation of one mind map:
 * nodes, edges, and the document record that owns them. The types are
 * shared between the server (storage and snapshots) and the client
 * reconciler (local replica state), so both sides serialize the exact
 * same JSON shapes.
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A single node on the mind-map canvas
///
/// Position (x, y) is a free-floating canvas coordinate, not grid-snapped.
/// The `id` is client-generated (UUID v4), globally unique within a
/// document, and immutable after creation.
///
/// # Fields
/// * `id` - Opaque node identifier
/// * `node_type` - Node kind (`"text"` today; serialized as `type`)
/// * `content` - Display text
/// * `x`, `y` - Canvas position
/// * `width`, `height` - Optional explicit dimensions
/// * `style` - Open attribute map (background color, font size, border, ...)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    /// Opaque, client-generated node id
    pub id: String,
    /// Node kind; only `"text"` is produced today but the field is open
    #[serde(rename = "type", default = "default_node_type")]
    pub node_type: String,
    /// Display text
    #[serde(default)]
    pub content: String,
    /// Canvas x coordinate
    pub x: f64,
    /// Canvas y coordinate
    pub y: f64,
    /// Explicit width, if the client resized the node
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Explicit height, if the client resized the node
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Open styling attribute map
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub style: Map<String, Value>,
}

fn default_node_type() -> String {
    "text".to_string()
}

impl Node {
    /// Create a new text node at the given canvas position
    ///
    /// The id is a freshly generated UUID v4, matching the
    /// collision-resistant ids clients produce.
    pub fn new(content: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            node_type: default_node_type(),
            content: content.into(),
            x,
            y,
            width: None,
            height: None,
            style: Map::new(),
        }
    }
}

/// A directed connection between two nodes
///
/// Valid only while both endpoints exist; referential integrity is
/// enforced by cascading deletion when a node is removed, not by a
/// foreign-key constraint in storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Edge {
    /// Opaque, client-generated edge id
    pub id: String,
    /// Id of the source node
    pub source: String,
    /// Id of the target node
    pub target: String,
    /// Optional stroke color
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Edge {
    /// Create a new edge between two node ids
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            source: source.into(),
            target: target.into(),
            color: None,
        }
    }
}

/// One mind map's persisted node/edge graph plus ownership metadata
///
/// The document is exclusively owned by the persistence layer; the hub
/// re-reads and re-writes it per operation rather than caching, and each
/// client holds its own replica. Insertion order within `nodes`/`edges`
/// is not semantically meaningful but is preserved by array append.
///
/// # Invariants
/// * Node and edge ids are unique within the document
/// * Exactly one owner; the owner is never listed in `collaborators`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MapDocument {
    /// Document id
    pub id: Uuid,
    /// Display title
    pub title: String,
    /// Owning user
    pub owner: Uuid,
    /// Users invited to collaborate (never contains the owner)
    #[serde(default)]
    pub collaborators: Vec<Uuid>,
    /// Node records, id-unique, append-ordered
    #[serde(default)]
    pub nodes: Vec<Node>,
    /// Edge records, id-unique, append-ordered
    #[serde(default)]
    pub edges: Vec<Edge>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last persisted write
    pub updated_at: DateTime<Utc>,
}

impl MapDocument {
    /// Create a new, empty document owned by `owner`
    pub fn new(title: impl Into<String>, owner: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            owner,
            collaborators: Vec::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}
