//! Shared Module
//!
//! This module contains types and data structures that are shared between
//! the server and the client reconciler: the graph data model, the
//! operation protocol, the real-time wire protocol, and shared errors.
//! All types are designed for JSON serialization, so the exact same shapes
//! travel over the WebSocket and into the document store.

/// Graph data model: nodes, edges, documents
pub mod graph;

/// Operation protocol and apply rules
pub mod operation;

/// Real-time wire protocol frames
pub mod protocol;

/// Shared error types
pub mod error;

/// Re-export commonly used types for convenience
pub use error::SharedError;
pub use graph::{Edge, MapDocument, Node};
pub use operation::{apply, EdgePatch, NodeMove, NodePatch, Operation, Target};
pub use protocol::{ClientMessage, RoomUser, ServerMessage};
