//! Client Reconciler
//!
//! The browser-side mirror of the collaboration core, as a plain library:
//! replica state with optimistic local apply, the connection state
//! machine, and the presence/cursor mirror. Rendering and the actual
//! WebSocket transport belong to the embedding application.

/// Local replica of a document's graph
pub mod reconciler;

/// Connection state machine and outbound queue
pub mod session;

pub use reconciler::MapReplica;
pub use session::{ClientSession, ConnectionState, RemoteCursor};
