//! Backend Module
//!
//! Server-side code: the Axum HTTP server, the WebSocket collaboration
//! hub, per-document rooms and presence, the document store, and the
//! authenticated REST surface. Compiled only with the `server` feature.

/// Authentication: users, JWT sessions, handlers
pub mod auth;

/// Backend error types and HTTP conversions
pub mod error;

/// The collaboration hub: WebSocket relay and persistence cycles
pub mod hub;

/// REST document lifecycle
pub mod maps;

/// HTTP middleware
pub mod middleware;

/// Document rooms and presence registry
pub mod rooms;

/// Router assembly
pub mod routes;

/// Server state, config, and initialization
pub mod server;

/// The document store
pub mod store;
