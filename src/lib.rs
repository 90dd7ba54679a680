//! MindLink - Main Library
//!
//! MindLink is a collaborative mind-mapping service: multiple browser
//! clients edit the same node/edge graph concurrently, seeing each other's
//! changes and cursors in near-real time. The heart of the system is the
//! real-time synchronization core: a WebSocket collaboration hub that
//! relays self-describing graph operations between room members and
//! persists them asynchronously to a document store.
//!
//! # Module Structure
//!
//! The library is organized into three main modules:
//!
//! - **`shared`** - Types shared between server and client
//!   - Graph data model (nodes, edges, documents)
//!   - Operation protocol and the single set of mutation rules
//!   - Real-time wire protocol frames
//!   - Error types
//!
//! - **`backend`** - Server-side code (only compiled with the `server`
//!   feature)
//!   - Axum HTTP server with the WebSocket collaboration hub
//!   - Per-document session registry (rooms, presence colors)
//!   - Document store (Postgres, with an in-memory fallback)
//!   - Authentication, REST document lifecycle
//!
//! - **`client`** - The client reconciler (no UI)
//!   - Local replica of the graph, optimistic apply
//!   - Connection state machine and outbound message queue
//!   - Presence roster and remote cursor mirror
//!
//! # Consistency Model
//!
//! This is deliberately not an OT or CRDT system. Operations are applied
//! as received ("last writer wins"), broadcast before they are persisted,
//! and persisted through unsynchronized read-modify-write cycles. The
//! domain (visual brainstorming) tolerates eventual, occasionally lossy,
//! convergence; the known races are documented where they live rather
//! than silently hardened.
//!
//! # Feature Flags
//!
//! - **`server`** (default) - Enables the backend module and its
//!   dependency tree (axum, sqlx, auth). Disable it to consume the shared
//!   types and client reconciler without the server stack.

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "server")]
pub mod backend;

/// Client reconciler (replica state, no UI)
pub mod client;
