//! Document rooms and presence
//!
//! Process-local registry of who is connected to which document, with the
//! per-room broadcast channels the hub relays through.

pub mod registry;

pub use registry::{ConnectionId, RoomEvent, RoomRegistry};
