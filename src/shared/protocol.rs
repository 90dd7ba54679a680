/**
 * Real-time Wire Protocol
 *
 * This module defines the JSON message frames exchanged over the
 * collaboration WebSocket. Messages are tagged with a kebab-case `type`
 * field matching the event vocabulary the browser client speaks:
 * `join-map`, `operation`, and `cursor` inbound; `init-map`, `operation`,
 * `room-users`, and `cursor` outbound.
 *
 * # Trust Boundary
 *
 * The real-time channel performs no authentication by design (link-sharing
 * model, consistent with the relaxed REST access control): any connection
 * that knows a map id may join its room and submit operations.
 */
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::graph::MapDocument;
use crate::shared::operation::Operation;

/// One participant in a document room, as broadcast in `room-users`
///
/// Ephemeral presence only: created on join, discarded on disconnect,
/// never written to the document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomUser {
    /// Connection id assigned by the server
    pub id: Uuid,
    /// Display name supplied at join time
    pub username: String,
    /// Random `#rrggbb` presence color assigned at join time
    pub color: String,
}

/// Messages a client sends to the hub
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// Subscribe to a document's room and request its snapshot
    JoinMap {
        map_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        username: Option<String>,
    },
    /// Submit one graph mutation for relay and persistence
    Operation {
        map_id: String,
        operation: Operation,
    },
    /// Ephemeral pointer position; relayed, never persisted
    Cursor {
        map_id: String,
        x: f64,
        y: f64,
        username: String,
    },
}

/// Messages the hub sends to a client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// Full document snapshot, sent once to the joining connection only
    InitMap { map: MapDocument },
    /// A relayed operation from another room member
    Operation { operation: Operation },
    /// Current roster of the room, sent to every member on join/leave
    RoomUsers { users: Vec<RoomUser> },
    /// Another member's pointer position with their presence color
    Cursor {
        id: Uuid,
        x: f64,
        y: f64,
        username: String,
        color: String,
    },
}
