//! # Client Session
//!
//! Transport-agnostic driver for one client's connection to the hub. The
//! embedding application owns the actual WebSocket: it feeds inbound
//! frames into [`ClientSession::handle_server_message`] and drains the
//! outbox with [`ClientSession::take_outgoing`] after each local action.
//!
//! ## Connection Lifecycle
//!
//! `Disconnected -> Connecting -> Joined(map_id) -> Disconnected`
//!
//! On join the session queues the `join-map` request (which asks the hub
//! for a snapshot) and begins operation exchange. Teardown persists
//! nothing client-side: any unsent operation is lost, and there is no
//! reconnection or resync protocol beyond rejoining from scratch.
use std::collections::HashMap;

use uuid::Uuid;

use crate::client::reconciler::MapReplica;
use crate::shared::error::SharedError;
use crate::shared::graph::{Edge, Node};
use crate::shared::operation::{EdgePatch, NodeMove, NodePatch, Operation, Target};
use crate::shared::protocol::{ClientMessage, RoomUser, ServerMessage};

/// Connection lifecycle state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// Not connected; nothing may be sent
    #[default]
    Disconnected,
    /// Transport handshake in progress
    Connecting,
    /// Subscribed to a document's room
    Joined(String),
}

/// Another participant's live pointer position
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteCursor {
    pub x: f64,
    pub y: f64,
    pub username: String,
    pub color: String,
}

/// One client's session against the collaboration hub
#[derive(Debug, Default)]
pub struct ClientSession {
    state: ConnectionState,
    username: String,
    replica: MapReplica,
    roster: Vec<RoomUser>,
    cursors: HashMap<Uuid, RemoteCursor>,
    outbox: Vec<ClientMessage>,
}

impl ClientSession {
    /// Create a session for the given display name
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Self::default()
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// The local graph replica (single source of UI truth)
    pub fn replica(&self) -> &MapReplica {
        &self.replica
    }

    /// Current room roster as last broadcast by the hub
    pub fn roster(&self) -> &[RoomUser] {
        &self.roster
    }

    /// Live remote cursors keyed by connection id
    pub fn cursors(&self) -> &HashMap<Uuid, RemoteCursor> {
        &self.cursors
    }

    /// Begin the transport handshake
    pub fn connect(&mut self) {
        self.state = ConnectionState::Connecting;
    }

    /// Join a document's room once the transport is up
    ///
    /// Queues the `join-map` request; the snapshot arrives later as an
    /// `init-map` frame. Rejoining a different map while joined is
    /// allowed and simply switches rooms.
    pub fn join_map(&mut self, map_id: impl Into<String>) -> Result<(), SharedError> {
        match self.state {
            ConnectionState::Disconnected => Err(SharedError::protocol(
                "join-map requires an active connection",
            )),
            ConnectionState::Connecting | ConnectionState::Joined(_) => {
                let map_id = map_id.into();
                self.outbox.push(ClientMessage::JoinMap {
                    map_id: map_id.clone(),
                    username: Some(self.username.clone()),
                });
                self.state = ConnectionState::Joined(map_id);
                Ok(())
            }
        }
    }

    /// Tear down the session
    ///
    /// Clears replica, roster, cursors, and the outbox: operations that
    /// were never drained by the transport are lost by design (no outbox
    /// retry, no offline queue).
    pub fn disconnect(&mut self) {
        self.state = ConnectionState::Disconnected;
        self.replica.clear();
        self.roster.clear();
        self.cursors.clear();
        self.outbox.clear();
    }

    /// Apply one frame received from the hub
    pub fn handle_server_message(&mut self, message: ServerMessage) {
        match message {
            ServerMessage::InitMap { map } => {
                self.replica.load_snapshot(&map);
            }
            ServerMessage::Operation { operation } => {
                // Remote-origin path: same rules as local edits
                self.replica.apply(&operation);
            }
            ServerMessage::RoomUsers { users } => {
                // Forget cursors of participants that left
                self.cursors.retain(|id, _| users.iter().any(|u| u.id == *id));
                self.roster = users;
            }
            ServerMessage::Cursor {
                id,
                x,
                y,
                username,
                color,
            } => {
                self.cursors.insert(
                    id,
                    RemoteCursor {
                        x,
                        y,
                        username,
                        color,
                    },
                );
            }
        }
    }

    /// Drain queued outbound frames for the transport to send
    pub fn take_outgoing(&mut self) -> Vec<ClientMessage> {
        std::mem::take(&mut self.outbox)
    }

    // Local-origin edits. Each mutates the replica synchronously and
    // queues the equivalent operation; none of them roll back on failure
    // because no conflict-rejection path exists.

    /// Add a node created locally
    pub fn add_node(&mut self, node: Node) -> Result<(), SharedError> {
        self.apply_local(Operation::NodeAdd(node))
    }

    /// Move a node to a new canvas position
    pub fn move_node(&mut self, id: impl Into<String>, x: f64, y: f64) -> Result<(), SharedError> {
        self.apply_local(Operation::NodeMove(NodeMove { id: id.into(), x, y }))
    }

    /// Shallow-merge a partial edit onto a node
    pub fn edit_node(&mut self, patch: NodePatch) -> Result<(), SharedError> {
        self.apply_local(Operation::NodeEdit(patch))
    }

    /// Delete a node (edges touching it cascade locally and remotely)
    pub fn delete_node(&mut self, id: impl Into<String>) -> Result<(), SharedError> {
        self.apply_local(Operation::NodeDelete(Target { id: id.into() }))
    }

    /// Add an edge created locally
    pub fn add_edge(&mut self, edge: Edge) -> Result<(), SharedError> {
        self.apply_local(Operation::EdgeAdd(edge))
    }

    /// Shallow-merge a partial edit onto an edge
    pub fn update_edge(&mut self, patch: EdgePatch) -> Result<(), SharedError> {
        self.apply_local(Operation::EdgeUpdate(patch))
    }

    /// Delete an edge
    pub fn delete_edge(&mut self, id: impl Into<String>) -> Result<(), SharedError> {
        self.apply_local(Operation::EdgeDelete(Target { id: id.into() }))
    }

    /// Queue an ephemeral cursor update
    ///
    /// Cursor positions never touch the replica and are drop-safe: if the
    /// transport loses one, nothing resends it.
    pub fn send_cursor(&mut self, x: f64, y: f64) -> Result<(), SharedError> {
        let map_id = self.joined_map()?;
        self.outbox.push(ClientMessage::Cursor {
            map_id,
            x,
            y,
            username: self.username.clone(),
        });
        Ok(())
    }

    /// Optimistic apply: mutate first, enqueue second
    fn apply_local(&mut self, operation: Operation) -> Result<(), SharedError> {
        let map_id = self.joined_map()?;
        self.replica.apply(&operation);
        self.outbox
            .push(ClientMessage::Operation { map_id, operation });
        Ok(())
    }

    fn joined_map(&self) -> Result<String, SharedError> {
        match &self.state {
            ConnectionState::Joined(map_id) => Ok(map_id.clone()),
            _ => Err(SharedError::protocol("not joined to a map")),
        }
    }
}
