/**
 * Session Registry
 *
 * Per-document roster of currently connected participants, plus the
 * per-room broadcast channel the hub fans events out on. State is
 * process-scoped and in-memory: rooms are created on first join, discarded
 * on last leave, and never persisted. A horizontally scaled deployment
 * would fragment presence and routing; that is an accepted boundary, not
 * something this registry tries to solve.
 *
 * # Broadcasting
 *
 * Each room owns a `tokio::sync::broadcast` channel of `RoomEvent`s. An
 * event optionally names a connection to skip, which is how "relay to
 * everyone except the sender" is implemented: every subscriber receives
 * the event and the sender's own receive loop drops it.
 */
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use rand::Rng;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::shared::protocol::{RoomUser, ServerMessage};

/// Identifier the hub assigns to one WebSocket connection
pub type ConnectionId = Uuid;

/// Capacity of each room's broadcast channel
const ROOM_CHANNEL_CAPACITY: usize = 1000;

/// One event fanned out to a room's subscribers
#[derive(Debug, Clone)]
pub struct RoomEvent {
    /// Connection that must not receive this event (the sender), if any
    pub skip: Option<ConnectionId>,
    /// The frame to deliver
    pub message: ServerMessage,
}

/// Internal per-room state: roster plus broadcast channel
struct Room {
    users: Vec<RoomUser>,
    events: broadcast::Sender<RoomEvent>,
}

impl Room {
    fn new() -> Self {
        let (events, _) = broadcast::channel(ROOM_CHANNEL_CAPACITY);
        Self {
            users: Vec::new(),
            events,
        }
    }
}

/// Registry of document rooms, shared across all hub connections
///
/// Cloning is cheap; all clones share the same underlying map. The inner
/// mutex is a plain `std::sync::Mutex` because no lock is ever held across
/// an await point.
#[derive(Clone)]
pub struct RoomRegistry {
    rooms: Arc<Mutex<HashMap<String, Room>>>,
}

impl RoomRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            rooms: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Add a connection to a document's room
    ///
    /// Creates the room on first join, assigns the participant a random
    /// presence color, and returns the updated roster together with a
    /// fresh receiver for the room's event channel. Joining twice with the
    /// same connection id does not duplicate the roster entry.
    pub fn join(
        &self,
        map_id: &str,
        connection_id: ConnectionId,
        username: &str,
    ) -> (Vec<RoomUser>, broadcast::Receiver<RoomEvent>) {
        let mut rooms = self.rooms.lock().unwrap();
        let room = rooms.entry(map_id.to_string()).or_insert_with(Room::new);

        if !room.users.iter().any(|u| u.id == connection_id) {
            room.users.push(RoomUser {
                id: connection_id,
                username: username.to_string(),
                color: random_color(),
            });
        }

        (room.users.clone(), room.events.subscribe())
    }

    /// Remove a connection from a document's room
    ///
    /// Returns `Some(roster)` if the room still has members (the caller
    /// broadcasts the new roster), or `None` if the connection was the
    /// last member and the room was discarded.
    pub fn leave(&self, map_id: &str, connection_id: ConnectionId) -> Option<Vec<RoomUser>> {
        let mut rooms = self.rooms.lock().unwrap();
        let room = rooms.get_mut(map_id)?;
        room.users.retain(|u| u.id != connection_id);

        if room.users.is_empty() {
            rooms.remove(map_id);
            None
        } else {
            Some(room.users.clone())
        }
    }

    /// Broadcast an event to a room's subscribers
    ///
    /// Returns the number of subscribers that received the event; 0 when
    /// the room does not exist or nobody is listening. Fire-and-forget.
    pub fn broadcast(&self, map_id: &str, event: RoomEvent) -> usize {
        let rooms = self.rooms.lock().unwrap();
        match rooms.get(map_id) {
            Some(room) => match room.events.send(event) {
                Ok(subscriber_count) => subscriber_count,
                Err(e) => {
                    // No subscribers, that's okay
                    tracing::debug!("No subscribers in room {}: {:?}", map_id, e);
                    0
                }
            },
            None => 0,
        }
    }

    /// Current roster of a room; empty if the room does not exist
    pub fn roster(&self, map_id: &str) -> Vec<RoomUser> {
        let rooms = self.rooms.lock().unwrap();
        rooms
            .get(map_id)
            .map(|room| room.users.clone())
            .unwrap_or_default()
    }

    /// The presence color assigned to a connection in a room
    pub fn color_of(&self, map_id: &str, connection_id: ConnectionId) -> Option<String> {
        let rooms = self.rooms.lock().unwrap();
        rooms.get(map_id).and_then(|room| {
            room.users
                .iter()
                .find(|u| u.id == connection_id)
                .map(|u| u.color.clone())
        })
    }

    /// Number of live rooms
    pub fn room_count(&self) -> usize {
        self.rooms.lock().unwrap().len()
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Random `#rrggbb` presence color over the full 24-bit space
fn random_color() -> String {
    format!("#{:06x}", rand::thread_rng().gen_range(0..0x1000000u32))
}
