/**
 * Per-connection Hub Contract
 *
 * The message-level core of the collaboration hub, one function per
 * contract operation: `join_document`, `submit_operation`, `submit_cursor`,
 * and `disconnect`. The WebSocket glue in `socket.rs` wires transport
 * frames to these functions; tests drive them directly.
 *
 * # Ordering
 *
 * `submit_operation` relays to the room first and persists afterwards in a
 * spawned task. The two steps are not ordered relative to each other and
 * are not transactional together: peers can apply an operation whose
 * persistence later fails, leaving memory and storage durably diverged.
 * Errors in the persistence task are logged and swallowed so a bad
 * operation never crashes the relay loop.
 */
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::backend::hub::persist;
use crate::backend::rooms::{ConnectionId, RoomEvent};
use crate::backend::server::state::AppState;
use crate::shared::operation::Operation;
use crate::shared::protocol::ServerMessage;

/// Cursor color used when the sender is not in the room's roster
const FALLBACK_CURSOR_COLOR: &str = "#ff5722";

/// Default display name for joins that omit a username
pub const GUEST_USERNAME: &str = "Guest";

/// A connection's membership in one document room
pub struct RoomSession {
    /// The joined document id (as received on the wire)
    pub map_id: String,
    /// Receiver half of the room's broadcast channel
    pub events: broadcast::Receiver<RoomEvent>,
}

/// Subscribe a connection to a document's room
///
/// Side effects, in order:
/// 1. Leaves the previously joined room, if any (one room per connection).
/// 2. Adds the connection to the roster with a fresh presence color.
/// 3. Broadcasts the updated roster to the rest of the room.
///
/// The returned frames are for the joining connection only: the roster,
/// followed by the `init-map` snapshot when the document exists. A missing
/// document (or an id that does not parse) produces no snapshot and no
/// error, so the client simply never receives `init-map`.
pub async fn join_document(
    state: &AppState,
    connection_id: ConnectionId,
    map_id: &str,
    username: Option<String>,
    current: Option<RoomSession>,
) -> (RoomSession, Vec<ServerMessage>) {
    let username = username.unwrap_or_else(|| GUEST_USERNAME.to_string());

    if let Some(previous) = current {
        leave_room(state, &previous.map_id, connection_id);
    }

    let (roster, events) = state.rooms.join(map_id, connection_id, &username);
    tracing::info!(
        "User {} ({}) joined map {}",
        username,
        connection_id,
        map_id
    );

    let roster_frame = ServerMessage::RoomUsers { users: roster };
    state.rooms.broadcast(
        map_id,
        RoomEvent {
            skip: Some(connection_id),
            message: roster_frame.clone(),
        },
    );

    let mut frames = vec![roster_frame];
    match state.store.find_by_id(map_id).await {
        Ok(Some(map)) => frames.push(ServerMessage::InitMap { map }),
        Ok(None) => {
            tracing::debug!("Map {} not found; no snapshot sent", map_id);
        }
        Err(e) => {
            // Matches the snapshot contract: load failures are logged,
            // never surfaced to the client.
            tracing::error!("Error fetching map {}: {}", map_id, e);
        }
    }

    (
        RoomSession {
            map_id: map_id.to_string(),
            events,
        },
        frames,
    )
}

/// Relay an operation to the room and persist it asynchronously
///
/// The relay is fire-and-forget and excludes the sender. The returned
/// handle belongs to the spawned persistence cycle; the socket loop drops
/// it, tests may await it for determinism.
pub fn submit_operation(
    state: &AppState,
    connection_id: ConnectionId,
    map_id: &str,
    operation: Operation,
) -> JoinHandle<()> {
    state.rooms.broadcast(
        map_id,
        RoomEvent {
            skip: Some(connection_id),
            message: ServerMessage::Operation {
                operation: operation.clone(),
            },
        },
    );

    let store = state.store.clone();
    let map_id = map_id.to_string();
    tokio::spawn(async move {
        match persist::apply_and_persist(store.as_ref(), &map_id, &operation).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!(
                    "Dropped operation on {} for missing map {}",
                    operation.target_id(),
                    map_id
                );
            }
            Err(e) => {
                // Peers already applied the broadcast; storage now lags them.
                tracing::error!("Error saving operation for map {}: {}", map_id, e);
            }
        }
    })
}

/// Relay an ephemeral cursor position to the rest of the room
///
/// The sender's presence color is resolved from the roster; connections
/// that somehow are not in the roster get the fallback color. Never
/// persisted, never retried.
pub fn submit_cursor(
    state: &AppState,
    connection_id: ConnectionId,
    map_id: &str,
    x: f64,
    y: f64,
    username: String,
) {
    let color = state
        .rooms
        .color_of(map_id, connection_id)
        .unwrap_or_else(|| FALLBACK_CURSOR_COLOR.to_string());

    state.rooms.broadcast(
        map_id,
        RoomEvent {
            skip: Some(connection_id),
            message: ServerMessage::Cursor {
                id: connection_id,
                x,
                y,
                username,
                color,
            },
        },
    );
}

/// Remove a connection from its room on disconnect
///
/// Broadcasts the shrunk roster to the remaining members; if the room is
/// now empty its registry entry is discarded. The document itself is
/// independently durable, so there is nothing else to do.
pub fn disconnect(state: &AppState, connection_id: ConnectionId, session: Option<RoomSession>) {
    tracing::info!("User disconnected: {}", connection_id);
    if let Some(session) = session {
        leave_room(state, &session.map_id, connection_id);
    }
}

fn leave_room(state: &AppState, map_id: &str, connection_id: ConnectionId) {
    if let Some(roster) = state.rooms.leave(map_id, connection_id) {
        state.rooms.broadcast(
            map_id,
            RoomEvent {
                skip: None,
                message: ServerMessage::RoomUsers { users: roster },
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::store::{MapStore, MemoryMapStore};
    use crate::shared::graph::Node;
    use crate::shared::operation::Target;
    use std::sync::Arc;
    use uuid::Uuid;

    fn test_state() -> (AppState, Arc<MemoryMapStore>) {
        let store = Arc::new(MemoryMapStore::new());
        (AppState::new(store.clone(), None), store)
    }

    /// Discard everything already queued on a receiver (join rosters etc.)
    fn drain(rx: &mut broadcast::Receiver<RoomEvent>) {
        while rx.try_recv().is_ok() {}
    }

    #[tokio::test]
    async fn test_join_sends_roster_then_snapshot() {
        let (state, store) = test_state();
        let doc = store
            .create("Plan".to_string(), Uuid::new_v4(), Vec::new(), Vec::new())
            .await
            .unwrap();
        let map_id = doc.id.to_string();

        let conn = Uuid::new_v4();
        let (_session, frames) =
            join_document(&state, conn, &map_id, Some("ada".to_string()), None).await;

        assert_eq!(frames.len(), 2);
        match &frames[0] {
            ServerMessage::RoomUsers { users } => {
                assert_eq!(users.len(), 1);
                assert_eq!(users[0].username, "ada");
            }
            other => panic!("Expected roster first, got {:?}", other),
        }
        match &frames[1] {
            ServerMessage::InitMap { map } => assert_eq!(map.id, doc.id),
            other => panic!("Expected snapshot second, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_join_missing_map_sends_no_snapshot() {
        let (state, _store) = test_state();
        let conn = Uuid::new_v4();

        let (_session, frames) =
            join_document(&state, conn, "definitely-not-a-map", None, None).await;

        // Roster only; the guest default fills in the username.
        assert_eq!(frames.len(), 1);
        match &frames[0] {
            ServerMessage::RoomUsers { users } => assert_eq!(users[0].username, GUEST_USERNAME),
            other => panic!("Expected roster, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_rejoin_leaves_previous_room() {
        let (state, _store) = test_state();
        let conn = Uuid::new_v4();

        let (session, _) = join_document(&state, conn, "map-a", None, None).await;
        let (_session, _) = join_document(&state, conn, "map-b", None, Some(session)).await;

        assert!(state.rooms.roster("map-a").is_empty());
        assert_eq!(state.rooms.roster("map-b").len(), 1);
    }

    #[tokio::test]
    async fn test_operation_relayed_to_others_not_sender() {
        let (state, _store) = test_state();
        let c1 = Uuid::new_v4();
        let c2 = Uuid::new_v4();

        let (mut s1, _) = join_document(&state, c1, "m1", None, None).await;
        let (mut s2, _) = join_document(&state, c2, "m1", None, None).await;

        // Discard the roster broadcasts the two joins produced.
        drain(&mut s1.events);
        drain(&mut s2.events);

        let op = Operation::NodeAdd(Node::new("A", 0.0, 0.0));
        let handle = submit_operation(&state, c1, "m1", op.clone());
        handle.await.unwrap();

        let event = s2.events.recv().await.unwrap();
        assert_eq!(event.skip, Some(c1));
        assert_eq!(
            event.message,
            ServerMessage::Operation { operation: op }
        );

        // The sender's receiver also sees the event but the socket loop
        // drops it via the skip field; nothing else should be queued.
        let own = s1.events.recv().await.unwrap();
        assert_eq!(own.skip, Some(c1));
    }

    #[tokio::test]
    async fn test_operation_persists_into_store() {
        let (state, store) = test_state();
        let doc = store
            .create("Plan".to_string(), Uuid::new_v4(), Vec::new(), Vec::new())
            .await
            .unwrap();
        let map_id = doc.id.to_string();
        let conn = Uuid::new_v4();
        let (_session, _) = join_document(&state, conn, &map_id, None, None).await;

        let node = Node::new("A", 1.0, 2.0);
        submit_operation(&state, conn, &map_id, Operation::NodeAdd(node.clone()))
            .await
            .unwrap();

        let stored = store.find_by_id(&map_id).await.unwrap().unwrap();
        assert_eq!(stored.nodes, vec![node]);
    }

    #[tokio::test]
    async fn test_cursor_uses_roster_color() {
        let (state, _store) = test_state();
        let c1 = Uuid::new_v4();
        let c2 = Uuid::new_v4();

        let (_s1, _) = join_document(&state, c1, "m1", Some("ada".to_string()), None).await;
        let (mut s2, _) = join_document(&state, c2, "m1", None, None).await;
        drain(&mut s2.events);

        let expected_color = state.rooms.color_of("m1", c1).unwrap();
        submit_cursor(&state, c1, "m1", 5.0, 6.0, "ada".to_string());

        let event = s2.events.recv().await.unwrap();
        match event.message {
            ServerMessage::Cursor { id, color, x, y, .. } => {
                assert_eq!(id, c1);
                assert_eq!(color, expected_color);
                assert_eq!((x, y), (5.0, 6.0));
            }
            other => panic!("Expected cursor, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_disconnect_broadcasts_shrunk_roster() {
        let (state, _store) = test_state();
        let c1 = Uuid::new_v4();
        let c2 = Uuid::new_v4();

        let (s1, _) = join_document(&state, c1, "m1", Some("ada".to_string()), None).await;
        let (mut s2, _) = join_document(&state, c2, "m1", Some("grace".to_string()), None).await;
        drain(&mut s2.events);

        disconnect(&state, c1, Some(s1));

        let event = s2.events.recv().await.unwrap();
        assert_eq!(event.skip, None);
        match event.message {
            ServerMessage::RoomUsers { users } => {
                assert_eq!(users.len(), 1);
                assert_eq!(users[0].id, c2);
            }
            other => panic!("Expected roster, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_operation_for_missing_map_still_relays() {
        let (state, store) = test_state();
        let c1 = Uuid::new_v4();
        let c2 = Uuid::new_v4();

        let (_s1, _) = join_document(&state, c1, "ghost", None, None).await;
        let (mut s2, _) = join_document(&state, c2, "ghost", None, None).await;
        drain(&mut s2.events);

        let op = Operation::NodeDelete(Target { id: "n1".to_string() });
        submit_operation(&state, c1, "ghost", op.clone())
            .await
            .unwrap();

        // Broadcast happened even though persistence dropped the operation.
        let event = s2.events.recv().await.unwrap();
        assert_eq!(event.message, ServerMessage::Operation { operation: op });
        assert!(store.find_by_id("ghost").await.unwrap().is_none());
    }
}
