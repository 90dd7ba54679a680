/**
 * WebSocket Transport Glue
 *
 * Upgrades `/ws` requests and runs the per-connection loop: inbound frames
 * are decoded into `ClientMessage`s and dispatched to the hub contract
 * functions; room events arrive on the joined room's broadcast channel and
 * are written back out, dropping the connection's own echoes.
 *
 * Malformed frames are logged and discarded; they never terminate the
 * connection or reach the relay.
 */
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

use crate::backend::hub::connection::{
    disconnect, join_document, submit_cursor, submit_operation, RoomSession,
};
use crate::backend::rooms::RoomEvent;
use crate::backend::server::state::AppState;
use crate::shared::protocol::{ClientMessage, ServerMessage};

/// WebSocket upgrade handler for the collaboration channel
///
/// No authentication happens here: the channel is deliberately open to any
/// connection that knows a map id (link-sharing trust model).
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Run one connection until it closes
async fn handle_socket(mut socket: WebSocket, state: AppState) {
    let connection_id = Uuid::new_v4();
    let mut session: Option<RoomSession> = None;
    tracing::info!("User connected: {}", connection_id);

    loop {
        tokio::select! {
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientMessage>(text.as_str()) {
                            Ok(message) => {
                                if handle_client_message(
                                    &state,
                                    connection_id,
                                    message,
                                    &mut session,
                                    &mut socket,
                                )
                                .await
                                .is_err()
                                {
                                    break;
                                }
                            }
                            Err(e) => {
                                tracing::debug!(
                                    "Discarding malformed frame from {}: {}",
                                    connection_id,
                                    e
                                );
                            }
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        break;
                    }
                    Some(Err(e)) => {
                        tracing::warn!("WebSocket error on {}: {}", connection_id, e);
                        break;
                    }
                    _ => {}
                }
            }
            event = room_event(&mut session) => {
                match event {
                    Ok(event) => {
                        // Sender exclusion happens here, not at broadcast time
                        if event.skip != Some(connection_id) {
                            if send_frame(&mut socket, &event.message).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(RecvError::Lagged(missed)) => {
                        tracing::warn!(
                            "Connection {} lagged behind its room by {} events",
                            connection_id,
                            missed
                        );
                    }
                    Err(RecvError::Closed) => {
                        session = None;
                    }
                }
            }
        }
    }

    disconnect(&state, connection_id, session.take());
}

/// Dispatch one decoded client frame
///
/// Returns `Err` only when writing to the socket fails, which ends the
/// connection loop.
async fn handle_client_message(
    state: &AppState,
    connection_id: Uuid,
    message: ClientMessage,
    session: &mut Option<RoomSession>,
    socket: &mut WebSocket,
) -> Result<(), axum::Error> {
    match message {
        ClientMessage::JoinMap { map_id, username } => {
            let (new_session, frames) =
                join_document(state, connection_id, &map_id, username, session.take()).await;
            *session = Some(new_session);
            for frame in &frames {
                send_frame(socket, frame).await?;
            }
        }
        ClientMessage::Operation { map_id, operation } => {
            // Fire-and-forget; the persistence task outlives this frame
            let _ = submit_operation(state, connection_id, &map_id, operation);
        }
        ClientMessage::Cursor {
            map_id,
            x,
            y,
            username,
        } => {
            submit_cursor(state, connection_id, &map_id, x, y, username);
        }
    }
    Ok(())
}

/// Wait for the next event from the joined room, or forever if none
async fn room_event(session: &mut Option<RoomSession>) -> Result<RoomEvent, RecvError> {
    match session {
        Some(session) => session.events.recv().await,
        None => std::future::pending().await,
    }
}

/// Serialize and send one frame
async fn send_frame(socket: &mut WebSocket, frame: &ServerMessage) -> Result<(), axum::Error> {
    let json = serde_json::to_string(frame).map_err(axum::Error::new)?;
    socket.send(Message::Text(json.into())).await
}
