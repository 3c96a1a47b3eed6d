//! Per-connection handler: socket setup, event routing, and teardown.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. WebSocket handshake, assign a `ConnectionId`
//!   2. Split the socket; a writer task pumps the outbox onto the sink
//!   3. Loop: decode `ClientEvent`s and dispatch against the shared state
//!   4. On close: unseat the player, notify the room, drop empty rooms

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use holdem_engine::TableError;
use holdem_protocol::{
    ActionKind, ClientEvent, Codec, ConnectionId, JsonCodec, RoomId, ServerEvent,
};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

use crate::server::{ServerState, Shared};
use crate::ServerError;

/// Counter for generating unique connection IDs.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    state: Arc<ServerState>,
) -> Result<(), ServerError> {
    let ws = tokio_tungstenite::accept_async(stream).await?;
    let conn_id = ConnectionId::new(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed));
    tracing::debug!(%conn_id, %addr, "accepted WebSocket connection");

    let (mut sink, mut source) = ws.split();
    let (outbox, mut events) = mpsc::unbounded_channel::<ServerEvent>();

    // The writer task owns the sink; it drains the outbox until the sync
    // service drops the sender at unregister.
    let writer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let data = match JsonCodec.encode(&event) {
                Ok(data) => data,
                Err(e) => {
                    tracing::error!(error = %e, "failed to encode event");
                    continue;
                }
            };
            if sink.send(Message::Binary(data.into())).await.is_err() {
                break;
            }
        }
        let _ = sink.close().await;
    });

    state.shared.lock().await.sync.register(conn_id, outbox);

    while let Some(message) = source.next().await {
        let message = match message {
            Ok(message) => message,
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                break;
            }
        };
        let data = match message {
            Message::Binary(data) => data.to_vec(),
            Message::Text(text) => text.as_bytes().to_vec(),
            Message::Close(_) => break,
            _ => continue, // skip ping/pong/frame
        };
        let event: ClientEvent = match JsonCodec.decode(&data) {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "failed to decode event");
                continue;
            }
        };
        dispatch(&state, conn_id, event).await;
    }

    disconnect(&state, conn_id).await;
    // Unregistering dropped the outbox, so the writer drains and exits.
    let _ = writer.await;
    tracing::debug!(%conn_id, "connection closed");
    Ok(())
}

/// Routes one client event. The whole dispatch runs under the shared lock,
/// so each event is applied atomically before the next is looked at.
async fn dispatch(state: &Arc<ServerState>, conn_id: ConnectionId, event: ClientEvent) {
    let mut guard = state.shared.lock().await;
    let shared = &mut *guard;
    match event {
        ClientEvent::Join { room_id, player_name } => {
            handle_join(shared, conn_id, room_id, player_name);
        }
        ClientEvent::Start { room_id } => {
            handle_start(shared, conn_id, &room_id);
        }
        ClientEvent::Action { room_id, action } => {
            handle_action(shared, conn_id, &room_id, action);
        }
    }
}

fn handle_join(shared: &mut Shared, conn_id: ConnectionId, room_id: RoomId, player_name: String) {
    let Shared { registry, sync, memberships } = shared;
    let table = registry.find_or_create(&room_id);
    match table.add_player(&player_name, conn_id) {
        Ok(outcome) => {
            memberships.insert(conn_id, room_id.clone());
            sync.send(
                conn_id,
                ServerEvent::JoinResult {
                    success: true,
                    state: Some(table.view_for(conn_id)),
                    player_id: Some(outcome.player_id.clone()),
                    message: None,
                },
            );
            if outcome.reconnected {
                // The seat already existed; just refresh everyone.
                sync.broadcast_state(table);
            } else {
                sync.broadcast_player_joined(table, conn_id);
            }
            tracing::info!(
                %room_id,
                %conn_id,
                player_id = %outcome.player_id,
                player = %player_name,
                reconnected = outcome.reconnected,
                "player joined"
            );
        }
        Err(e) => {
            tracing::debug!(%room_id, %conn_id, error = %e, "join rejected");
            sync.send(
                conn_id,
                ServerEvent::JoinResult {
                    success: false,
                    state: None,
                    player_id: None,
                    message: Some(e.to_string()),
                },
            );
        }
    }
}

fn handle_start(shared: &mut Shared, conn_id: ConnectionId, room_id: &RoomId) {
    let Shared { registry, sync, .. } = shared;
    let Some(table) = registry.get_mut(room_id) else {
        sync.send(
            conn_id,
            ServerEvent::ActionRejected {
                reason: format!("room {room_id} not found"),
            },
        );
        return;
    };
    // Signals from connections with no seat at the table are stale; ignore.
    if table.seat_of(conn_id).is_none() {
        tracing::debug!(%room_id, %conn_id, "start from unseated connection, ignoring");
        return;
    }
    match table.start() {
        Ok(()) => sync.broadcast_started(table),
        Err(e) => {
            tracing::debug!(%room_id, %conn_id, error = %e, "start rejected");
            sync.send(
                conn_id,
                ServerEvent::ActionRejected {
                    reason: e.to_string(),
                },
            );
        }
    }
}

fn handle_action(shared: &mut Shared, conn_id: ConnectionId, room_id: &RoomId, action: ActionKind) {
    let Shared { registry, sync, .. } = shared;
    let Some(table) = registry.get_mut(room_id) else {
        sync.send(
            conn_id,
            ServerEvent::ActionRejected {
                reason: format!("room {room_id} not found"),
            },
        );
        return;
    };
    match table.apply_action(conn_id, action) {
        Ok(()) => sync.broadcast_state(table),
        Err(TableError::UnknownPlayer) => {
            tracing::debug!(%room_id, %conn_id, "action from unseated connection, ignoring");
        }
        Err(e) => {
            tracing::debug!(%room_id, %conn_id, error = %e, "action rejected");
            sync.send(
                conn_id,
                ServerEvent::ActionRejected {
                    reason: e.to_string(),
                },
            );
        }
    }
}

/// Unseats the player bound to a closed connection and drops the room if
/// that was its last seat.
async fn disconnect(state: &Arc<ServerState>, conn_id: ConnectionId) {
    let mut guard = state.shared.lock().await;
    let shared = &mut *guard;
    shared.sync.unregister(conn_id);
    let Some(room_id) = shared.memberships.remove(&conn_id) else {
        return;
    };
    if let Some(table) = shared.registry.get_mut(&room_id) {
        if let Some(player) = table.remove_connection(conn_id) {
            tracing::info!(%room_id, %conn_id, player_id = %player.id, "player left");
            shared.sync.broadcast_player_left(table);
        }
    }
    shared.registry.remove_if_empty(&room_id);
}
