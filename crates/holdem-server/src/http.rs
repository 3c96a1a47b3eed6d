//! Read-only HTTP surface: room listings and full (unredacted) room state.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use holdem_protocol::{RoomId, RoomSummary, TableView};
use serde::Serialize;
use tokio::net::TcpListener;

use crate::server::ServerState;
use crate::ServerError;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/api/rooms", get(list_rooms))
        .route("/api/rooms/{room_id}", get(room_state))
        .with_state(state)
}

/// Serves the router on an already-bound listener.
pub async fn serve(listener: TcpListener, state: Arc<ServerState>) -> Result<(), ServerError> {
    tracing::info!(addr = ?listener.local_addr(), "HTTP listener bound");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn list_rooms(State(state): State<Arc<ServerState>>) -> Json<Vec<RoomSummary>> {
    let shared = state.shared.lock().await;
    Json(shared.registry.list())
}

/// Full room state with every hand visible. Diagnostic surface; not meant
/// for players.
async fn room_state(
    State(state): State<Arc<ServerState>>,
    Path(room_id): Path<String>,
) -> Result<Json<TableView>, (StatusCode, Json<ErrorBody>)> {
    let shared = state.shared.lock().await;
    match shared.registry.get(&RoomId(room_id)) {
        Some(table) => Ok(Json(table.view_unredacted())),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorBody {
                error: "room not found".into(),
            }),
        )),
    }
}
