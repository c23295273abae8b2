//! Axum WebSocket upgrade handler.

use std::sync::Arc;

use axum::extract::ws::WebSocketUpgrade;
use axum::response::Response;

use super::connection::run_connection;
use crate::app_state::AppState;

/// Upgrades the request and hands the socket to a fresh relay connection.
pub fn upgrade(ws: WebSocketUpgrade, state: &AppState) -> Response {
    let hub = Arc::clone(&state.hub);

    ws.on_upgrade(move |socket| async move {
        let (conn, outbound) = hub.connect();
        tracing::info!(conn_id = %conn.id(), "websocket connected");
        run_connection(socket, hub, conn, outbound).await;
    })
}
