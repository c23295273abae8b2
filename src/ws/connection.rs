//! WebSocket connection loop.
//!
//! Reads frames from the peer and hands them to the [`RelayHub`] in
//! receive order, while draining the connection's outbound queue into the
//! socket. Whatever ends the loop, the hub sees exactly one disconnect.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::domain::ConnHandle;
use crate::service::RelayHub;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Text frames, and binary frames holding valid UTF-8, go to
///   [`RelayHub::handle_text`].
/// - Payloads queued on `outbound` are written as text frames.
/// - A close frame, end of stream, or any read/write error ends the loop
///   and releases the connection's roles.
pub async fn run_connection(
    socket: WebSocket,
    hub: Arc<RelayHub>,
    conn: ConnHandle,
    mut outbound: mpsc::Receiver<String>,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            // Incoming frame from the peer
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        hub.handle_text(&conn, text.as_str()).await;
                    }
                    Some(Ok(Message::Binary(bytes))) => match std::str::from_utf8(&bytes) {
                        Ok(text) => {
                            hub.handle_text(&conn, text).await;
                        }
                        Err(_) => {
                            tracing::debug!(conn_id = %conn.id(), len = bytes.len(), "non-UTF-8 binary frame ignored");
                        }
                    },
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        tracing::warn!(conn_id = %conn.id(), error = %err, "websocket read error");
                        break;
                    }
                }
            }
            // Payload routed to this connection
            payload = outbound.recv() => {
                let Some(payload) = payload else {
                    break;
                };
                if let Err(err) = ws_tx.send(Message::text(payload)).await {
                    tracing::warn!(conn_id = %conn.id(), error = %err, "websocket write error");
                    break;
                }
            }
        }
    }

    hub.disconnect(&conn).await;
    let _ = ws_tx.close().await;
    tracing::info!(conn_id = %conn.id(), "websocket disconnected");
}
