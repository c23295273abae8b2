//! Shared helpers: spawn a relay on an ephemeral port and drive it with
//! WebSocket peers.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use haptic_relay::api::build_app;
use haptic_relay::app_state::AppState;
use haptic_relay::config::RelayConfig;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

/// How long a peer waits for a frame before giving up.
pub const RECV_TIMEOUT: Duration = Duration::from_secs(2);

/// How long a peer listens when asserting that nothing arrives.
pub const QUIET_PERIOD: Duration = Duration::from_millis(200);

/// Starts a relay serving `monitor_page_path` and returns its address.
pub async fn spawn_relay(monitor_page_path: PathBuf) -> SocketAddr {
    let Ok(listener) = TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind ephemeral port");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("listener has an address");
    };
    let config = RelayConfig {
        listen_addr: addr,
        monitor_page_path,
        ..RelayConfig::default()
    };
    let app = build_app(AppState::new(config));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// A WebSocket peer connected to the relay.
pub struct Peer {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl Peer {
    /// Opens a WebSocket connection to the relay root.
    pub async fn connect(addr: SocketAddr) -> Self {
        let Ok((ws, _)) = tokio_tungstenite::connect_async(format!("ws://{addr}/")).await else {
            panic!("websocket handshake with {addr}");
        };
        Self { ws }
    }

    /// Sends one text frame.
    pub async fn send(&mut self, payload: &str) {
        if self.ws.send(Message::text(payload.to_string())).await.is_err() {
            panic!("send {payload:?}");
        }
    }

    /// Waits for the next text frame.
    pub async fn recv(&mut self) -> String {
        match tokio::time::timeout(RECV_TIMEOUT, self.ws.next()).await {
            Ok(Some(Ok(Message::Text(text)))) => text.as_str().to_string(),
            other => panic!("expected a text frame, got {other:?}"),
        }
    }

    /// Waits for the next frame and parses it as JSON.
    pub async fn recv_json(&mut self) -> serde_json::Value {
        let text = self.recv().await;
        let Ok(value) = serde_json::from_str(&text) else {
            panic!("expected JSON, got {text:?}");
        };
        value
    }

    /// Asserts that no frame arrives within [`QUIET_PERIOD`].
    pub async fn assert_silent(&mut self) {
        if let Ok(frame) = tokio::time::timeout(QUIET_PERIOD, self.ws.next()).await {
            panic!("expected silence, got {frame:?}");
        }
    }

    /// Sends a close frame and waits for the connection to end.
    pub async fn close(mut self) {
        let _ = self.ws.close(None).await;
        while let Ok(Some(Ok(_))) = tokio::time::timeout(RECV_TIMEOUT, self.ws.next()).await {}
    }

    /// Drops the TCP stream without a close handshake, like a peer that
    /// lost power or network.
    pub fn drop_connection(self) {
        drop(self.ws);
    }

    /// Connects and announces as a monitor, consuming the welcome frame.
    pub async fn monitor(addr: SocketAddr) -> Self {
        let mut peer = Self::connect(addr).await;
        peer.send("web_monitor").await;
        assert_eq!(peer.recv().await, "web_monitor");
        peer
    }
}
