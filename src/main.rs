//! haptic-relay server entry point.
//!
//! Starts the Axum HTTP server serving the pages and the WebSocket endpoint.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use haptic_relay::api::build_app;
use haptic_relay::app_state::AppState;
use haptic_relay::config::{LogFormat, RelayConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = RelayConfig::from_env().context("loading configuration")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    let listen_addr = config.listen_addr;
    tracing::info!(
        addr = %listen_addr,
        monitor_page = %config.monitor_page_path.display(),
        "starting haptic-relay"
    );

    // Build application
    let app = build_app(AppState::new(config));

    // Start server
    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("binding {listen_addr}"))?;
    tracing::info!(addr = %listen_addr, "server listening");

    axum::serve(listener, app).await.context("serving")?;

    Ok(())
}
