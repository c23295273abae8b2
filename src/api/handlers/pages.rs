//! Page endpoints: monitor document, diagnostics, not-found fallback.

use axum::Router;
use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::http::Uri;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;

use crate::app_state::AppState;
use crate::domain::RegistrySnapshot;
use crate::error::RelayError;
use crate::ws::handler::upgrade;

/// Flags listed on the diagnostics cheat sheet.
const CHEAT_SHEET_BITS: u8 = 6;

/// `GET /` — WebSocket upgrade for peers, monitor page for browsers.
pub async fn root_handler(
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
    State(state): State<AppState>,
) -> Response {
    match ws {
        Ok(ws) => upgrade(ws, &state),
        Err(_) => monitor_page(&state).await.into_response(),
    }
}

/// Reads the configured monitor document on every request.
///
/// # Errors
///
/// Returns [`RelayError::PageUnavailable`] if the file cannot be read.
async fn monitor_page(state: &AppState) -> Result<Html<Vec<u8>>, RelayError> {
    let body = tokio::fs::read(&state.config.monitor_page_path).await?;
    Ok(Html(body))
}

/// `GET /test` — human-readable relay status.
pub async fn diagnostics_handler(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.hub.snapshot().await;
    Html(render_diagnostics(state.config.listen_addr.port(), &snapshot))
}

/// Fallback for every unknown path.
pub async fn not_found_handler(uri: Uri) -> RelayError {
    RelayError::PageNotFound(uri.path().to_string())
}

fn render_diagnostics(port: u16, snapshot: &RegistrySnapshot) -> String {
    let mut html = format!(
        "<h1>haptic-relay diagnostics</h1>\n\
         <p>Relay running, version {version}</p>\n\
         <p>WebSocket port: {port}</p>\n\
         <ul>\n\
         <li>device: {device}</li>\n\
         <li>actuator: {actuator}</li>\n\
         <li>monitors: {monitors}</li>\n\
         </ul>\n\
         <p>Numeric status examples:</p>\n<ul>\n",
        version = env!("CARGO_PKG_VERSION"),
        device = link_state(snapshot.device_bound),
        actuator = link_state(snapshot.actuator_bound),
        monitors = snapshot.monitors,
    );
    html.extend(
        (0..CHEAT_SHEET_BITS).map(|bit| format!("<li>{} = BIT{bit}</li>\n", 1_u16 << bit)),
    );
    html.push_str("</ul>\n<p>Example: 34 = BIT1 + BIT5 (2 + 32)</p>\n");
    html
}

const fn link_state(bound: bool) -> &'static str {
    if bound { "connected" } else { "not connected" }
}

/// Page routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root_handler))
        .route("/test", get(diagnostics_handler))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use super::*;
    use crate::api::build_app;
    use crate::config::RelayConfig;

    async fn get_page(state: AppState, path: &str) -> (StatusCode, Option<String>, String) {
        let Ok(request) = Request::builder().uri(path).body(Body::empty()) else {
            panic!("valid request");
        };
        let Ok(response) = build_app(state).oneshot(request).await else {
            panic!("router is infallible");
        };
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let Ok(bytes) = to_bytes(response.into_body(), usize::MAX).await else {
            panic!("readable body");
        };
        (status, content_type, String::from_utf8_lossy(&bytes).into_owned())
    }

    fn state_with_page(path: std::path::PathBuf) -> AppState {
        AppState::new(RelayConfig {
            monitor_page_path: path,
            ..RelayConfig::default()
        })
    }

    #[test]
    fn diagnostics_lists_bits_and_roles() {
        let html = render_diagnostics(
            8080,
            &RegistrySnapshot {
                device_bound: true,
                actuator_bound: false,
                monitors: 2,
            },
        );
        assert!(html.contains("WebSocket port: 8080"));
        assert!(html.contains("device: connected"));
        assert!(html.contains("actuator: not connected"));
        assert!(html.contains("monitors: 2"));
        assert!(html.contains("<li>1 = BIT0</li>"));
        assert!(html.contains("<li>32 = BIT5</li>"));
        assert!(!html.contains("BIT6"));
        assert!(html.ends_with("(2 + 32)</p>\n"));
    }

    #[tokio::test]
    async fn root_serves_monitor_page() {
        let path = std::env::temp_dir().join(format!("monitor-{}.html", uuid::Uuid::new_v4()));
        if std::fs::write(&path, "<h1>monitor</h1>").is_err() {
            panic!("temp dir must be writable");
        }

        let (status, content_type, body) = get_page(state_with_page(path.clone()), "/").await;
        let _ = std::fs::remove_file(&path);

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("text/html; charset=utf-8"));
        assert_eq!(body, "<h1>monitor</h1>");
    }

    #[tokio::test]
    async fn missing_monitor_page_is_404() {
        let path = std::env::temp_dir().join(format!("absent-{}.html", uuid::Uuid::new_v4()));
        let (status, _, body) = get_page(state_with_page(path), "/").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "File not found");
    }

    #[tokio::test]
    async fn test_page_reflects_registry() {
        let state = AppState::new(RelayConfig::default());
        let (device, _rx) = state.hub.connect();
        state.hub.handle_text(&device, "sensor_device").await;

        let (status, _, body) = get_page(state, "/test").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("device: connected"));
        assert!(body.contains("actuator: not connected"));
    }

    #[tokio::test]
    async fn unknown_path_is_404() {
        let state = AppState::new(RelayConfig::default());
        let (status, _, body) = get_page(state, "/admin").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Not Found");
    }
}
