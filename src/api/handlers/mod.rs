//! HTTP endpoint handlers.

pub mod pages;

use axum::Router;

use crate::app_state::AppState;

/// Composes the page routes. The root path doubles as the WebSocket
/// endpoint.
pub fn routes() -> Router<AppState> {
    Router::new().merge(pages::routes())
}
