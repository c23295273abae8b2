//! HTTP surface: page handlers and router composition.
//!
//! Only two paths exist: `/` (monitor page, or WebSocket upgrade) and
//! `/test` (diagnostics). Every other path is answered with 404.

pub mod handlers;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;

/// Builds the router with every page route and the not-found fallback.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(handlers::routes())
        .fallback(handlers::pages::not_found_handler)
}

/// Builds the complete application, with request tracing, bound to `state`.
pub fn build_app(state: AppState) -> Router {
    build_router()
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
