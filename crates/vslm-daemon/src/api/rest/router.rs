//! API Router configuration

use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Servers
        .route("/server", post(handlers::create_server))
        .route("/server/:id", get(handlers::get_server))
        .route("/servers", get(handlers::list_servers))
        .route("/servers/:id/action", post(handlers::apply_action))
        .route("/servers/:id/logs", get(handlers::get_server_logs))
        // Events
        .route("/events/stream", get(handlers::stream_events));

    // Build router with middleware
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/status", get(handlers::daemon_status))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
