//! Axum router configuration with middleware.
//!
//! Routes:
//! - `GET /ws`: chat channel (WebSocket upgrade)
//! - `GET /listings/{id}/messages`: conversation history (bearer token)
//! - `GET /health`: liveness probe
//!
//! Middleware: CORS (when `cors_permissive` is set) and request tracing.

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/ws", get(handlers::ws::ws_handler))
        .route(
            "/listings/{id}/messages",
            get(handlers::message::list_messages),
        )
        .route("/health", get(health_check));

    if state.config.cors_permissive {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        router = router.layer(cors);
    }

    router
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint (no auth required).
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
