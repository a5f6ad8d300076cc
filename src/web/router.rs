//! Router configuration for the hub.

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::exchange::RateSource;

use super::ws::{hub_ws_handler, HubState};

/// Create the hub router.
///
/// - `GET /` upgrades to the chat WebSocket
/// - `GET /health` returns `OK`
pub fn create_router<S: RateSource + 'static>(state: Arc<HubState<S>>) -> Router {
    Router::new()
        .route("/", get(hub_ws_handler::<S>))
        .with_state(state)
        .merge(create_health_router())
        .layer(TraceLayer::new_for_http())
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check() {
        assert_eq!(health_check().await, "OK");
    }

    #[test]
    fn test_create_health_router() {
        let _router = create_health_router();
    }
}
