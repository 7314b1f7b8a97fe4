//! Router setup with routes and middleware.

use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::handlers;
use crate::state::{ActionState, ChatState};

/// Router of the action server the dialogue manager calls.
pub fn create_action_router(state: ActionState) -> Router {
    Router::new()
        .route("/webhook", post(handlers::run_action))
        .route("/actions", get(handlers::list_actions))
        .route("/health", get(handlers::action_health))
        .route("/recommend", post(handlers::recommend))
        .route("/catalog/reload", post(handlers::reload_catalog))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Router of the chat façade the web frontend calls.
pub fn create_chat_router(state: ChatState) -> Router {
    let cors = cors_layer(&state.allowed_origins);
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::chat_health))
        .route("/chat", post(handlers::chat))
        .route("/webhook", post(handlers::chat_webhook))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Any origin when `origins` is empty, otherwise exactly the listed ones.
/// Entries that are not valid header values are skipped.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let list: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(list))
}
