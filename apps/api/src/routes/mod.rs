pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::chat::handlers::handle_chat;
use crate::scoring::handlers::handle_score;
use crate::state::AppState;
use crate::upload::handlers::handle_upload;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/chat", post(handle_chat))
        .route("/upload", post(handle_upload))
        .route("/score", post(handle_score))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Any origin, method and header, with credentials. Wildcards cannot be
/// combined with credentials, so the request's own values are mirrored back.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
