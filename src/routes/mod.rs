//! Router assembly: API endpoints, CORS, body-size limit, and HTTP tracing.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{warn, Level};

use crate::state::AppState;

pub mod http;

/// Screenshot payloads arrive base64-inline in the JSON body, so the default
/// 2 MB axum limit is far too small.
pub const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Build the application router with:
/// - REST API under `/api/...`
/// - CORS from ALLOWED_ORIGINS (allow-any when unset)
/// - 50 MB JSON body limit
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = match &state.settings.allowed_origins {
        Some(origins) => {
            let parsed: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|o| match o.parse::<HeaderValue>() {
                    Ok(v) => Some(v),
                    Err(_) => {
                        warn!(target: "snapsolve", origin = %o, "ignoring unparsable CORS origin");
                        None
                    }
                })
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(parsed))
                .allow_methods(Any)
                .allow_headers(Any)
        }
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    Router::new()
        .route("/api/health", get(http::http_health))
        .route("/api/extract", post(http::http_post_extract))
        .route("/api/generate", post(http::http_post_generate))
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}
