// src/routes/mod.rs
pub mod relay;

use std::path::Path;

use crate::state::SharedState;
use axum::{
    Router,
    http::{HeaderName, HeaderValue, header},
    routing::{any, get},
};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

/// Path of the generic HTTP function host binding.
pub const HTTP_FUNCTION_PATH: &str = "/api/geminiChat";
/// Path of the managed cloud function binding.
pub const CLOUD_FUNCTION_PATH: &str = "/geminiChat";

pub fn create_router(static_dir: impl AsRef<Path>) -> Router<SharedState> {
    // `any` so the relay core decides on 204 / 405 itself.
    let relay_routes: Router<SharedState> = Router::new()
        .route(HTTP_FUNCTION_PATH, any(relay::http_function))
        .route(CLOUD_FUNCTION_PATH, any(relay::cloud_function))
        .layer(cors_header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .layer(cors_header(header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"))
        .layer(cors_header(header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"));

    Router::new()
        .merge(relay_routes)
        .route("/health", get(|| async { "OK" }))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
}

fn cors_header(name: HeaderName, value: &'static str) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(name, HeaderValue::from_static(value))
}
