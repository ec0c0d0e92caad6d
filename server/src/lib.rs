//! DermaSense HTTP server
//!
//! Routes, shared state and error mapping for the diagnosis API. The binary in
//! `main.rs` only parses configuration, builds the [`AppState`] and serves
//! [`build_router`].

pub mod error;
pub mod routes;
pub mod state;
pub mod uploads;

use std::any::Any;

use axum::{
    extract::DefaultBodyLimit,
    response::{IntoResponse, Response},
    routing::{get, get_service, post},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::error;

pub use error::{ApiError, ApiResult};
pub use state::{AppState, ServerConfig, SharedState};

/// Turn a handler panic into the usual JSON 500
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!("Handler panicked: {}", detail);

    ApiError::Internal("Internal server error".to_string()).into_response()
}

/// Build the application router
pub fn build_router(state: SharedState) -> Router {
    let static_dir = state.config.static_dir.clone();
    let upload_dir = state.config.upload_dir.clone();
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        // Health and status
        .route("/health", get(routes::health::health_check))
        .route("/debug", get(routes::health::debug_status))

        // Diagnosis
        .route("/predict", post(routes::predict::predict))

        // SMS
        .route("/send_sms", post(routes::sms::send_sms))
        .route(
            "/test_sms",
            get(routes::sms::test_sms_page).post(routes::sms::test_sms),
        )

        // Contact form
        .route(
            "/contact",
            get_service(ServeFile::new(static_dir.join("contact.html")))
                .post(routes::contact::submit_form),
        )
        .route("/messages", get(routes::contact::list_messages))
        .route(
            "/api/contact",
            get(routes::contact::list_messages).post(routes::contact::submit_json),
        )

        // Pages and uploaded images
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .route_service("/location", ServeFile::new(static_dir.join("location.html")))
        .nest_service("/uploads", ServeDir::new(upload_dir))
        .fallback_service(ServeDir::new(static_dir))

        // Add state
        .with_state(state)

        // Add middleware
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(AnyOrigin)
                .allow_methods(AnyOrigin)
                .allow_headers(AnyOrigin),
        )
        .layer(CatchPanicLayer::custom(panic_response))
}
