//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: gate and store wiring
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `errors.rs`: the single error-to-response translation

use std::sync::Arc;
use std::time::Duration;

use axum::error_handling::HandleErrorLayer;
use axum::{BoxError, Extension, Router, routing::get};
use tower::ServiceBuilder;
use tower::timeout::TimeoutLayer;
use tower::timeout::error::Elapsed;
use tower_http::trace::TraceLayer;

use errors::ApiError;

pub mod errors;
pub mod routes;
pub mod services;

pub use services::{AppServices, build_services};

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// `request_timeout` bounds the whole request; on expiry the handler future,
/// identity resolution included, is dropped and the client gets a 504.
pub fn build_app(services: AppServices, request_timeout: Duration) -> Router {
    let protected = routes::router().layer(Extension(Arc::new(services)));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .layer(TimeoutLayer::new(request_timeout)),
        )
}

async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<Elapsed>() {
        tracing::warn!("request deadline exceeded");
        ApiError::Timeout
    } else {
        tracing::error!(error = %err, "unhandled middleware error");
        ApiError::Internal
    }
}
