//! HTTP application wiring (axum router + service wiring).
//!
//! - `services.rs`: the shared order service and its repository
//! - `routes/`: handlers, one file per resource
//! - `dto.rs`: request DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{http::StatusCode, response::Response, routing::get, Extension, Router};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router with a fresh, empty order store.
pub fn build_app() -> Router {
    build_app_with(Arc::new(services::build_services()))
}

/// Build the router around an existing service graph (tests share one).
pub fn build_app_with(services: Arc<AppServices>) -> Router {
    Router::new()
        .route("/", get(routes::system::index))
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::log_requests))
                .layer(Extension(services)),
        )
}

async fn not_found() -> Response {
    errors::json_error(StatusCode::NOT_FOUND, "no such resource")
}
