//! Route definitions for the farm advisory API

use axum::{
    routing::{delete, get},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/advisory", advisory_routes())
}

/// Advisory routes (public)
fn advisory_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_advisory))
        .route("/rules", get(handlers::list_rules))
        .route("/cache", delete(handlers::invalidate_weather))
}
