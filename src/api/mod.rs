//! API layer - HTTP handlers and routing
//!
//! JSON endpoints live under `/api/v1`:
//! - Listing endpoints (browse, search, detail)
//! - Inquiry endpoints
//! - Search form choices
//!
//! `build_router` also mounts the HTML pages from `crate::web` and the
//! theme's static files.

pub mod common;
pub mod inquiries;
pub mod listings;
pub mod middleware;
pub mod responses;
pub mod static_files;

use axum::{middleware as axum_middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::web;

pub use middleware::{ApiError, AppState};

/// Build the JSON API router
pub fn build_api_router() -> Router<AppState> {
    Router::new()
        .nest("/listings", listings::router())
        .nest("/inquiries", inquiries::router())
        .route("/choices", get(listings::get_choices))
        .fallback(|| async { ApiError::not_found("Endpoint not found") })
}

/// Build the complete router with middleware
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(web::router())
        .nest("/api/v1", build_api_router())
        .route("/static/{*path}", get(static_files::serve_static))
        .fallback(web::not_found)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            web::render_error_pages,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod tests;
