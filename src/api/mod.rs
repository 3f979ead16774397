//! API subsystem, mounted under `/api`.
//!
//! # Endpoints
//! - `GET    /api/jobs` — recent jobs, optional `keyword`/`limit` query
//! - `GET    /api/jobs/{id}` — single job
//! - `POST   /api/subscribers` — register a subscriber
//! - `DELETE /api/subscribers/{email}` — deactivate a subscriber
//! - `GET    /api/status` — service status for dashboards
//!
//! # Design Decisions
//! - Handlers never block on the database being up; an unconnected pool
//!   maps to 503 rather than an error at mount time

pub mod error;
pub mod handlers;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::http::server::AppState;

pub use error::ApiError;

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/jobs", get(handlers::list_jobs))
        .route("/jobs/{id}", get(handlers::get_job))
        .route("/subscribers", post(handlers::create_subscriber))
        .route("/subscribers/{email}", delete(handlers::delete_subscriber))
        .route("/status", get(handlers::get_status))
        .with_state(state)
}
