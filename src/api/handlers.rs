//! API route handlers.

use std::sync::atomic::Ordering;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::SqlitePool;

use crate::api::error::ApiError;
use crate::db::{queries, Job};
use crate::http::server::AppState;

const MAX_PAGE_SIZE: i64 = 100;

fn pool(state: &AppState) -> Result<&SqlitePool, ApiError> {
    state.db.pool().ok_or(ApiError::DatabaseUnavailable)
}

#[derive(Debug, Deserialize)]
pub struct JobsQuery {
    pub keyword: Option<String>,
    pub limit: Option<i64>,
}

pub async fn list_jobs(
    State(state): State<AppState>,
    Query(params): Query<JobsQuery>,
) -> Result<Json<Vec<Job>>, ApiError> {
    let pool = pool(&state)?;
    let limit = params.limit.unwrap_or(50).clamp(1, MAX_PAGE_SIZE);
    let jobs = queries::recent_jobs(pool, params.keyword.as_deref(), limit).await?;
    Ok(Json(jobs))
}

pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Job>, ApiError> {
    let pool = pool(&state)?;
    queries::job_by_id(pool, id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("job"))
}

#[derive(Debug, Deserialize)]
pub struct NewSubscriber {
    pub email: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SubscriberCreated {
    pub id: i64,
    pub email: String,
}

pub async fn create_subscriber(
    State(state): State<AppState>,
    Json(body): Json<NewSubscriber>,
) -> Result<(StatusCode, Json<SubscriberCreated>), ApiError> {
    let pool = pool(&state)?;

    let email = body.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::InvalidInput("invalid email address".to_string()));
    }

    let keywords = body.keywords.join(",");
    let id = queries::insert_subscriber(pool, email, &keywords).await?;

    tracing::info!(email = %email, "Subscriber registered");
    Ok((
        StatusCode::CREATED,
        Json(SubscriberCreated {
            id,
            email: email.to_string(),
        }),
    ))
}

pub async fn delete_subscriber(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<StatusCode, ApiError> {
    let pool = pool(&state)?;

    if queries::deactivate_subscriber(pool, &email).await? {
        tracing::info!(email = %email, "Subscriber deactivated");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("subscriber"))
    }
}

pub async fn get_status(State(state): State<AppState>) -> Json<serde_json::Value> {
    let (database_connected, jobs) = match state.db.pool() {
        Some(pool) => (true, queries::job_count(pool).await.unwrap_or(0)),
        None => (false, 0),
    };

    Json(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "status": "operational",
        "database_connected": database_connected,
        "scheduler_running": state.scheduler_started.load(Ordering::SeqCst),
        "jobs": jobs,
    }))
}
