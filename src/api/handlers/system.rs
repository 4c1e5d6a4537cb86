//! System endpoints: health check and the modification-policy summary.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Policy knobs the booking site shows to guests.
#[derive(Debug, Serialize, ToSchema)]
struct PolicyInfo {
    free_cancel_threshold_days: i64,
    late_change_penalty_pct: u32,
    deposit_pct: u32,
}

/// `GET /config/policy` — Current modification policy.
#[utoipa::path(
    get,
    path = "/config/policy",
    tag = "System",
    summary = "Modification policy",
    description = "Returns the cancellation threshold, late-change penalty, and deposit split currently in force.",
    responses(
        (status = 200, description = "Policy knobs", body = PolicyInfo),
    )
)]
pub async fn policy_handler(State(state): State<AppState>) -> impl IntoResponse {
    let policy = state.policy;
    (
        StatusCode::OK,
        Json(PolicyInfo {
            free_cancel_threshold_days: policy.free_cancel_threshold_days,
            late_change_penalty_pct: policy.late_change_penalty_pct,
            deposit_pct: policy.deposit_pct,
        }),
    )
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/policy", get(policy_handler))
}
