//! Channel-manager sync handler.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::SyncParams;
use crate::app_state::AppState;
use crate::error::{EngineError, ErrorResponse};
use crate::service::SyncReport;

/// `POST /sync/run` — Pull the channel-manager feed and reconcile it.
///
/// # Errors
///
/// Returns [`EngineError::Upstream`] when the feed fetch fails.
#[utoipa::path(
    post,
    path = "/api/v1/sync/run",
    tag = "Sync",
    summary = "Run a channel sync",
    description = "Fetches external bookings in the date window and imports each at most once. Duplicates and malformed records are skipped, never fatal.",
    params(SyncParams),
    responses(
        (status = 200, description = "Reconciliation counters", body = SyncReport),
        (status = 502, description = "Channel-manager feed unavailable", body = ErrorResponse),
    )
)]
pub async fn run_sync(
    State(state): State<AppState>,
    Query(params): Query<SyncParams>,
) -> Result<impl IntoResponse, EngineError> {
    let (from, to) = params.window();
    let report = state.sync_service.run(from, to).await?;
    Ok(Json(report))
}

/// Sync routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/sync/run", post(run_sync))
}
