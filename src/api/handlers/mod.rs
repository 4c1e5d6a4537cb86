//! REST endpoint handlers organized by resource.

pub mod bookings;
pub mod cancellation;
pub mod modification;
pub mod sync;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(bookings::routes())
        .merge(modification::routes())
        .merge(sync::routes())
}
