//! Dashboard route
//!
//! Derived metrics recomputed from the current budget snapshot on every
//! read.

use axum::{extract::State, response::IntoResponse};
use chrono::Utc;
use std::sync::Arc;

use crate::api::response::DataResponse;
use crate::app::AppState;
use crate::domain::metrics;
use crate::error::ApiError;

/// GET /dashboard
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = state.budgets.list();
    Ok(DataResponse::new(metrics::compute(&snapshot, Utc::now())))
}
