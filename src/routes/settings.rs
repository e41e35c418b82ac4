//! Shop settings routes

use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

use crate::api::response::DataResponse;
use crate::app::AppState;
use crate::domain::settings::UpdateSettingsRequest;
use crate::error::ApiError;

/// GET /settings
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(DataResponse::new(state.settings.get()))
}

/// PATCH /settings
///
/// Merge supplied fields into the settings record. A credential change
/// re-triggers the advisory feed.
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateSettingsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!("Updating shop settings");

    let settings = state.settings.update(req)?;
    state.refresh_alerts();

    Ok(DataResponse::new(settings))
}
