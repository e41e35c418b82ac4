//! Advisory routes
//!
//! The alerts feed is refreshed out-of-band by state changes; GET only
//! reads the latest applied list. Q&A goes straight to the Gemini
//! client, which degrades internally instead of erroring.

use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::response::DataResponse;
use crate::app::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
}

/// GET /advisory/alerts
pub async fn get_alerts(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(DataResponse::new(state.alerts.current()))
}

/// POST /advisory/ask
pub async fn ask(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AskRequest>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!("Advisory question received");

    let settings = state.settings.get();
    let budgets = state.budgets.list();
    let answer = state
        .gemini
        .analyze(&settings.api_key, &budgets, &req.question)
        .await;

    Ok(DataResponse::new(AskResponse { answer }))
}
