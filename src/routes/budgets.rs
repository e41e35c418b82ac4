//! Budget routes
//!
//! Creation, lifecycle transitions, boleto tracking and deletion.
//! Mutations persist through the store and kick off a background
//! advisory refresh.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::response::{DataResponse, NoContent};
use crate::app::AppState;
use crate::domain::budgets::{CreateBudgetRequest, IssueBoletoRequest, UpdateStatusRequest};
use crate::error::ApiError;

/// POST /budgets
///
/// Create a budget. Derived cost fields come from the pricing calculator
/// with the current shop settings; the core accepts any numbers, so the
/// only boundary checks are the required client fields.
pub async fn create_budget(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateBudgetRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.client_name.trim().is_empty() {
        return Err(ApiError::BadRequest("client_name is required".to_string()));
    }
    if req.client_phone.trim().is_empty() {
        return Err(ApiError::BadRequest("client_phone is required".to_string()));
    }

    tracing::info!(
        client_name = %req.client_name,
        service_type = %req.service_type,
        "Creating budget"
    );

    let settings = state.settings.get();
    let budget = state.budgets.add(req, &settings)?;
    state.refresh_alerts();

    Ok((StatusCode::CREATED, Json(DataResponse::new(budget))))
}

/// GET /budgets
///
/// Full snapshot, most-recently-created first.
pub async fn list_budgets(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(DataResponse::new(state.budgets.list()))
}

/// PATCH /budgets/:id/status
///
/// Apply a lifecycle transition. Illegal edges return 409.
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!(budget_id = %id, status = ?req.status, "Updating budget status");

    let budget = state.budgets.transition_status(id, req.status)?;
    state.refresh_alerts();

    Ok(DataResponse::new(budget))
}

/// POST /budgets/:id/boleto
///
/// Mark the boleto as issued with a due date. Re-issuing overwrites the
/// due date.
pub async fn issue_boleto(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<IssueBoletoRequest>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!(budget_id = %id, due_date = %req.due_date, "Issuing boleto");

    let budget = state.budgets.issue_boleto(id, req.due_date)?;
    state.refresh_alerts();

    Ok(DataResponse::new(budget))
}

/// POST /budgets/:id/boleto/paid
///
/// Mark the boleto as paid. Idempotent.
pub async fn mark_boleto_paid(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!(budget_id = %id, "Marking boleto paid");

    let budget = state.budgets.mark_boleto_paid(id)?;
    state.refresh_alerts();

    Ok(DataResponse::new(budget))
}

/// DELETE /budgets/:id
///
/// Permanently remove a budget.
pub async fn delete_budget(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!(budget_id = %id, "Deleting budget");

    state.budgets.delete(id)?;
    state.refresh_alerts();

    Ok(NoContent)
}
