pub mod advisory;
pub mod budgets;
pub mod dashboard;
pub mod health;
pub mod settings;

use axum::{routing::delete, routing::get, routing::patch, routing::post, Router};
use std::sync::Arc;

use crate::app::AppState;

/// Build the API router with all routes
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        // Budgets
        .route("/budgets", post(budgets::create_budget))
        .route("/budgets", get(budgets::list_budgets))
        .route("/budgets/:budget_id/status", patch(budgets::update_status))
        .route("/budgets/:budget_id/boleto", post(budgets::issue_boleto))
        .route(
            "/budgets/:budget_id/boleto/paid",
            post(budgets::mark_boleto_paid),
        )
        .route("/budgets/:budget_id", delete(budgets::delete_budget))
        // Settings
        .route("/settings", get(settings::get_settings))
        .route("/settings", patch(settings::update_settings))
        // Dashboard metrics
        .route("/dashboard", get(dashboard::get_dashboard))
        // Advisory
        .route("/advisory/alerts", get(advisory::get_alerts))
        .route("/advisory/ask", post(advisory::ask))
}
