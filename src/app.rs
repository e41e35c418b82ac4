use axum::{http::HeaderValue, Router};
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::config::Config;
use crate::middleware::request_id_layer;
use crate::routes;
use crate::services::{AlertsFeed, GeminiClient};
use crate::store::{BudgetStore, SettingsStore};

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub budgets: BudgetStore,
    pub settings: SettingsStore,
    pub gemini: GeminiClient,
    pub alerts: Arc<AlertsFeed>,
}

impl AppState {
    pub fn new(
        config: Config,
        budgets: BudgetStore,
        settings: SettingsStore,
        gemini: GeminiClient,
        alerts: Arc<AlertsFeed>,
    ) -> Arc<Self> {
        Arc::new(Self {
            config,
            budgets,
            settings,
            gemini,
            alerts,
        })
    }

    /// Kick off a background advisory refresh from the current snapshot.
    /// Called after every budget or settings mutation.
    pub fn refresh_alerts(&self) {
        let api_key = self.settings.get().api_key;
        self.alerts.refresh(api_key, self.budgets.list());
    }
}

/// Build the complete application with all middleware
pub fn create_app(state: Arc<AppState>) -> Router {
    let cors = build_cors_layer(&state.config);

    // Use DEBUG for spans to reduce overhead at INFO level
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(DefaultOnResponse::new().level(Level::DEBUG));

    let (set_request_id, propagate_request_id) = request_id_layer();

    Router::new()
        .merge(routes::api_router())
        // Middleware stack (applied bottom-up)
        .layer(propagate_request_id)
        .layer(trace_layer)
        .layer(set_request_id)
        .layer(cors)
        .with_state(state)
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_allow_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let max_age = if config.env.is_dev() {
        // Cache preflight for 24 hours in development
        std::time::Duration::from_secs(86400)
    } else {
        std::time::Duration::from_secs(3600)
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::list([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PATCH,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
            axum::http::HeaderName::from_static("x-request-id"),
        ]))
        .allow_credentials(true)
        .max_age(max_age)
}
