mod api;
mod app;
mod config;
mod domain;
mod error;
mod logging;
mod middleware;
mod routes;
mod services;
mod store;

use anyhow::Result;
use std::sync::Arc;

use services::{AlertsFeed, GeminiClient};
use store::kv::JsonFileStorage;
use store::{BudgetStore, SettingsStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = config::Config::from_env()?;

    // Initialize logging
    logging::init_logging(&config.env);

    tracing::info!(
        env = ?config.env,
        server_addr = %config.server_addr,
        data_dir = %config.data_dir.display(),
        "Starting Spamidia backend"
    );

    // File-backed key-value storage shared by both stores
    let storage: Arc<dyn store::kv::KvStorage> =
        Arc::new(JsonFileStorage::new(&config.data_dir)?);

    let budgets = BudgetStore::load(Arc::clone(&storage))?;
    let settings = SettingsStore::load(storage)?;

    // Gemini advisory client and the background-refreshed alerts feed
    let gemini = GeminiClient::new(&config.gemini_api_url, config.gemini_timeout_seconds)?;
    let alerts = Arc::new(AlertsFeed::new(gemini.clone()));

    // Create application state
    let state = app::AppState::new(config.clone(), budgets, settings, gemini, alerts);

    // Warm the alerts feed from the persisted snapshot (no-op without a key)
    state.refresh_alerts();

    // Build application
    let app = app::create_app(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.server_addr).await?;
    tracing::info!("Listening on {}", config.server_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
