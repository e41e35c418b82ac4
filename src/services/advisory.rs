//! Advisory alerts feed
//!
//! Holds the most recently generated alert list and refreshes it in the
//! background whenever budgets or the credential change. A refresh
//! supersedes any in-flight one: each trigger bumps a generation counter
//! and only the task whose generation is still current applies its
//! result, so a slow stale fetch can never overwrite a newer one.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

use crate::domain::budgets::Budget;
use crate::services::gemini::GeminiClient;

pub struct AlertsFeed {
    gemini: GeminiClient,
    alerts: RwLock<Vec<String>>,
    generation: AtomicU64,
}

impl AlertsFeed {
    pub fn new(gemini: GeminiClient) -> Self {
        Self {
            gemini,
            alerts: RwLock::new(Vec::new()),
            generation: AtomicU64::new(0),
        }
    }

    /// Latest applied alert list.
    pub fn current(&self) -> Vec<String> {
        self.alerts.read().clone()
    }

    /// Fire-and-forget refresh from the given snapshot. Never blocks the
    /// caller; in-flight fetches are not cancelled, just outvoted.
    pub fn refresh(self: &Arc<Self>, api_key: String, budgets: Vec<Budget>) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let feed = Arc::clone(self);

        tokio::spawn(async move {
            let alerts = feed.gemini.smart_alerts(&api_key, &budgets).await;
            if feed.generation.load(Ordering::SeqCst) == generation {
                debug!(generation, count = alerts.len(), "Alerts refreshed");
                *feed.alerts.write() = alerts;
            } else {
                debug!(generation, "Dropping stale alerts result");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed() -> Arc<AlertsFeed> {
        Arc::new(AlertsFeed::new(
            GeminiClient::new("http://127.0.0.1:9", 1).unwrap(),
        ))
    }

    #[tokio::test]
    async fn starts_empty() {
        assert!(feed().current().is_empty());
    }

    #[tokio::test]
    async fn stale_generations_do_not_apply() {
        let feed = feed();

        // Simulate a slow first fetch finishing after a second trigger.
        let first = feed.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let second = feed.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if feed.generation.load(Ordering::SeqCst) == first {
            *feed.alerts.write() = vec!["stale".to_string()];
        }
        assert!(feed.current().is_empty());

        if feed.generation.load(Ordering::SeqCst) == second {
            *feed.alerts.write() = vec!["fresh".to_string()];
        }
        assert_eq!(feed.current(), vec!["fresh".to_string()]);
    }

    #[tokio::test]
    async fn refresh_with_empty_key_settles_to_empty_list() {
        let feed = feed();
        feed.refresh(String::new(), Vec::new());
        // The spawned task makes no network call with an empty key, so it
        // settles quickly.
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(feed.current().is_empty());
    }
}
