//! Gemini advisory client
//!
//! Turns the current book of budgets into prompts for the Gemini
//! `generateContent` API and parses the free-text replies. Purely
//! advisory: every transport or service failure degrades to an empty
//! alert list (alerts path) or a fixed message (Q&A path) and is never
//! surfaced to the caller as an error. No retries.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::domain::budgets::{Budget, BudgetStatus};

const MODEL: &str = "gemini-2.5-flash";
const ALERTS_MAX_OUTPUT_TOKENS: u32 = 200;

pub const MISSING_KEY_MESSAGE: &str =
    "Configure your Gemini API key in Settings to use the AI assistant.";
pub const SERVICE_ERROR_MESSAGE: &str =
    "Could not reach the AI service. Check your API key or try again later.";
pub const EMPTY_ANSWER_MESSAGE: &str = "The AI service returned no answer.";

/// Client for the Gemini text-generation API.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
}

/// Reduced budget view serialized into the Q&A prompt.
#[derive(Serialize)]
struct BudgetContext<'a> {
    client: &'a str,
    service: &'a str,
    value: f64,
    status: BudgetStatus,
    date: String,
    ink_used: f64,
    paid: bool,
    due_date: Option<String>,
}

impl<'a> From<&'a Budget> for BudgetContext<'a> {
    fn from(b: &'a Budget) -> Self {
        Self {
            client: &b.client_name,
            service: &b.service_type,
            value: b.final_price,
            status: b.status,
            date: b.created_at.date_naive().to_string(),
            ink_used: b.ink_consumption_ml,
            paid: b.boleto_paid,
            due_date: b.boleto_due_date.map(|d| d.to_string()),
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GeminiClient {
    pub fn new(base_url: &str, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Single `generateContent` call; returns the concatenated candidate
    /// text.
    async fn generate(
        &self,
        api_key: &str,
        prompt: &str,
        max_output_tokens: Option<u32>,
    ) -> Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, MODEL
        );

        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: max_output_tokens
                .map(|max| GenerationConfig {
                    max_output_tokens: max,
                }),
        };

        debug!(url = %url, "Gemini request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .context("Gemini request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("Gemini returned {status}");
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .context("Invalid Gemini response body")?;

        let text: String = parsed
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        Ok(text)
    }

    /// Generate short strategic alerts from quick book metrics. Returns an
    /// empty list when the credential is empty or anything fails.
    pub async fn smart_alerts(&self, api_key: &str, budgets: &[Budget]) -> Vec<String> {
        if api_key.is_empty() {
            return Vec::new();
        }

        let pending = budgets
            .iter()
            .filter(|b| b.status == BudgetStatus::PendingApproval)
            .count();
        let unpaid = budgets
            .iter()
            .filter(|b| b.boleto_issued && !b.boleto_paid)
            .count();

        let prompt = format!(
            "You are a business-management assistant for Spamidia, a visual \
             communication print shop. Quick metrics:\n\
             - Budgets awaiting approval: {pending}\n\
             - Open boletos: {unpaid}\n\
             - Today's date: {today}\n\n\
             Generate 3 short, strategic alerts for the finance manager as a \
             simple list. Focus on urgency and cash flow.",
            today = Utc::now().date_naive(),
        );

        match self
            .generate(api_key, &prompt, Some(ALERTS_MAX_OUTPUT_TOKENS))
            .await
        {
            Ok(text) => parse_alert_lines(&text),
            Err(e) => {
                warn!(error = %e, "Smart alerts request failed");
                Vec::new()
            }
        }
    }

    /// Answer a free-form management question over the current budgets.
    /// Returns fixed guidance/error strings instead of failing.
    pub async fn analyze(&self, api_key: &str, budgets: &[Budget], question: &str) -> String {
        if api_key.is_empty() {
            return MISSING_KEY_MESSAGE.to_string();
        }

        let context: Vec<BudgetContext<'_>> = budgets.iter().map(Into::into).collect();
        let context_json = match serde_json::to_string(&context) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "Failed to serialize budget context");
                return SERVICE_ERROR_MESSAGE.to_string();
            }
        };

        let prompt = format!(
            "You are a business-management assistant for Spamidia, a visual \
             communication print shop. Analyze the following budget data and \
             answer the user's question. Be concise, professional and helpful.\n\n\
             Data (simplified JSON):\n{context_json}\n\n\
             User question: \"{question}\"",
        );

        match self.generate(api_key, &prompt, None).await {
            Ok(text) if text.trim().is_empty() => EMPTY_ANSWER_MESSAGE.to_string(),
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Gemini analysis request failed");
                SERVICE_ERROR_MESSAGE.to_string()
            }
        }
    }
}

/// Split a free-text reply into alert strings: one per line, dropping
/// lines shorter than 6 trimmed characters and stripping leading bullet
/// or numbering characters.
pub fn parse_alert_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| line.len() > 5)
        .map(strip_bullet_prefix)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn strip_bullet_prefix(line: &str) -> &str {
    line.trim_start_matches(|c: char| {
        c.is_ascii_digit() || matches!(c, '-' | '.' | '*' | '•' | ')')
    })
    .trim_start()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_drops_short_lines_and_strips_bullets() {
        let text = "- Chase the 3 budgets awaiting approval.\n\
                    \n\
                    ok\n\
                    1. Two boletos are overdue this week.\n\
                    * Cash flow is tight until Friday.";
        assert_eq!(
            parse_alert_lines(text),
            vec![
                "Chase the 3 budgets awaiting approval.".to_string(),
                "Two boletos are overdue this week.".to_string(),
                "Cash flow is tight until Friday.".to_string(),
            ]
        );
    }

    #[test]
    fn parse_handles_numbered_lists_with_parenthesis() {
        assert_eq!(
            parse_alert_lines("2) Follow up on unpaid boletos."),
            vec!["Follow up on unpaid boletos.".to_string()]
        );
    }

    #[test]
    fn parse_of_empty_text_is_empty() {
        assert!(parse_alert_lines("").is_empty());
        assert!(parse_alert_lines("\n\n").is_empty());
    }

    #[tokio::test]
    async fn empty_credential_short_circuits_without_a_call() {
        // Unroutable base URL: if the client tried the network these
        // would not return the fixed fallbacks.
        let client = GeminiClient::new("http://127.0.0.1:9", 1).unwrap();

        let alerts = client.smart_alerts("", &[]).await;
        assert!(alerts.is_empty());

        let answer = client.analyze("", &[], "How is revenue?").await;
        assert_eq!(answer, MISSING_KEY_MESSAGE);
    }

    #[tokio::test]
    async fn transport_errors_degrade_to_fallbacks() {
        let client = GeminiClient::new("http://127.0.0.1:9", 1).unwrap();

        let alerts = client.smart_alerts("some-key", &[]).await;
        assert!(alerts.is_empty());

        let answer = client.analyze("some-key", &[], "How is revenue?").await;
        assert_eq!(answer, SERVICE_ERROR_MESSAGE);
    }
}
