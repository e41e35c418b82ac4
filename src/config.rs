use anyhow::Result;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            "staging" => Self::Staging,
            _ => Self::Dev,
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, Self::Dev)
    }
}

/// Process configuration from environment variables. The Gemini API key
/// is deliberately not here: it is user-supplied shop data and lives in
/// the settings store.
#[derive(Debug, Clone)]
pub struct Config {
    pub env: Environment,
    pub server_addr: String,

    /// Directory for the JSON key-value documents
    pub data_dir: PathBuf,

    // CORS
    pub cors_allow_origins: Vec<String>,

    // Gemini advisory service
    pub gemini_api_url: String,
    pub gemini_timeout_seconds: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let env = Environment::from_str(&env::var("ENV").unwrap_or_else(|_| "dev".to_string()));
        let server_addr = env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));

        let cors_allow_origins = env::var("CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let gemini_api_url = env::var("GEMINI_API_URL")
            .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string());
        let gemini_timeout_seconds = env::var("GEMINI_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(60); // LLM calls can be slow

        Ok(Config {
            env,
            server_addr,
            data_dir,
            cors_allow_origins,
            gemini_api_url,
            gemini_timeout_seconds,
        })
    }
}
