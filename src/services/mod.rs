//! Service layer modules for external integrations.
//!
//! The Gemini client and the background-refreshed advisory alerts feed.

pub mod advisory;
pub mod gemini;

pub use advisory::AlertsFeed;
pub use gemini::GeminiClient;
