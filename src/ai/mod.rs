pub mod bridge;
pub mod client;
pub mod prompts;
pub mod worker;

pub use bridge::{generate_weekly_review, parse_tasks_from_text};
pub use client::{GeminiClient, GenerateRequest, LanguageModel};

/// Errors from the AI bridge
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("{0} environment variable is not set")]
    MissingApiKey(String),
    #[error("AI service returned HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("could not reach AI service: {0}")]
    Transport(String),
    #[error("AI service returned no candidate")]
    EmptyCandidate,
    #[error("could not parse AI response: {message}")]
    Parse { message: String, raw: String },
}
