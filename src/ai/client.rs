use std::time::Duration;

use serde::Deserialize;
use serde_json::json;

use super::AiError;
use crate::model::config::AiConfig;

/// One generation call: a prompt, optionally constrained to JSON output.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub prompt: String,
    /// When set, the model must answer with JSON matching this schema
    pub response_schema: Option<serde_json::Value>,
}

impl GenerateRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        GenerateRequest {
            prompt: prompt.into(),
            response_schema: None,
        }
    }

    pub fn json(prompt: impl Into<String>, schema: serde_json::Value) -> Self {
        GenerateRequest {
            prompt: prompt.into(),
            response_schema: Some(schema),
        }
    }
}

/// A text-generation backend. Returns the text of the first candidate,
/// which may be empty.
pub trait LanguageModel: Send + Sync {
    fn generate(&self, request: &GenerateRequest) -> Result<String, AiError>;
}

/// Gemini `generateContent` over blocking HTTP.
pub struct GeminiClient {
    agent: ureq::Agent,
    endpoint: String,
    model: String,
    api_key_env: String,
    api_key: Option<String>,
}

impl GeminiClient {
    /// Build from config, reading the key from the configured variable.
    /// A missing key is reported on the first request, not here.
    pub fn from_config(config: &AiConfig) -> Self {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty());
        Self::new(config, api_key)
    }

    pub fn new(config: &AiConfig, api_key: Option<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();
        GeminiClient {
            agent,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key_env: config.api_key_env.clone(),
            api_key,
        }
    }

    pub fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

impl LanguageModel for GeminiClient {
    fn generate(&self, request: &GenerateRequest) -> Result<String, AiError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AiError::MissingApiKey(self.api_key_env.clone()))?;

        tracing::info!(model = %self.model, json = request.response_schema.is_some(), "AI request");
        let resp = self
            .agent
            .post(&self.url())
            .set("x-goog-api-key", key)
            .set("User-Agent", concat!("planhub/", env!("CARGO_PKG_VERSION")))
            .send_json(request_body(request));

        let resp = match resp {
            Ok(r) => r,
            Err(ureq::Error::Status(status, r)) => {
                let body = r.into_string().unwrap_or_default();
                tracing::warn!(status, "AI service error");
                return Err(AiError::Http { status, body });
            }
            Err(ureq::Error::Transport(t)) => {
                tracing::warn!(error = %t, "AI transport error");
                return Err(AiError::Transport(t.to_string()));
            }
        };

        let body = resp
            .into_string()
            .map_err(|e| AiError::Transport(e.to_string()))?;
        extract_text(&body)
    }
}

fn request_body(request: &GenerateRequest) -> serde_json::Value {
    let mut body = json!({
        "contents": [{ "parts": [{ "text": request.prompt }] }],
    });
    if let Some(schema) = &request.response_schema {
        body["generationConfig"] = json!({
            "responseMimeType": "application/json",
            "responseSchema": schema,
        });
    }
    body
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

/// Concatenated text parts of the first candidate.
fn extract_text(body: &str) -> Result<String, AiError> {
    let resp: GenerateResponse = serde_json::from_str(body).map_err(|e| AiError::Parse {
        message: e.to_string(),
        raw: body.to_string(),
    })?;
    let candidate = resp
        .candidates
        .into_iter()
        .next()
        .ok_or(AiError::EmptyCandidate)?;
    Ok(candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default())
}
