//! Text-generation client.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::audit::AuditError;

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Default API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Configuration for the text-generation service.
#[derive(Debug, Clone)]
pub struct GenerativeConfig {
    /// API base URL
    pub endpoint: String,

    /// Model identifier
    pub model: String,

    /// API key; narration is unavailable without one
    pub api_key: Option<String>,
}

/// HTTP client for a `generateContent` style text-generation API.
#[derive(Debug, Clone)]
pub struct GenerativeClient {
    config: GenerativeConfig,
    http: Client,
}

impl GenerativeClient {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: GenerativeConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }
}

#[async_trait]
impl TextGenerator for GenerativeClient {
    async fn generate(&self, prompt: &str) -> Result<String, AuditError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(AuditError::MissingApiKey)?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        );

        debug!(model = %self.config.model, "requesting narration");

        let body = json!({ "contents": [{ "parts": [{ "text": prompt }] }] });

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(AuditError::UnexpectedResponse(format!(
                "generateContent failed with status {status}: {text}"
            )));
        }

        let parsed: GenerateResponse = response.json().await?;

        Ok(parsed.text())
    }
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

#[derive(Debug, Default, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<TextPart>,
}

#[derive(Debug, Default, Deserialize)]
struct TextPart {
    #[serde(default)]
    text: String,
}

impl GenerateResponse {
    /// Text of the first candidate, parts concatenated.
    fn text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[automock]
#[async_trait]
/// Hosted text generation.
pub trait TextGenerator: Send + Sync {
    /// Generates text for a single prompt.
    async fn generate(&self, prompt: &str) -> Result<String, AuditError>;
}
