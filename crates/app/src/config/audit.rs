//! Audit Config

use clap::Args;

use crate::audit::{DEFAULT_ENDPOINT, DEFAULT_MODEL, GenerativeConfig};

/// Text-generation service settings.
#[derive(Debug, Clone, Args)]
pub struct AuditConfig {
    /// Text-generation API key; narration is skipped without one
    #[arg(long = "genai-api-key", env = "API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Text-generation model
    #[arg(long = "genai-model", env = "GENAI_MODEL", default_value = DEFAULT_MODEL, global = true)]
    pub model: String,

    /// Text-generation service endpoint
    #[arg(
        long = "genai-endpoint",
        env = "GENAI_ENDPOINT",
        default_value = DEFAULT_ENDPOINT,
        global = true
    )]
    pub endpoint: String,
}

impl AuditConfig {
    /// Client configuration.
    #[must_use]
    pub fn generative_config(&self) -> GenerativeConfig {
        GenerativeConfig {
            endpoint: self.endpoint.clone(),
            model: self.model.clone(),
            api_key: self.api_key.clone(),
        }
    }
}
