//! Audit errors.

use thiserror::Error;

/// Errors that can occur when requesting a narration.
#[derive(Debug, Error)]
pub enum AuditError {
    /// No API key is configured.
    #[error("text-generation API key is not configured")]
    MissingApiKey,

    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service returned a non-2xx response or an unexpected body.
    #[error("unexpected response from text-generation service: {0}")]
    UnexpectedResponse(String),
}
