//! Record store errors.

use std::io;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when talking to the record store.
#[derive(Debug, Error)]
pub enum RecordStoreError {
    /// The service could not be reached.
    #[error("record store is unreachable")]
    Unreachable(#[source] reqwest::Error),

    /// Identity or password was rejected.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The collection does not exist on the server.
    #[error("collection `{0}` does not exist")]
    MissingCollection(String),

    /// The record does not exist.
    #[error("record not found")]
    NotFound,

    /// The server answered with a non-success status.
    #[error("request rejected with status {status}: {message}")]
    Rejected {
        /// HTTP status code
        status: u16,

        /// Server-provided message
        message: String,
    },

    /// The response body did not decode.
    #[error("failed to decode record store response")]
    Decode(#[source] reqwest::Error),

    /// The session file could not be read or written.
    #[error("session file error")]
    SessionFile(#[from] io::Error),

    /// The session file holds malformed JSON.
    #[error("session file is malformed")]
    SessionEncoding(#[from] serde_json::Error),
}

impl RecordStoreError {
    /// Classify a transport error.
    pub(crate) fn transport(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::Decode(error)
        } else {
            Self::Unreachable(error)
        }
    }

    /// Build an error from a non-success status and its body.
    pub(crate) fn from_status(status: StatusCode, body: &str) -> Self {
        if status == StatusCode::NOT_FOUND {
            return Self::NotFound;
        }

        let message = serde_json::from_str::<ErrorBody>(body)
            .map(|parsed| parsed.message)
            .unwrap_or_else(|_malformed| body.trim().to_string());

        Self::Rejected {
            status: status.as_u16(),
            message,
        }
    }

    /// Whether the failure means the service was not reached at all.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable(_))
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}
