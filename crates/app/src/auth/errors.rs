//! Auth service errors.

use thiserror::Error;

use crate::store::RecordStoreError;

#[derive(Debug, Error)]
pub enum AuthServiceError {
    #[error("record store is unreachable")]
    Unreachable(#[source] RecordStoreError),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("record store error")]
    Store(#[source] RecordStoreError),
}

impl From<RecordStoreError> for AuthServiceError {
    fn from(error: RecordStoreError) -> Self {
        match error {
            RecordStoreError::InvalidCredentials => Self::InvalidCredentials,
            error if error.is_unreachable() => Self::Unreachable(error),
            error => Self::Store(error),
        }
    }
}
