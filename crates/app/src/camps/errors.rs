//! Camps service errors.

use thiserror::Error;

use crate::store::RecordStoreError;

#[derive(Debug, Error)]
pub enum CampsServiceError {
    #[error("record store is unreachable")]
    Unreachable(#[source] RecordStoreError),

    #[error("collection `{0}` does not exist")]
    MissingCollection(String),

    #[error("record not found")]
    NotFound,

    #[error("record store error")]
    Store(#[source] RecordStoreError),
}

impl From<RecordStoreError> for CampsServiceError {
    fn from(error: RecordStoreError) -> Self {
        match error {
            RecordStoreError::MissingCollection(name) => Self::MissingCollection(name),
            RecordStoreError::NotFound => Self::NotFound,
            error if error.is_unreachable() => Self::Unreachable(error),
            error => Self::Store(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_collection_is_kept_apart_from_not_found() {
        assert!(matches!(
            CampsServiceError::from(RecordStoreError::MissingCollection("camps".to_string())),
            CampsServiceError::MissingCollection(ref name) if name == "camps"
        ));
        assert!(matches!(
            CampsServiceError::from(RecordStoreError::NotFound),
            CampsServiceError::NotFound
        ));
    }
}
