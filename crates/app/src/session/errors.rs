//! Session errors.

use camp_registry::{
    camps::{CampId, update::CampUpdateError},
    documents::{DocumentId, DocumentType, UploadError},
    fixtures::FixtureError,
};
use thiserror::Error;

use crate::{auth::AuthServiceError, camps::CampsServiceError};

/// Failure classes, independent of how they are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The record store could not be reached
    Connectivity,

    /// Credentials were rejected
    Authentication,

    /// The server is up but a collection is missing
    MissingSchema,

    /// A save, upload or delete failed
    Mutation,

    /// The signed-in role may not perform the action
    Forbidden,

    /// Input was refused before reaching the store
    Invalid,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("sign-in failed")]
    Auth(#[from] AuthServiceError),

    #[error("registry request failed")]
    Camps(#[from] CampsServiceError),

    #[error("not signed in")]
    NotSignedIn,

    #[error("action not permitted: {0}")]
    Forbidden(&'static str),

    #[error("invalid camp update")]
    InvalidUpdate(#[from] CampUpdateError),

    #[error("invalid upload")]
    InvalidUpload(#[from] UploadError),

    #[error("document \"{0}\" is already uploaded; delete it before uploading again")]
    DuplicateDocument(DocumentType),

    #[error("camp {0} not found")]
    CampNotFound(CampId),

    #[error("document {0} not found")]
    DocumentNotFound(DocumentId),

    #[error("demo data unavailable")]
    Fixtures(#[from] FixtureError),
}

impl SessionError {
    /// Failure class of this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Auth(AuthServiceError::Unreachable(_))
            | Self::Camps(CampsServiceError::Unreachable(_)) => FailureKind::Connectivity,
            Self::Auth(_) => FailureKind::Authentication,
            Self::Camps(CampsServiceError::MissingCollection(_)) => FailureKind::MissingSchema,
            Self::Camps(_) | Self::CampNotFound(_) | Self::DocumentNotFound(_) => {
                FailureKind::Mutation
            }
            Self::NotSignedIn | Self::Forbidden(_) => FailureKind::Forbidden,
            Self::InvalidUpdate(_)
            | Self::InvalidUpload(_)
            | Self::DuplicateDocument(_)
            | Self::Fixtures(_) => FailureKind::Invalid,
        }
    }
}
