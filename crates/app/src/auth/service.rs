//! Auth service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    auth::{AuthServiceError, Credentials},
    store::{RecordStoreClient, records::AuthRecord},
};

/// Password sign-in against the record store's `users` collection.
#[derive(Debug, Clone)]
pub struct RemoteAuthService {
    client: Arc<RecordStoreClient>,
}

impl RemoteAuthService {
    #[must_use]
    pub fn new(client: Arc<RecordStoreClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthService for RemoteAuthService {
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthRecord, AuthServiceError> {
        let record = self
            .client
            .auth_with_password(&credentials.email, credentials.password())
            .await?;

        info!(account = %record.id, "signed in");

        Ok(record)
    }

    fn restore(&self) -> Option<AuthRecord> {
        self.client.auth().valid_record()
    }

    fn sign_out(&self) -> Result<(), AuthServiceError> {
        self.client.auth().clear().map_err(AuthServiceError::Store)
    }
}

#[automock]
#[async_trait]
/// Account session operations.
pub trait AuthService: Send + Sync {
    /// Signs in and keeps the session.
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthRecord, AuthServiceError>;

    /// Account of a cached session whose token has not expired.
    fn restore(&self) -> Option<AuthRecord>;

    /// Drops the cached session.
    fn sign_out(&self) -> Result<(), AuthServiceError>;
}
