//! Record store health probe.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;

use crate::store::{RecordStoreClient, RecordStoreError};

/// Health probe backed by the record store.
#[derive(Debug, Clone)]
pub struct RemoteHealthcheck {
    client: Arc<RecordStoreClient>,
}

impl RemoteHealthcheck {
    #[must_use]
    pub fn new(client: Arc<RecordStoreClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Healthcheck for RemoteHealthcheck {
    async fn check(&self) -> Result<(), RecordStoreError> {
        self.client.health().await
    }
}

#[automock]
#[async_trait]
/// Reachability probe.
pub trait Healthcheck: Send + Sync {
    /// Probes the service once.
    async fn check(&self) -> Result<(), RecordStoreError>;
}
