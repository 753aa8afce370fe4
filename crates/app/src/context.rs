//! App Context

use std::sync::Arc;

use crate::{
    audit::{ComplianceAuditor, GenerativeClient},
    auth::RemoteAuthService,
    camps::RemoteCampsService,
    config::AppConfig,
    health::RemoteHealthcheck,
    seed::Seeder,
    session::Session,
    store::RecordStoreClient,
};

/// Services wired from configuration.
#[derive(Clone)]
pub struct AppContext {
    pub client: Arc<RecordStoreClient>,
    pub auditor: ComplianceAuditor,
    pub config: AppConfig,
}

impl AppContext {
    /// Build the record store client and text-generation client.
    #[must_use]
    pub fn from_config(config: AppConfig) -> Self {
        let client = Arc::new(RecordStoreClient::new(config.store.client_config()));
        let generator = GenerativeClient::new(config.audit.generative_config());

        Self {
            client,
            auditor: ComplianceAuditor::new(Arc::new(generator)),
            config,
        }
    }

    /// Fresh session over the record store, not yet initialized.
    #[must_use]
    pub fn session(&self) -> Session {
        Session::new(
            Arc::new(RemoteAuthService::new(Arc::clone(&self.client))),
            Arc::new(RemoteCampsService::new(Arc::clone(&self.client))),
            Arc::new(RemoteHealthcheck::new(Arc::clone(&self.client))),
            self.config.accounts.demo_accounts(),
        )
    }

    /// Seeder sharing the record store client.
    #[must_use]
    pub fn seeder(&self) -> Seeder {
        Seeder::new(Arc::clone(&self.client))
    }
}
