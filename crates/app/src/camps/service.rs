//! Camps service.

use std::sync::Arc;

use async_trait::async_trait;
use camp_registry::{
    camps::{Camp, CampId, update::CampUpdate},
    documents::{DocumentId, DocumentStatus},
};
use jiff::civil::Date;
use mockall::automock;
use reqwest::multipart::{Form, Part};
use tracing::debug;

use crate::{
    camps::{CampsServiceError, NewDocument},
    store::{
        RecordStoreClient,
        records::{
            CAMPS, CampPatchRecord, CampRecord, DOCUMENTS, DocumentRecord,
            DocumentStatusPatchRecord, VerificationPatchRecord, assemble,
        },
    },
};

/// Camps and documents held in the record store.
#[derive(Debug, Clone)]
pub struct RemoteCampsService {
    client: Arc<RecordStoreClient>,
}

impl RemoteCampsService {
    #[must_use]
    pub fn new(client: Arc<RecordStoreClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CampsService for RemoteCampsService {
    async fn list_camps(&self) -> Result<Vec<Camp>, CampsServiceError> {
        let camps: Vec<CampRecord> = self.client.full_list(CAMPS, Some("-created")).await?;
        let documents: Vec<DocumentRecord> = self.client.full_list(DOCUMENTS, None).await?;

        debug!(
            camps = camps.len(),
            documents = documents.len(),
            "fetched registry"
        );

        Ok(assemble(camps, documents, |record, file| {
            self.client.file_url(DOCUMENTS, record, file)
        }))
    }

    async fn update_camp(
        &self,
        camp: &CampId,
        update: &CampUpdate,
    ) -> Result<(), CampsServiceError> {
        self.client
            .update(CAMPS, camp.as_str(), &CampPatchRecord::from(update))
            .await
            .map_err(Into::into)
    }

    async fn set_verification(
        &self,
        camp: &CampId,
        verified: bool,
        inclusion_date: Option<Date>,
    ) -> Result<(), CampsServiceError> {
        self.client
            .update(
                CAMPS,
                camp.as_str(),
                &VerificationPatchRecord::new(verified, inclusion_date),
            )
            .await
            .map_err(Into::into)
    }

    async fn upload_document(&self, document: &NewDocument) -> Result<(), CampsServiceError> {
        let file = Part::bytes(document.file.bytes.clone())
            .file_name(document.file.file_name.clone());

        let form = Form::new()
            .text("camp", document.camp.to_string())
            .text("type", document.kind.label())
            .text("status", DocumentStatus::Pending.as_str())
            .part("file", file);

        self.client
            .create_multipart(DOCUMENTS, form)
            .await
            .map_err(Into::into)
    }

    async fn delete_document(&self, document: &DocumentId) -> Result<(), CampsServiceError> {
        self.client
            .delete(DOCUMENTS, document.as_str())
            .await
            .map_err(Into::into)
    }

    async fn review_document(
        &self,
        document: &DocumentId,
        status: DocumentStatus,
    ) -> Result<(), CampsServiceError> {
        self.client
            .update(
                DOCUMENTS,
                document.as_str(),
                &DocumentStatusPatchRecord {
                    status: status.as_str(),
                },
            )
            .await
            .map_err(Into::into)
    }
}

#[automock]
#[async_trait]
/// Registry persistence operations.
pub trait CampsService: Send + Sync {
    /// Lists every camp with its documents.
    async fn list_camps(&self) -> Result<Vec<Camp>, CampsServiceError>;

    /// Applies a partial camp update.
    async fn update_camp(&self, camp: &CampId, update: &CampUpdate)
    -> Result<(), CampsServiceError>;

    /// Sets the ministry verification flag and inclusion date.
    async fn set_verification(
        &self,
        camp: &CampId,
        verified: bool,
        inclusion_date: Option<Date>,
    ) -> Result<(), CampsServiceError>;

    /// Stores a new document as pending.
    async fn upload_document(&self, document: &NewDocument) -> Result<(), CampsServiceError>;

    /// Deletes a document.
    async fn delete_document(&self, document: &DocumentId) -> Result<(), CampsServiceError>;

    /// Sets a document's review status.
    async fn review_document(
        &self,
        document: &DocumentId,
        status: DocumentStatus,
    ) -> Result<(), CampsServiceError>;
}
