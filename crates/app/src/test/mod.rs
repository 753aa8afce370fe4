//! Test Helpers

use camp_registry::{
    camps::{Camp, CampId},
    documents::{Document, DocumentId, DocumentStatus, DocumentType},
};
use jiff::civil::date;

use crate::store::{RecordStoreError, records::AuthRecord};

/// Transport failure built without touching the network.
pub(crate) fn unreachable() -> RecordStoreError {
    match reqwest::Client::new().get("http://[invalid").build() {
        Err(error) => RecordStoreError::Unreachable(error),
        Ok(request) => panic!("expected an invalid request, built {request:?}"),
    }
}

pub(crate) fn camp(id: &str, email: &str) -> Camp {
    Camp {
        id: CampId::new(id),
        name: format!("ДОЛ {id}"),
        email: email.to_string(),
        ..Camp::default()
    }
}

pub(crate) fn with_document(mut camp: Camp, id: &str, kind: DocumentType) -> Camp {
    camp.documents.push(Document {
        id: DocumentId::new(id),
        camp_id: camp.id.clone(),
        kind,
        file_name: format!("{id}.pdf"),
        uploaded_on: date(2024, 5, 1),
        status: DocumentStatus::Pending,
        url: None,
    });

    camp
}

pub(crate) fn account(id: &str, email: &str) -> AuthRecord {
    AuthRecord {
        id: id.to_string(),
        email: email.to_string(),
        ..AuthRecord::default()
    }
}
