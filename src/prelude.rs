//! Camp registry prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    audit::{AuditVerdict, ComplianceGap, compliance_gaps, compliance_prompt},
    camps::{
        Camp, CampField, CampId, UnknownCampField, registry_status,
        update::{CampUpdate, CampUpdateError},
    },
    documents::{
        Document, DocumentId, DocumentParseError, DocumentStatus, DocumentType, UploadError,
    },
    export::ExportError,
    fixtures::{FixtureError, demo_camps},
    ids::TypedId,
    registry::{RegistryFilter, RegistryQuery, UnknownFilter},
    report::ReportError,
    stats::CampStats,
    users::{Role, UnknownRole, User, UserId},
};
