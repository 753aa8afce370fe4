//! Record store records.
//!
//! Wire shapes of the `camps`, `documents` and `users` collections and their
//! mapping onto the registry domain. Columns are snake case; every field is
//! copied one to one and absent values default.

use camp_registry::{
    camps::{Camp, CampId, update::CampUpdate},
    documents::{Document, DocumentId, DocumentParseError, DocumentStatus, DocumentType},
    users::{Role, UserId},
};
use jiff::civil::Date;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// Camps collection name.
pub const CAMPS: &str = "camps";

/// Documents collection name.
pub const DOCUMENTS: &str = "documents";

/// Users (auth) collection name.
pub const USERS: &str = "users";

/// One page of a record listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPage<T> {
    /// Page number, starting at 1
    pub page: u32,

    /// Page size
    pub per_page: u32,

    /// Records across all pages
    pub total_items: u64,

    /// Number of pages
    pub total_pages: u32,

    /// Records on this page
    pub items: Vec<T>,
}

/// Row of the `camps` collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampRecord {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    pub legal_form: String,
    pub ownership_type: String,
    pub municipality: String,
    pub inn: String,
    pub oktmo: String,
    pub registry_code: String,
    pub address: String,
    pub legal_address: String,
    pub director_name: String,
    pub phone: String,
    pub email: String,
    pub website: String,
    pub camp_type: String,
    pub seasonality: String,
    pub shift_dates: String,
    #[serde(deserialize_with = "number")]
    pub capacity: u32,
    #[serde(deserialize_with = "number")]
    pub ticket_cost: u64,
    pub age_category: String,
    pub accessibility: String,
    pub sanitary_number: String,
    pub sanitary_date: String,
    pub medical_license: String,
    pub education_license: String,
    pub inspection_results: String,
    pub has_swimming: bool,
    pub is_verified: bool,
    pub inclusion_date: String,
}

impl CampRecord {
    /// Convert to a [`Camp`] with the given documents.
    pub fn into_camp(self, documents: Vec<Document>) -> Camp {
        let inclusion_date = date_part(&self.inclusion_date);

        Camp {
            id: CampId::new(self.id),
            name: self.name,
            legal_form: self.legal_form,
            ownership_type: self.ownership_type,
            municipality: self.municipality,
            inn: self.inn,
            oktmo: self.oktmo,
            registry_code: self.registry_code,
            address: self.address,
            legal_address: self.legal_address,
            director_name: self.director_name,
            phone: self.phone,
            email: self.email,
            website: self.website,
            camp_type: self.camp_type,
            seasonality: self.seasonality,
            shift_dates: self.shift_dates,
            capacity: self.capacity,
            ticket_cost: self.ticket_cost,
            age_category: self.age_category,
            accessibility: self.accessibility,
            sanitary_number: self.sanitary_number,
            sanitary_date: self.sanitary_date,
            medical_license: self.medical_license,
            education_license: self.education_license,
            inspection_results: self.inspection_results,
            has_swimming: self.has_swimming,
            is_verified: self.is_verified,
            inclusion_date,
            documents,
        }
    }
}

impl From<&Camp> for CampRecord {
    fn from(camp: &Camp) -> Self {
        Self {
            id: String::new(),
            name: camp.name.clone(),
            legal_form: camp.legal_form.clone(),
            ownership_type: camp.ownership_type.clone(),
            municipality: camp.municipality.clone(),
            inn: camp.inn.clone(),
            oktmo: camp.oktmo.clone(),
            registry_code: camp.registry_code.clone(),
            address: camp.address.clone(),
            legal_address: camp.legal_address.clone(),
            director_name: camp.director_name.clone(),
            phone: camp.phone.clone(),
            email: camp.email.clone(),
            website: camp.website.clone(),
            camp_type: camp.camp_type.clone(),
            seasonality: camp.seasonality.clone(),
            shift_dates: camp.shift_dates.clone(),
            capacity: camp.capacity,
            ticket_cost: camp.ticket_cost,
            age_category: camp.age_category.clone(),
            accessibility: camp.accessibility.clone(),
            sanitary_number: camp.sanitary_number.clone(),
            sanitary_date: camp.sanitary_date.clone(),
            medical_license: camp.medical_license.clone(),
            education_license: camp.education_license.clone(),
            inspection_results: camp.inspection_results.clone(),
            has_swimming: camp.has_swimming,
            is_verified: camp.is_verified,
            inclusion_date: camp
                .inclusion_date
                .map(|date| date.to_string())
                .unwrap_or_default(),
        }
    }
}

/// Partial `camps` row; only present fields are serialised.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CampPatchRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_form: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ownership_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub municipality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oktmo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub director_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camp_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seasonality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shift_dates: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_cost: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessibility: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sanitary_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sanitary_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical_license: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education_license: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inspection_results: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_swimming: Option<bool>,
}

impl From<&CampUpdate> for CampPatchRecord {
    fn from(update: &CampUpdate) -> Self {
        Self {
            name: update.name.clone(),
            legal_form: update.legal_form.clone(),
            ownership_type: update.ownership_type.clone(),
            municipality: update.municipality.clone(),
            inn: update.inn.clone(),
            oktmo: update.oktmo.clone(),
            registry_code: update.registry_code.clone(),
            address: update.address.clone(),
            legal_address: update.legal_address.clone(),
            director_name: update.director_name.clone(),
            phone: update.phone.clone(),
            email: update.email.clone(),
            website: update.website.clone(),
            camp_type: update.camp_type.clone(),
            seasonality: update.seasonality.clone(),
            shift_dates: update.shift_dates.clone(),
            capacity: update.capacity,
            ticket_cost: update.ticket_cost,
            age_category: update.age_category.clone(),
            accessibility: update.accessibility.clone(),
            sanitary_number: update.sanitary_number.clone(),
            sanitary_date: update.sanitary_date.clone(),
            medical_license: update.medical_license.clone(),
            education_license: update.education_license.clone(),
            inspection_results: update.inspection_results.clone(),
            has_swimming: update.has_swimming,
        }
    }
}

/// Ministry-controlled `camps` columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationPatchRecord {
    pub is_verified: bool,

    /// `YYYY-MM-DD`, empty when revoked
    pub inclusion_date: String,
}

impl VerificationPatchRecord {
    /// Patch for the given verification state.
    pub fn new(verified: bool, inclusion_date: Option<Date>) -> Self {
        Self {
            is_verified: verified,
            inclusion_date: inclusion_date
                .map(|date| date.to_string())
                .unwrap_or_default(),
        }
    }
}

/// Row of the `documents` collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DocumentRecord {
    pub id: String,
    pub camp: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub file: String,
    pub status: String,
    pub created: String,
}

impl DocumentRecord {
    /// Convert to a [`Document`]. `file_url` receives the record id and stored
    /// filename.
    ///
    /// # Errors
    ///
    /// Returns an error if the type or status is not recognised.
    pub fn try_into_document(
        self,
        file_url: impl Fn(&str, &str) -> String,
    ) -> Result<Document, DocumentParseError> {
        let kind = self.kind.parse::<DocumentType>()?;

        let status = if self.status.trim().is_empty() {
            DocumentStatus::default()
        } else {
            self.status.parse::<DocumentStatus>()?
        };

        let url = (!self.file.is_empty()).then(|| file_url(&self.id, &self.file));

        Ok(Document {
            uploaded_on: date_part(&self.created).unwrap_or_default(),
            id: DocumentId::new(self.id),
            camp_id: CampId::new(self.camp),
            kind,
            file_name: self.file,
            status,
            url,
        })
    }
}

/// Review status change for a `documents` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DocumentStatusPatchRecord {
    pub status: &'static str,
}

/// Authenticated account from the `users` collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthRecord {
    pub id: String,
    pub email: String,
    pub name: String,

    /// Explicit role claim, when the deployment issues one
    #[serde(skip_serializing_if = "String::is_empty")]
    pub role: String,

    /// Explicit linked-camp claim, when the deployment issues one
    #[serde(skip_serializing_if = "String::is_empty")]
    pub camp: String,
}

impl AuthRecord {
    /// Account id.
    pub fn user_id(&self) -> UserId {
        UserId::new(self.id.clone())
    }

    /// Role claim, if present and recognised.
    pub fn role_claim(&self) -> Option<Role> {
        if self.role.trim().is_empty() {
            return None;
        }

        match self.role.parse::<Role>() {
            Ok(role) => Some(role),
            Err(error) => {
                warn!(account = %self.id, %error, "ignoring unrecognised role claim");

                None
            }
        }
    }

    /// Linked-camp claim, if present.
    pub fn camp_claim(&self) -> Option<CampId> {
        let camp = self.camp.trim();

        (!camp.is_empty()).then(|| CampId::new(camp))
    }
}

/// Join camps and documents into domain camps, preserving camp order.
///
/// Documents whose camp is not in `camps` are dropped, as are documents with
/// an unrecognised type or status.
pub fn assemble(
    camps: Vec<CampRecord>,
    documents: Vec<DocumentRecord>,
    file_url: impl Fn(&str, &str) -> String,
) -> Vec<Camp> {
    let mut by_camp: FxHashMap<String, Vec<Document>> = camps
        .iter()
        .map(|camp| (camp.id.clone(), Vec::new()))
        .collect();

    for record in documents {
        let Some(owned) = by_camp.get_mut(&record.camp) else {
            warn!(document = %record.id, camp = %record.camp, "dropping orphan document");

            continue;
        };

        let id = record.id.clone();

        match record.try_into_document(&file_url) {
            Ok(document) => owned.push(document),
            Err(error) => warn!(document = %id, %error, "dropping unreadable document"),
        }
    }

    camps
        .into_iter()
        .map(|camp| {
            let documents = by_camp.remove(&camp.id).unwrap_or_default();

            camp.into_camp(documents)
        })
        .collect()
}

/// Date portion of a store timestamp (`2024-04-10 09:30:00.000Z`,
/// `2024-04-10T09:30:00Z` or `2024-04-10`).
pub fn date_part(value: &str) -> Option<Date> {
    let value = value.trim();

    if value.is_empty() {
        return None;
    }

    let date = value.split([' ', 'T']).next().unwrap_or(value);

    match date.parse::<Date>() {
        Ok(date) => Some(date),
        Err(error) => {
            warn!(value, %error, "ignoring malformed date");

            None
        }
    }
}

fn number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64> + Default,
{
    let value = Option::<f64>::deserialize(deserializer)?.unwrap_or_default();

    if !value.is_finite() || value <= 0.0 {
        return Ok(T::default());
    }

    // float to int casts saturate
    let whole = value.round() as u64;

    Ok(T::try_from(whole).unwrap_or_default())
}
