//! Fixtures
//!
//! Demo camps embedded in the crate. They back the offline registry and seed
//! a fresh record store.

use jiff::civil::Date;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    camps::{Camp, CampId},
    documents::{Document, DocumentId, DocumentParseError, DocumentStatus, DocumentType},
};

const DEMO_CAMPS_YAML: &str = include_str!("camps.yml");

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid date value
    #[error("Invalid date {value:?}: {source}")]
    InvalidDate {
        /// Raw value
        value: String,

        /// Parse failure
        #[source]
        source: jiff::Error,
    },

    /// Invalid document type or status
    #[error(transparent)]
    Document(#[from] DocumentParseError),
}

/// Wrapper for camps in YAML
#[derive(Debug, Deserialize)]
pub struct CampsFixture {
    /// Camp fixtures in display order
    pub camps: Vec<CampFixture>,
}

/// Camp fixture from YAML
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CampFixture {
    /// Record id
    pub id: String,
    /// Organisation name
    pub name: String,
    /// Legal form
    pub legal_form: String,
    /// Ownership type
    pub ownership_type: String,
    /// Municipality
    pub municipality: String,
    /// Tax id
    pub inn: String,
    /// Territory code
    pub oktmo: String,
    /// Registry code
    pub registry_code: String,
    /// Facility address
    pub address: String,
    /// Legal address
    pub legal_address: String,
    /// Director name
    pub director_name: String,
    /// Phone
    pub phone: String,
    /// Email
    pub email: String,
    /// Website
    pub website: String,
    /// Camp type
    pub camp_type: String,
    /// Seasonality
    pub seasonality: String,
    /// Shift dates
    pub shift_dates: String,
    /// Capacity
    pub capacity: u32,
    /// Ticket cost
    pub ticket_cost: u64,
    /// Age category
    pub age_category: String,
    /// Accessibility
    pub accessibility: String,
    /// Sanitary certificate number
    pub sanitary_number: String,
    /// Sanitary certificate date
    pub sanitary_date: String,
    /// Medical license
    pub medical_license: String,
    /// Education license
    pub education_license: String,
    /// Inspection results
    pub inspection_results: String,
    /// Swimming facility
    pub has_swimming: bool,
    /// Verification flag
    pub is_verified: bool,
    /// Inclusion date, `YYYY-MM-DD`
    pub inclusion_date: Option<String>,
    /// Uploaded documents
    pub documents: Vec<DocumentFixture>,
}

/// Document fixture from YAML
#[derive(Debug, Deserialize)]
pub struct DocumentFixture {
    /// Record id
    pub id: String,
    /// Document type label
    #[serde(rename = "type")]
    pub kind: String,
    /// Stored filename
    pub file: String,
    /// Upload date, `YYYY-MM-DD`
    pub uploaded_on: String,
    /// Review status
    #[serde(default)]
    pub status: Option<String>,
}

impl CampFixture {
    /// Convert to a [`Camp`].
    ///
    /// # Errors
    ///
    /// Returns an error if a date, document type or status does not parse.
    pub fn try_into_camp(self) -> Result<Camp, FixtureError> {
        let id = CampId::new(self.id);

        let documents = self
            .documents
            .into_iter()
            .map(|doc| doc.try_into_document(&id))
            .collect::<Result<Vec<_>, _>>()?;

        let inclusion_date = self
            .inclusion_date
            .filter(|value| !value.trim().is_empty())
            .map(|value| parse_date(&value))
            .transpose()?;

        Ok(Camp {
            id,
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
        })
    }
}

impl DocumentFixture {
    fn try_into_document(self, camp_id: &CampId) -> Result<Document, FixtureError> {
        Ok(Document {
            id: DocumentId::new(self.id),
            camp_id: camp_id.clone(),
            kind: self.kind.parse::<DocumentType>()?,
            file_name: self.file,
            uploaded_on: parse_date(&self.uploaded_on)?,
            status: self
                .status
                .as_deref()
                .map(str::parse::<DocumentStatus>)
                .transpose()?
                .unwrap_or_default(),
            url: None,
        })
    }
}

fn parse_date(value: &str) -> Result<Date, FixtureError> {
    value
        .trim()
        .parse::<Date>()
        .map_err(|source| FixtureError::InvalidDate {
            value: value.to_string(),
            source,
        })
}

/// Parse camps from a YAML document.
///
/// # Errors
///
/// Returns an error if the YAML is malformed or a value does not parse.
pub fn camps_from_yaml(yaml: &str) -> Result<Vec<Camp>, FixtureError> {
    let fixture: CampsFixture = serde_norway::from_str(yaml)?;

    fixture
        .camps
        .into_iter()
        .map(CampFixture::try_into_camp)
        .collect()
}

/// The embedded demo registry.
///
/// # Errors
///
/// Returns an error if the embedded YAML does not parse.
pub fn demo_camps() -> Result<Vec<Camp>, FixtureError> {
    camps_from_yaml(DEMO_CAMPS_YAML)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn demo_camps_parse() -> TestResult {
        let camps = demo_camps()?;

        assert_eq!(camps.len(), 3);

        Ok(())
    }

    #[test]
    fn demo_documents_belong_to_their_camp() -> TestResult {
        for camp in demo_camps()? {
            assert!(
                camp.documents.iter().all(|doc| doc.camp_id == camp.id),
                "document of {} points elsewhere",
                camp.name
            );
        }

        Ok(())
    }

    #[test]
    fn absent_fields_default_to_empty() -> TestResult {
        let camps = camps_from_yaml("camps:\n  - id: x\n    name: Лагерь\n")?;
        let camp = camps.first().ok_or("no camp parsed")?;

        assert_eq!(camp.sanitary_number, "");
        assert_eq!(camp.capacity, 0);
        assert!(!camp.is_verified);
        assert!(camp.inclusion_date.is_none());

        Ok(())
    }

    #[test]
    fn unknown_document_type_fails() {
        let yaml = "camps:\n  - id: x\n    name: Лагерь\n    documents:\n      - id: d\n        type: Справка\n        file: a.pdf\n        uploaded_on: 2024-01-01\n";

        assert!(matches!(
            camps_from_yaml(yaml),
            Err(FixtureError::Document(_))
        ));
    }
}
