//! Camps

use std::{fmt, str::FromStr};

use jiff::civil::Date;
use thiserror::Error;

use crate::{
    documents::{Document, DocumentType},
    ids::TypedId,
};

pub mod update;

/// Camp Id
pub type CampId = TypedId<Camp>;

/// Registry entry for one summer-camp organisation.
///
/// Text fields the organisation has not filled in are empty strings, never
/// missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Camp {
    /// Record id
    pub id: CampId,

    /// Organisation name
    pub name: String,

    /// Legal form (e.g. "ООО")
    pub legal_form: String,

    /// Ownership type
    pub ownership_type: String,

    /// Municipality
    pub municipality: String,

    /// Tax id (ИНН)
    pub inn: String,

    /// Territory code (ОКТМО)
    pub oktmo: String,

    /// Registry entry code
    pub registry_code: String,

    /// Facility address
    pub address: String,

    /// Legal address
    pub legal_address: String,

    /// Director's full name
    pub director_name: String,

    /// Contact phone
    pub phone: String,

    /// Contact email, also used to link the camp account
    pub email: String,

    /// Website
    pub website: String,

    /// Facility type
    pub camp_type: String,

    /// Seasonal or year-round
    pub seasonality: String,

    /// Shift dates, free text
    pub shift_dates: String,

    /// Number of places
    pub capacity: u32,

    /// Ticket cost in rubles
    pub ticket_cost: u64,

    /// Accepted age range
    pub age_category: String,

    /// Accessibility notes
    pub accessibility: String,

    /// Sanitary certificate number
    pub sanitary_number: String,

    /// Sanitary certificate date
    pub sanitary_date: String,

    /// Medical license reference
    pub medical_license: String,

    /// Education license reference
    pub education_license: String,

    /// Inspection notes
    pub inspection_results: String,

    /// Has a swimming facility
    pub has_swimming: bool,

    /// Included in the registry by the ministry
    pub is_verified: bool,

    /// Date of inclusion in the registry
    pub inclusion_date: Option<Date>,

    /// Uploaded documents
    pub documents: Vec<Document>,
}

impl Camp {
    /// Documents of the given type.
    pub fn documents_of(&self, kind: DocumentType) -> impl Iterator<Item = &Document> {
        self.documents.iter().filter(move |doc| doc.kind == kind)
    }

    /// Whether at least one document of the given type is present.
    pub fn has_document(&self, kind: DocumentType) -> bool {
        self.documents_of(kind).next().is_some()
    }

    /// Whether the camp has submitted a periodic report.
    pub fn has_report(&self) -> bool {
        self.has_document(DocumentType::ExcelReport)
    }

    /// Checklist state: each required type paired with whether it is present.
    pub fn checklist(&self) -> impl Iterator<Item = (DocumentType, bool)> + '_ {
        DocumentType::CHECKLIST
            .into_iter()
            .map(|kind| (kind, self.has_document(kind)))
    }

    /// Sanitary certificate number and date are both filled in.
    pub fn has_sanitary_certificate(&self) -> bool {
        !self.sanitary_number.trim().is_empty() && !self.sanitary_date.trim().is_empty()
    }

    /// Needs ministry attention: not yet verified, or missing the sanitary
    /// certificate or the medical license.
    pub fn is_problematic(&self) -> bool {
        !self.is_verified
            || !self.has_sanitary_certificate()
            || self.medical_license.trim().is_empty()
    }

    /// Whether the account email links to this camp.
    pub fn matches_email(&self, email: &str) -> bool {
        let email = email.trim();

        !email.is_empty() && self.email.trim().eq_ignore_ascii_case(email)
    }
}

/// Error for unknown field names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown camp field: {0}")]
pub struct UnknownCampField(pub String);

/// Camp field, owning the translation between the UI naming, the store's
/// column naming and the human label used in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CampField {
    /// Name
    Name,
    /// Legal form
    LegalForm,
    /// Ownership type
    OwnershipType,
    /// Municipality
    Municipality,
    /// Tax id
    Inn,
    /// Territory code
    Oktmo,
    /// Registry code
    RegistryCode,
    /// Address
    Address,
    /// Legal address
    LegalAddress,
    /// Director name
    DirectorName,
    /// Phone
    Phone,
    /// Email
    Email,
    /// Website
    Website,
    /// Camp type
    CampType,
    /// Seasonality
    Seasonality,
    /// Shift dates
    ShiftDates,
    /// Capacity
    Capacity,
    /// Ticket cost
    TicketCost,
    /// Age category
    AgeCategory,
    /// Accessibility
    Accessibility,
    /// Sanitary certificate number
    SanitaryNumber,
    /// Sanitary certificate date
    SanitaryDate,
    /// Medical license
    MedicalLicense,
    /// Education license
    EducationLicense,
    /// Inspection results
    InspectionResults,
    /// Swimming facility
    HasSwimming,
    /// Verification flag
    IsVerified,
    /// Inclusion date
    InclusionDate,
}

impl CampField {
    /// Every field, in regulatory form order.
    pub const ALL: [Self; 28] = [
        Self::Name,
        Self::LegalForm,
        Self::OwnershipType,
        Self::Municipality,
        Self::Inn,
        Self::Oktmo,
        Self::RegistryCode,
        Self::Address,
        Self::LegalAddress,
        Self::DirectorName,
        Self::Phone,
        Self::Email,
        Self::Website,
        Self::CampType,
        Self::Seasonality,
        Self::ShiftDates,
        Self::Capacity,
        Self::TicketCost,
        Self::AgeCategory,
        Self::Accessibility,
        Self::SanitaryNumber,
        Self::SanitaryDate,
        Self::MedicalLicense,
        Self::EducationLicense,
        Self::InspectionResults,
        Self::HasSwimming,
        Self::IsVerified,
        Self::InclusionDate,
    ];

    /// camelCase name used by forms.
    #[must_use]
    pub const fn ui_name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::LegalForm => "legalForm",
            Self::OwnershipType => "ownershipType",
            Self::Municipality => "municipality",
            Self::Inn => "inn",
            Self::Oktmo => "oktmo",
            Self::RegistryCode => "registryCode",
            Self::Address => "address",
            Self::LegalAddress => "legalAddress",
            Self::DirectorName => "directorName",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::Website => "website",
            Self::CampType => "campType",
            Self::Seasonality => "seasonality",
            Self::ShiftDates => "shiftDates",
            Self::Capacity => "capacity",
            Self::TicketCost => "ticketCost",
            Self::AgeCategory => "ageCategory",
            Self::Accessibility => "accessibility",
            Self::SanitaryNumber => "sanitaryNumber",
            Self::SanitaryDate => "sanitaryDate",
            Self::MedicalLicense => "medicalLicense",
            Self::EducationLicense => "educationLicense",
            Self::InspectionResults => "inspectionResults",
            Self::HasSwimming => "hasSwimming",
            Self::IsVerified => "isVerified",
            Self::InclusionDate => "inclusionDate",
        }
    }

    /// snake_case column name in the record store.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::LegalForm => "legal_form",
            Self::OwnershipType => "ownership_type",
            Self::Municipality => "municipality",
            Self::Inn => "inn",
            Self::Oktmo => "oktmo",
            Self::RegistryCode => "registry_code",
            Self::Address => "address",
            Self::LegalAddress => "legal_address",
            Self::DirectorName => "director_name",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::Website => "website",
            Self::CampType => "camp_type",
            Self::Seasonality => "seasonality",
            Self::ShiftDates => "shift_dates",
            Self::Capacity => "capacity",
            Self::TicketCost => "ticket_cost",
            Self::AgeCategory => "age_category",
            Self::Accessibility => "accessibility",
            Self::SanitaryNumber => "sanitary_number",
            Self::SanitaryDate => "sanitary_date",
            Self::MedicalLicense => "medical_license",
            Self::EducationLicense => "education_license",
            Self::InspectionResults => "inspection_results",
            Self::HasSwimming => "has_swimming",
            Self::IsVerified => "is_verified",
            Self::InclusionDate => "inclusion_date",
        }
    }

    /// Human label used in exports and tables.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Наименование",
            Self::LegalForm => "Организационно-правовая форма",
            Self::OwnershipType => "Форма собственности",
            Self::Municipality => "Муниципальное образование",
            Self::Inn => "ИНН",
            Self::Oktmo => "ОКТМО",
            Self::RegistryCode => "Реестровый номер",
            Self::Address => "Фактический адрес",
            Self::LegalAddress => "Юридический адрес",
            Self::DirectorName => "Руководитель",
            Self::Phone => "Телефон",
            Self::Email => "Email",
            Self::Website => "Сайт",
            Self::CampType => "Тип организации",
            Self::Seasonality => "Сезонность",
            Self::ShiftDates => "Даты смен",
            Self::Capacity => "Вместимость",
            Self::TicketCost => "Стоимость путевки",
            Self::AgeCategory => "Возраст детей",
            Self::Accessibility => "Доступная среда",
            Self::SanitaryNumber => "Номер СЭЗ",
            Self::SanitaryDate => "Дата СЭЗ",
            Self::MedicalLicense => "Медицинская лицензия",
            Self::EducationLicense => "Образовательная лицензия",
            Self::InspectionResults => "Результаты проверок",
            Self::HasSwimming => "Бассейн",
            Self::IsVerified => "Статус",
            Self::InclusionDate => "Дата включения в реестр",
        }
    }

    /// Fields the camp representative may change. Verification is reserved
    /// for the ministry.
    #[must_use]
    pub const fn is_camp_editable(self) -> bool {
        !matches!(self, Self::IsVerified | Self::InclusionDate)
    }

    /// Render the field's value of `camp` as display text.
    #[must_use]
    pub fn display_value(self, camp: &Camp) -> String {
        match self {
            Self::Name => camp.name.clone(),
            Self::LegalForm => camp.legal_form.clone(),
            Self::OwnershipType => camp.ownership_type.clone(),
            Self::Municipality => camp.municipality.clone(),
            Self::Inn => camp.inn.clone(),
            Self::Oktmo => camp.oktmo.clone(),
            Self::RegistryCode => camp.registry_code.clone(),
            Self::Address => camp.address.clone(),
            Self::LegalAddress => camp.legal_address.clone(),
            Self::DirectorName => camp.director_name.clone(),
            Self::Phone => camp.phone.clone(),
            Self::Email => camp.email.clone(),
            Self::Website => camp.website.clone(),
            Self::CampType => camp.camp_type.clone(),
            Self::Seasonality => camp.seasonality.clone(),
            Self::ShiftDates => camp.shift_dates.clone(),
            Self::Capacity => camp.capacity.to_string(),
            Self::TicketCost => camp.ticket_cost.to_string(),
            Self::AgeCategory => camp.age_category.clone(),
            Self::Accessibility => camp.accessibility.clone(),
            Self::SanitaryNumber => camp.sanitary_number.clone(),
            Self::SanitaryDate => camp.sanitary_date.clone(),
            Self::MedicalLicense => camp.medical_license.clone(),
            Self::EducationLicense => camp.education_license.clone(),
            Self::InspectionResults => camp.inspection_results.clone(),
            Self::HasSwimming => (if camp.has_swimming { "Да" } else { "Нет" }).to_string(),
            Self::IsVerified => registry_status(camp).to_string(),
            Self::InclusionDate => camp
                .inclusion_date
                .map(|date| date.to_string())
                .unwrap_or_default(),
        }
    }
}

impl fmt::Display for CampField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ui_name())
    }
}

impl FromStr for CampField {
    type Err = UnknownCampField;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();

        Self::ALL
            .into_iter()
            .find(|field| field.ui_name() == value || field.column() == value)
            .ok_or_else(|| UnknownCampField(value.to_string()))
    }
}

/// Registry status label shown to reviewers.
#[must_use]
pub fn registry_status(camp: &Camp) -> &'static str {
    if camp.is_verified {
        "В реестре"
    } else {
        "На проверке"
    }
}
