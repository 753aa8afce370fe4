//! Documents

use std::{fmt, path::Path, str::FromStr};

use jiff::civil::Date;
use thiserror::Error;

use crate::{camps::CampId, ids::TypedId};

/// Document Id
pub type DocumentId = TypedId<Document>;

/// Errors parsing document enumerations from their wire values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentParseError {
    /// Unknown document type label
    #[error("unknown document type: {0}")]
    UnknownType(String),

    /// Unknown review status
    #[error("unknown document status: {0}")]
    UnknownStatus(String),
}

/// Largest accepted upload, in bytes.
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// Reasons an upload is refused before it reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    /// The file has no content
    #[error("file {0} is empty")]
    Empty(String),

    /// The file exceeds [`MAX_UPLOAD_BYTES`]
    #[error("file {file_name} is {size} bytes, the limit is 5 MiB")]
    TooLarge {
        /// Uploaded filename
        file_name: String,

        /// File size in bytes
        size: u64,
    },

    /// The extension is not accepted for the document type
    #[error("file {file_name} is not accepted as \"{kind}\"")]
    UnsupportedExtension {
        /// Uploaded filename
        file_name: String,

        /// Target document type
        kind: DocumentType,
    },
}

/// Kind of regulatory evidence a document provides.
///
/// The store keeps the Russian label as the column value, so the label is
/// also the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DocumentType {
    /// Fire-safety certificate
    FireSafety,

    /// Sanitary-epidemiological conclusion
    SanitaryConclusion,

    /// Staff list
    StaffList,

    /// Menu
    Menu,

    /// Medical license
    MedicalLicense,

    /// Education license
    EducationLicense,

    /// Periodic Excel report
    ExcelReport,
}

impl DocumentType {
    /// Every document type, in checklist order.
    pub const ALL: [Self; 7] = [
        Self::FireSafety,
        Self::SanitaryConclusion,
        Self::StaffList,
        Self::Menu,
        Self::MedicalLicense,
        Self::EducationLicense,
        Self::ExcelReport,
    ];

    /// Types that make up the per-camp document checklist.
    pub const CHECKLIST: [Self; 6] = [
        Self::FireSafety,
        Self::SanitaryConclusion,
        Self::StaffList,
        Self::Menu,
        Self::MedicalLicense,
        Self::EducationLicense,
    ];

    /// Wire value and display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FireSafety => "Пожарная безопасность",
            Self::SanitaryConclusion => "Заключение СЭС",
            Self::StaffList => "Штатное расписание",
            Self::Menu => "Меню питания",
            Self::MedicalLicense => "Медицинская лицензия",
            Self::EducationLicense => "Образовательная лицензия",
            Self::ExcelReport => "Отчетный период (Excel)",
        }
    }

    /// Short ASCII slug, convenient on the command line.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::FireSafety => "fire-safety",
            Self::SanitaryConclusion => "sanitary",
            Self::StaffList => "staff-list",
            Self::Menu => "menu",
            Self::MedicalLicense => "medical-license",
            Self::EducationLicense => "education-license",
            Self::ExcelReport => "excel-report",
        }
    }

    /// Periodic reports may be uploaded repeatedly; every other type is a
    /// single slot that must be emptied before re-uploading.
    #[must_use]
    pub const fn is_periodic(self) -> bool {
        matches!(self, Self::ExcelReport)
    }

    /// File extensions accepted for this type.
    #[must_use]
    pub const fn accepted_extensions(self) -> &'static [&'static str] {
        match self {
            Self::ExcelReport => &["xls", "xlsx", "csv", "pdf"],
            _ => &["pdf", "jpg", "jpeg", "png"],
        }
    }

    /// Check a file against the size limit and this type's extensions.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is empty, too large or of the wrong kind.
    pub fn check_upload(self, file_name: &str, size: u64) -> Result<(), UploadError> {
        if size == 0 {
            return Err(UploadError::Empty(file_name.to_string()));
        }

        if size > MAX_UPLOAD_BYTES {
            return Err(UploadError::TooLarge {
                file_name: file_name.to_string(),
                size,
            });
        }

        let accepted = Path::new(file_name)
            .extension()
            .and_then(|extension| extension.to_str())
            .is_some_and(|extension| {
                self.accepted_extensions()
                    .iter()
                    .any(|accepted| extension.eq_ignore_ascii_case(accepted))
            });

        if !accepted {
            return Err(UploadError::UnsupportedExtension {
                file_name: file_name.to_string(),
                kind: self,
            });
        }

        Ok(())
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DocumentType {
    type Err = DocumentParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();

        Self::ALL
            .into_iter()
            .find(|kind| kind.label() == value || kind.slug() == value)
            .ok_or_else(|| DocumentParseError::UnknownType(value.to_string()))
    }
}

/// Review status of an uploaded document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DocumentStatus {
    /// Awaiting ministry review
    #[default]
    Pending,

    /// Accepted by the ministry
    Verified,

    /// Rejected by the ministry
    Rejected,
}

impl DocumentStatus {
    /// Every status value.
    pub const ALL: [Self; 3] = [Self::Pending, Self::Verified, Self::Rejected];

    /// Wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Verified => "verified",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentStatus {
    type Err = DocumentParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "pending" => Ok(Self::Pending),
            "verified" => Ok(Self::Verified),
            "rejected" => Ok(Self::Rejected),
            other => Err(DocumentParseError::UnknownStatus(other.to_string())),
        }
    }
}

/// Uploaded file evidencing regulatory compliance.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Document id
    pub id: DocumentId,

    /// Owning camp
    pub camp_id: CampId,

    /// Document type
    pub kind: DocumentType,

    /// Stored filename
    pub file_name: String,

    /// Upload date
    pub uploaded_on: Date,

    /// Review status
    pub status: DocumentStatus,

    /// Download URL, when the store exposes one
    pub url: Option<String>,
}
