//! Compliance audit
//!
//! Builds the reviewer prompt sent to the text-generation service, runs the
//! same inclusion criteria locally, and reads the verdict out of a narration.

use std::fmt;

use smallvec::SmallVec;

use crate::{camps::Camp, documents::DocumentType};

/// Answer prefix for a refusal.
pub const REFUSAL_MARKER: &str = "ОТКАЗ";

/// Answer phrase for a recommendation.
pub const RECOMMENDATION_MARKER: &str = "РЕКОМЕНДОВАНО К ВКЛЮЧЕНИЮ";

/// Documents that must be on file before inclusion.
pub const REQUIRED_DOCUMENTS: [DocumentType; 2] =
    [DocumentType::FireSafety, DocumentType::SanitaryConclusion];

/// A criterion the camp card does not meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplianceGap {
    /// Sanitary certificate number is empty
    MissingSanitaryNumber,

    /// Sanitary certificate date is empty
    MissingSanitaryDate,

    /// No medical license or contract
    MissingMedicalLicense,

    /// Required document not uploaded
    MissingDocument(DocumentType),
}

impl fmt::Display for ComplianceGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSanitaryNumber => f.write_str("не указан номер СЭЗ"),
            Self::MissingSanitaryDate => f.write_str("не указана дата СЭЗ"),
            Self::MissingMedicalLicense => f.write_str("нет сведений о медицинской лицензии"),
            Self::MissingDocument(kind) => write!(f, "не загружен документ \"{kind}\""),
        }
    }
}

/// Inclusion criteria the camp currently fails.
pub fn compliance_gaps(camp: &Camp) -> SmallVec<[ComplianceGap; 5]> {
    let mut gaps = SmallVec::new();

    if camp.sanitary_number.trim().is_empty() {
        gaps.push(ComplianceGap::MissingSanitaryNumber);
    }

    if camp.sanitary_date.trim().is_empty() {
        gaps.push(ComplianceGap::MissingSanitaryDate);
    }

    if camp.medical_license.trim().is_empty() {
        gaps.push(ComplianceGap::MissingMedicalLicense);
    }

    for kind in REQUIRED_DOCUMENTS {
        if !camp.has_document(kind) {
            gaps.push(ComplianceGap::MissingDocument(kind));
        }
    }

    gaps
}

/// Reviewer prompt for `camp`.
pub fn compliance_prompt(camp: &Camp) -> String {
    let mut documents: String = camp
        .documents
        .iter()
        .map(|doc| format!("- {}: {} ({})\n", doc.kind, doc.file_name, doc.status))
        .collect();

    if documents.is_empty() {
        documents.push_str("- файлы не загружены\n");
    }

    format!(
        "Вы - эксперт отдела надзора Министерства Образования. Проведите аудит карточки \
лагеря для включения в Реестр (согласно Приказу № 509).

АНКЕТА ОРГАНИЗАЦИИ:
1. Наименование: {name} ({legal_form})
2. Руководитель: {director}
3. ИНН: {inn} | ОКТМО: {oktmo}
4. Адрес: {address}
5. Тип: {camp_type} | Сезонность: {seasonality}
6. Вместимость: {capacity} | Возраст: {age}
7. СЭЗ (Санитарное заключение): Номер \"{sanitary_number}\", Дата \"{sanitary_date}\"
8. Медицина: \"{medical}\"
9. Образовательная лицензия: \"{education}\"
10. Результаты проверок: \"{inspections}\"

ЗАГРУЖЕННЫЕ ФАЙЛЫ:
{documents}
КРИТЕРИИ ПРОВЕРКИ:
1. Все поля раздела \"СЭЗ\" должны быть заполнены.
2. Должны быть сведения о медицинской лицензии или договоре.
3. Среди файлов ОБЯЗАТЕЛЬНО должны быть: \"{fire}\" и \"{sanitary}\".

ЗАДАЧА:
Сформируйте заключение (макс 100 слов).
- Если данных не хватает (особенно СЭЗ или Медицины), напишите \"{REFUSAL_MARKER}: [причина]\".
- Если все ок, напишите \"{RECOMMENDATION_MARKER}\".
",
        name = camp.name,
        legal_form = camp.legal_form,
        director = camp.director_name,
        inn = camp.inn,
        oktmo = camp.oktmo,
        address = camp.address,
        camp_type = camp.camp_type,
        seasonality = camp.seasonality,
        capacity = camp.capacity,
        age = camp.age_category,
        sanitary_number = camp.sanitary_number,
        sanitary_date = camp.sanitary_date,
        medical = camp.medical_license,
        education = camp.education_license,
        inspections = camp.inspection_results,
        fire = DocumentType::FireSafety,
        sanitary = DocumentType::SanitaryConclusion,
    )
}

/// Verdict read out of a narration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditVerdict {
    /// Recommended for inclusion
    Recommended,

    /// Refused, with the stated reason
    Refused(String),

    /// Narration follows neither answer form
    Unclear,
}

impl AuditVerdict {
    /// Classify a narration.
    pub fn parse(narration: &str) -> Self {
        let text = narration.trim();

        if let Some(position) = text.find(REFUSAL_MARKER) {
            let reason = text
                .get(position + REFUSAL_MARKER.len()..)
                .unwrap_or_default()
                .trim_start_matches([':', ' '])
                .trim();

            return Self::Refused(reason.to_string());
        }

        if text.contains(RECOMMENDATION_MARKER) {
            return Self::Recommended;
        }

        Self::Unclear
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;
    use crate::documents::{Document, DocumentId, DocumentStatus};

    fn complete_camp() -> Camp {
        let id = crate::camps::CampId::new("c1");

        Camp {
            name: "ДОЛ \"Звездный\"".to_string(),
            sanitary_number: "48.ОЦ.01.000.М.000111.05.23".to_string(),
            sanitary_date: "25.05.2023".to_string(),
            medical_license: "ЛО-48-01-001234".to_string(),
            documents: REQUIRED_DOCUMENTS
                .into_iter()
                .map(|kind| Document {
                    id: DocumentId::new(kind.slug()),
                    camp_id: id.clone(),
                    kind,
                    file_name: format!("{}.pdf", kind.slug()),
                    uploaded_on: date(2024, 4, 10),
                    status: DocumentStatus::Verified,
                    url: None,
                })
                .collect(),
            id,
            ..Camp::default()
        }
    }

    #[test]
    fn complete_camp_has_no_gaps() {
        assert!(compliance_gaps(&complete_camp()).is_empty());
    }

    #[test]
    fn empty_camp_reports_every_gap() {
        let gaps = compliance_gaps(&Camp::default());

        assert_eq!(gaps.len(), 5);
        assert!(gaps.contains(&ComplianceGap::MissingDocument(DocumentType::FireSafety)));
    }

    #[test]
    fn prompt_lists_documents_and_fields() {
        let prompt = compliance_prompt(&complete_camp());

        assert!(prompt.contains("ДОЛ \"Звездный\""));
        assert!(prompt.contains("- Пожарная безопасность: fire-safety.pdf (verified)"));
        assert!(prompt.contains("Номер \"48.ОЦ.01.000.М.000111.05.23\""));
    }

    #[test]
    fn prompt_marks_missing_files() {
        assert!(compliance_prompt(&Camp::default()).contains("файлы не загружены"));
    }

    #[test]
    fn verdict_extracts_refusal_reason() {
        let verdict = AuditVerdict::parse("ОТКАЗ: отсутствует санитарное заключение");

        assert_eq!(
            verdict,
            AuditVerdict::Refused("отсутствует санитарное заключение".to_string())
        );
    }

    #[test]
    fn verdict_detects_recommendation() {
        assert_eq!(
            AuditVerdict::parse("Заключение: РЕКОМЕНДОВАНО К ВКЛЮЧЕНИЮ."),
            AuditVerdict::Recommended
        );
        assert_eq!(AuditVerdict::parse("Нет ответа"), AuditVerdict::Unclear);
    }
}
