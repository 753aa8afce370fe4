//! Report
//!
//! Terminal tables for the ministry dashboard (registry and statistics) and
//! the camp self-service card.

use std::io;

use tabled::{
    Table,
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    audit::compliance_gaps,
    camps::{Camp, CampField, registry_status},
    documents::DocumentType,
    stats::CampStats,
};

/// Errors that can occur when printing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// IO error
    #[error("failed to write report")]
    Io(#[from] io::Error),
}

/// Registry table: one row per camp.
pub fn registry_table(camps: &[&Camp]) -> Table {
    let mut builder = Builder::default();

    builder.push_record(["Название", "ИНН", "Документы", "Отчет", "Статус"]);

    for camp in camps {
        builder.push_record([
            camp.name.clone(),
            camp.inn.clone(),
            format!("{} загр.", camp.documents.len()),
            if camp.has_report() { "Сдан" } else { "Нет" }.to_string(),
            registry_status(camp).to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(2..3), Alignment::right());

    table
}

/// Statistics table for the reports view.
pub fn stats_table(stats: &CampStats) -> Table {
    let mut builder = Builder::default();

    builder.push_record(["Показатель", "Количество"]);
    builder.push_record(["Всего организаций".to_string(), stats.total.to_string()]);
    builder.push_record(["В реестре".to_string(), stats.verified.to_string()]);
    builder.push_record(["Требуют проверки".to_string(), stats.pending.to_string()]);
    builder.push_record(["Сдали отчеты".to_string(), stats.with_reports.to_string()]);
    builder.push_record([
        "Загружено документов".to_string(),
        stats.documents_uploaded.to_string(),
    ]);

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::last(), Alignment::right());

    table
}

/// Camp card: every form field with its value, then the document checklist.
pub fn camp_card(camp: &Camp) -> Table {
    let mut builder = Builder::default();

    builder.push_record(["Поле", "Значение"]);

    for field in CampField::ALL {
        builder.push_record([field.label().to_string(), field.display_value(camp)]);
    }

    for (kind, present) in camp.checklist() {
        builder.push_record([
            kind.label().to_string(),
            if present { "Загружен" } else { "Не загружен" }.to_string(),
        ]);
    }

    let reports = camp.documents_of(DocumentType::ExcelReport);

    for report in reports {
        builder.push_record([
            report.kind.label().to_string(),
            format!("{} ({})", report.file_name, report.uploaded_on),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);

    table
}

/// Uploaded documents of a camp with their ids, for review and deletion.
pub fn documents_table(camp: &Camp) -> Table {
    let mut builder = Builder::default();

    builder.push_record(["Id", "Тип", "Файл", "Загружен", "Статус"]);

    for document in &camp.documents {
        builder.push_record([
            document.id.to_string(),
            document.kind.label().to_string(),
            document.file_name.clone(),
            document.uploaded_on.to_string(),
            document.status.to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);

    table
}

/// Write the registry table followed by a count line.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_registry(mut out: impl io::Write, camps: &[&Camp]) -> Result<(), ReportError> {
    if camps.is_empty() {
        writeln!(out, "Организации не найдены")?;

        return Ok(());
    }

    writeln!(out, "{}", registry_table(camps))?;
    writeln!(out, "Найдено: {}", camps.len())?;

    Ok(())
}

/// Write the local compliance pre-check for `camp`.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_gaps(mut out: impl io::Write, camp: &Camp) -> Result<(), ReportError> {
    let gaps = compliance_gaps(camp);

    if gaps.is_empty() {
        writeln!(out, "Предварительная проверка: замечаний нет")?;

        return Ok(());
    }

    writeln!(out, "Предварительная проверка:")?;

    for gap in gaps {
        writeln!(out, "  - {gap}")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use testresult::TestResult;

    use super::*;
    use crate::{
        camps::CampId,
        documents::{Document, DocumentId, DocumentStatus},
    };

    #[test]
    fn registry_table_has_header_and_rows() {
        let camp = Camp {
            name: "ДОЛ \"Березка\"".to_string(),
            inn: "4826002222".to_string(),
            ..Camp::default()
        };

        let rendered = registry_table(&[&camp]).to_string();

        assert!(rendered.contains("Название"));
        assert!(rendered.contains("4826002222"));
        assert!(rendered.contains("На проверке"));
    }

    #[test]
    fn empty_registry_prints_placeholder() -> TestResult {
        let mut out = Vec::new();

        write_registry(&mut out, &[])?;

        assert_eq!(String::from_utf8(out)?, "Организации не найдены\n");

        Ok(())
    }

    #[test]
    fn documents_table_shows_ids() {
        let camp = Camp {
            documents: vec![Document {
                id: DocumentId::new("d1"),
                camp_id: CampId::new("c1"),
                kind: DocumentType::FireSafety,
                file_name: "fire.pdf".to_string(),
                uploaded_on: date(2024, 5, 1),
                status: DocumentStatus::Verified,
                url: None,
            }],
            ..Camp::default()
        };

        let rendered = documents_table(&camp).to_string();

        assert!(rendered.contains("d1"));
        assert!(rendered.contains("Пожарная безопасность"));
        assert!(rendered.contains("verified"));
    }

    #[test]
    fn gaps_are_listed() -> TestResult {
        let mut out = Vec::new();

        write_gaps(&mut out, &Camp::default())?;

        let text = String::from_utf8(out)?;

        assert!(text.contains("не указан номер СЭЗ"));

        Ok(())
    }
}
