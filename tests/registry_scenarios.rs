//! Registry scenarios over the embedded demo data set.
//!
//! The demo registry holds three camps:
//!
//! 1. ДОЛ "Звездный": verified, sanitary certificate and medical license on
//!    file, one fire-safety document.
//! 2. ДОЛ "Березка": awaiting verification, no sanitary certificate.
//! 3. Санаторий "Солнечный": verified, no documents.

use camp_registry::{
    export,
    prelude::*,
    report::{self, registry_table},
};
use jiff::civil::date;
use testresult::TestResult;

fn find<'a>(camps: &'a [Camp], name: &str) -> Result<&'a Camp, String> {
    camps
        .iter()
        .find(|camp| camp.name.contains(name))
        .ok_or_else(|| format!("camp {name} missing from demo data"))
}

#[test]
fn problematic_filter_selects_only_incomplete_camps() -> TestResult {
    let camps = demo_camps()?;
    let query = RegistryQuery {
        filter: RegistryFilter::Problematic,
        ..RegistryQuery::default()
    };

    let found = query.apply(&camps);

    assert!(
        found.iter().any(|camp| camp.name.contains("Березка")),
        "unverified camp without a certificate must be flagged"
    );
    assert!(
        found.iter().all(|camp| !camp.name.contains("Звездный")),
        "complete verified camp must not be flagged"
    );

    Ok(())
}

#[test]
fn stats_stay_within_bounds() -> TestResult {
    let camps = demo_camps()?;
    let stats = CampStats::from_camps(&camps);

    assert_eq!(stats.total, 3);
    assert_eq!(stats.verified + stats.pending, stats.total);
    assert!(stats.with_reports <= stats.total, "more reports than camps");
    assert_eq!(stats.documents_uploaded, 1);

    Ok(())
}

#[test]
fn every_export_row_matches_header_width() -> TestResult {
    let camps = demo_camps()?;
    let bytes = export::to_bytes(&camps)?;
    let body = bytes
        .strip_prefix(export::UTF8_BOM)
        .ok_or("export is missing the byte-order mark")?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(export::DELIMITER)
        .has_headers(true)
        .from_reader(body);

    let width = reader.headers()?.len();

    assert_eq!(width, CampField::ALL.len() + 1);

    let mut rows = 0;

    for record in reader.records() {
        assert_eq!(record?.len(), width, "row width differs from header");
        rows += 1;
    }

    assert_eq!(rows, camps.len());

    Ok(())
}

#[test]
fn export_writes_date_stamped_file() -> TestResult {
    let camps = demo_camps()?;
    let dir = tempfile::tempdir()?;

    let path = export::write_to_dir(&camps, dir.path(), date(2024, 6, 1))?;

    assert!(path.ends_with("reestr_lagerey_2024-06-01.csv"));
    assert!(std::fs::read(&path)?.starts_with(export::UTF8_BOM));

    Ok(())
}

#[test]
fn camp_update_round_trips_into_card() -> TestResult {
    let mut camps = demo_camps()?;
    let camp = camps
        .iter_mut()
        .find(|camp| camp.name.contains("Березка"))
        .ok_or("camp missing")?;

    let mut update = CampUpdate::default();
    update.assign("sanitaryNumber=48.ОЦ.01.000.М.000222.05.24")?;
    update.assign("sanitaryDate=20.05.2024")?;
    update.validate()?;
    update.apply_to(camp);

    assert!(camp.has_sanitary_certificate());
    assert!(
        compliance_gaps(camp).contains(&ComplianceGap::MissingMedicalLicense),
        "medical license is still missing"
    );

    Ok(())
}

#[test]
fn registry_report_lists_found_camps() -> TestResult {
    let camps = demo_camps()?;
    let star = find(&camps, "Звездный")?;

    let rendered = registry_table(&[star]).to_string();
    assert!(rendered.contains("В реестре"));

    let mut out = Vec::new();
    report::write_registry(&mut out, &[star])?;

    assert!(String::from_utf8(out)?.ends_with("Найдено: 1\n"));

    Ok(())
}
