//! CSV Export
//!
//! Master registry report for spreadsheets: semicolon-delimited, UTF-8 with
//! a byte-order mark, one row per camp in regulatory form order.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use csv::WriterBuilder;
use jiff::civil::Date;
use thiserror::Error;

use crate::camps::{Camp, CampField};

/// UTF-8 byte-order mark, required by spreadsheet software to detect the
/// encoding.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Field delimiter.
pub const DELIMITER: u8 = b';';

/// Label of the trailing document-count column.
pub const DOCUMENTS_COLUMN: &str = "Документов загружено";

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Writing to the destination failed
    #[error("failed to write export: {0}")]
    Io(#[from] io::Error),

    /// CSV serialisation failed
    #[error("failed to encode export: {0}")]
    Csv(#[from] csv::Error),
}

/// Column headers in output order.
pub fn header() -> Vec<&'static str> {
    CampField::ALL
        .into_iter()
        .map(CampField::label)
        .chain([DOCUMENTS_COLUMN])
        .collect()
}

/// Values of one camp in header order.
pub fn row(camp: &Camp) -> Vec<String> {
    CampField::ALL
        .into_iter()
        .map(|field| field.display_value(camp))
        .chain([camp.documents.len().to_string()])
        .collect()
}

/// Write the report for `camps` to `writer`.
///
/// # Errors
///
/// Returns an error if encoding or writing fails.
pub fn write_csv<W: Write>(camps: &[Camp], mut writer: W) -> Result<(), ExportError> {
    writer.write_all(UTF8_BOM)?;

    let mut csv = WriterBuilder::new()
        .delimiter(DELIMITER)
        .from_writer(writer);

    csv.write_record(header())?;

    for camp in camps {
        csv.write_record(row(camp))?;
    }

    csv.flush()?;

    Ok(())
}

/// Render the report into memory.
///
/// # Errors
///
/// Returns an error if encoding fails.
pub fn to_bytes(camps: &[Camp]) -> Result<Vec<u8>, ExportError> {
    let mut buffer = Vec::new();

    write_csv(camps, &mut buffer)?;

    Ok(buffer)
}

/// Date-stamped download name.
#[must_use]
pub fn file_name(date: Date) -> String {
    format!("reestr_lagerey_{date}.csv")
}

/// Write the report into `dir` under its date-stamped name and return the
/// path written.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_to_dir(camps: &[Camp], dir: &Path, date: Date) -> Result<PathBuf, ExportError> {
    let path = dir.join(file_name(date));
    let file = BufWriter::new(File::create(&path)?);

    write_csv(camps, file)?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn output_starts_with_bom() -> TestResult {
        let bytes = to_bytes(&[])?;

        assert!(bytes.starts_with(UTF8_BOM), "missing byte-order mark");

        Ok(())
    }

    #[test]
    fn values_with_delimiter_are_quoted() -> TestResult {
        let camp = Camp {
            name: "Лагерь; филиал".to_string(),
            ..Camp::default()
        };

        let text = String::from_utf8(to_bytes(&[camp])?)?;

        assert!(
            text.contains("\"Лагерь; филиал\""),
            "delimiter inside a value must be quoted: {text}"
        );

        Ok(())
    }

    #[test]
    fn file_name_is_date_stamped() {
        assert_eq!(file_name(date(2024, 6, 1)), "reestr_lagerey_2024-06-01.csv");
    }
}
