//! CSV writers for fixtures and processed data.
//!
//! Files are meant to be easy to consume in spreadsheets or downstream scripts:
//! a single header row from the record's column list, then one line per
//! record. Existing files are overwritten without confirmation.

use std::fs::{File, create_dir_all};
use std::path::Path;

use serde::Serialize;

use crate::domain::{DailyMetricRecord, HistoricalMetricRecord};
use crate::error::AppError;

/// A row type with a fixed CSV column list.
///
/// `COLUMNS` must match the serde field order; the header is written from it so
/// that a file with zero rows still carries one.
pub trait CsvRecord: Serialize {
    const COLUMNS: &'static [&'static str];
}

impl CsvRecord for DailyMetricRecord {
    const COLUMNS: &'static [&'static str] = &["date", "sales", "revenue", "users", "conversion_rate"];
}

impl CsvRecord for HistoricalMetricRecord {
    const COLUMNS: &'static [&'static str] = &["date", "sales", "revenue"];
}

/// Write `rows` to `path` as CSV with a header row, creating parent directories.
pub fn write_records_csv<T: CsvRecord>(path: &Path, rows: &[T]) -> Result<(), AppError> {
    ensure_parent_dir(path)?;

    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create CSV '{}': {e}", path.display())))?;
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);

    writer
        .write_record(T::COLUMNS)
        .map_err(|e| AppError::io(format!("Failed to write CSV header to '{}': {e}", path.display())))?;

    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| AppError::io(format!("Failed to write CSV row to '{}': {e}", path.display())))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::io(format!("Failed to flush CSV '{}': {e}", path.display())))?;

    Ok(())
}

/// Create the parent directory of `path` if it has one.
pub fn ensure_parent_dir(path: &Path) -> Result<(), AppError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => create_dir_all(parent).map_err(|e| {
            AppError::io(format!("Failed to create directory '{}': {e}", parent.display()))
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn writes_header_then_rows_in_field_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.csv");
        let rows = vec![
            HistoricalMetricRecord {
                date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
                sales: 60,
                revenue: 512.5,
            },
            HistoricalMetricRecord {
                date: NaiveDate::from_ymd_opt(2023, 1, 2).unwrap(),
                sales: 299,
                revenue: 2999.25,
            },
        ];

        write_records_csv(&path, &rows).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["date,sales,revenue", "2023-01-01,60,512.5", "2023-01-02,299,2999.25"]);
    }

    #[test]
    fn overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "stale contents\nmore\nand more\n").unwrap();

        let rows: Vec<HistoricalMetricRecord> = Vec::new();
        write_records_csv(&path, &rows).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "date,sales,revenue\n");
    }

    #[test]
    fn zero_daily_rows_still_get_a_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daily.csv");

        write_records_csv::<DailyMetricRecord>(&path, &[]).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(
            reader.headers().unwrap(),
            vec!["date", "sales", "revenue", "users", "conversion_rate"]
        );
        assert_eq!(reader.records().count(), 0);
    }

    // The explicit column list must agree with what serde would emit.
    fn serde_header<T: CsvRecord>(row: &T) -> String {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.serialize(row).unwrap();
        let bytes = writer.into_inner().unwrap();
        String::from_utf8(bytes).unwrap().lines().next().unwrap().to_string()
    }

    #[test]
    fn column_lists_match_serde_field_order() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let daily = DailyMetricRecord {
            date,
            sales: 100,
            revenue: 1000.0,
            users: 50,
            conversion_rate: 0.01,
        };
        assert_eq!(serde_header(&daily), DailyMetricRecord::COLUMNS.join(","));

        let hist = HistoricalMetricRecord {
            date,
            sales: 50,
            revenue: 500.0,
        };
        assert_eq!(serde_header(&hist), HistoricalMetricRecord::COLUMNS.join(","));

        let processed = crate::data::ProcessedMetricRow {
            date: Some(date),
            ..Default::default()
        };
        assert_eq!(
            serde_header(&processed),
            crate::data::ProcessedMetricRow::COLUMNS.join(",")
        );
    }

    #[test]
    fn unwritable_destination_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where a parent directory is expected.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();

        let rows: Vec<HistoricalMetricRecord> = Vec::new();
        let err = write_records_csv(&blocker.join("out.csv"), &rows).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Io);
    }
}
