//! CSV ingest for raw daily metrics.
//!
//! This module turns a metrics CSV into loosely typed rows: every field is
//! optional so that cleaning (fill, dedupe) can happen in one place
//! afterwards. Design goals:
//! - **Tolerant cells**: unparseable values become `None`, never an error
//! - **Strict file**: an unreadable file or header is an error
//! - **No cleaning logic here**

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::error::AppError;

/// One raw metrics row, before cleaning.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMetricRow {
    pub date: Option<NaiveDate>,
    pub sales: Option<f64>,
    pub revenue: Option<f64>,
    pub users: Option<f64>,
    pub conversion_rate: Option<f64>,
}

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: raw rows + which known columns were present + row errors.
#[derive(Debug, Clone)]
pub struct IngestedMetrics {
    pub rows: Vec<RawMetricRow>,
    pub columns: Vec<String>,
    pub row_errors: Vec<RowError>,
}

/// Columns the pipeline understands, in output order.
pub const METRIC_COLUMNS: [&str; 5] = ["date", "sales", "revenue", "users", "conversion_rate"];

pub fn load_raw_metrics(path: &Path) -> Result<IngestedMetrics, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open CSV '{}': {e}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::data(format!("Failed to read CSV headers from '{}': {e}", path.display())))?
        .clone();
    let header_map = build_header_map(&headers);

    let columns = METRIC_COLUMNS
        .iter()
        .filter(|c| header_map.contains_key(**c))
        .map(|c| c.to_string())
        .collect();

    let mut rows = Vec::new();
    let mut row_errors = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header, and CSV lines are 1-based.
        let line = idx + 2;
        match result {
            Ok(record) => rows.push(parse_row(&record, &header_map)),
            Err(e) => row_errors.push(RowError {
                line,
                message: format!("CSV parse error: {e}"),
            }),
        }
    }

    Ok(IngestedMetrics {
        rows,
        columns,
        row_errors,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> RawMetricRow {
    RawMetricRow {
        date: get_optional(record, header_map, "date").and_then(parse_date),
        sales: parse_opt_f64(get_optional(record, header_map, "sales")),
        revenue: parse_opt_f64(get_optional(record, header_map, "revenue")),
        users: parse_opt_f64(get_optional(record, header_map, "users")),
        conversion_rate: parse_opt_f64(get_optional(record, header_map, "conversion_rate")),
    }
}

fn get_optional<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

/// Parse a date cell. Accepts ISO dates, optionally with a time suffix.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    const FMTS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];
    // `2024-01-01 00:00:00` style timestamps: keep the date part.
    let s = s.split([' ', 'T']).next().unwrap_or(s);
    FMTS.iter().find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

fn parse_opt_f64(s: Option<&str>) -> Option<f64> {
    let v = s?.parse::<f64>().ok()?;
    v.is_finite().then_some(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_tmp(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.csv");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn parses_known_columns_and_coerces_bad_cells() {
        let (_dir, path) = write_tmp(
            "\u{feff}Date,Sales,revenue,extra\n\
             2024-01-01,100,1000.5,x\n\
             not-a-date,abc,,y\n",
        );
        let ingest = load_raw_metrics(&path).unwrap();

        assert_eq!(ingest.columns, vec!["date", "sales", "revenue"]);
        assert_eq!(ingest.rows.len(), 2);
        assert_eq!(ingest.rows[0].date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(ingest.rows[0].sales, Some(100.0));
        assert_eq!(ingest.rows[0].users, None);
        assert_eq!(ingest.rows[1].date, None);
        assert_eq!(ingest.rows[1].sales, None);
        assert_eq!(ingest.rows[1].revenue, None);
    }

    #[test]
    fn date_formats() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 5);
        assert_eq!(parse_date("2024-01-05"), d);
        assert_eq!(parse_date("2024/01/05"), d);
        assert_eq!(parse_date("05/01/2024"), d);
        assert_eq!(parse_date("2024-01-05 00:00:00"), d);
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_raw_metrics(&dir.path().join("nope.csv")).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Io);
    }

    #[test]
    fn non_finite_numbers_are_dropped() {
        assert_eq!(parse_opt_f64(Some("NaN")), None);
        assert_eq!(parse_opt_f64(Some("inf")), None);
        assert_eq!(parse_opt_f64(Some("1e3")), Some(1000.0));
    }
}
