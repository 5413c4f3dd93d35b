//! The data pipeline: load raw daily metrics, clean, derive, save.
//!
//! load -> (generate sample if missing) -> clean -> metrics -> save

use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::ConfigDocument;
use crate::data::sample::DAILY_STREAM;
use crate::data::{ProcessedMetricRow, calculate_metrics, clean_rows, fixture_rng, generate_daily_metrics};
use crate::domain::DailyFixtureSpec;
use crate::error::AppError;
use crate::io::{RowError, Workspace, load_raw_metrics, write_records_csv};

/// Output file name inside `paths.processed_data`.
pub const PROCESSED_FILE_NAME: &str = "processed_data.csv";

/// All computed outputs of a single `analytics data` run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub raw_path: PathBuf,
    pub processed_path: PathBuf,
    /// True when the raw file was missing and sample data was written in its place.
    pub generated_sample: bool,
    pub rows_read: usize,
    pub rows_after_cleaning: usize,
    pub columns: Vec<String>,
    pub row_errors: Vec<RowError>,
    pub rows: Vec<ProcessedMetricRow>,
}

pub fn run_data_pipeline(
    workspace: &Workspace,
    config: &ConfigDocument,
    seed: Option<u64>,
) -> Result<PipelineOutput, AppError> {
    // 1) Make sure there is something to load.
    let raw_path = workspace.join(config.daily_metrics_path());
    let generated_sample = !raw_path.exists();
    if generated_sample {
        warn!(path = %raw_path.display(), "raw data not found, generating sample data");
        let spec = DailyFixtureSpec::standard()?;
        let rows = generate_daily_metrics(&spec, &mut fixture_rng(seed, DAILY_STREAM))?;
        write_records_csv(&raw_path, &rows)?;
    }

    // 2) Load.
    let ingest = load_raw_metrics(&raw_path)?;
    info!(path = %raw_path.display(), rows = ingest.rows.len(), "loaded raw data");
    for e in &ingest.row_errors {
        warn!(line = e.line, "{}", e.message);
    }
    if ingest.rows.is_empty() {
        return Err(AppError::data(format!(
            "No usable rows in '{}'.",
            raw_path.display()
        )));
    }

    // 3) Clean and derive.
    let cleaned = clean_rows(&ingest.rows);
    info!(rows = cleaned.len(), columns = ingest.columns.len(), "cleaned data");
    let rows = calculate_metrics(&cleaned);

    // 4) Save.
    let processed_path = workspace.join(config.processed_dir()).join(PROCESSED_FILE_NAME);
    write_records_csv(&processed_path, &rows)?;
    info!(path = %processed_path.display(), "saved processed data");

    Ok(PipelineOutput {
        raw_path,
        processed_path,
        generated_sample,
        rows_read: ingest.rows.len(),
        rows_after_cleaning: cleaned.len(),
        columns: ingest.columns,
        row_errors: ingest.row_errors,
        rows,
    })
}
