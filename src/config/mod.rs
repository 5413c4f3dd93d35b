//! The workspace configuration document (`config/config.yaml`).
//!
//! The tool writes the default document once and afterwards treats the file as
//! user-owned: it is read and validated, never rewritten.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

use crate::error::AppError;
use crate::io::ensure_parent_dir;

/// Body written when no configuration exists yet. Written byte-for-byte.
pub const DEFAULT_CONFIG_YAML: &str = "\
# Analytics workspace configuration.
# Created once by `analytics bootstrap`; edit freely, it is never overwritten.

paths:
  raw_data: data/raw/
  processed_data: data/processed/
  forecasts: data/forecasts/
  reports: reports/
  excel_files: excel_files/

data:
  source_files:
    daily_metrics: daily_metrics.csv
    historical_data: historical_data.csv
  target_column: sales

model:
  test_size: 0.2
  forecast_periods: 7

reporting:
  company_name: Your Company Name
  report_title: Daily Analytics Report

logging:
  level: INFO
  file: logs/analytics_tool.log
";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigDocument {
    pub paths: PathsSection,
    pub data: DataSection,
    pub model: ModelSection,
    pub reporting: ReportingSection,
    pub logging: LoggingSection,
}

/// Workspace directories, relative to the workspace root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsSection {
    pub raw_data: String,
    pub processed_data: String,
    pub forecasts: String,
    pub reports: String,
    pub excel_files: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSection {
    pub source_files: SourceFiles,
    /// Column downstream modelling predicts.
    pub target_column: String,
}

/// File names inside `paths.raw_data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFiles {
    pub daily_metrics: String,
    pub historical_data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSection {
    /// Hold-out fraction, strictly between 0 and 1.
    pub test_size: f64,
    pub forecast_periods: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportingSection {
    pub company_name: String,
    pub report_title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSection {
    pub level: String,
    pub file: String,
}

impl Default for ConfigDocument {
    fn default() -> Self {
        Self {
            paths: PathsSection {
                raw_data: "data/raw/".to_string(),
                processed_data: "data/processed/".to_string(),
                forecasts: "data/forecasts/".to_string(),
                reports: "reports/".to_string(),
                excel_files: "excel_files/".to_string(),
            },
            data: DataSection {
                source_files: SourceFiles {
                    daily_metrics: "daily_metrics.csv".to_string(),
                    historical_data: "historical_data.csv".to_string(),
                },
                target_column: "sales".to_string(),
            },
            model: ModelSection {
                test_size: 0.2,
                forecast_periods: 7,
            },
            reporting: ReportingSection {
                company_name: "Your Company Name".to_string(),
                report_title: "Daily Analytics Report".to_string(),
            },
            logging: LoggingSection {
                level: "INFO".to_string(),
                file: "logs/analytics_tool.log".to_string(),
            },
        }
    }
}

impl ConfigDocument {
    pub fn from_yaml(text: &str) -> Result<Self, AppError> {
        let doc: ConfigDocument =
            serde_yaml::from_str(text).map_err(|e| AppError::config(format!("Invalid config YAML: {e}")))?;
        doc.validate()?;
        Ok(doc)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let t = self.model.test_size;
        if !(t.is_finite() && t > 0.0 && t < 1.0) {
            return Err(AppError::config(format!(
                "model.test_size must be strictly between 0 and 1 (got {t})."
            )));
        }
        if self.model.forecast_periods == 0 {
            return Err(AppError::config("model.forecast_periods must be at least 1."));
        }
        if self.data.target_column.trim().is_empty() {
            return Err(AppError::config("data.target_column must not be empty."));
        }
        self.log_level()?;
        Ok(())
    }

    /// `logging.level` as a tracing filter. Accepts Python-style names too.
    pub fn log_level(&self) -> Result<LevelFilter, AppError> {
        match self.logging.level.trim().to_ascii_uppercase().as_str() {
            "TRACE" => Ok(LevelFilter::TRACE),
            "DEBUG" => Ok(LevelFilter::DEBUG),
            "INFO" => Ok(LevelFilter::INFO),
            "WARN" | "WARNING" => Ok(LevelFilter::WARN),
            "ERROR" | "CRITICAL" => Ok(LevelFilter::ERROR),
            other => Err(AppError::config(format!("Unknown logging.level '{other}'."))),
        }
    }

    /// Raw daily metrics CSV, relative to the workspace root.
    pub fn daily_metrics_path(&self) -> PathBuf {
        Path::new(&self.paths.raw_data).join(&self.data.source_files.daily_metrics)
    }

    pub fn historical_data_path(&self) -> PathBuf {
        Path::new(&self.paths.raw_data).join(&self.data.source_files.historical_data)
    }

    pub fn processed_dir(&self) -> PathBuf {
        PathBuf::from(&self.paths.processed_data)
    }

    pub fn log_file_path(&self) -> PathBuf {
        PathBuf::from(&self.logging.file)
    }
}

/// What the materializer did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Materialized {
    Created,
    AlreadyExists,
}

/// Write the default document to `path` unless a file is already there.
///
/// An existing file is never read or modified. Anything at `path` that is not
/// a regular file is an error.
pub fn materialize_default_config(path: &Path) -> Result<Materialized, AppError> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => return Ok(Materialized::AlreadyExists),
        Ok(_) => {
            return Err(AppError::io(format!(
                "Config path '{}' exists but is not a regular file.",
                path.display()
            )));
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(AppError::io(format!(
                "Failed to check config path '{}': {e}",
                path.display()
            )));
        }
    }

    ensure_parent_dir(path)?;
    fs::write(path, DEFAULT_CONFIG_YAML)
        .map_err(|e| AppError::io(format!("Failed to write config '{}': {e}", path.display())))?;
    Ok(Materialized::Created)
}

/// Read and validate the configuration document at `path`.
pub fn load_config(path: &Path) -> Result<ConfigDocument, AppError> {
    let text = fs::read_to_string(path)
        .map_err(|e| AppError::io(format!("Failed to read config '{}': {e}", path.display())))?;
    ConfigDocument::from_yaml(&text)
}
