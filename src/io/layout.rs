//! Workspace directory layout.
//!
//! Every path the tool touches is relative to a workspace root. Other
//! collaborators (report runner, test runner, Excel macros, CI) only rely on
//! this tree existing; nothing here invokes them.

use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// Directories created by bootstrap, relative to the workspace root.
pub const WORKSPACE_DIRS: [&str; 10] = [
    "data/raw",
    "data/processed",
    "data/forecasts",
    "reports/daily_reports",
    "reports/forecast_reports",
    "excel_files/macro_scripts",
    "logs",
    "config",
    "tests",
    ".github/workflows",
];

pub const DAILY_METRICS_CSV: &str = "data/raw/daily_metrics.csv";
pub const HISTORICAL_DATA_CSV: &str = "data/raw/historical_data.csv";
pub const CONFIG_YAML: &str = "config/config.yaml";

/// A resolved workspace root.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `rel` against the root. An absolute `rel` replaces the root
    /// entirely, so absolute `paths.*` config values point outside the workspace.
    pub fn join(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.root.join(rel)
    }

    pub fn daily_metrics_path(&self) -> PathBuf {
        self.join(DAILY_METRICS_CSV)
    }

    pub fn historical_data_path(&self) -> PathBuf {
        self.join(HISTORICAL_DATA_CSV)
    }

    pub fn config_path(&self) -> PathBuf {
        self.join(CONFIG_YAML)
    }

    /// Fail with an environment error unless the root is an existing directory.
    pub fn check_root(&self) -> Result<(), AppError> {
        let meta = std::fs::metadata(&self.root).map_err(|e| {
            AppError::environment(format!(
                "Workspace root '{}' is not accessible: {e}",
                self.root.display()
            ))
        })?;
        if !meta.is_dir() {
            return Err(AppError::environment(format!(
                "Workspace root '{}' is not a directory.",
                self.root.display()
            )));
        }
        if meta.permissions().readonly() {
            return Err(AppError::environment(format!(
                "Workspace root '{}' is read-only.",
                self.root.display()
            )));
        }
        Ok(())
    }

    /// Create every directory of the layout. Existing directories are left alone.
    ///
    /// Returns how many directories did not exist beforehand.
    pub fn create_layout(&self) -> Result<usize, AppError> {
        let mut created = 0usize;
        for rel in WORKSPACE_DIRS {
            let dir = self.join(rel);
            if !dir.is_dir() {
                created += 1;
            }
            create_dir_all(&dir)
                .map_err(|e| AppError::io(format!("Failed to create directory '{}': {e}", dir.display())))?;
            tracing::debug!(dir = %dir.display(), "ensured directory");
        }
        Ok(created)
    }
}
