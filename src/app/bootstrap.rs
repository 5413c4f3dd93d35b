//! Workspace bootstrap as an ordered list of independent steps.
//!
//! Each step reports a tri-state outcome. The sequence is fail-fast: the first
//! failed step stops the run, and nothing already written is rolled back.

use tracing::{info, warn};

use crate::config::{Materialized, materialize_default_config};
use crate::data::sample::{DAILY_STREAM, HISTORICAL_STREAM};
use crate::data::{fixture_rng, generate_daily_metrics, generate_historical_data};
use crate::domain::{BootstrapStep, DailyFixtureSpec, HistoricalFixtureSpec};
use crate::error::AppError;
use crate::io::{WORKSPACE_DIRS, Workspace, write_records_csv};

#[derive(Debug, Clone)]
pub enum StepOutcome {
    Success(String),
    /// Nothing to do; not an error.
    Skipped(String),
    Failed(AppError),
}

impl StepOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, StepOutcome::Failed(_))
    }
}

#[derive(Debug, Clone)]
pub struct StepReport {
    pub step: BootstrapStep,
    pub outcome: StepOutcome,
}

#[derive(Debug, Clone, Default)]
pub struct BootstrapOptions {
    pub seed: Option<u64>,
    /// Restrict the run to these steps. Empty means all.
    pub only: Vec<BootstrapStep>,
}

impl BootstrapOptions {
    /// Steps to run, deduplicated, in canonical order.
    pub fn planned_steps(&self) -> Vec<BootstrapStep> {
        BootstrapStep::ALL
            .into_iter()
            .filter(|s| self.only.is_empty() || self.only.contains(s))
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct BootstrapReport {
    pub steps: Vec<StepReport>,
}

impl BootstrapReport {
    pub fn failure(&self) -> Option<(BootstrapStep, &AppError)> {
        self.steps.iter().find_map(|r| match &r.outcome {
            StepOutcome::Failed(e) => Some((r.step, e)),
            _ => None,
        })
    }

    pub fn count(&self, pred: impl Fn(&StepOutcome) -> bool) -> usize {
        self.steps.iter().filter(|r| pred(&r.outcome)).count()
    }
}

/// Run the planned steps in order, calling `on_step` as each one finishes.
pub fn run_bootstrap(
    workspace: &Workspace,
    options: &BootstrapOptions,
    mut on_step: impl FnMut(&StepReport),
) -> BootstrapReport {
    let mut report = BootstrapReport::default();

    for step in options.planned_steps() {
        let outcome = run_step(workspace, step, options.seed);
        let failed = outcome.is_failed();

        let step_report = StepReport { step, outcome };
        on_step(&step_report);
        report.steps.push(step_report);

        if failed {
            warn!(step = step.display_name(), "bootstrap aborted");
            break;
        }
    }

    report
}

/// Run a single step. Safe to call repeatedly.
///
/// Every step requires a usable root, so a step selected on its own never
/// creates a missing root through its parent-directory handling.
pub fn run_step(workspace: &Workspace, step: BootstrapStep, seed: Option<u64>) -> StepOutcome {
    let result = match step {
        BootstrapStep::Environment => check_environment(workspace),
        BootstrapStep::Directories => workspace.check_root().and_then(|()| create_directories(workspace)),
        BootstrapStep::DailyMetrics => workspace
            .check_root()
            .and_then(|()| write_daily_fixture(workspace, seed)),
        BootstrapStep::HistoricalData => workspace
            .check_root()
            .and_then(|()| write_historical_fixture(workspace, seed)),
        BootstrapStep::Config => workspace.check_root().and_then(|()| materialize_config(workspace)),
    };

    match result {
        Ok(outcome) => {
            match &outcome {
                StepOutcome::Success(msg) => info!(step = step.display_name(), "{msg}"),
                StepOutcome::Skipped(msg) => info!(step = step.display_name(), skipped = true, "{msg}"),
                StepOutcome::Failed(_) => {}
            }
            outcome
        }
        Err(e) => {
            tracing::error!(step = step.display_name(), error = %e, "step failed");
            StepOutcome::Failed(e)
        }
    }
}

fn check_environment(workspace: &Workspace) -> Result<StepOutcome, AppError> {
    workspace.check_root()?;
    Ok(StepOutcome::Success(format!(
        "workspace root {}",
        workspace.root().display()
    )))
}

fn create_directories(workspace: &Workspace) -> Result<StepOutcome, AppError> {
    let created = workspace.create_layout()?;
    Ok(StepOutcome::Success(format!(
        "{created} created, {} already present",
        WORKSPACE_DIRS.len() - created
    )))
}

fn write_daily_fixture(workspace: &Workspace, seed: Option<u64>) -> Result<StepOutcome, AppError> {
    let spec = DailyFixtureSpec::standard()?;
    let rows = generate_daily_metrics(&spec, &mut fixture_rng(seed, DAILY_STREAM))?;
    let path = workspace.daily_metrics_path();
    write_records_csv(&path, &rows)?;
    Ok(StepOutcome::Success(format!("{} rows -> {}", rows.len(), path.display())))
}

fn write_historical_fixture(workspace: &Workspace, seed: Option<u64>) -> Result<StepOutcome, AppError> {
    let spec = HistoricalFixtureSpec::standard()?;
    let rows = generate_historical_data(&spec, &mut fixture_rng(seed, HISTORICAL_STREAM))?;
    let path = workspace.historical_data_path();
    write_records_csv(&path, &rows)?;
    Ok(StepOutcome::Success(format!("{} rows -> {}", rows.len(), path.display())))
}

fn materialize_config(workspace: &Workspace) -> Result<StepOutcome, AppError> {
    let path = workspace.config_path();
    Ok(match materialize_default_config(&path)? {
        Materialized::Created => StepOutcome::Success(format!("created {}", path.display())),
        Materialized::AlreadyExists => StepOutcome::Skipped(format!("already exists: {}", path.display())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn planned_steps_keep_canonical_order() {
        let opts = BootstrapOptions {
            seed: None,
            only: vec![BootstrapStep::Config, BootstrapStep::Environment, BootstrapStep::Config],
        };
        assert_eq!(
            opts.planned_steps(),
            vec![BootstrapStep::Environment, BootstrapStep::Config]
        );
        assert_eq!(BootstrapOptions::default().planned_steps(), BootstrapStep::ALL.to_vec());
    }

    #[test]
    fn full_run_reports_every_step() {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::new(dir.path());
        let mut seen = Vec::new();

        let report = run_bootstrap(&ws, &BootstrapOptions::default(), |r| seen.push(r.step));

        assert_eq!(seen, BootstrapStep::ALL.to_vec());
        assert!(report.failure().is_none());
        assert_eq!(report.count(|o| matches!(o, StepOutcome::Success(_))), 5);
    }

    #[test]
    fn second_run_skips_config_only() {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::new(dir.path());
        run_bootstrap(&ws, &BootstrapOptions::default(), |_| {});

        let report = run_bootstrap(&ws, &BootstrapOptions::default(), |_| {});
        let skipped: Vec<_> = report
            .steps
            .iter()
            .filter(|r| matches!(r.outcome, StepOutcome::Skipped(_)))
            .map(|r| r.step)
            .collect();
        assert_eq!(skipped, vec![BootstrapStep::Config]);
    }

    #[test]
    fn failure_stops_the_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::new(dir.path().join("missing-root"));

        let report = run_bootstrap(&ws, &BootstrapOptions::default(), |_| {});

        assert_eq!(report.steps.len(), 1);
        let (step, err) = report.failure().unwrap();
        assert_eq!(step, BootstrapStep::Environment);
        assert_eq!(err.kind(), ErrorKind::Environment);
        assert!(!dir.path().join("missing-root").exists());
    }

    #[test]
    fn selected_steps_never_create_a_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("typo-root");
        let ws = Workspace::new(&root);

        for step in [
            BootstrapStep::Config,
            BootstrapStep::Directories,
            BootstrapStep::DailyMetrics,
            BootstrapStep::HistoricalData,
        ] {
            let opts = BootstrapOptions {
                seed: Some(1),
                only: vec![step],
            };
            let report = run_bootstrap(&ws, &opts, |_| {});
            let (failed, err) = report.failure().unwrap();
            assert_eq!(failed, step);
            assert_eq!(err.kind(), ErrorKind::Environment);
            assert!(!root.exists(), "{} created the root", step.display_name());
        }
    }

    #[test]
    fn io_failure_mid_run_keeps_earlier_output() {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::new(dir.path());
        // A directory where the historical CSV should go.
        std::fs::create_dir_all(ws.historical_data_path()).unwrap();

        let report = run_bootstrap(&ws, &BootstrapOptions::default(), |_| {});

        let (step, err) = report.failure().unwrap();
        assert_eq!(step, BootstrapStep::HistoricalData);
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(report.steps.len(), 4);
        assert!(ws.daily_metrics_path().is_file());
        assert!(!ws.config_path().exists());
    }

    #[test]
    fn single_step_rerun_matches_full_seeded_run() {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::new(dir.path());
        let opts = BootstrapOptions {
            seed: Some(11),
            only: Vec::new(),
        };
        run_bootstrap(&ws, &opts, |_| {});
        let full = std::fs::read(ws.historical_data_path()).unwrap();

        let only = BootstrapOptions {
            seed: Some(11),
            only: vec![BootstrapStep::HistoricalData],
        };
        let report = run_bootstrap(&ws, &only, |_| {});
        assert_eq!(report.steps.len(), 1);
        assert_eq!(std::fs::read(ws.historical_data_path()).unwrap(), full);
    }
}
