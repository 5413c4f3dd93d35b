//! Formatted terminal output: per-step status lines and run summaries.

use crate::app::bootstrap::{BootstrapReport, StepOutcome, StepReport};
use crate::app::pipeline::PipelineOutput;
use crate::config::ConfigDocument;

/// Status indicator for a step outcome: success, warning (skipped), or error.
pub fn status_symbol(outcome: &StepOutcome) -> &'static str {
    match outcome {
        StepOutcome::Success(_) => "✓",
        StepOutcome::Skipped(_) => "!",
        StepOutcome::Failed(_) => "✗",
    }
}

pub fn format_step_line(report: &StepReport) -> String {
    let detail = match &report.outcome {
        StepOutcome::Success(msg) | StepOutcome::Skipped(msg) => msg.clone(),
        StepOutcome::Failed(err) => err.to_string(),
    };
    format!(
        "[{}] {:<24} {}",
        status_symbol(&report.outcome),
        report.step.display_name(),
        detail
    )
}

pub fn format_bootstrap_summary(report: &BootstrapReport) -> String {
    let ok = report.count(|o| matches!(o, StepOutcome::Success(_)));
    let skipped = report.count(|o| matches!(o, StepOutcome::Skipped(_)));

    match report.failure() {
        Some((step, _)) => format!(
            "Bootstrap aborted at '{}' ({ok} succeeded, {skipped} skipped).",
            step.display_name()
        ),
        None => format!("Bootstrap complete: {ok} succeeded, {skipped} skipped."),
    }
}

pub fn format_pipeline_summary(out: &PipelineOutput) -> String {
    let mut s = String::new();
    s.push_str("=== analytics - data pipeline ===\n");
    if out.generated_sample {
        s.push_str(&format!("Raw: {} (generated sample data)\n", out.raw_path.display()));
    } else {
        s.push_str(&format!("Raw: {}\n", out.raw_path.display()));
    }
    s.push_str(&format!("Columns: {}\n", out.columns.join(", ")));
    s.push_str(&format!(
        "Rows: read={} cleaned={} skipped={}\n",
        out.rows_read,
        out.rows_after_cleaning,
        out.row_errors.len()
    ));
    if let (Some(first), Some(last)) = (
        out.rows.iter().find_map(|r| r.date),
        out.rows.iter().rev().find_map(|r| r.date),
    ) {
        s.push_str(&format!("Dates: {first} .. {last}\n"));
    }
    if let Some(total) = out.rows.iter().rev().find_map(|r| r.cumulative_revenue) {
        s.push_str(&format!("Total revenue: {total:.2}\n"));
    }
    s.push_str(&format!("Processed: {}", out.processed_path.display()));
    s
}

pub fn format_config_summary(config: &ConfigDocument) -> String {
    let mut s = String::new();
    s.push_str(&format!("Company: {}\n", config.reporting.company_name));
    s.push_str(&format!("Report title: {}\n", config.reporting.report_title));
    s.push_str(&format!("Daily metrics: {}\n", config.daily_metrics_path().display()));
    s.push_str(&format!("Historical data: {}\n", config.historical_data_path().display()));
    s.push_str(&format!("Processed dir: {}\n", config.paths.processed_data));
    s.push_str(&format!(
        "Model: target={} test_size={} forecast_periods={}\n",
        config.data.target_column, config.model.test_size, config.model.forecast_periods
    ));
    s.push_str(&format!("Logging: {} -> {}", config.logging.level, config.logging.file));
    s
}
