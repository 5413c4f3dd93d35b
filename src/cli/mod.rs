//! Command-line parsing for the analytics workspace tool.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! bootstrap and data-processing code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::BootstrapStep;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "analytics", version, about = "Analytics workspace bootstrap and data pipeline")]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create the workspace tree, regenerate sample data, and write the default config if missing.
    Bootstrap(BootstrapArgs),
    /// Clean the raw daily metrics and write processed data with derived metrics.
    Data(DataArgs),
    /// Load and validate the workspace config, then print a summary.
    Config(ConfigArgs),
}

#[derive(Debug, Args, Clone)]
pub struct WorkspaceArgs {
    /// Workspace root; all relative paths resolve against it.
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct BootstrapArgs {
    #[command(flatten)]
    pub workspace: WorkspaceArgs,

    /// Seed for sample data. Omit for fresh values on every run.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Run only these steps (repeatable). They still run in canonical order.
    #[arg(long = "only", value_enum, value_name = "STEP")]
    pub only: Vec<BootstrapStep>,
}

#[derive(Debug, Args, Clone)]
pub struct DataArgs {
    #[command(flatten)]
    pub workspace: WorkspaceArgs,

    /// Config file (default: <root>/config/config.yaml).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Seed used if the raw file is missing and sample data has to be generated.
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Args, Clone)]
pub struct ConfigArgs {
    #[command(flatten)]
    pub workspace: WorkspaceArgs,

    /// Config file (default: <root>/config/config.yaml).
    #[arg(long)]
    pub config: Option<PathBuf>,
}
