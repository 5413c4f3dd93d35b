//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - sets up logging
//! - runs bootstrap steps, the data pipeline, or the config check
//! - prints status lines and summaries

use clap::Parser;

use crate::cli::{BootstrapArgs, Command, ConfigArgs, DataArgs};
use crate::config::{ConfigDocument, load_config};
use crate::error::AppError;
use crate::io::Workspace;
use crate::logging::{FileSink, init_logging};

pub mod bootstrap;
pub mod pipeline;

/// Entry point for the `analytics` binary.
pub fn run() -> Result<(), AppError> {
    // Lets RUST_LOG and friends be set per workspace.
    dotenvy::dotenv().ok();
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Bootstrap(args) => handle_bootstrap(args, cli.verbose),
        Command::Data(args) => handle_data(args, cli.verbose),
        Command::Config(args) => handle_config(args, cli.verbose),
    }
}

fn handle_bootstrap(args: BootstrapArgs, verbose: bool) -> Result<(), AppError> {
    // The config may not exist yet, so bootstrap logs to the console only.
    let _guard = init_logging(verbose, None)?;

    let workspace = Workspace::new(&args.workspace.root);
    let options = bootstrap::BootstrapOptions {
        seed: args.seed,
        only: args.only,
    };

    let report = bootstrap::run_bootstrap(&workspace, &options, |step| {
        println!("{}", crate::report::format_step_line(step));
    });
    println!("{}", crate::report::format_bootstrap_summary(&report));

    match report.failure() {
        Some((_, err)) => Err(err.clone()),
        None => Ok(()),
    }
}

fn handle_data(args: DataArgs, verbose: bool) -> Result<(), AppError> {
    let workspace = Workspace::new(&args.workspace.root);
    let config = load_workspace_config(&workspace, args.config.as_deref())?;

    let log_path = workspace.join(config.log_file_path());
    let _guard = init_logging(
        verbose,
        Some(FileSink {
            path: &log_path,
            level: config.log_level()?,
        }),
    )?;

    let out = pipeline::run_data_pipeline(&workspace, &config, args.seed)?;
    println!("{}", crate::report::format_pipeline_summary(&out));
    Ok(())
}

fn handle_config(args: ConfigArgs, verbose: bool) -> Result<(), AppError> {
    let _guard = init_logging(verbose, None)?;

    let workspace = Workspace::new(&args.workspace.root);
    let config = load_workspace_config(&workspace, args.config.as_deref())?;
    println!("{}", crate::report::format_config_summary(&config));
    Ok(())
}

fn load_workspace_config(
    workspace: &Workspace,
    explicit: Option<&std::path::Path>,
) -> Result<ConfigDocument, AppError> {
    let path = match explicit {
        Some(p) => workspace.join(p),
        None => workspace.config_path(),
    };
    if !path.exists() {
        return Err(AppError::config(format!(
            "No config at '{}'. Run `analytics bootstrap` first.",
            path.display()
        )));
    }
    load_config(&path)
}
