//! Tracing subscriber setup.
//!
//! Console output always goes to stderr (stdout carries the status lines). When
//! a configuration has been loaded, events are also appended to the configured
//! log file.

use std::path::Path;

use tracing::Subscriber;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::error::AppError;

/// Keeps the non-blocking file writer alive; drop it only at process exit so
/// buffered lines are flushed.
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// File sink settings taken from `logging.*` in the config document.
pub struct FileSink<'a> {
    pub path: &'a Path,
    pub level: LevelFilter,
}

pub fn init_logging(verbose: bool, file: Option<FileSink<'_>>) -> Result<LogGuard, AppError> {
    let (subscriber, guard) = build_subscriber(verbose, file)?;
    subscriber
        .try_init()
        .map_err(|e| AppError::environment(format!("Failed to initialise logging: {e}")))?;
    Ok(guard)
}

/// Assemble the console layer and the optional file layer without installing them.
///
/// Creates the log file's directory when a sink is given.
pub fn build_subscriber(
    verbose: bool,
    file: Option<FileSink<'_>>,
) -> Result<(impl Subscriber + Send + Sync + 'static, LogGuard), AppError> {
    let default_directive = if verbose { "debug" } else { "info" };
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(console_filter);

    let (file_layer, guard) = match file {
        Some(sink) => {
            let (dir, name) = split_log_path(sink.path)?;
            std::fs::create_dir_all(&dir)
                .map_err(|e| AppError::io(format!("Failed to create log directory '{}': {e}", dir.display())))?;
            let appender = tracing_appender::rolling::never(&dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let level = if verbose { LevelFilter::DEBUG.max(sink.level) } else { sink.level };
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(level);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let subscriber = tracing_subscriber::registry().with(console).with(file_layer);
    Ok((subscriber, LogGuard { _file: guard }))
}

fn split_log_path(path: &Path) -> Result<(std::path::PathBuf, std::ffi::OsString), AppError> {
    let name = path
        .file_name()
        .ok_or_else(|| AppError::config(format!("logging.file '{}' has no file name.", path.display())))?
        .to_os_string();
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => std::path::PathBuf::from("."),
    };
    Ok((dir, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_path_splits_into_dir_and_name() {
        let (dir, name) = split_log_path(Path::new("logs/analytics_tool.log")).unwrap();
        assert_eq!(dir, Path::new("logs"));
        assert_eq!(name, "analytics_tool.log");

        let (dir, _) = split_log_path(Path::new("tool.log")).unwrap();
        assert_eq!(dir, Path::new("."));
    }

    #[test]
    fn directory_only_path_is_rejected() {
        assert!(split_log_path(Path::new("/")).is_err());
    }

    #[test]
    fn file_sink_creates_directory_and_honours_level() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("analytics_tool.log");
        let (subscriber, guard) = build_subscriber(
            false,
            Some(FileSink {
                path: &path,
                level: LevelFilter::WARN,
            }),
        )
        .unwrap();
        assert!(dir.path().join("logs").is_dir());

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("below the file level");
            tracing::warn!(rows = 30, "fixture written");
        });
        // Dropping the guard flushes the background writer.
        drop(guard);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("WARN"));
        assert!(text.contains("fixture written"));
        assert!(text.contains("rows=30"));
        assert!(!text.contains("below the file level"));
        assert!(!text.contains('\x1b'), "file output must not carry ANSI codes");
    }

    #[test]
    fn verbose_lowers_file_level_to_debug() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tool.log");
        let (subscriber, guard) = build_subscriber(
            true,
            Some(FileSink {
                path: &path,
                level: LevelFilter::ERROR,
            }),
        )
        .unwrap();

        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("debug detail");
            tracing::trace!("trace detail");
        });
        drop(guard);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("debug detail"));
        assert!(!text.contains("trace detail"));
    }
}
