//! Logging initialization and configuration.
//!
//! Console output always works. A size-rotated log file is added on top when
//! its directory and file can be opened; otherwise the process keeps running
//! with console output only and says so once the subscriber is up.

use flexi_logger::writers::{ArcFileLogWriter, FileLogWriter, FileLogWriterHandle};
use flexi_logger::{Cleanup, Criterion, FileSpec, FlexiLoggerError, Naming, WriteMode};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::warn;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::LoggingConfig;

const DEFAULT_LOG_FILE_NAME: &str = "app.log";

/// Rotated files become `app_r2024-06-09_13-24-35.log`; the live file keeps
/// its configured name.
const ROTATED_INFIX_FORMAT: &str = "r%Y-%m-%d_%H-%M-%S";

/// Keeps the file writer alive; dropping it flushes and closes the file.
static FILE_LOG_HANDLE: OnceLock<FileLogWriterHandle> = OnceLock::new();

#[derive(Debug, Error)]
pub enum LogFileError {
    #[error("failed to create log directory `{path}`: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open log file: {0}")]
    Writer(#[from] FlexiLoggerError),
}

/// Initializes the logging subsystem based on configuration.
pub fn init_logging(config: &LoggingConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let mut file_error = None;
    let file_layer = if config.file_enabled {
        match open_log_file(config) {
            Ok((writer, handle)) => {
                let _ = FILE_LOG_HANDLE.set(handle);
                Some(
                    fmt::layer()
                        .with_ansi(false)
                        .with_target(true)
                        .with_writer(move || writer.clone()),
                )
            }
            Err(err) => {
                file_error = Some(err);
                None
            }
        }
    } else {
        None
    };

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer);

    match config.format.as_str() {
        "json" => {
            let json_layer = fmt::layer()
                .json()
                .with_span_events(FmtSpan::CLOSE)
                .with_current_span(true)
                .with_target(true);
            subscriber.with(json_layer).init();
        }
        _ => {
            let pretty_layer = fmt::layer()
                .pretty()
                .with_span_events(FmtSpan::CLOSE)
                .with_target(true);
            subscriber.with(pretty_layer).init();
        }
    }

    if let Some(err) = file_error {
        warn!(error = %err, "Could not open log file, logging to console only");
    }
}

/// Opens the rotating log file described by `config`.
pub fn open_log_file(
    config: &LoggingConfig,
) -> Result<(ArcFileLogWriter, FileLogWriterHandle), LogFileError> {
    let path = resolve_log_path(Path::new(&config.dir), &config.file_name);
    let dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    std::fs::create_dir_all(&dir).map_err(|source| LogFileError::CreateDir {
        path: dir.clone(),
        source,
    })?;

    let basename = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("app")
        .to_string();
    let suffix = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("log")
        .to_string();

    let file_spec = FileSpec::default()
        .directory(dir)
        .basename(basename)
        .suffix(suffix)
        .suppress_timestamp();

    let writer = FileLogWriter::builder(file_spec)
        .rotate(
            Criterion::Size(config.max_file_size_bytes),
            Naming::TimestampsCustomFormat {
                current_infix: Some(""),
                format: ROTATED_INFIX_FORMAT,
            },
            Cleanup::KeepLogFiles(config.max_backup_files),
        )
        .append()
        .write_mode(WriteMode::Direct)
        .try_build_with_handle()?;

    Ok(writer)
}

/// Resolves the log file path.
///
/// If `dir/file_name` already exists as a directory (a common volume-mapping
/// mistake), the file is placed inside it instead.
pub fn resolve_log_path(dir: &Path, file_name: &str) -> PathBuf {
    let file_name = if file_name.trim().is_empty() {
        DEFAULT_LOG_FILE_NAME
    } else {
        file_name
    };
    let candidate = dir.join(file_name);
    if candidate.is_dir() {
        candidate.join(DEFAULT_LOG_FILE_NAME)
    } else {
        candidate
    }
}
