//! Tracing setup for the command-line client.
//!
//! Diagnostics go to stderr so stdout carries only the command output. The
//! console shows warnings by default, or debug output for this crate when
//! verbose. `RUST_LOG` replaces either default. A per-run log file under
//! `.house-price/logs` is written only when asked for.

use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    sync::OnceLock,
    time::SystemTime,
};

use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*};

use crate::app_dirs::{self, AppDirError};

/// Log files kept in the logs directory, counting the one for this run.
const KEEP_LOG_FILES: usize = 10;
const LOG_FILE_PREFIX: &str = "house-price_";
const QUIET_DIRECTIVES: &str = "warn";
const VERBOSE_DIRECTIVES: &str = "warn,house_price_client=debug,house_price=debug";

static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();
static INSTALLED: OnceLock<()> = OnceLock::new();

/// What the subscriber should emit and where.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LogSettings {
    /// Show debug events from this crate on the console.
    pub verbose: bool,
    /// Also write the run's events to a timestamped file.
    pub to_file: bool,
}

/// Errors that may occur while installing the subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Log directory unavailable: {0}")]
    Dir(#[from] AppDirError),
    /// A filesystem step on the log directory failed.
    #[error("Failed to {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to format log file timestamp: {0}")]
    FormatTime(#[from] time::error::Format),
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Install the global subscriber once.
///
/// Returns the log file path when file output was requested. Later calls
/// change nothing and return `Ok(None)`.
pub fn init(settings: LogSettings) -> Result<Option<PathBuf>, LoggingError> {
    if INSTALLED.get().is_some() {
        return Ok(None);
    }

    let (file_layer, log_path) = if settings.to_file {
        let dir = app_dirs::logs_dir()?;
        let path = prepare_log_file(&dir, now_local_or_utc(), KEEP_LOG_FILES)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        let (writer, guard) = tracing_appender::non_blocking(rolling::never(&dir, file_name));
        let _ = FILE_GUARD.set(guard);
        let layer = fmt::layer()
            .with_ansi(false)
            .with_timer(build_timer())
            .with_writer(writer);
        (Some(layer), Some(path))
    } else {
        (None, None)
    };

    let directives = filter_directives(std::env::var("RUST_LOG").ok(), settings.verbose);
    let filter = EnvFilter::try_new(&directives)
        .unwrap_or_else(|_| EnvFilter::new(default_directives(settings.verbose)));
    let console_layer = fmt::layer()
        .with_target(settings.verbose)
        .with_timer(build_timer())
        .with_writer(std::io::stderr);

    let subscriber = Registry::default()
        .with(filter)
        .with(console_layer)
        .with(file_layer);
    tracing::subscriber::set_global_default(subscriber)?;
    let _ = INSTALLED.set(());

    if let Some(path) = &log_path {
        tracing::debug!("Writing log file {}", path.display());
    }
    Ok(log_path)
}

fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_DIRECTIVES
    } else {
        QUIET_DIRECTIVES
    }
}

/// A non-blank `RUST_LOG` wins over the built-in defaults.
fn filter_directives(rust_log: Option<String>, verbose: bool) -> String {
    rust_log
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default_directives(verbose).to_string())
}

/// Create this run's log file in `dir` and drop older ones beyond `keep`.
fn prepare_log_file(
    dir: &Path,
    now: OffsetDateTime,
    keep: usize,
) -> Result<PathBuf, LoggingError> {
    let path = dir.join(log_file_name(now)?);
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|source| LoggingError::Io {
            action: "create log file",
            path: path.clone(),
            source,
        })?;
    prune_old_logs(dir, keep)?;
    Ok(path)
}

/// Remove the oldest `house-price_*.log` files so at most `keep` remain.
fn prune_old_logs(dir: &Path, keep: usize) -> Result<(), LoggingError> {
    let listing = fs::read_dir(dir).map_err(|source| LoggingError::Io {
        action: "list log directory",
        path: dir.to_path_buf(),
        source,
    })?;
    let mut logs: Vec<(SystemTime, PathBuf)> = listing
        .filter_map(|entry| entry.ok())
        .filter(|entry| is_own_log(&entry.file_name().to_string_lossy()))
        .filter_map(|entry| {
            let meta = entry.metadata().ok().filter(|meta| meta.is_file())?;
            let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            Some((modified, entry.path()))
        })
        .collect();
    if logs.len() <= keep {
        return Ok(());
    }
    logs.sort_by(|a, b| b.0.cmp(&a.0));
    for (_, path) in logs.split_off(keep) {
        fs::remove_file(&path).map_err(|source| LoggingError::Io {
            action: "remove old log file",
            path,
            source,
        })?;
    }
    Ok(())
}

fn is_own_log(name: &str) -> bool {
    name.starts_with(LOG_FILE_PREFIX) && name.ends_with(".log")
}

fn log_file_name(now: OffsetDateTime) -> Result<String, LoggingError> {
    const NAME_FORMAT: &[FormatItem<'_>] =
        format_description!("[year]-[month]-[day]_[hour]-[minute]-[second]");
    Ok(format!("{LOG_FILE_PREFIX}{}.log", now.format(NAME_FORMAT)?))
}

fn build_timer() -> fmt::time::OffsetTime<time::format_description::BorrowedFormatItem<'static>> {
    const DISPLAY_FORMAT: &[FormatItem<'static>] =
        format_description!("[hour]:[minute]:[second].[subsecond digits:3]");
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    fmt::time::OffsetTime::new(offset, DISPLAY_FORMAT.into())
}

fn now_local_or_utc() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}
