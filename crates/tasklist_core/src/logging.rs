//! Process-wide logging bootstrap.
//!
//! # Responsibility
//! - Start one file logger per process for the task list.
//! - Mirror warnings and errors to stderr so CLI users see degraded seeds
//!   and failed writes.
//!
//! # Invariants
//! - Repeated init with an equal `LoggingConfig` is a no-op.
//! - Re-init with a different config is rejected.
//! - Log lines carry metadata only; task titles are never logged.

use flexi_logger::{
    Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming, WriteMode,
};
use log::info;
use once_cell::sync::OnceCell;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

const LOG_FILE_BASENAME: &str = "tasklist";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

static ACTIVE: OnceCell<(LoggingConfig, LoggerHandle)> = OnceCell::new();

/// Verbosity accepted by [`init_logging`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// `Debug` for debug builds, `Info` otherwise.
    pub fn for_build() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Info
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let level = match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Self::Trace,
            "debug" => Self::Debug,
            "info" => Self::Info,
            "warn" | "warning" => Self::Warn,
            "error" => Self::Error,
            other => return Err(format!("unknown log level `{other}`")),
        };
        Ok(level)
    }
}

/// Where and how verbosely to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    level: LogLevel,
    log_dir: PathBuf,
}

impl LoggingConfig {
    /// Builds a config; `log_dir` must be absolute.
    pub fn new(level: LogLevel, log_dir: impl AsRef<Path>) -> Result<Self, String> {
        let log_dir = log_dir.as_ref();
        if !log_dir.is_absolute() {
            return Err(format!(
                "log directory must be absolute, got `{}`",
                log_dir.display()
            ));
        }
        Ok(Self {
            level,
            log_dir: log_dir.to_path_buf(),
        })
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }
}

/// Starts file logging for the process.
///
/// # Errors
/// - The log directory cannot be created or the backend fails to start.
/// - Logging was already started with a different config.
pub fn init_logging(config: &LoggingConfig) -> Result<(), String> {
    let (active, _) = ACTIVE.get_or_try_init(|| start(config))?;
    if active != config {
        return Err(format!(
            "logging already active at `{}` ({}); refusing `{}` ({})",
            active.log_dir.display(),
            active.level,
            config.log_dir.display(),
            config.level
        ));
    }
    Ok(())
}

/// Returns the config logging was started with, if any.
pub fn active_logging() -> Option<&'static LoggingConfig> {
    ACTIVE.get().map(|(config, _)| config)
}

fn start(config: &LoggingConfig) -> Result<(LoggingConfig, LoggerHandle), String> {
    std::fs::create_dir_all(&config.log_dir)
        .map_err(|err| format!("cannot create `{}`: {err}", config.log_dir.display()))?;

    let file = FileSpec::default()
        .directory(config.log_dir.as_path())
        .basename(LOG_FILE_BASENAME)
        .suppress_timestamp();
    let handle = Logger::try_with_str(config.level.as_str())
        .map_err(|err| err.to_string())?
        .log_to_file(file)
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .duplicate_to_stderr(Duplicate::Warn)
        .write_mode(WriteMode::Direct)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| format!("failed to start logger: {err}"))?;

    info!(
        "event=logging_init module=core status=ok level={} version={}",
        config.level,
        env!("CARGO_PKG_VERSION")
    );
    Ok((config.clone(), handle))
}
