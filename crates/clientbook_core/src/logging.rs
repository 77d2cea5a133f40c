//! Rolling file logging for the client directory.
//!
//! # Responsibility
//! - Turn a validated [`LogConfig`] into a running `flexi_logger` backend.
//! - Parse level names coming from the environment.
//!
//! # Invariants
//! - At most one logger runs per process; a second `init_logging` with the
//!   same config is a no-op, with a different config an error.
//! - Core log lines are `key=value` metadata; client names, emails and phone
//!   numbers never reach the log.

use flexi_logger::{
    Cleanup, Criterion, Duplicate, FileSpec, LogSpecification, Logger, LoggerHandle, Naming,
    WriteMode,
};
use log::{info, LevelFilter};
use once_cell::sync::OnceCell;
use std::path::PathBuf;

const LOG_FILE_BASENAME: &str = "clientbook";
const ROTATE_AT_BYTES: u64 = 4 * 1024 * 1024;
const KEEP_LOG_FILES: usize = 3;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();

struct ActiveLogger {
    config: LogConfig,
    _handle: LoggerHandle,
}

/// Where and how verbosely to log. Built by [`crate::AppConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: LevelFilter,
    /// Absolute directory; created on init when missing.
    pub dir: PathBuf,
}

/// Starts file logging. Warnings and errors are also mirrored to stderr.
///
/// # Errors
/// - The log directory cannot be created or the backend fails to start.
/// - Logging is already running with a different config.
pub fn init_logging(config: &LogConfig) -> Result<(), String> {
    let active = ACTIVE.get_or_try_init(|| start_logger(config))?;
    if active.config != *config {
        return Err(format!(
            "logging already running at `{}` with level {}; refusing to switch to `{}` with level {}",
            active.config.dir.display(),
            active.config.level,
            config.dir.display(),
            config.level
        ));
    }
    Ok(())
}

/// Level used when `CLIENTBOOK_LOG_LEVEL` is unset: `debug` in debug builds,
/// `info` otherwise.
pub fn default_log_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Parses `trace|debug|info|warn|error` (case-insensitive, `warning` allowed).
pub fn parse_level(raw: &str) -> Result<LevelFilter, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok(LevelFilter::Trace),
        "debug" => Ok(LevelFilter::Debug),
        "info" => Ok(LevelFilter::Info),
        "warn" | "warning" => Ok(LevelFilter::Warn),
        "error" => Ok(LevelFilter::Error),
        other => Err(format!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error"
        )),
    }
}

fn start_logger(config: &LogConfig) -> Result<ActiveLogger, String> {
    std::fs::create_dir_all(&config.dir).map_err(|err| {
        format!(
            "failed to create log directory `{}`: {err}",
            config.dir.display()
        )
    })?;

    let spec = LogSpecification::builder().default(config.level).build();
    let handle = Logger::with(spec)
        .log_to_file(
            FileSpec::default()
                .directory(config.dir.as_path())
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_LOG_FILES),
        )
        .duplicate_to_stderr(Duplicate::Warn)
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| format!("failed to start logger: {err}"))?;

    info!(
        "event=logging_init module=core status=ok level={} version={}",
        config.level,
        env!("CARGO_PKG_VERSION")
    );

    Ok(ActiveLogger {
        config: config.clone(),
        _handle: handle,
    })
}
