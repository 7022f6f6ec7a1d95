//! Optional file logging for embedders.
//!
//! Hosts that already install a `tracing` subscriber can ignore this
//! module entirely; the engine only ever emits through the `tracing`
//! macros. For everything else, `init` sets up file-based logging with
//! timestamped files and retention cleanup under ~/.atmention/logs/.

use std::fs::{self, File};
use std::io;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Default log retention in hours.
pub const DEFAULT_LOG_RETENTION_HOURS: u32 = 24;

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log retention period in hours.
    pub retention_hours: u32,
    /// Log level (trace, debug, info, warn, error).
    pub level: String,
    /// Whether logging is enabled.
    pub enabled: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            retention_hours: DEFAULT_LOG_RETENTION_HOURS,
            level: DEFAULT_LOG_LEVEL.to_string(),
            enabled: true,
        }
    }
}

impl LogConfig {
    /// Parses a log level from a config string.
    #[must_use]
    pub fn parse_level(value: &str) -> String {
        match value.to_lowercase().as_str() {
            "trace" => "trace".to_string(),
            "debug" => "debug".to_string(),
            "info" => "info".to_string(),
            "warn" | "warning" => "warn".to_string(),
            "error" => "error".to_string(),
            "off" | "none" | "disabled" => "off".to_string(),
            _ => DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// Returns the log directory path (~/.atmention/logs/).
#[must_use]
pub fn log_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".atmention")
        .join("logs")
}

/// Returns the log file path for this run.
#[must_use]
pub fn current_log_path() -> PathBuf {
    let now = chrono::Local::now();
    let filename = format!("atmention_{}.log", now.format("%Y-%m-%d_%H-%M-%S"));
    log_directory().join(filename)
}

/// Deletes log files older than the retention period.
///
/// # Errors
/// Returns error if the directory cannot be read.
pub fn cleanup_old_logs(retention_hours: u32) -> io::Result<u32> {
    let log_dir = log_directory();

    if !log_dir.exists() {
        return Ok(0);
    }

    let retention = Duration::from_secs(u64::from(retention_hours) * 3600);
    let now = SystemTime::now();
    let mut deleted = 0;

    for entry in fs::read_dir(&log_dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.extension().and_then(|e| e.to_str()) != Some("log") {
            continue;
        }

        if let Ok(metadata) = entry.metadata() {
            if let Ok(modified) = metadata.modified() {
                if let Ok(age) = now.duration_since(modified) {
                    if age > retention && fs::remove_file(&path).is_ok() {
                        deleted += 1;
                    }
                }
            }
        }
    }

    Ok(deleted)
}

/// Initializes file-based logging.
///
/// Returns the writer guard; log lines are dropped once it goes out of
/// scope, so hold it for the life of the program. Returns `None` when
/// logging is disabled.
///
/// # Errors
/// Returns error if the log directory or file cannot be created.
pub fn init(config: &LogConfig) -> io::Result<Option<WorkerGuard>> {
    if !config.enabled || config.level == "off" {
        return Ok(None);
    }

    let log_dir = log_directory();
    fs::create_dir_all(&log_dir)?;

    let deleted = cleanup_old_logs(config.retention_hours)?;

    let log_path = current_log_path();
    let log_file = File::create(&log_path)?;
    let (writer, guard) = tracing_appender::non_blocking(log_file);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();

    tracing::info!("atmention logging initialized");
    tracing::info!("Log file: {}", log_path.display());
    tracing::info!("Log level: {}", config.level);
    if deleted > 0 {
        tracing::info!("Cleaned up {} old log file(s)", deleted);
    }

    Ok(Some(guard))
}
