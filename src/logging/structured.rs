//! Structured logging setup using tracing
//!
//! Console output goes to stdout as text or JSON. When local logging is
//! enabled, two append-only files receive the same events in a plain line
//! format that downstream tooling parses:
//!
//! ```text
//! [2025-03-14 09:26:53] [INFO] SKU ID: 42 | RefId: ABC-1 | Product: Paracetamol
//! ```
//!
//! The run log receives every event, the error log only ERROR events.
//!
//! # Example
//!
//! ```no_run
//! use skulabel::logging::init_logging;
//! use skulabel::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//! ```

use crate::config::LoggingConfig;
use crate::domain::{Result, SkuLabelError};
use std::fmt;
use std::path::Path;
use tracing::{Event, Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Timestamp layout used in log file lines
pub const LINE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Guard that must be kept alive for the duration of the program
/// to ensure logs are flushed properly
pub struct LoggingGuard {
    _file_guards: Vec<WorkerGuard>,
}

impl LoggingGuard {
    fn new(file_guards: Vec<WorkerGuard>) -> Self {
        Self {
            _file_guards: file_guards,
        }
    }
}

/// Event formatter producing `[timestamp] [LEVEL] message fields`
#[derive(Debug, Clone, Copy, Default)]
pub struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let now = chrono::Local::now();
        write!(
            writer,
            "[{}] [{}] ",
            now.format(LINE_TIMESTAMP_FORMAT),
            event.metadata().level()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Initialize the logging system based on configuration
///
/// # Arguments
///
/// * `log_level_str` - Log level as a string (trace, debug, info, warn, error)
/// * `config` - Logging configuration
///
/// # Returns
///
/// A `LoggingGuard` that must be kept alive for the duration of the program
pub fn init_logging(log_level_str: &str, config: &LoggingConfig) -> Result<LoggingGuard> {
    let log_level = parse_log_level(log_level_str)?;

    // EnvFilter is not Clone, so each layer builds its own
    let make_filter = || {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("skulabel={log_level}")))
    };

    let mut layers = Vec::new();

    let console_layer = if config.console_format == "json" {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_filter(make_filter())
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_filter(make_filter())
            .boxed()
    };
    layers.push(console_layer);

    let mut guards = Vec::new();
    if config.local_enabled {
        let (run_writer, run_guard) = file_writer(&config.log_path)?;
        layers.push(
            tracing_subscriber::fmt::layer()
                .event_format(LineFormat)
                .with_ansi(false)
                .with_writer(run_writer)
                .with_filter(make_filter())
                .boxed(),
        );
        guards.push(run_guard);

        let (error_writer, error_guard) = file_writer(&config.error_log_path)?;
        layers.push(
            tracing_subscriber::fmt::layer()
                .event_format(LineFormat)
                .with_ansi(false)
                .with_writer(error_writer)
                .with_filter(LevelFilter::ERROR)
                .boxed(),
        );
        guards.push(error_guard);
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| {
            SkuLabelError::Configuration(format!("Failed to initialize logging: {e}"))
        })?;

    tracing::debug!(
        local_enabled = config.local_enabled,
        log_path = %config.log_path,
        error_log_path = %config.error_log_path,
        "Logging initialized"
    );

    Ok(LoggingGuard::new(guards))
}

/// Opens an append-only, non-rotating file writer for `path`
fn file_writer(
    path: &str,
) -> Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    let path = Path::new(path);
    let file_name = path.file_name().ok_or_else(|| {
        SkuLabelError::Configuration(format!("Invalid log file path: {}", path.display()))
    })?;
    let directory = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => Path::new(".").to_path_buf(),
    };

    std::fs::create_dir_all(&directory).map_err(|e| {
        SkuLabelError::Configuration(format!(
            "Failed to create log directory {}: {}",
            directory.display(),
            e
        ))
    })?;

    let appender = tracing_appender::rolling::never(directory, file_name);
    Ok(tracing_appender::non_blocking(appender))
}

/// Parse log level from string
pub fn parse_log_level(level_str: &str) -> Result<Level> {
    match level_str.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(SkuLabelError::Configuration(format!(
            "Invalid log level: {level_str}. Must be one of: trace, debug, info, warn, error"
        ))),
    }
}
