//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Text or JSON console output
//! - Configurable log levels
//! - Append-only run and error log files in a stable line format
//!
//! # Example
//!
//! ```no_run
//! use skulabel::logging::init_logging;
//! use skulabel::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, parse_log_level, LineFormat, LoggingGuard};

/// Log the start of a unit's processing
///
/// The message text is parsed by reporting tools and must stay stable.
///
/// # Example
///
/// ```no_run
/// use skulabel::log_unit_start;
///
/// log_unit_start!(42, "REF-42", "Paracetamol 500mg");
/// ```
#[macro_export]
macro_rules! log_unit_start {
    ($sku_id:expr, $ref_id:expr, $name:expr) => {
        tracing::info!("SKU ID: {} | RefId: {} | Product: {}", $sku_id, $ref_id, $name);
    };
}

/// Log a confirmed image label update
///
/// The message text is parsed by reporting tools and must stay stable.
///
/// # Example
///
/// ```no_run
/// use skulabel::log_image_updated;
///
/// log_image_updated!("paracetamol-500mg_1");
/// ```
#[macro_export]
macro_rules! log_image_updated {
    ($label:expr) => {
        tracing::info!("[OK] Image updated: '{}'", $label);
    };
}

/// Log a retry attempt
///
/// # Example
///
/// ```no_run
/// use skulabel::log_retry_attempt;
///
/// log_retry_attempt!(2, 3, "status 503");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($attempt:expr, $max_attempts:expr, $reason:expr) => {
        tracing::warn!(
            attempt = $attempt,
            max_attempts = $max_attempts,
            reason = %$reason,
            "Retrying request"
        );
    };
}
