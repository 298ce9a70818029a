//! Configuration schema types
//!
//! This module defines the configuration structure for skulabel.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};

/// Main skulabel configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkuLabelConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Remote catalog connection
    pub catalog: CatalogConfig,

    /// Outbound request pacing
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Worker pool and paging
    #[serde(default)]
    pub run: RunConfig,

    /// Checkpoint persistence
    #[serde(default)]
    pub state: StateConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SkuLabelConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.catalog.validate()?;
        self.rate_limit.validate()?;
        self.run.validate()?;
        self.state.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (read everything, write nothing)
    #[serde(default)]
    pub dry_run: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

/// Transport-level retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Backoff multiplier
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.backoff_multiplier < 1.0 {
            return Err("catalog.retry.backoff_multiplier must be >= 1.0".to_string());
        }
        if self.initial_delay_ms > self.max_delay_ms {
            return Err(
                "catalog.retry.initial_delay_ms must not exceed catalog.retry.max_delay_ms"
                    .to_string(),
            );
        }
        Ok(())
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

/// Remote catalog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Store account name, used to derive the base URL
    #[serde(default)]
    pub account_name: String,

    /// Explicit base URL (overrides the one derived from `account_name`)
    #[serde(default)]
    pub base_url: Option<String>,

    /// Header carrying the session credential
    #[serde(default = "default_auth_header")]
    pub auth_header: String,

    /// Session credential
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub auth_token: Option<SecretString>,

    /// Per-attempt request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Maximum idle pooled connections kept per host
    #[serde(default = "default_pool_max_idle_per_host")]
    pub pool_max_idle_per_host: usize,

    /// Retry configuration
    #[serde(default)]
    pub retry: RetryConfig,
}

impl CatalogConfig {
    /// Effective base URL, without a trailing slash
    pub fn base_url(&self) -> String {
        match &self.base_url {
            Some(url) if !url.is_empty() => url.trim_end_matches('/').to_string(),
            _ => format!("https://{}.vtexcommercestable.com.br", self.account_name),
        }
    }

    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        let explicit_url = self.base_url.as_ref().filter(|u| !u.is_empty());
        match explicit_url {
            Some(url) => {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err("catalog.base_url must start with http:// or https://".to_string());
                }
            }
            None => {
                if self.account_name.trim().is_empty() {
                    return Err(
                        "catalog.account_name is required when catalog.base_url is not set"
                            .to_string(),
                    );
                }
            }
        }

        if self.auth_header.trim().is_empty() {
            return Err("catalog.auth_header cannot be empty".to_string());
        }

        if self
            .auth_token
            .as_ref()
            .map(|s| s.expose_secret().is_empty())
            .unwrap_or(true)
        {
            return Err("catalog.auth_token cannot be empty".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("catalog.timeout_seconds must be > 0".to_string());
        }

        self.retry.validate()?;
        Ok(())
    }
}

/// Outbound request pacing and rate-limit handling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Minimum interval between any two outbound requests, in milliseconds
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,

    /// Wait applied on 429 when the server sends no Retry-After
    #[serde(default = "default_retry_after_secs")]
    pub default_retry_after_secs: u64,

    /// How many times a request is re-issued after a 429 wait
    #[serde(default = "default_max_rate_limit_retries")]
    pub max_rate_limit_retries: usize,

    /// Ceiling on any single 429 wait, whatever the server asks for
    #[serde(default = "default_max_retry_after_secs")]
    pub max_retry_after_secs: u64,
}

impl RateLimitConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_rate_limit_retries == 0 {
            return Err("rate_limit.max_rate_limit_retries must be > 0".to_string());
        }
        if self.max_retry_after_secs == 0 {
            return Err("rate_limit.max_retry_after_secs must be > 0".to_string());
        }
        if self.default_retry_after_secs > self.max_retry_after_secs {
            return Err(
                "rate_limit.default_retry_after_secs must not exceed max_retry_after_secs"
                    .to_string(),
            );
        }
        Ok(())
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: default_min_interval_ms(),
            default_retry_after_secs: default_retry_after_secs(),
            max_rate_limit_retries: default_max_rate_limit_retries(),
            max_retry_after_secs: default_max_retry_after_secs(),
        }
    }
}

/// Worker pool and paging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Parallel workers per page (1-32)
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// SKU IDs requested per listing page (1-1000)
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Persist the checkpoint every N completed units
    #[serde(default = "default_checkpoint_interval")]
    pub checkpoint_interval: usize,
}

impl RunConfig {
    fn validate(&self) -> Result<(), String> {
        if self.workers == 0 || self.workers > 32 {
            return Err("run.workers must be between 1 and 32".to_string());
        }
        if self.page_size == 0 || self.page_size > 1000 {
            return Err("run.page_size must be between 1 and 1000".to_string());
        }
        if self.checkpoint_interval == 0 {
            return Err("run.checkpoint_interval must be > 0".to_string());
        }
        Ok(())
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            page_size: default_page_size(),
            checkpoint_interval: default_checkpoint_interval(),
        }
    }
}

/// Checkpoint persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    /// Path of the checkpoint file
    #[serde(default = "default_checkpoint_path")]
    pub checkpoint_path: String,
}

impl StateConfig {
    fn validate(&self) -> Result<(), String> {
        if self.checkpoint_path.trim().is_empty() {
            return Err("state.checkpoint_path cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            checkpoint_path: default_checkpoint_path(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable the run log and error log files
    #[serde(default = "default_true")]
    pub local_enabled: bool,

    /// Run log file (every event, appended)
    #[serde(default = "default_log_path")]
    pub log_path: String,

    /// Error log file (ERROR events only, appended)
    #[serde(default = "default_error_log_path")]
    pub error_log_path: String,

    /// Console output format (text or json)
    #[serde(default = "default_console_format")]
    pub console_format: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.console_format.as_str()) {
            return Err(format!(
                "Invalid logging.console_format '{}'. Must be one of: {}",
                self.console_format,
                valid_formats.join(", ")
            ));
        }

        if self.local_enabled {
            if self.log_path.trim().is_empty() {
                return Err("logging.log_path cannot be empty".to_string());
            }
            if self.error_log_path.trim().is_empty() {
                return Err("logging.error_log_path cannot be empty".to_string());
            }
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: true,
            log_path: default_log_path(),
            error_log_path: default_error_log_path(),
            console_format: default_console_format(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_auth_header() -> String {
    "VtexIdclientAutCookie".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_pool_max_idle_per_host() -> usize {
    20
}

fn default_max_retries() -> usize {
    3
}

fn default_initial_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    30000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_min_interval_ms() -> u64 {
    300
}

fn default_retry_after_secs() -> u64 {
    60
}

fn default_max_rate_limit_retries() -> usize {
    5
}

fn default_max_retry_after_secs() -> u64 {
    300
}

fn default_workers() -> usize {
    3
}

fn default_page_size() -> u32 {
    50
}

fn default_checkpoint_interval() -> usize {
    10
}

fn default_checkpoint_path() -> String {
    "checkpoint.json".to_string()
}

fn default_log_path() -> String {
    "execution_log.txt".to_string()
}

fn default_error_log_path() -> String {
    "error_log.txt".to_string()
}

fn default_console_format() -> String {
    "text".to_string()
}
