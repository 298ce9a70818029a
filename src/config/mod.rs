//! Configuration management for skulabel.
//!
//! skulabel reads a TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Default values for optional settings
//! - `SKULABEL_<SECTION>_<KEY>` environment overrides
//! - Validation on load
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [catalog]
//! account_name = "mystore"
//! auth_token = "${VTEX_COOKIE}"
//!
//! [rate_limit]
//! min_interval_ms = 300
//!
//! [run]
//! workers = 3
//! page_size = 50
//! checkpoint_interval = 10
//!
//! [state]
//! checkpoint_path = "checkpoint.json"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, CatalogConfig, LoggingConfig, RateLimitConfig, RetryConfig, RunConfig,
    SkuLabelConfig, StateConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
