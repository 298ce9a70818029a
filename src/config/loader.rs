//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::SkuLabelConfig;
use super::secret::secret_string;
use crate::domain::errors::SkuLabelError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into SkuLabelConfig
/// 4. Applies environment variable overrides (SKULABEL_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read, a referenced environment
/// variable is missing, the TOML is malformed or validation fails.
///
/// # Examples
///
/// ```no_run
/// use skulabel::config::loader::load_config;
///
/// let config = load_config("skulabel.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<SkuLabelConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(SkuLabelError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        SkuLabelError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: SkuLabelConfig = toml::from_str(&contents)
        .map_err(|e| SkuLabelError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        SkuLabelError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| SkuLabelError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(SkuLabelError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using SKULABEL_* prefix
///
/// Environment variables follow the pattern: SKULABEL_<SECTION>_<KEY>
/// For example: SKULABEL_CATALOG_AUTH_TOKEN, SKULABEL_RUN_WORKERS
fn apply_env_overrides(config: &mut SkuLabelConfig) {
    // Application overrides
    if let Ok(val) = std::env::var("SKULABEL_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("SKULABEL_APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    // Catalog overrides
    if let Ok(val) = std::env::var("SKULABEL_CATALOG_ACCOUNT_NAME") {
        config.catalog.account_name = val;
    }
    if let Ok(val) = std::env::var("SKULABEL_CATALOG_BASE_URL") {
        config.catalog.base_url = Some(val);
    }
    if let Ok(val) = std::env::var("SKULABEL_CATALOG_AUTH_TOKEN") {
        config.catalog.auth_token = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("SKULABEL_CATALOG_TIMEOUT_SECONDS") {
        if let Ok(secs) = val.parse() {
            config.catalog.timeout_seconds = secs;
        }
    }

    // Rate limit overrides
    if let Ok(val) = std::env::var("SKULABEL_RATE_LIMIT_MIN_INTERVAL_MS") {
        if let Ok(ms) = val.parse() {
            config.rate_limit.min_interval_ms = ms;
        }
    }
    if let Ok(val) = std::env::var("SKULABEL_RATE_LIMIT_MAX_RETRY_AFTER_SECS") {
        if let Ok(secs) = val.parse() {
            config.rate_limit.max_retry_after_secs = secs;
        }
    }

    // Run overrides
    if let Ok(val) = std::env::var("SKULABEL_RUN_WORKERS") {
        if let Ok(workers) = val.parse() {
            config.run.workers = workers;
        }
    }
    if let Ok(val) = std::env::var("SKULABEL_RUN_PAGE_SIZE") {
        if let Ok(size) = val.parse() {
            config.run.page_size = size;
        }
    }
    if let Ok(val) = std::env::var("SKULABEL_RUN_CHECKPOINT_INTERVAL") {
        if let Ok(interval) = val.parse() {
            config.run.checkpoint_interval = interval;
        }
    }

    // State overrides
    if let Ok(val) = std::env::var("SKULABEL_STATE_CHECKPOINT_PATH") {
        config.state.checkpoint_path = val;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("SKULABEL_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("SKULABEL_LOGGING_LOG_PATH") {
        config.logging.log_path = val;
    }
    if let Ok(val) = std::env::var("SKULABEL_LOGGING_ERROR_LOG_PATH") {
        config.logging.error_log_path = val;
    }
}
