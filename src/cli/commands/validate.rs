//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the skulabel configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates before returning
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);
        println!("  Catalog: {}", config.catalog.base_url());
        println!("  Auth Header: {}", config.catalog.auth_header);
        println!("  Request Timeout: {}s", config.catalog.timeout_seconds);
        println!(
            "  Transport Retries: {} (backoff {}ms..{}ms x{})",
            config.catalog.retry.max_retries,
            config.catalog.retry.initial_delay_ms,
            config.catalog.retry.max_delay_ms,
            config.catalog.retry.backoff_multiplier
        );
        println!("  Rate Limit Delay: {}ms", config.rate_limit.min_interval_ms);
        println!("  Workers: {}", config.run.workers);
        println!("  Page Size: {}", config.run.page_size);
        println!("  Checkpoint Interval: {}", config.run.checkpoint_interval);
        println!("  Checkpoint: {}", config.state.checkpoint_path);
        if config.logging.local_enabled {
            println!(
                "  Log Files: {} / {}",
                config.logging.log_path, config.logging.error_log_path
            );
        }
        println!();
        Ok(0)
    }
}
