//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "skulabel.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing skulabel configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        match fs::write(&self.output, Self::generate_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Set catalog.account_name in {}", self.output);
                println!("  2. Export VTEX_COOKIE with a valid session cookie (or put it in .env)");
                println!("  3. Run 'skulabel validate-config' to check the file");
                println!("  4. Run 'skulabel run --dry-run' to preview the changes");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to create configuration file");
                println!("   Error: {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Sample configuration with every setting at its default
    pub fn generate_config() -> String {
        r#"# skulabel configuration
# Values of the form ${VAR} are read from the environment.
# Any setting can also be overridden with SKULABEL_<SECTION>_<KEY>.

[application]
# trace, debug, info, warn, error
log_level = "info"
# Read everything, send no updates, write no checkpoint
dry_run = false

[catalog]
account_name = "mystore"
# base_url = "https://mystore.vtexcommercestable.com.br"
auth_header = "VtexIdclientAutCookie"
auth_token = "${VTEX_COOKIE}"
timeout_seconds = 30
pool_max_idle_per_host = 20

[catalog.retry]
# Connection failures and 429/500/502/503/504 responses
max_retries = 3
initial_delay_ms = 1000
max_delay_ms = 30000
backoff_multiplier = 2.0

[rate_limit]
# Minimum gap between any two requests, across all workers
min_interval_ms = 300
# Wait after a 429 without Retry-After
default_retry_after_secs = 60
max_rate_limit_retries = 5
# Longest single 429 wait, even if Retry-After asks for more
max_retry_after_secs = 300

[run]
workers = 3
page_size = 50
# Save the checkpoint every N finished SKUs
checkpoint_interval = 10

[state]
checkpoint_path = "checkpoint.json"

[logging]
local_enabled = true
log_path = "execution_log.txt"
error_log_path = "error_log.txt"
# text or json
console_format = "text"
"#
        .to_string()
    }
}
