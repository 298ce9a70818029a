//! Status command implementation
//!
//! This module implements the `status` command for displaying checkpoint
//! progress.

use crate::config::load_config;
use crate::core::state::CheckpointStore;
use clap::Args;
use std::path::Path;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Read this checkpoint file instead of the configured one
    #[arg(long)]
    pub checkpoint: Option<String>,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking run status");

        println!("📊 Run Status");
        println!();

        let checkpoint_path = match &self.checkpoint {
            Some(path) => path.clone(),
            None => match load_config(config_path) {
                Ok(c) => c.state.checkpoint_path,
                Err(e) => {
                    println!("❌ Failed to load configuration file");
                    println!("   Error: {e}");
                    return Ok(2); // Configuration error exit code
                }
            },
        };

        if !Path::new(&checkpoint_path).exists() {
            println!("No checkpoint found at {checkpoint_path}.");
            println!("Run 'skulabel run' to start processing.");
            return Ok(0);
        }

        let store = CheckpointStore::load(&checkpoint_path);
        println!("  Checkpoint: {checkpoint_path}");
        println!("  Next page: {}", store.last_page());
        println!("  SKUs processed: {}", store.processed_count());
        println!();

        Ok(0)
    }
}
