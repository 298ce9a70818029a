//! Run command implementation
//!
//! This module implements the `run` command, which relabels SKU images
//! across the whole catalog.

use crate::adapters::catalog::VtexCatalog;
use crate::config::load_config;
use crate::core::run::{BatchOrchestrator, RunOutcome, RunSummary};
use crate::core::state::CheckpointStore;
use clap::Args;
use std::sync::Arc;
use tokio::sync::watch;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Clear the checkpoint and start from page 1
    #[arg(long)]
    pub fresh: bool,

    /// Dry run mode - read everything, send no updates, write no checkpoint
    #[arg(long)]
    pub dry_run: bool,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting run command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }
        let dry_run = config.application.dry_run;

        let catalog = match VtexCatalog::from_config(&config) {
            Ok(c) => Arc::new(c),
            Err(e) => {
                tracing::error!(error = %e, "Failed to create catalog client");
                eprintln!("Failed to initialize catalog client: {e}");
                return Ok(2);
            }
        };

        let mut checkpoint = CheckpointStore::load(&config.state.checkpoint_path);
        if dry_run {
            checkpoint = checkpoint.without_persistence();
            println!("🔍 DRY RUN MODE - No images will be updated");
            println!();
        }

        if !self.yes {
            println!("Run Configuration:");
            println!("  Catalog: {}", catalog.base_url());
            println!("  Workers: {}", config.run.workers);
            println!("  Page size: {}", config.run.page_size);
            println!("  Rate limit delay: {}ms", config.rate_limit.min_interval_ms);
            println!("  Request timeout: {}s", config.catalog.timeout_seconds);
            println!("  Checkpoint: {}", config.state.checkpoint_path);
            if self.fresh {
                println!("  Start: page 1 (checkpoint will be cleared)");
            } else {
                println!(
                    "  Start: page {} ({} SKUs already processed)",
                    checkpoint.last_page(),
                    checkpoint.processed_count()
                );
            }
            println!();
            print!("Proceed with run? [y/N]: ");
            use std::io::{self, Write};
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Run cancelled.");
                return Ok(0);
            }
        }

        println!("🚀 Starting run...");
        println!();

        let mut orchestrator = BatchOrchestrator::new(
            catalog,
            Arc::new(checkpoint),
            config.run.clone(),
            shutdown_signal,
        )
        .with_dry_run(dry_run);

        let summary = orchestrator.run(!self.fresh).await;
        print_summary(&summary);

        Ok(summary.exit_code())
    }
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("📊 Run Summary:");
    println!("  Outcome: {}", summary.outcome);
    println!("  Pages completed: {}", summary.pages_completed);
    println!("  Next page: {}", summary.next_page);
    println!("  SKUs completed: {}", summary.units_completed);
    println!("  Succeeded: {}", summary.units_succeeded);
    println!("  Failed: {}", summary.units_failed);
    println!("  Skipped: {}", summary.units_skipped);
    if summary.units_not_started > 0 {
        println!("  Not started: {}", summary.units_not_started);
    }
    if summary.dry_run {
        println!("  Images that would be updated: {}", summary.images_updated);
    } else {
        println!("  Images updated: {}", summary.images_updated);
    }
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!("  Success Rate: {:.2}%", summary.success_rate());
    println!();

    match summary.outcome {
        RunOutcome::Exhausted => println!("✅ Catalog fully processed!"),
        RunOutcome::Interrupted => {
            println!("⚠️  Run interrupted gracefully. Progress saved.");
            println!("   Run the same command to resume from checkpoint.");
        }
        RunOutcome::AuthFailed => {
            println!("❌ The catalog rejected the credential. Renew it and resume.");
        }
        RunOutcome::ListError => {
            println!("❌ Could not fetch the SKU listing. Progress saved, resume later.");
        }
        RunOutcome::FatalError => {
            println!("❌ Run stopped by an unexpected error. Progress saved.");
        }
    }
}
