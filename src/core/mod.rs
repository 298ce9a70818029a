//! Core batch engine for skulabel.
//!
//! # Modules
//!
//! - [`state`] - Checkpoint model and the shared, crash-safe store
//! - [`process`] - Slug derivation and the per-SKU label transaction
//! - [`run`] - Page-by-page orchestration over a bounded worker pool
//!
//! # Run Workflow
//!
//! 1. **Load State**: Read the checkpoint (missing or corrupt means fresh)
//! 2. **List**: Fetch one page of SKU ids from the catalog
//! 3. **Dispatch**: Process each SKU on the worker pool
//! 4. **Checkpoint**: Save every N completions and after each page
//! 5. **Report**: Return a [`run::RunSummary`] with an explicit outcome
//!
//! # Example
//!
//! ```rust,no_run
//! use skulabel::adapters::catalog::VtexCatalog;
//! use skulabel::config::load_config;
//! use skulabel::core::run::BatchOrchestrator;
//! use skulabel::core::state::CheckpointStore;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("skulabel.toml")?;
//! let catalog = Arc::new(VtexCatalog::from_config(&config)?);
//! let checkpoint = Arc::new(CheckpointStore::load(&config.state.checkpoint_path));
//!
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//! let mut orchestrator =
//!     BatchOrchestrator::new(catalog, checkpoint, config.run.clone(), shutdown_rx);
//!
//! let summary = orchestrator.run(true).await;
//! println!("{}: {} images updated", summary.outcome, summary.images_updated);
//! # Ok(())
//! # }
//! ```

pub mod process;
pub mod run;
pub mod state;
