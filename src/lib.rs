// skulabel - Resumable bulk image alt-text updater for catalog SKUs
// Copyright (c) 2025 skulabel Contributors
// Licensed under the MIT License

//! # skulabel - Bulk SKU Image Alt-Text Updater
//!
//! skulabel walks every SKU exposed by a remote catalog API and gives each
//! SKU image a deterministic label derived from the product name
//! (`{slug}_{position}`), surviving network failures, rate limits and
//! restarts along the way.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Checkpoint store, per-SKU processor and batch orchestrator
//! - [`adapters`] - HTTP transport, rate gate, retrying request layer, catalog client
//! - [`domain`] - Identifiers, catalog models and error types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and the stable log line format
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use skulabel::adapters::catalog::VtexCatalog;
//! use skulabel::config::load_config;
//! use skulabel::core::run::BatchOrchestrator;
//! use skulabel::core::state::CheckpointStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("skulabel.toml")?;
//!     let catalog = Arc::new(VtexCatalog::from_config(&config)?);
//!     let checkpoint = Arc::new(CheckpointStore::load(&config.state.checkpoint_path));
//!     let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!
//!     let mut orchestrator =
//!         BatchOrchestrator::new(catalog, checkpoint, config.run.clone(), shutdown_rx);
//!     let summary = orchestrator.run(true).await;
//!
//!     std::process::exit(summary.exit_code());
//! }
//! ```
//!
//! ## Resuming
//!
//! Progress is kept in a JSON checkpoint (`{"processed_ids": [...], "last_page": n}`).
//! A run resumes from `last_page` and skips SKUs already in `processed_ids`
//! without any remote call. The page cursor only advances once every SKU of
//! the page has finished.
//!
//! ## Slugs
//!
//! ```rust
//! use skulabel::core::process::{slugify, target_labels};
//!
//! let slug = slugify("Paracetamol 500mg Comprimidos");
//! assert_eq!(slug, "paracetamol-500mg-comprimidos");
//! assert_eq!(target_labels(&slug, 2), vec![
//!     "paracetamol-500mg-comprimidos_1",
//!     "paracetamol-500mg-comprimidos_2",
//! ]);
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
