//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for skulabel using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// skulabel - bulk image alt-text updater for catalog SKUs
#[derive(Parser, Debug)]
#[command(name = "skulabel")]
#[command(version, about, long_about = None)]
#[command(author = "skulabel Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "skulabel.toml", env = "SKULABEL_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "SKULABEL_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Relabel SKU images across the catalog, resuming from the checkpoint
    Run(commands::run::RunArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Show checkpoint progress
    Status(commands::status::StatusArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
