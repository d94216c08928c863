//! # ENSM CLI Module
//!
//! ## Available Commands
//!
//! - `run` - Replay a scenario and print the resulting network
//! - `check` - Validate a scenario without replaying it
//! - `window` - Feed a value stream to one sliding window

mod commands;

use clap::{Parser, Subcommand};
use ensm_core::EnsmError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// ENSM - generalisation network driver
///
/// Replays scripted edits against a generalisation network and reports the
/// control lists, levels and fitness windows.
#[derive(Parser, Debug)]
#[command(name = "ensm")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file (TOML); overrides the scenario's [config] table
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a scenario and print the resulting network
    Run {
        /// Path to the scenario file
        #[arg(short, long)]
        scenario: PathBuf,
    },

    /// Validate a scenario and configuration without replaying it
    Check {
        /// Path to the scenario file
        #[arg(short, long)]
        scenario: PathBuf,
    },

    /// Feed values to a single sliding window and print its series
    Window {
        /// Window capacity
        #[arg(short, long, default_value = "3")]
        size: usize,

        /// Observations, in order
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<f64>,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), EnsmError> {
    let json_mode = cli.json_mode;
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Run { scenario } => cmd_run(&scenario, config, json_mode),
        Commands::Check { scenario } => cmd_check(&scenario, config, json_mode),
        Commands::Window { size, values } => cmd_window(size, &values, json_mode),
    }
}
