//! # ENSM - Generalisation Network Driver
//!
//! Command-line front end for `ensm-core`.
//!
//! ## Usage
//!
//! ```bash
//! # Replay a scenario
//! ensm run -s scenarios/traffic.toml
//!
//! # Same, with a configuration override and JSON output
//! ensm --config strict.toml --json-mode run -s scenarios/traffic.toml
//!
//! # Inspect window statistics
//! ensm window --size 3 1 2 3 4
//! ```

mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Initialize tracing; ENSM_LOG_FORMAT=json switches to JSON lines.
    let log_format = std::env::var("ENSM_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose { "ensm=debug" } else { "ensm=info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    // Logs go to stderr so that reports on stdout stay parseable
    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    // Display startup banner
    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the ENSM startup banner.
fn print_banner() {
    println!(
        "ensm v{} - evolutionary norm synthesis, generalisation network driver\n",
        env!("CARGO_PKG_VERSION")
    );
}
