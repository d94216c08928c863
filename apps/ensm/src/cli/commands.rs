//! # CLI Command Implementations

use ensm::{NetworkReport, Scenario, load_config, render_window_text, replay};
use ensm_core::{EnsmConfig, EnsmError, SlidingValueWindow, WindowConfig};
use std::path::Path;

/// Scenario config, replaced wholesale by `--config` when given.
fn effective_config(scenario: &Scenario, config: Option<&Path>) -> Result<EnsmConfig, EnsmError> {
    match config {
        Some(path) => {
            tracing::info!("Using configuration from {:?}", path);
            load_config(path)
        }
        None => Ok(scenario.config),
    }
}

fn print_json<S: serde::Serialize>(value: &S) -> Result<(), EnsmError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| EnsmError::Io(format!("JSON encoding: {}", e)))?;
    println!("{}", text);
    Ok(())
}

// =============================================================================
// RUN COMMAND
// =============================================================================

/// Replay a scenario and print the report.
pub fn cmd_run(scenario_path: &Path, config: Option<&Path>, json_mode: bool) -> Result<(), EnsmError> {
    tracing::info!("Replaying {:?}", scenario_path);

    let scenario = Scenario::load(scenario_path)?;
    let config = effective_config(&scenario, config)?;
    tracing::debug!(?config, "effective configuration");

    let outcome = replay(&scenario, &config)?;
    let report = NetworkReport::from_outcome(&outcome);

    if json_mode {
        return print_json(&report);
    }
    print!("{}", report.render_text());
    Ok(())
}

// =============================================================================
// CHECK COMMAND
// =============================================================================

/// Validate a scenario without replaying it.
pub fn cmd_check(scenario_path: &Path, config: Option<&Path>, json_mode: bool) -> Result<(), EnsmError> {
    let scenario = Scenario::load(scenario_path)?;
    let config = effective_config(&scenario, config)?;

    if json_mode {
        let output = serde_json::json!({
            "scenario": scenario_path.to_string_lossy(),
            "valid": true,
            "nodes": scenario.nodes.len(),
            "steps": scenario.steps.len(),
            "config": config,
        });
        return print_json(&output);
    }

    println!("Scenario OK: {}", scenario_path.display());
    println!("  Nodes:                {}", scenario.nodes.len());
    println!("  Steps:                {}", scenario.steps.len());
    println!("  Propagate levels:     {}", config.network.propagate_levels);
    println!("  Eager representation: {}", config.network.eager_representation);
    println!("  Window size:          {}", config.window.size);
    Ok(())
}

// =============================================================================
// WINDOW COMMAND
// =============================================================================

/// Feed values to one window and print every series.
pub fn cmd_window(size: usize, values: &[f64], json_mode: bool) -> Result<(), EnsmError> {
    let mut window = SlidingValueWindow::from_config(&WindowConfig { size })?;
    for value in values {
        window.add_value(*value);
    }
    tracing::debug!(size, observations = values.len(), "window filled");

    let snapshot = window.snapshot();
    if json_mode {
        return print_json(&snapshot);
    }
    print!("{}", render_window_text(&snapshot));
    Ok(())
}
