//! # Scenario Scripts
//!
//! A scenario is a TOML document naming the nodes of a network and an ordered
//! list of steps to replay against it:
//!
//! ```toml
//! nodes = ["go", "stop", "move"]
//!
//! [config.network]
//! eager_representation = true
//!
//! [[steps]]
//! op = "generalise"
//! child = "go"
//! parent = "move"
//!
//! [[steps]]
//! op = "activate"
//! node = "move"
//!
//! [[steps]]
//! op = "observe"
//! node = "move"
//! value = 0.75
//! ```
//!
//! Replay stops at the first rejected step and reports its position.

use ensm_core::{EnsmConfig, EnsmError, GeneralisationNetwork, NodeEvaluations, NodeState};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Maximum scenario file size (4 MB).
///
/// Scenarios are hand-written scripts; anything larger is rejected before
/// it is read into memory.
pub const MAX_SCENARIO_FILE_SIZE: u64 = 4 * 1024 * 1024;

// =============================================================================
// SCRIPT TYPES
// =============================================================================

/// One edit or observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Generalise { child: String, parent: String },
    Ungeneralise { child: String, parent: String },
    Activate { node: String },
    Deactivate { node: String },
    Observe { node: String, value: f64 },
    Remove { node: String },
    Refresh { node: String },
}

impl Step {
    /// Node names the step refers to.
    fn names(&self) -> Vec<&str> {
        match self {
            Step::Generalise { child, parent } | Step::Ungeneralise { child, parent } => {
                vec![child.as_str(), parent.as_str()]
            }
            Step::Activate { node }
            | Step::Deactivate { node }
            | Step::Observe { node, .. }
            | Step::Remove { node }
            | Step::Refresh { node } => vec![node.as_str()],
        }
    }

    fn op(&self) -> &'static str {
        match self {
            Step::Generalise { .. } => "generalise",
            Step::Ungeneralise { .. } => "ungeneralise",
            Step::Activate { .. } => "activate",
            Step::Deactivate { .. } => "deactivate",
            Step::Observe { .. } => "observe",
            Step::Remove { .. } => "remove",
            Step::Refresh { .. } => "refresh",
        }
    }
}

/// A parsed scenario script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Configuration embedded in the script; `--config` overrides it.
    #[serde(default)]
    pub config: EnsmConfig,
    pub nodes: Vec<String>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Parse and validate a scenario from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, EnsmError> {
        let scenario: Scenario =
            toml::from_str(text).map_err(|e| EnsmError::Scenario(e.to_string()))?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Read, parse and validate a scenario file.
    pub fn load(path: &Path) -> Result<Self, EnsmError> {
        let text = read_bounded(path, MAX_SCENARIO_FILE_SIZE)?;
        Self::from_toml_str(&text)
    }

    /// Check that node names are unique and every step names a declared node.
    pub fn validate(&self) -> Result<(), EnsmError> {
        self.config.validate()?;

        let mut declared = BTreeSet::new();
        for name in &self.nodes {
            if name.is_empty() {
                return Err(EnsmError::Scenario("empty node name".to_string()));
            }
            if !declared.insert(name.as_str()) {
                return Err(EnsmError::Scenario(format!("node '{}' declared twice", name)));
            }
        }

        for (index, step) in self.steps.iter().enumerate() {
            for name in step.names() {
                if !declared.contains(name) {
                    return Err(EnsmError::Scenario(format!(
                        "step {} ({}): undeclared node '{}'",
                        index + 1,
                        step.op(),
                        name
                    )));
                }
            }
            if let Step::Observe { value, .. } = step {
                if !value.is_finite() {
                    return Err(EnsmError::Scenario(format!(
                        "step {} (observe): value must be finite",
                        index + 1
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Load an `EnsmConfig` from a TOML file.
pub fn load_config(path: &Path) -> Result<EnsmConfig, EnsmError> {
    let text = read_bounded(path, MAX_SCENARIO_FILE_SIZE)?;
    let config: EnsmConfig =
        toml::from_str(&text).map_err(|e| EnsmError::Config(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// Read a UTF-8 file after checking its size.
fn read_bounded(path: &Path, max_size: u64) -> Result<String, EnsmError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| EnsmError::Io(format!("Cannot read '{}': {}", path.display(), e)))?;
    if !metadata.is_file() {
        return Err(EnsmError::Io(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }
    if metadata.len() > max_size {
        return Err(EnsmError::Io(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    std::fs::read_to_string(path)
        .map_err(|e| EnsmError::Io(format!("Read '{}': {}", path.display(), e)))
}

// =============================================================================
// REPLAY
// =============================================================================

/// Network and fitness windows after a replay.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub network: GeneralisationNetwork<String>,
    pub evaluations: NodeEvaluations<String>,
    pub steps_applied: usize,
}

/// Replay a scenario with the given configuration.
pub fn replay(scenario: &Scenario, config: &EnsmConfig) -> Result<Outcome, EnsmError> {
    let mut network = GeneralisationNetwork::with_config(config.network);
    let mut evaluations = NodeEvaluations::new(config.window)?;

    for name in &scenario.nodes {
        network.add(name.clone());
    }
    tracing::debug!(nodes = scenario.nodes.len(), "registered nodes");

    for (index, step) in scenario.steps.iter().enumerate() {
        apply_step(&mut network, &mut evaluations, step).map_err(|e| {
            tracing::warn!(step = index + 1, op = step.op(), error = %e, "step rejected");
            EnsmError::Scenario(format!("step {} ({}): {}", index + 1, step.op(), e))
        })?;
        tracing::debug!(step = index + 1, op = step.op(), "step applied");
    }

    tracing::info!(
        nodes = network.len(),
        active = network.active_nodes().len(),
        steps = scenario.steps.len(),
        "replay complete"
    );

    Ok(Outcome {
        network,
        evaluations,
        steps_applied: scenario.steps.len(),
    })
}

fn apply_step(
    network: &mut GeneralisationNetwork<String>,
    evaluations: &mut NodeEvaluations<String>,
    step: &Step,
) -> Result<(), EnsmError> {
    match step {
        Step::Generalise { child, parent } => network.add_generalisation(child, parent),
        Step::Ungeneralise { child, parent } => {
            if !network.remove_generalisation(child, parent)? {
                tracing::debug!(%child, %parent, "no generalisation to remove");
            }
            Ok(())
        }
        Step::Activate { node } => network.set_state(node, NodeState::Active),
        Step::Deactivate { node } => network.set_state(node, NodeState::Inactive),
        Step::Observe { node, value } => {
            if !network.contains(node) {
                return Err(EnsmError::UnknownNode(format!("{:?}", node)));
            }
            evaluations.observe(node, *value)
        }
        Step::Remove { node } => {
            network.remove(node)?;
            evaluations.remove(node);
            Ok(())
        }
        Step::Refresh { node } => network.refresh(node),
    }
}

// =============================================================================
// TESTS
// =============================================================================
