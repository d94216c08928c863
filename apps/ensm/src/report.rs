//! # Reports
//!
//! Serializable summaries of a replayed network, printed as JSON or as a
//! plain-text listing.

use crate::scenario::Outcome;
use ensm_core::{NodeState, SlidingValueWindow, WindowSnapshot};
use serde::Serialize;

/// Per-node structural summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeReport {
    pub name: String,
    pub state: NodeState,
    pub level: u32,
    pub represented: bool,
    pub leaf: bool,
    pub parents: Vec<String>,
    pub children: Vec<String>,
}

/// Current statistics of one node's fitness window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowReport {
    pub node: String,
    pub observations: usize,
    pub in_window: usize,
    pub current: f64,
    pub average: f64,
    pub top_boundary: f64,
    pub bottom_boundary: f64,
}

impl WindowReport {
    fn from_window(node: &str, window: &SlidingValueWindow) -> Self {
        Self {
            node: node.to_string(),
            observations: window.num_punctual_values(),
            in_window: window.num_sliding_punctual_values(),
            current: window.current_punctual_value(),
            average: window.current_average(),
            top_boundary: window.current_top_boundary(),
            bottom_boundary: window.current_bottom_boundary(),
        }
    }
}

/// Everything `ensm run` prints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkReport {
    pub steps_applied: usize,
    pub nodes: Vec<NodeReport>,
    pub active: Vec<String>,
    pub inactive: Vec<String>,
    pub represented: Vec<String>,
    pub not_represented: Vec<String>,
    pub top_boundary: Vec<String>,
    pub windows: Vec<WindowReport>,
}

impl NetworkReport {
    #[must_use]
    pub fn from_outcome(outcome: &Outcome) -> Self {
        let net = &outcome.network;
        let nodes = net
            .nodes()
            .map(|n| NodeReport {
                name: n.clone(),
                state: net.state(n),
                level: net.generalisation_level(n).unwrap_or_default(),
                represented: net.is_represented(n),
                leaf: net.is_leaf(n),
                parents: net.parents(n),
                children: net.children(n),
            })
            .collect();

        Self {
            steps_applied: outcome.steps_applied,
            nodes,
            active: net.active_nodes().to_vec(),
            inactive: net.inactive_nodes().to_vec(),
            represented: net.represented_nodes().to_vec(),
            not_represented: net.not_represented_nodes().to_vec(),
            top_boundary: net.top_boundary(),
            windows: outcome
                .evaluations
                .iter()
                .map(|(n, w)| WindowReport::from_window(n, w))
                .collect(),
        }
    }

    /// Plain-text listing.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut lines = vec![
            "ENSM Network".to_string(),
            "============".to_string(),
            format!("Steps applied: {}", self.steps_applied),
            String::new(),
            format!(
                "{:<20} {:<9} {:>5} {:<11} {}",
                "NODE", "STATE", "LEVEL", "REPRESENTED", "PARENTS"
            ),
        ];
        lines.extend(self.nodes.iter().map(|node| {
            format!(
                "{:<20} {:<9} {:>5} {:<11} {}",
                node.name,
                node.state.to_string(),
                node.level,
                if node.represented { "yes" } else { "no" },
                node.parents.join(", ")
            )
        }));
        lines.push(String::new());
        lines.push(format!("Active:          [{}]", self.active.join(", ")));
        lines.push(format!("Inactive:        [{}]", self.inactive.join(", ")));
        lines.push(format!("Represented:     [{}]", self.represented.join(", ")));
        lines.push(format!(
            "Not represented: [{}]",
            self.not_represented.join(", ")
        ));
        lines.push(format!("Top boundary:    [{}]", self.top_boundary.join(", ")));

        if !self.windows.is_empty() {
            lines.push(String::new());
            lines.push(format!(
                "{:<20} {:>6} {:>10} {:>10} {:>10}",
                "WINDOW", "OBS", "AVERAGE", "TOP", "BOTTOM"
            ));
            lines.extend(self.windows.iter().map(|w| {
                format!(
                    "{:<20} {:>6} {:>10.4} {:>10.4} {:>10.4}",
                    w.node, w.observations, w.average, w.top_boundary, w.bottom_boundary
                )
            }));
        }
        with_trailing_newline(lines)
    }
}

/// Plain-text listing of a single window's series.
#[must_use]
pub fn render_window_text(snapshot: &WindowSnapshot) -> String {
    let fmt = |series: &[f64]| {
        series
            .iter()
            .map(|v| format!("{:.4}", v))
            .collect::<Vec<_>>()
            .join(", ")
    };
    with_trailing_newline(vec![
        format!("Capacity:        {}", snapshot.capacity),
        format!("Punctual:        [{}]", fmt(&snapshot.punctual_values)),
        format!("Average:         [{}]", fmt(&snapshot.average)),
        format!("Top boundary:    [{}]", fmt(&snapshot.top_boundary)),
        format!("Bottom boundary: [{}]", fmt(&snapshot.bottom_boundary)),
        format!("Window:          [{}]", fmt(&snapshot.sliding_punctual_values)),
        format!("Current average: {:.4}", snapshot.current_average),
        format!(
            "Current range:   [{:.4}, {:.4}]",
            snapshot.current_bottom_boundary, snapshot.current_top_boundary
        ),
    ])
}

fn with_trailing_newline(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
