//! # ensm
//!
//! Driver for the ENSM generalisation network: scenario scripts, replay and
//! reports. The binary in `main.rs` wraps these in a CLI.

pub mod report;
pub mod scenario;

pub use report::{NetworkReport, NodeReport, WindowReport, render_window_text};
pub use scenario::{Outcome, Scenario, Step, load_config, replay};
