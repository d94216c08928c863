//! # End-to-End Scenarios
//!
//! Reference walkthroughs of the network and the sliding window, plus the
//! behaviour of both coherence settings.

#![allow(clippy::float_arithmetic)]

use ensm_core::{
    EnsmError, GeneralisationNetwork, GraphStore, NetworkConfig, NodeState, SlidingValueWindow,
};

const EPS: f64 = 1e-9;

fn network(nodes: &[&'static str]) -> GeneralisationNetwork<&'static str> {
    let mut net = GeneralisationNetwork::new();
    for node in nodes {
        net.add(*node);
    }
    net
}

// =============================================================================
// NETWORK
// =============================================================================

mod network_scenarios {
    use super::*;

    #[test]
    fn single_active_leaf() {
        let mut net = network(&["a"]);
        net.set_state(&"a", NodeState::Active).expect("state");

        assert_eq!(net.active_nodes(), &["a"]);
        assert_eq!(net.represented_nodes(), &["a"]);
        assert!(net.not_represented_nodes().is_empty());
        assert!(net.inactive_nodes().is_empty());
        assert_eq!(net.generalisation_level(&"a"), Some(1));
        assert!(net.is_leaf(&"a"));
        assert_eq!(net.top_boundary(), vec!["a"]);
    }

    #[test]
    fn two_level_chain() {
        let mut net = network(&["a", "b"]);
        net.add_generalisation(&"a", &"b").expect("gen");

        assert_eq!(net.parents(&"a"), vec!["b"]);
        assert_eq!(net.children(&"b"), vec!["a"]);
        assert_eq!(net.generalisation_level(&"a"), Some(1));
        assert_eq!(net.generalisation_level(&"b"), Some(2));
        assert_eq!(net.top_boundary(), vec!["b"]);
        assert_eq!(net.state(&"a"), NodeState::Inactive);
        assert_eq!(net.state(&"b"), NodeState::Inactive);
        assert!(net.represented_nodes().is_empty());
        assert!(!net.is_leaf(&"b"));
    }

    #[test]
    fn representation_via_ancestor() {
        let mut net = network(&["a", "b"]);
        net.add_generalisation(&"a", &"b").expect("gen");
        net.set_state(&"b", NodeState::Active).expect("state");

        assert!(net.is_represented(&"a"));
        assert!(net.is_represented(&"b"));

        // a was not touched, so the cached list still has it as not represented
        assert!(!net.represented_nodes().contains(&"a"));
        net.refresh(&"a").expect("refresh");
        assert!(net.represented_nodes().contains(&"a"));
    }

    #[test]
    fn representation_via_ancestor_eager() {
        let mut net = GeneralisationNetwork::with_config(NetworkConfig {
            eager_representation: true,
            ..NetworkConfig::default()
        });
        net.add("a");
        net.add("b");
        net.add_generalisation(&"a", &"b").expect("gen");
        net.set_state(&"b", NodeState::Active).expect("state");

        assert_eq!(net.represented_nodes(), &["b", "a"]);
        assert!(net.not_represented_nodes().is_empty());
    }

    #[test]
    fn brothers_of_three_children() {
        let mut net = network(&["p", "c1", "c2", "c3"]);
        net.add_generalisation(&"c1", &"p").expect("gen");
        net.add_generalisation(&"c2", &"p").expect("gen");
        net.add_generalisation(&"c3", &"p").expect("gen");

        assert_eq!(net.brothers(&"c1"), vec!["c2", "c3"]);
        assert_eq!(net.brothers(&"c2"), vec!["c1", "c3"]);
        assert_eq!(net.brothers_under(&"c3", &"p"), vec!["c1", "c2"]);
        assert!(net.brothers(&"p").is_empty());
    }

    #[test]
    fn deactivation_round_trip() {
        let mut net = network(&["a", "b"]);
        net.add_generalisation(&"a", &"b").expect("gen");
        net.set_state(&"a", NodeState::Active).expect("state");
        net.set_state(&"a", NodeState::Inactive).expect("state");

        assert!(net.active_nodes().is_empty());
        assert_eq!(net.inactive_nodes(), &["b", "a"]);
        assert_eq!(net.not_represented_nodes(), &["b", "a"]);
    }

    #[test]
    fn failed_mutation_leaves_network_untouched() {
        let mut net = network(&["a", "b"]);
        net.add_generalisation(&"a", &"b").expect("gen");

        let err = net.add_generalisation(&"b", &"a");
        assert!(matches!(err, Err(EnsmError::CycleDetected { .. })));
        assert_eq!(net.generalisation_level(&"a"), Some(1));
        assert_eq!(net.top_boundary(), vec!["b"]);
        assert_eq!(net.graph().edge_count(), 1);
    }
}

// =============================================================================
// OPEN-QUESTION BEHAVIOUR
// =============================================================================

mod coherence_settings {
    use super::*;

    fn diamond_plus_tail(config: NetworkConfig) -> GeneralisationNetwork<&'static str> {
        let mut net = GeneralisationNetwork::with_config(config);
        for n in ["leaf", "mid", "top", "roof"] {
            net.add(n);
        }
        net.add_generalisation(&"mid", &"top").expect("gen");
        net.add_generalisation(&"top", &"roof").expect("gen");
        net.add_generalisation(&"leaf", &"mid").expect("gen");
        net
    }

    #[test]
    fn one_step_levels_can_break_upper_edges() {
        let net = diamond_plus_tail(NetworkConfig::default());
        assert_eq!(net.generalisation_level(&"mid"), Some(2));
        assert_eq!(net.generalisation_level(&"top"), Some(2));
        assert_eq!(net.generalisation_level(&"roof"), Some(3));
    }

    #[test]
    fn propagated_levels_hold_on_every_edge() {
        let net = diamond_plus_tail(NetworkConfig::strict());
        for child in net.nodes() {
            let child_level = net.generalisation_level(child).expect("level");
            for parent in net.parents(child) {
                let parent_level = net.generalisation_level(&parent).expect("level");
                assert!(parent_level > child_level, "{child} -> {parent}");
            }
        }
        assert_eq!(net.generalisation_level(&"roof"), Some(4));
    }

    #[test]
    fn ancestor_found_through_second_parent() {
        let mut net = network(&["n", "first", "second", "far"]);
        net.add_generalisation(&"n", &"first").expect("gen");
        net.add_generalisation(&"n", &"second").expect("gen");
        net.add_generalisation(&"second", &"far").expect("gen");

        assert!(net.is_ancestor(&"far", &"n"));
        // and the cycle guard relies on it
        assert!(matches!(
            net.add_generalisation(&"far", &"n"),
            Err(EnsmError::CycleDetected { .. })
        ));
    }

    #[test]
    fn refresh_all_restores_partition() {
        let mut net = diamond_plus_tail(NetworkConfig::default());
        net.set_state(&"roof", NodeState::Active).expect("state");
        net.refresh_all();

        assert_eq!(net.represented_nodes().len(), 4);
        assert!(net.not_represented_nodes().is_empty());
    }
}

// =============================================================================
// SLIDING WINDOW
// =============================================================================

mod window_scenarios {
    use super::*;

    #[test]
    fn window_of_three_over_stream() {
        let mut window = SlidingValueWindow::new(3).expect("window");
        for v in [1.0, 2.0, 3.0, 4.0] {
            window.add_value(v);
        }

        let tail: Vec<f64> = window.sliding_punctual_values().iter().copied().collect();
        assert_eq!(tail, vec![2.0, 3.0, 4.0]);
        assert!((window.current_average() - 3.0).abs() < EPS);

        let sigma = (2.0_f64 / 3.0).sqrt();
        assert!((window.current_top_boundary() - (3.0 + sigma)).abs() < EPS);
        assert!((window.current_bottom_boundary() - (3.0 - sigma)).abs() < EPS);
        assert_eq!(window.punctual_values().len(), 4);
        assert_eq!(window.sliding_punctual_values().len(), 3);
    }

    #[test]
    fn reset_after_stream() {
        let mut window = SlidingValueWindow::new(3).expect("window");
        for v in [1.0, 2.0, 3.0, 4.0] {
            window.add_value(v);
        }
        window.reset();

        assert_eq!(window.current_average(), 0.0);
        assert!(window.punctual_values().is_empty());
        assert!(window.sliding_average().is_empty());
        assert!(!window.has_new_value());
    }
}
