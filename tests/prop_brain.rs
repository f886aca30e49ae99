//! Property-based tests for brain structure under sustained mutation.
//!
//! These tests verify that layer ordering, edge uniqueness and sequential
//! ids survive long runs of random structural mutation.
//! Run with: cargo test --release prop_brain

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use neurovolve::{check_invariants, Brain, ConnectionId, Error, MutationConfig, NodeId};

/// Aggressive rates so that topology changes every few passes.
fn churn_config() -> MutationConfig {
    MutationConfig {
        new_connection_rate: 0.6,
        weight_change_rate: 0.8,
        weight_reset_rate: 0.1,
        new_node_rate: 0.05,
        ..MutationConfig::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Layer order, edge uniqueness and outgoing lists hold after every pass.
    #[test]
    fn prop_invariants_survive_mutation(
        seed in any::<u64>(),
        inputs in 1usize..6,
        outputs in 1usize..4,
        passes in 1usize..60
    ) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let config = churn_config();
        let mut brain = Brain::new(inputs, outputs, &config, &mut rng).unwrap();

        for _ in 0..passes {
            // Saturated brains skip the new connection instead of failing
            if let Err(e) = brain.mutate(&config, &mut rng) {
                return Err(TestCaseError::fail(e.to_string()));
            }

            let violations = check_invariants(&brain);
            prop_assert!(violations.is_empty(), "{:?}", violations);
        }

        // Ids stay sequential and every connection is reachable by handle
        for (position, conn) in brain.connections().iter().enumerate() {
            prop_assert_eq!(conn.id(), ConnectionId(position));
            prop_assert!(brain.connection(conn.id()).is_ok());
        }
        // Direct requests still report saturation
        let free = brain.has_free_pair();
        match brain.new_rand_connection(32, &mut rng) {
            Ok(_) => prop_assert!(free),
            Err(Error::SamplingBudgetExceeded { .. }) => prop_assert!(!free),
            Err(e) => return Err(TestCaseError::fail(e.to_string())),
        }
        prop_assert_eq!(brain.input_count(), inputs);
        prop_assert_eq!(brain.output_count(), outputs);
    }

    /// Repeated splits of the same region never break layering.
    #[test]
    fn prop_repeated_splits_keep_layers(seed in any::<u64>(), splits in 1usize..40) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut brain = Brain::unconnected(2, 1).unwrap();
        brain.add_connection(NodeId(0), NodeId(2), 0.5).unwrap();

        for _ in 0..splits {
            // Always split the newest active connection into the output
            let target = brain
                .active_connections()
                .filter(|c| c.to() == NodeId(2))
                .map(|c| c.id())
                .last()
                .unwrap();
            let hidden = brain.split_connection(target, &mut rng).unwrap();

            let from_layer = brain.node(brain.connection(target).unwrap().from()).unwrap().layer();
            let hidden_layer = brain.node(hidden).unwrap().layer();
            prop_assert!(from_layer < hidden_layer);
            prop_assert!(hidden_layer < brain.output_layer());
            prop_assert!(!brain.connection(target).unwrap().is_active());
        }

        prop_assert!(check_invariants(&brain).is_empty());
        prop_assert_eq!(brain.nodes().len(), 3 + splits);
        prop_assert_eq!(brain.connections().len(), 1 + 2 * splits);
        prop_assert_eq!(brain.active_connections().count(), 1 + splits);
    }

    /// Evaluation is a pure function of structure and input.
    #[test]
    fn prop_feed_forward_deterministic(
        seed in any::<u64>(),
        input in prop::collection::vec(-2.0f64..2.0, 4)
    ) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let config = churn_config();
        let mut brain = Brain::new(4, 2, &config, &mut rng).unwrap();
        for _ in 0..15 {
            let _ = brain.mutate(&config, &mut rng);
        }

        let mut twin = brain.clone();

        brain.put_input(&input).unwrap();
        brain.feed_forward();
        twin.put_input(&input).unwrap();
        twin.feed_forward();
        prop_assert_eq!(brain.get_outputs(), twin.get_outputs());

        // Same brain, primed again
        let first = brain.get_outputs();
        brain.put_input(&input).unwrap();
        brain.feed_forward();
        prop_assert_eq!(first, brain.get_outputs());

        for out in brain.get_outputs() {
            prop_assert!(out.abs() < 1.0);
        }
    }

    /// Mutating a clone never touches the original.
    #[test]
    fn prop_clone_is_independent(seed in any::<u64>()) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let config = churn_config();
        let parent = Brain::new(3, 2, &config, &mut rng).unwrap();
        let snapshot = parent.clone();

        let mut child = parent.offspring();
        for _ in 0..10 {
            let _ = child.mutate(&config, &mut rng);
        }

        prop_assert_eq!(parent.nodes(), snapshot.nodes());
        prop_assert_eq!(parent.connections(), snapshot.connections());
    }
}
