#![no_main]

//! Structural mutation fuzzer.
//!
//! Drives a brain through fuzzer-chosen shapes, rates and passes, checking
//! the layer and edge invariants after every mutation and split.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use neurovolve::{check_invariants, Brain, ConnectionId, MutationConfig};
use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Structured input for mutation fuzzing.
#[derive(Arbitrary, Debug)]
struct MutationInput {
    /// Input node count, reduced modulo 8.
    inputs: u8,
    /// Output node count, reduced modulo 4.
    outputs: u8,
    /// Rates as fractions of 255.
    new_connection: u8,
    weight_change: u8,
    weight_reset: u8,
    new_node: u8,
    /// Connections to split explicitly between passes.
    splits: Vec<u16>,
    /// RNG seed.
    rng_seed: u64,
    /// Number of mutation passes.
    passes: u8,
}

fn rate(value: u8) -> f64 {
    f64::from(value) / 255.0
}

fuzz_target!(|input: MutationInput| {
    let inputs = usize::from(input.inputs % 8) + 1;
    let outputs = usize::from(input.outputs % 4) + 1;
    let config = MutationConfig {
        new_connection_rate: rate(input.new_connection),
        weight_change_rate: rate(input.weight_change),
        weight_reset_rate: rate(input.weight_reset),
        new_node_rate: rate(input.new_node) / 4.0,
        connection_attempts: 64,
        ..MutationConfig::default()
    };
    let mut rng = SmallRng::seed_from_u64(input.rng_seed);

    let mut brain = Brain::new(inputs, outputs, &config, &mut rng).unwrap();
    let mut splits = input.splits.iter();

    for _ in 0..input.passes % 32 {
        if let Err(e) = brain.mutate(&config, &mut rng) {
            panic!("mutation failed: {e}");
        }

        if let Some(&pick) = splits.next() {
            let id = ConnectionId(usize::from(pick) % brain.connections().len().max(1));
            let active = brain.connection(id).is_ok_and(|c| c.is_active());
            match brain.split_connection(id, &mut rng) {
                Ok(_) => assert!(active),
                Err(_) => assert!(!active),
            }
        }

        let violations = check_invariants(&brain);
        assert!(violations.is_empty(), "{violations:?}");
    }

    brain.put_input(&vec![1.0; inputs]).unwrap();
    brain.feed_forward();
    assert!(brain.get_outputs().iter().all(|o| o.is_finite()));
});
