#![no_main]

//! Roster file fuzzer.
//!
//! Feeds arbitrary text to the roster decoder. Anything the decoder accepts
//! must be a structurally sound population that evaluates and re-encodes.

use libfuzzer_sys::fuzz_target;
use neurovolve::persistence::{from_json, to_json};
use neurovolve::{check_invariants, PopulationConfig};

fuzz_target!(|data: &str| {
    let config = PopulationConfig {
        size: 4,
        inputs: 2,
        outputs: 1,
        ..PopulationConfig::default()
    };

    let Ok(mut population) = from_json(data, config) else {
        return;
    };

    for brain in population.brains_mut() {
        let violations = check_invariants(brain);
        assert!(violations.is_empty(), "decoder accepted {violations:?}");

        brain.put_input(&[0.5, -0.5]).unwrap();
        brain.feed_forward();
        assert_eq!(brain.get_outputs().len(), 1);
    }

    let json = to_json(&population).unwrap();
    let again = from_json(&json, config).unwrap();
    assert_eq!(again.len(), population.len());
    assert_eq!(again.generation(), population.generation());
});
