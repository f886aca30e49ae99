//! Multi-generation integration tests for populations and roster files.
//!
//! These tests run whole evolution loops, save and reload rosters, and
//! check that elitism and persistence keep every genome intact.
//!
//! Run with: cargo test --release evolution_integration

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tempfile::tempdir;

use neurovolve::{check_invariants, Brain, MutationConfig, Population, PopulationConfig};

fn config() -> PopulationConfig {
    PopulationConfig {
        size: 30,
        inputs: 5,
        outputs: 3,
        mutation: MutationConfig {
            new_connection_rate: 0.3,
            new_node_rate: 0.05,
            ..MutationConfig::default()
        },
    }
}

/// Reward networks whose first output tracks the first input.
fn score(brain: &mut Brain) -> f64 {
    let mut total = 0.0;
    for x in [-1.0, -0.5, 0.5, 1.0] {
        brain.put_input(&[x, 0.0, 0.0, 0.0, 1.0]).unwrap();
        brain.feed_forward();
        total += 2.0 - (brain.get_outputs()[0] - x).abs();
    }
    total
}

fn run_generation(population: &mut Population, rng: &mut SmallRng) -> Brain {
    for brain in population.brains_mut() {
        let fitness = score(brain);
        brain.set_fitness(fitness);
    }
    population.set_best_player();
    let champion = population.best().clone();
    population.generate_offspring(rng).unwrap();
    champion
}

#[test]
fn test_fifty_generations_keep_invariants() {
    let mut rng = SmallRng::seed_from_u64(2024);
    let mut population = Population::new(config(), &mut rng).unwrap();

    for generation in 1..=50 {
        assert_eq!(population.generation(), generation);
        let champion = run_generation(&mut population, &mut rng);

        // Elite survivor is an exact structural copy of last round's best
        let survivor = &population.brains()[0];
        assert_eq!(survivor.nodes(), champion.nodes());
        assert_eq!(survivor.connections(), champion.connections());

        assert_eq!(population.len(), 30);
        for brain in population.brains() {
            assert!(check_invariants(brain).is_empty());
        }
    }
}

#[test]
fn test_elite_fitness_never_regresses() {
    let mut rng = SmallRng::seed_from_u64(77);
    let mut population = Population::new(config(), &mut rng).unwrap();

    let mut previous_best = f64::NEG_INFINITY;
    for _ in 0..30 {
        for brain in population.brains_mut() {
            let fitness = score(brain);
            brain.set_fitness(fitness);
        }
        population.set_best_player();
        assert!(population.best_fitness() >= previous_best - 1e-9);
        previous_best = population.best_fitness();
        population.generate_offspring(&mut rng).unwrap();
    }
}

#[test]
fn test_roster_roundtrip_preserves_behavior() {
    let mut rng = SmallRng::seed_from_u64(5);
    let mut population = Population::new(config(), &mut rng).unwrap();
    for _ in 0..10 {
        run_generation(&mut population, &mut rng);
    }

    let dir = tempdir().unwrap();
    let path = dir.path().join("roster.json");
    population.save(&path).unwrap();
    let mut loaded = Population::load(&path, config()).unwrap();

    assert_eq!(loaded.generation(), population.generation());
    assert_eq!(loaded.len(), population.len());

    let input = [0.3, -0.2, 0.9, 0.0, 1.0];
    for (original, restored) in population.brains_mut().iter_mut().zip(loaded.brains_mut()) {
        assert_eq!(original.connections(), restored.connections());
        assert_eq!(original.nodes().len(), restored.nodes().len());
        for (a, b) in original.nodes().iter().zip(restored.nodes()) {
            assert_eq!(a.layer(), b.layer());
            assert_eq!(a.outgoing(), b.outgoing());
        }

        original.put_input(&input).unwrap();
        original.feed_forward();
        restored.put_input(&input).unwrap();
        restored.feed_forward();
        assert_eq!(original.get_outputs(), restored.get_outputs());
    }

    // Evolution continues from the restored roster
    run_generation(&mut loaded, &mut rng);
    assert_eq!(loaded.generation(), population.generation() + 1);
}

#[test]
fn test_load_rejects_other_shape() {
    let mut rng = SmallRng::seed_from_u64(9);
    let population = Population::new(config(), &mut rng).unwrap();

    let dir = tempdir().unwrap();
    let path = dir.path().join("roster.json");
    population.save(&path).unwrap();

    let other = PopulationConfig {
        inputs: 4,
        ..config()
    };
    assert!(Population::load(&path, other).is_err());
}

#[test]
fn test_missing_roster_is_io_error() {
    let dir = tempdir().unwrap();
    let err = Population::load(&dir.path().join("absent.json"), config()).unwrap_err();
    assert!(matches!(err, neurovolve::Error::Io(_)));
}

/// Truth table with a constant bias input, targets on the sigmoid's range.
fn xor_score(brain: &mut Brain) -> f64 {
    let mut error = 0.0;
    for ([a, b], target) in [
        ([0.0, 0.0], -1.0),
        ([0.0, 1.0], 1.0),
        ([1.0, 0.0], 1.0),
        ([1.0, 1.0], -1.0),
    ] {
        brain.put_input(&[a, b, 1.0]).unwrap();
        brain.feed_forward();
        error += (brain.get_outputs()[0] - target).abs();
    }
    ((8.0 - error) / 2.0).powi(2)
}

#[test]
fn test_xor_roster_survives_saturation() {
    let config = PopulationConfig {
        size: 200,
        inputs: 3,
        outputs: 1,
        mutation: MutationConfig {
            new_node_rate: 0.02,
            new_connection_rate: 0.1,
            ..MutationConfig::default()
        },
    };

    for seed in 0..3 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut population = Population::new(config, &mut rng).unwrap();

        for generation in 1..=100 {
            assert_eq!(population.generation(), generation);
            for brain in population.brains_mut() {
                let fitness = xor_score(brain);
                brain.set_fitness(fitness);
            }
            population
                .generate_offspring(&mut rng)
                .unwrap_or_else(|e| panic!("seed {seed}, generation {generation}: {e}"));
        }

        assert_eq!(population.generation(), 101);
    }
}
