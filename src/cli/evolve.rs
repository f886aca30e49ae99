//! CLI command for evolving a roster on the XOR task.

use crate::cli::CliError;
use indicatif::{ProgressBar, ProgressStyle};
use neurovolve::persistence::default_roster_path;
use neurovolve::{Brain, MutationConfig, Population, PopulationConfig, SelectionStats};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Inputs are `a`, `b` and a constant bias of 1.0.
const XOR_INPUTS: usize = 3;

/// Truth table with targets mapped onto the sigmoid's (-1, 1) range.
const XOR_CASES: [([f64; 2], f64); 4] = [
    ([0.0, 0.0], -1.0),
    ([0.0, 1.0], 1.0),
    ([1.0, 0.0], 1.0),
    ([1.0, 1.0], -1.0),
];

/// Highest fitness a perfect XOR network can reach.
const XOR_MAX_FITNESS: f64 = 16.0;

/// Arguments of the evolve command.
#[derive(Debug)]
pub(crate) struct EvolveArgs {
    pub(crate) output: Option<PathBuf>,
    pub(crate) population: usize,
    pub(crate) generations: u32,
    pub(crate) seed: Option<u64>,
    pub(crate) resume: bool,
    pub(crate) node_rate: f64,
    pub(crate) connection_rate: f64,
    pub(crate) threads: Option<usize>,
    pub(crate) progress: bool,
}

/// Execute the evolve command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, evolution fails, or the
/// roster cannot be written.
pub(crate) fn execute(args: &EvolveArgs) -> Result<(), CliError> {
    // Set thread pool size if specified
    if let Some(num_threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let seed = args.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(42)
    });
    let mut rng = SmallRng::seed_from_u64(seed);

    let config = PopulationConfig {
        size: args.population,
        inputs: XOR_INPUTS,
        outputs: 1,
        mutation: MutationConfig {
            new_node_rate: args.node_rate,
            new_connection_rate: args.connection_rate,
            ..MutationConfig::default()
        },
    };
    config.validate()?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_roster_path(Path::new(".")));

    let mut population = if args.resume {
        Population::open_or_create(&output, config, &mut rng)?
    } else {
        Population::new(config, &mut rng)?
    };

    println!("Starting evolution:");
    println!("  Population: {}", args.population);
    println!("  Generations: {}", args.generations);
    println!("  Starting generation: {}", population.generation());
    println!("  Seed: {seed}");
    println!("  Output: {}", output.display());
    println!();

    let bar = args.progress.then(|| {
        let bar = ProgressBar::new(u64::from(args.generations));
        bar.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar
    });

    let start = Instant::now();
    let mut best_fitness = 0.0f64;
    let mut best_generation = population.generation();

    for _ in 0..args.generations {
        population
            .brains_mut()
            .par_iter_mut()
            .try_for_each(|brain| -> neurovolve::Result<()> {
                let fitness = xor_fitness(brain)?;
                brain.set_fitness(fitness);
                Ok(())
            })?;

        population.set_best_player();
        let fitness: Vec<f64> = population.brains().iter().map(Brain::fitness).collect();
        let stats = SelectionStats::from_fitness(&fitness);

        if stats.best_fitness > best_fitness {
            best_fitness = stats.best_fitness;
            best_generation = population.generation();
        }

        let line = format!(
            "Gen {:>5}: best={:.4} mean={:.4} std={:.4} hidden={}",
            population.generation(),
            stats.best_fitness,
            stats.mean_fitness,
            stats.fitness_std,
            population.best().summary().hidden_nodes
        );
        match &bar {
            Some(bar) => bar.set_message(line),
            None => println!("{line}"),
        }

        population.generate_offspring(&mut rng)?;
        population.save(&output)?;

        if let Some(bar) = &bar {
            bar.inc(1);
        }
    }

    if let Some(bar) = &bar {
        bar.finish();
    }

    println!();
    println!("Evolution complete!");
    println!("  Best fitness: {best_fitness:.4} / {XOR_MAX_FITNESS:.1}");
    println!("  Best generation: {best_generation}");
    println!("  Elapsed time: {:.1}s", start.elapsed().as_secs_f64());
    println!("  Roster: {}", output.display());

    Ok(())
}

/// Score a brain on the XOR truth table.
///
/// Each case contributes an absolute error below 2, so
/// `((8 - total_error) / 2)^2` always lands in (0, 16].
fn xor_fitness(brain: &mut Brain) -> neurovolve::Result<f64> {
    let mut error = 0.0;
    for ([a, b], target) in XOR_CASES {
        brain.put_input(&[a, b, 1.0])?;
        brain.feed_forward();
        let output = brain.get_outputs().first().copied().unwrap_or(0.0);
        error += (output - target).abs();
    }
    Ok(((8.0 - error) / 2.0).powi(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use neurovolve::NodeId;

    #[test]
    fn test_xor_fitness_is_positive_and_bounded() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut brain = Brain::new(XOR_INPUTS, 1, &MutationConfig::default(), &mut rng).unwrap();
        let fitness = xor_fitness(&mut brain).unwrap();
        assert!(fitness > 0.0);
        assert!(fitness <= XOR_MAX_FITNESS);
    }

    #[test]
    fn test_xor_fitness_of_silent_brain() {
        // Zero output everywhere misses each target by exactly 1
        let mut brain = Brain::unconnected(XOR_INPUTS, 1).unwrap();
        assert!((xor_fitness(&mut brain).unwrap() - 4.0).abs() < 1e-9);

        brain.add_connection(NodeId(2), NodeId(3), 1.0).unwrap();
        assert!(xor_fitness(&mut brain).unwrap() < XOR_MAX_FITNESS);
    }
}
