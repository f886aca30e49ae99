//! Fixed-size rosters of brains and generational turnover.
//!
//! The caller evaluates every brain, assigns fitness, then asks the
//! population for the next generation:
//!
//! ```ignore
//! use neurovolve::{Population, PopulationConfig};
//!
//! let mut population = Population::new(PopulationConfig::default(), &mut rng)?;
//! for brain in population.brains_mut() {
//!     brain.set_fitness(play(brain));
//! }
//! population.set_best_player();
//! population.generate_offspring(&mut rng)?;
//! population.save(&path)?;
//! ```

use crate::brain::{Brain, MutationConfig};
use crate::error::{Error, Result};
use crate::selection::{rank, RouletteWheel};
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for a population.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Number of brains in every generation.
    pub size: usize,
    /// Input nodes per brain.
    pub inputs: usize,
    /// Output nodes per brain.
    pub outputs: usize,
    /// Mutation applied to every offspring except the elite survivor.
    pub mutation: MutationConfig,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            size: 200,
            inputs: 36,
            outputs: 8,
            mutation: MutationConfig::default(),
        }
    }
}

impl PopulationConfig {
    /// Check sizes and mutation rates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for an empty roster or bad rates, and
    /// [`Error::InvalidShape`] for a zero input or output count.
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(Error::InvalidConfig("population size must be at least 1".to_string()));
        }
        if self.inputs == 0 || self.outputs == 0 {
            return Err(Error::InvalidShape {
                inputs: self.inputs,
                outputs: self.outputs,
            });
        }
        self.mutation.validate()
    }
}

/// A generation of brains sharing one input/output shape.
#[derive(Debug, Clone)]
pub struct Population {
    brains: Vec<Brain>,
    generation: u32,
    best_index: usize,
    runner_up_index: Option<usize>,
    best_fitness: f64,
    fitness_sum: f64,
    config: PopulationConfig,
}

impl Population {
    /// Create generation 1 from fresh seed brains.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new<R: Rng>(config: PopulationConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;
        let brains = (0..config.size)
            .map(|_| Brain::new(config.inputs, config.outputs, &config.mutation, rng))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_roster(brains, 1, config))
    }

    /// Wrap a roster that has already been checked against `config`.
    pub(crate) fn from_roster(brains: Vec<Brain>, generation: u32, config: PopulationConfig) -> Self {
        Self {
            brains,
            generation,
            best_index: 0,
            runner_up_index: None,
            best_fitness: 0.0,
            fitness_sum: 0.0,
            config,
        }
    }

    /// Load the roster at `path` if it exists, otherwise start fresh.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be loaded.
    pub fn open_or_create<R: Rng>(path: &Path, config: PopulationConfig, rng: &mut R) -> Result<Self> {
        if path.is_file() {
            Self::load(path, config)
        } else {
            Self::new(config, rng)
        }
    }

    /// Current generation number, starting at 1.
    #[must_use]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// The configuration this population was built with.
    #[must_use]
    pub fn config(&self) -> &PopulationConfig {
        &self.config
    }

    /// The roster, in slot order.
    #[must_use]
    pub fn brains(&self) -> &[Brain] {
        &self.brains
    }

    /// Mutable roster access for evaluation and fitness assignment.
    ///
    /// The roster length is fixed. Each brain is independent, so callers may
    /// evaluate them in parallel.
    pub fn brains_mut(&mut self) -> &mut [Brain] {
        &mut self.brains
    }

    /// Number of brains per generation.
    #[must_use]
    pub fn len(&self) -> usize {
        self.brains.len()
    }

    /// Whether the roster is empty. Never true for a validated population.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.brains.is_empty()
    }

    /// Slot of the best brain found by the last ranking.
    #[must_use]
    pub fn best_index(&self) -> usize {
        self.best_index
    }

    /// Slot of the runner-up found by the last ranking.
    #[must_use]
    pub fn runner_up_index(&self) -> Option<usize> {
        self.runner_up_index
    }

    /// Highest fitness found by the last ranking.
    #[must_use]
    pub fn best_fitness(&self) -> f64 {
        self.best_fitness
    }

    /// Sum of fitness found by the last ranking.
    #[must_use]
    pub fn fitness_sum(&self) -> f64 {
        self.fitness_sum
    }

    /// The brain in the best slot.
    #[must_use]
    pub fn best(&self) -> &Brain {
        &self.brains[self.best_index]
    }

    fn fitness_values(&self) -> Vec<f64> {
        self.brains.iter().map(Brain::fitness).collect()
    }

    /// Find the best and runner-up brains and flag both as elite.
    pub fn set_best_player(&mut self) {
        let fitness = self.fitness_values();
        let Some(ranking) = rank(&fitness) else {
            return;
        };

        for brain in &mut self.brains {
            brain.set_elite(false);
        }
        self.brains[ranking.best].set_elite(true);
        if let Some(runner_up) = ranking.runner_up {
            self.brains[runner_up].set_elite(true);
        }

        self.best_index = ranking.best;
        self.runner_up_index = ranking.runner_up;
        self.best_fitness = ranking.best_fitness;
        self.fitness_sum = fitness.iter().sum();
    }

    /// Pick a parent slot by fitness-proportionate selection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SelectionExhaustion`] if the total fitness is not
    /// positive and [`Error::InvalidFitness`] for negative or NaN fitness.
    pub fn select_parent<R: Rng>(&self, rng: &mut R) -> Result<usize> {
        let fitness = self.fitness_values();
        Ok(RouletteWheel::new(&fitness)?.spin(rng))
    }

    /// Replace the roster with the next generation.
    ///
    /// Slot 0 is an unmutated copy of the best brain. Every other slot is a
    /// mutated copy of a parent picked by [`Population::select_parent`]. The
    /// old roster is only replaced once the whole new one is built. On error
    /// the population is unchanged, ranking included.
    ///
    /// # Errors
    ///
    /// Returns a selection error if fitness cannot drive roulette selection,
    /// or [`Error::InvalidConfig`] if the mutation rates are not probabilities.
    pub fn generate_offspring<R: Rng>(&mut self, rng: &mut R) -> Result<()> {
        let fitness = self.fitness_values();
        let ranking = rank(&fitness).ok_or(Error::SelectionExhaustion { total: 0.0 })?;
        let wheel = if self.brains.len() > 1 {
            Some(RouletteWheel::new(&fitness)?)
        } else {
            None
        };

        let mut next = Vec::with_capacity(self.brains.len());
        let mut elite = self.brains[ranking.best].offspring();
        elite.set_elite(true);
        next.push(elite);

        if let Some(wheel) = wheel {
            for _ in 1..self.brains.len() {
                let parent = wheel.spin(rng);
                let mut child = self.brains[parent].offspring();
                child.mutate(&self.config.mutation, rng)?;
                next.push(child);
            }
        }

        let fitness_sum = fitness.iter().sum();
        debug!(
            "generation {} -> {}: best slot {} with fitness {:.4}, total {:.4}",
            self.generation,
            self.generation + 1,
            ranking.best,
            ranking.best_fitness,
            fitness_sum
        );

        self.brains = next;
        self.generation += 1;
        self.best_index = 0;
        self.runner_up_index = None;
        self.best_fitness = ranking.best_fitness;
        self.fitness_sum = fitness_sum;
        Ok(())
    }
}
