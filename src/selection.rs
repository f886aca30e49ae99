//! Selection operators.
//!
//! Ranking finds the elite (best and runner-up), and fitness-proportionate
//! roulette selection picks the parents of every other offspring.

// Selection uses intentional casts for statistics
#![allow(clippy::cast_precision_loss)]

use crate::error::{Error, Result};
use rand::Rng;

/// Best and runner-up of a roster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranking {
    /// Index of the highest fitness. Ties keep the lowest index.
    pub best: usize,
    /// Index of the highest fitness strictly below the best, if any.
    pub runner_up: Option<usize>,
    /// Fitness of the best individual.
    pub best_fitness: f64,
}

/// Rank a roster by fitness.
///
/// Returns `None` for an empty roster. NaN values never win either slot.
#[must_use]
pub fn rank(fitness: &[f64]) -> Option<Ranking> {
    let first = *fitness.first()?;

    let mut best = 0;
    let mut best_fitness = first;
    for (i, &f) in fitness.iter().enumerate() {
        if f > best_fitness || (best_fitness.is_nan() && !f.is_nan()) {
            best = i;
            best_fitness = f;
        }
    }

    let mut runner_up: Option<(usize, f64)> = None;
    for (i, &f) in fitness.iter().enumerate() {
        if f < best_fitness && runner_up.is_none_or(|(_, r)| f > r) {
            runner_up = Some((i, f));
        }
    }

    Some(Ranking {
        best,
        runner_up: runner_up.map(|(i, _)| i),
        best_fitness,
    })
}

/// Fitness-proportionate ("roulette wheel") selector over a fixed roster.
#[derive(Debug, Clone, Copy)]
pub struct RouletteWheel<'a> {
    fitness: &'a [f64],
    total: f64,
}

impl<'a> RouletteWheel<'a> {
    /// Build a wheel, checking that selection can make progress.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFitness`] for a negative or non-finite value
    /// and [`Error::SelectionExhaustion`] if the total is not positive.
    pub fn new(fitness: &'a [f64]) -> Result<Self> {
        for (index, &value) in fitness.iter().enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidFitness { index, value });
            }
        }

        let total: f64 = fitness.iter().sum();
        if !(total > 0.0 && total.is_finite()) {
            return Err(Error::SelectionExhaustion { total });
        }

        Ok(Self { fitness, total })
    }

    /// Sum of fitness on the wheel.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Draw one index with probability proportional to its fitness.
    ///
    /// Zero-fitness entries are never returned.
    pub fn spin<R: Rng>(&self, rng: &mut R) -> usize {
        let target = rng.gen_range(0.0..=self.total);

        let mut running = 0.0;
        let mut last_positive = 0;
        for (i, &f) in self.fitness.iter().enumerate() {
            if f > 0.0 {
                running += f;
                last_positive = i;
                if running >= target {
                    return i;
                }
            }
        }

        // Rounding left the running sum just short of the target
        last_positive
    }
}

/// Pick one parent index by roulette selection.
///
/// # Errors
///
/// See [`RouletteWheel::new`].
pub fn roulette_select<R: Rng>(fitness: &[f64], rng: &mut R) -> Result<usize> {
    Ok(RouletteWheel::new(fitness)?.spin(rng))
}

/// Calculate selection pressure statistics.
#[derive(Debug, Clone, Copy)]
pub struct SelectionStats {
    /// Mean fitness of the population.
    pub mean_fitness: f64,
    /// Best fitness in the population.
    pub best_fitness: f64,
    /// Worst fitness in the population.
    pub worst_fitness: f64,
    /// Standard deviation of fitness.
    pub fitness_std: f64,
}

impl SelectionStats {
    /// Calculate statistics from fitness values.
    #[must_use]
    pub fn from_fitness(fitness: &[f64]) -> Self {
        if fitness.is_empty() {
            return Self {
                mean_fitness: 0.0,
                best_fitness: 0.0,
                worst_fitness: 0.0,
                fitness_std: 0.0,
            };
        }

        let sum: f64 = fitness.iter().sum();
        let mean = sum / fitness.len() as f64;

        let best = fitness.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let worst = fitness.iter().copied().fold(f64::INFINITY, f64::min);

        let variance: f64 = fitness
            .iter()
            .map(|f| (f - mean).powi(2))
            .sum::<f64>()
            / fitness.len() as f64;

        Self {
            mean_fitness: mean,
            best_fitness: best,
            worst_fitness: worst,
            fitness_std: variance.sqrt(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_rank_finds_best_and_runner_up() {
        let ranking = rank(&[0.3, 0.9, 0.1, 0.8, 0.9]).unwrap();
        assert_eq!(ranking.best, 1);
        assert_eq!(ranking.runner_up, Some(3));
        assert!((ranking.best_fitness - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_rank_all_equal_has_no_runner_up() {
        let ranking = rank(&[2.0, 2.0, 2.0]).unwrap();
        assert_eq!(ranking.best, 0);
        assert_eq!(ranking.runner_up, None);
        assert!(rank(&[]).is_none());
    }

    #[test]
    fn test_rank_skips_nan() {
        let ranking = rank(&[f64::NAN, 1.0, 3.0]).unwrap();
        assert_eq!(ranking.best, 2);
        assert_eq!(ranking.runner_up, Some(1));
    }

    #[test]
    fn test_single_fit_individual_always_wins() {
        let mut rng = SmallRng::seed_from_u64(42);
        let fitness = [0.0, 0.0, 0.0, 10.0];
        for _ in 0..10_000 {
            assert_eq!(roulette_select(&fitness, &mut rng).unwrap(), 3);
        }
    }

    #[test]
    fn test_roulette_frequency_tracks_fitness() {
        let mut rng = SmallRng::seed_from_u64(1234);
        let fitness = [1.0, 2.0, 3.0, 4.0];
        let wheel = RouletteWheel::new(&fitness).unwrap();

        let draws = 100_000;
        let mut counts = [0usize; 4];
        for _ in 0..draws {
            counts[wheel.spin(&mut rng)] += 1;
        }

        for (i, &count) in counts.iter().enumerate() {
            let expected = fitness[i] / wheel.total();
            let observed = count as f64 / f64::from(draws);
            assert!(
                (observed - expected).abs() < 0.01,
                "index {i}: observed {observed}, expected {expected}"
            );
        }
    }

    #[test]
    fn test_zero_total_fails() {
        let mut rng = SmallRng::seed_from_u64(0);
        let err = roulette_select(&[0.0, 0.0], &mut rng).unwrap_err();
        assert!(matches!(err, Error::SelectionExhaustion { .. }));
        assert!(roulette_select(&[], &mut rng).is_err());
    }

    #[test]
    fn test_negative_fitness_fails() {
        let err = RouletteWheel::new(&[1.0, -0.5]).unwrap_err();
        assert!(matches!(err, Error::InvalidFitness { index: 1, .. }));
        assert!(RouletteWheel::new(&[1.0, f64::NAN]).is_err());
    }

    #[test]
    fn test_selection_stats() {
        let fitness = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let stats = SelectionStats::from_fitness(&fitness);

        assert!((stats.mean_fitness - 3.0).abs() < 0.001);
        assert!((stats.best_fitness - 5.0).abs() < 0.001);
        assert!((stats.worst_fitness - 1.0).abs() < 0.001);
    }
}
