//! Optional fitness policy helpers.
//!
//! The engine never scores a brain on its own. Callers that measure behavior
//! as a handful of ratios plus event bonuses can combine them here and store
//! the result with [`Brain::score`].

use crate::brain::Brain;
use serde::{Deserialize, Serialize};

/// Bonus points added for rewarded events.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitnessBonuses {
    /// Added when the controller made contact with the target object.
    pub contact: f64,
    /// Added when the controller scored.
    pub goal: f64,
}

impl Default for FitnessBonuses {
    fn default() -> Self {
        Self {
            contact: 3.0,
            goal: 6.0,
        }
    }
}

/// Measured components of one evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FitnessComponents {
    /// Normalized score difference, 0 (lost badly) to 1 (won clearly).
    pub goal_difference: f64,
    /// Normalized remaining time when the episode ended.
    pub duration: f64,
    /// Opponent's fitness relative to the previous best.
    pub opponent: f64,
    /// Whether the controller made contact during the episode.
    pub made_contact: bool,
    /// Whether the controller scored during the episode.
    pub scored: bool,
}

impl FitnessComponents {
    /// Sum the ratios and any earned bonuses.
    #[must_use]
    pub fn combine(&self, bonuses: &FitnessBonuses) -> f64 {
        let contact = if self.made_contact { bonuses.contact } else { 0.0 };
        let goal = if self.scored { bonuses.goal } else { 0.0 };
        self.goal_difference + self.duration + self.opponent + contact + goal
    }
}

impl Brain {
    /// Combine `components` and store the result as this brain's fitness.
    pub fn score(&mut self, components: &FitnessComponents, bonuses: &FitnessBonuses) -> f64 {
        let fitness = components.combine(bonuses);
        self.set_fitness(fitness);
        fitness
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine_without_bonuses() {
        let components = FitnessComponents {
            goal_difference: 0.5,
            duration: 0.25,
            opponent: 0.1,
            ..FitnessComponents::default()
        };
        assert!((components.combine(&FitnessBonuses::default()) - 0.85).abs() < 1e-12);
    }

    #[test]
    fn test_score_adds_bonuses() {
        let mut brain = Brain::unconnected(2, 1).unwrap();
        let components = FitnessComponents {
            goal_difference: 1.0,
            made_contact: true,
            scored: true,
            ..FitnessComponents::default()
        };

        let fitness = brain.score(&components, &FitnessBonuses::default());
        assert!((fitness - 10.0).abs() < 1e-12);
        assert!((brain.fitness() - 10.0).abs() < 1e-12);
    }
}
