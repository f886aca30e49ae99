// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Neurovolve: topology-evolving feed-forward networks.
//!
//! This crate provides a genetic algorithm over neural-network controllers
//! whose structure, not only their weights, changes between generations:
//! - Layered genomes with stable node and connection handles
//! - Weight, new-connection and connection-splitting mutations
//! - Elitism plus fitness-proportionate parent selection
//! - A JSON roster format for resuming runs
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │    Population (roster, elitism)     │
//! ├─────────────────────────────────────┤
//! │  Selection │ Persistence │ Fitness  │
//! ├─────────────────────────────────────┤
//! │   Brain (evaluation, mutation)      │
//! └─────────────────────────────────────┘
//! ```
//!
//! Fitness is always supplied by the caller. The simulation that feeds
//! inputs and consumes outputs lives outside this crate.

pub mod brain;
pub mod error;
pub mod fitness;
pub mod persistence;
pub mod population;
pub mod selection;

pub use error::{Error, HandleKind, Result};

// Re-export key types at crate root for convenience
pub use brain::{
    check_invariants, sigmoid, Brain, BrainSummary, Connection, ConnectionId, MutationConfig,
    Node, NodeId, NodeLayer,
};
pub use fitness::{FitnessBonuses, FitnessComponents};
pub use population::{Population, PopulationConfig};
pub use selection::{RouletteWheel, SelectionStats};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_debug() {
        let err = Error::SamplingBudgetExceeded { attempts: 100 };
        let debug = format!("{err:?}");
        assert!(debug.contains("SamplingBudgetExceeded"));
        assert!(debug.contains("100"));
    }
}
