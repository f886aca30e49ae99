//! Mutation operators for brains.
//!
//! A mutation pass may add one random connection, then walks the connections
//! that existed before the pass. Each one may have its weight perturbed or
//! reset, and may be split by a new hidden node.

use crate::brain::genome::random_weight;
use crate::brain::{Brain, ConnectionId, NodeId, NodeLayer};
use crate::error::{Error, Result};
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Default number of random pair draws before falling back to enumeration.
pub const DEFAULT_CONNECTION_ATTEMPTS: usize = 10_000;

/// Configuration for mutation operations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MutationConfig {
    /// Probability of adding one random connection per pass.
    pub new_connection_rate: f64,
    /// Probability of changing each active connection's weight.
    pub weight_change_rate: f64,
    /// Given a weight change, probability of drawing a fresh weight instead
    /// of scaling the current one.
    pub weight_reset_rate: f64,
    /// Probability of splitting each active connection with a new node.
    pub new_node_rate: f64,
    /// Weights are scaled by a factor in `[1 - p, 1 + p]`.
    pub weight_perturbation: f64,
    /// Random pair draws allowed when adding a connection.
    pub connection_attempts: usize,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            new_connection_rate: 0.05,
            weight_change_rate: 0.8,
            weight_reset_rate: 0.1,
            new_node_rate: 0.005,
            weight_perturbation: 0.1,
            connection_attempts: DEFAULT_CONNECTION_ATTEMPTS,
        }
    }
}

impl MutationConfig {
    /// Check that every rate is a probability.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        let rates = [
            ("new_connection_rate", self.new_connection_rate),
            ("weight_change_rate", self.weight_change_rate),
            ("weight_reset_rate", self.weight_reset_rate),
            ("new_node_rate", self.new_node_rate),
            ("weight_perturbation", self.weight_perturbation),
        ];
        for (name, rate) in rates {
            if !(0.0..=1.0).contains(&rate) {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be within [0, 1], got {rate}"
                )));
            }
        }
        Ok(())
    }
}

impl Brain {
    /// Run one mutation pass.
    ///
    /// Connections created by splits during this pass are not themselves
    /// mutated until the next pass. A requested new connection is skipped
    /// when the brain has no free pair left.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if a rate in `config` is not a
    /// probability.
    pub fn mutate<R: Rng>(&mut self, config: &MutationConfig, rng: &mut R) -> Result<()> {
        config.validate()?;

        if rng.gen_bool(config.new_connection_rate) && self.has_free_pair() {
            self.new_rand_connection(config.connection_attempts, rng)?;
        }

        let existing = self.connections.len();
        for index in 0..existing {
            if !self.connections[index].active {
                continue;
            }

            if rng.gen_bool(config.weight_change_rate) {
                let weight = if rng.gen_bool(config.weight_reset_rate) {
                    random_weight(rng)
                } else {
                    let spread = config.weight_perturbation;
                    let factor = rng.gen_range(1.0 - spread..=1.0 + spread);
                    (self.connections[index].weight * factor).clamp(-1.0, 1.0)
                };
                self.connections[index].weight = weight;
            }

            if rng.gen_bool(config.new_node_rate) {
                self.split_connection(ConnectionId(index), rng)?;
            }
        }

        Ok(())
    }

    /// Replace an active connection `a -> b` with a new hidden node `n` and
    /// the connections `a -> n` and `n -> b`.
    ///
    /// The original connection is deactivated and dropped from `a`'s
    /// outgoing list. Both new connections get independent random weights.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HandleOutOfRange`] for an unknown id and
    /// [`Error::StructuralInvariantViolation`] if the connection is inactive.
    pub fn split_connection<R: Rng>(&mut self, id: ConnectionId, rng: &mut R) -> Result<NodeId> {
        let conn = *self.connection(id)?;
        if !conn.active {
            return Err(Error::structural(format!("{id} is inactive and cannot be split")));
        }

        let from_layer = self.node(conn.from)?.layer;
        let to_layer = self.node(conn.to)?.layer;

        self.connections[id.0].active = false;
        self.nodes[conn.from.0].outgoing.retain(|&c| c != id);

        let hidden = self.add_node(NodeLayer::Between {
            from: from_layer,
            to: to_layer,
        });
        self.add_connection(conn.from, hidden, random_weight(rng))?;
        self.add_connection(hidden, conn.to, random_weight(rng))?;

        debug!(
            "split {id} ({} -> {}) through {hidden} at layer {}",
            conn.from, conn.to, self.nodes[hidden.0].layer
        );
        Ok(hidden)
    }
}
