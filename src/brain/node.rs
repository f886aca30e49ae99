//! Network nodes and the activation function.

use crate::brain::ConnectionId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable handle of a node inside its brain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl NodeId {
    /// Position of the node in its brain's arena.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node {}", self.0)
    }
}

/// Bounded odd sigmoid mapping the real line onto (-1, 1).
#[must_use]
pub fn sigmoid(x: f64) -> f64 {
    2.0 / (1.0 + (-x).exp()) - 1.0
}

/// One evaluation unit of a brain.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) layer: u32,
    pub(crate) input_sum: f64,
    pub(crate) output: f64,
    /// Ids of the active connections leaving this node, in creation order.
    pub(crate) outgoing: Vec<ConnectionId>,
}

impl Node {
    pub(crate) fn new(layer: u32) -> Self {
        Self {
            layer,
            input_sum: 0.0,
            output: 0.0,
            outgoing: Vec::new(),
        }
    }

    /// Evaluation rank. Layer 0 holds the inputs.
    #[must_use]
    pub fn layer(&self) -> u32 {
        self.layer
    }

    /// Weighted input accumulated during the current pass.
    #[must_use]
    pub fn input_sum(&self) -> f64 {
        self.input_sum
    }

    /// Last activation result, or the injected value for input nodes.
    #[must_use]
    pub fn output(&self) -> f64 {
        self.output
    }

    /// Active outgoing connection ids.
    #[must_use]
    pub fn outgoing(&self) -> &[ConnectionId] {
        &self.outgoing
    }

    /// Squash the accumulated input into the output value.
    pub fn activate(&mut self) {
        self.output = sigmoid(self.input_sum);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigmoid_is_odd_and_bounded() {
        assert!(sigmoid(0.0).abs() < 1e-12);
        assert!((sigmoid(2.5) + sigmoid(-2.5)).abs() < 1e-12);
        assert!(sigmoid(50.0) <= 1.0);
        assert!(sigmoid(-50.0) >= -1.0);
        assert!((sigmoid(1.0) - 0.462_117_157).abs() < 1e-6);
    }

    #[test]
    fn test_activate_uses_input_sum() {
        let mut node = Node::new(1);
        node.input_sum = 1.0;
        node.activate();
        assert!((node.output() - sigmoid(1.0)).abs() < 1e-12);
        // Accumulator is left alone
        assert!((node.input_sum() - 1.0).abs() < 1e-12);
    }
}
