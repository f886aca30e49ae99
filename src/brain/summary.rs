//! Compact structural overview of a brain.

#![allow(clippy::cast_precision_loss)]

use crate::brain::Brain;
use serde::Serialize;

/// Layer histogram and connection statistics for one brain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrainSummary {
    /// Number of nodes on each layer, from layer 0 to the output layer.
    pub nodes_per_layer: Vec<usize>,
    /// Layer shared by the output nodes.
    pub output_layer: u32,
    /// Total nodes, including inputs and outputs.
    pub nodes: usize,
    /// Hidden nodes created by split mutations.
    pub hidden_nodes: usize,
    /// Every connection ever created.
    pub connections: usize,
    /// Connections still taking part in evaluation.
    pub active_connections: usize,
    /// Mean absolute weight over the active connections.
    pub mean_abs_weight: f64,
}

impl Brain {
    /// Summarize the brain's current topology.
    #[must_use]
    pub fn summary(&self) -> BrainSummary {
        let output_layer = self.output_layer();
        let mut nodes_per_layer = vec![0usize; output_layer as usize + 1];
        for node in &self.nodes {
            if let Some(count) = nodes_per_layer.get_mut(node.layer as usize) {
                *count += 1;
            }
        }

        let (active, weight_sum) = self
            .active_connections()
            .fold((0usize, 0.0f64), |(n, sum), c| (n + 1, sum + c.weight.abs()));

        BrainSummary {
            nodes_per_layer,
            output_layer,
            nodes: self.nodes.len(),
            hidden_nodes: self.nodes.len() - self.input_count() - self.output_count(),
            connections: self.connections.len(),
            active_connections: active,
            mean_abs_weight: if active == 0 {
                0.0
            } else {
                weight_sum / active as f64
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::brain::{Brain, ConnectionId, NodeId};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_summary_after_split() {
        let mut rng = SmallRng::seed_from_u64(8);
        let mut brain = Brain::unconnected(2, 1).unwrap();
        brain.add_connection(NodeId(1), NodeId(2), -0.5).unwrap();
        brain.split_connection(ConnectionId(0), &mut rng).unwrap();

        let summary = brain.summary();
        assert_eq!(summary.nodes_per_layer, vec![2, 1, 1]);
        assert_eq!(summary.output_layer, 2);
        assert_eq!(summary.nodes, 4);
        assert_eq!(summary.hidden_nodes, 1);
        assert_eq!(summary.connections, 3);
        assert_eq!(summary.active_connections, 2);
        assert!(summary.mean_abs_weight <= 1.0);
    }

    #[test]
    fn test_summary_without_connections() {
        let brain = Brain::unconnected(3, 2).unwrap();
        let summary = brain.summary();
        assert_eq!(summary.nodes_per_layer, vec![3, 2]);
        assert_eq!(summary.active_connections, 0);
        assert!(summary.mean_abs_weight.abs() < 1e-12);
    }
}
