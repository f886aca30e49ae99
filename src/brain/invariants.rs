//! Structural invariants of a brain - sanity checks that detect corruption.
//!
//! Every edit made through the `Brain` API keeps these intact. They are
//! checked after loading a roster and by the property tests.

use crate::brain::{Brain, ConnectionId};
use std::collections::HashSet;

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

fn violation(message: String) -> InvariantViolation {
    InvariantViolation { message }
}

/// Check all structural invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(brain: &Brain) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let nodes = brain.nodes();
    let connections = brain.connections();
    let inputs = brain.input_count();
    let outputs = brain.output_count();

    if nodes.len() < inputs + outputs {
        violations.push(violation(format!(
            "{} nodes cannot hold {inputs} inputs and {outputs} outputs",
            nodes.len()
        )));
        return violations;
    }

    // Layer layout: inputs at 0, outputs on one shared top layer, hidden between
    let output_layer = brain.output_layer();
    for (index, node) in nodes.iter().enumerate() {
        let layer = node.layer();
        if index < inputs {
            if layer != 0 {
                violations.push(violation(format!("input node {index} sits on layer {layer}")));
            }
        } else if index < inputs + outputs {
            if layer != output_layer {
                violations.push(violation(format!(
                    "output node {index} sits on layer {layer}, expected {output_layer}"
                )));
            }
        } else if layer == 0 || layer >= output_layer {
            violations.push(violation(format!(
                "hidden node {index} sits on layer {layer} outside 1..{output_layer}"
            )));
        }
    }
    if output_layer == 0 {
        violations.push(violation("output layer is 0".to_string()));
    }

    // Connection arena: sequential ids, known endpoints, climbing layers
    let mut edges = HashSet::new();
    for (position, conn) in connections.iter().enumerate() {
        if conn.id().index() != position {
            violations.push(violation(format!(
                "connection at position {position} carries id {}",
                conn.id().index()
            )));
        }

        let (Some(from), Some(to)) = (nodes.get(conn.from().index()), nodes.get(conn.to().index()))
        else {
            violations.push(violation(format!("{conn} references a missing node")));
            continue;
        };

        if !conn.is_active() {
            continue;
        }
        if from.layer() >= to.layer() {
            violations.push(violation(format!(
                "{conn} runs from layer {} to layer {}",
                from.layer(),
                to.layer()
            )));
        }
        if !edges.insert((conn.from(), conn.to())) {
            violations.push(violation(format!(
                "duplicate active edge {} -> {}",
                conn.from(),
                conn.to()
            )));
        }
    }

    // Outgoing lists hold exactly the active connections leaving each node
    let mut listed: HashSet<ConnectionId> = HashSet::new();
    for (index, node) in nodes.iter().enumerate() {
        for &id in node.outgoing() {
            match connections.get(id.index()) {
                None => violations.push(violation(format!(
                    "node {index} lists missing {id}"
                ))),
                Some(conn) if conn.from().index() != index => violations.push(violation(format!(
                    "node {index} lists {id}, which leaves {}",
                    conn.from()
                ))),
                Some(conn) if !conn.is_active() => violations.push(violation(format!(
                    "node {index} lists inactive {id}"
                ))),
                Some(_) => {
                    if !listed.insert(id) {
                        violations.push(violation(format!("node {index} lists {id} twice")));
                    }
                }
            }
        }
    }
    for conn in connections.iter().filter(|c| c.is_active()) {
        if !listed.contains(&conn.id()) {
            violations.push(violation(format!(
                "active {} is missing from {}'s outgoing list",
                conn.id(),
                conn.from()
            )));
        }
    }

    violations
}
