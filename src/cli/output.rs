//! Output formatting utilities for CLI.

use neurovolve::BrainSummary;
use serde::Serialize;

/// JSON-serializable roster overview.
#[derive(Debug, Serialize)]
pub(super) struct JsonRosterSummary {
    /// Generation stored in the roster.
    pub(super) generation: u32,
    /// Per-net summaries.
    pub(super) nets: Vec<JsonNetSummary>,
}

/// JSON-serializable summary of one net.
#[derive(Debug, Serialize)]
pub(super) struct JsonNetSummary {
    /// Roster slot.
    pub(super) index: usize,
    /// Topology overview.
    #[serde(flatten)]
    pub(super) summary: BrainSummary,
}

/// Format a roster overview as human-readable text.
pub(super) fn format_text(roster: &JsonRosterSummary) -> String {
    let mut output = String::new();

    output.push_str(&format!("Roster (generation {})\n", roster.generation));
    output.push_str(&format!("  Nets: {}\n\n", roster.nets.len()));

    for net in &roster.nets {
        let s = &net.summary;
        output.push_str(&format!(
            "  Net {:>4}: {} nodes ({} hidden), {}/{} connections active, mean |w| {:.3}\n",
            net.index, s.nodes, s.hidden_nodes, s.active_connections, s.connections, s.mean_abs_weight
        ));
        let layers: Vec<String> = s
            .nodes_per_layer
            .iter()
            .enumerate()
            .map(|(layer, count)| format!("L{layer}:{count}"))
            .collect();
        output.push_str(&format!("            layers {}\n", layers.join(" ")));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use neurovolve::{Brain, NodeId};

    #[test]
    fn test_format_text_lists_layers() {
        let mut brain = Brain::unconnected(2, 1).unwrap();
        brain.add_connection(NodeId(0), NodeId(2), 0.5).unwrap();
        let roster = JsonRosterSummary {
            generation: 7,
            nets: vec![JsonNetSummary {
                index: 0,
                summary: brain.summary(),
            }],
        };

        let text = format_text(&roster);
        assert!(text.contains("generation 7"));
        assert!(text.contains("1/1 connections active"));
        assert!(text.contains("L0:2 L1:1"));
    }
}
