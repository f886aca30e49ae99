//! Forward evaluation of a brain, one layer at a time.

use crate::brain::Brain;

impl Brain {
    /// Propagate the injected inputs through the network.
    ///
    /// Hidden nodes are activated when their layer is reached and then push
    /// `output * weight` along their outgoing connections. Output nodes are
    /// activated last. Accumulators are not cleared here, so call
    /// [`Brain::put_input`] before every pass.
    pub fn feed_forward(&mut self) {
        let output_layer = self.output_layer();
        let top = self.nodes.iter().map(|n| n.layer).max().unwrap_or(0);

        let mut layers: Vec<Vec<usize>> = vec![Vec::new(); top as usize + 1];
        for (index, node) in self.nodes.iter().enumerate() {
            layers[node.layer as usize].push(index);
        }

        for layer in &layers[..output_layer as usize] {
            for &index in layer {
                if self.nodes[index].layer != 0 {
                    self.nodes[index].activate();
                }

                let output = self.nodes[index].output;
                for slot in 0..self.nodes[index].outgoing.len() {
                    let conn = self.connections[self.nodes[index].outgoing[slot].0];
                    if conn.active {
                        self.nodes[conn.to.0].input_sum += output * conn.weight;
                    }
                }
            }
        }

        let outputs = self.input_count()..self.input_count() + self.output_count();
        for node in &mut self.nodes[outputs] {
            node.activate();
        }
    }
}
