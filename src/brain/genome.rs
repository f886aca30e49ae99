//! The `Brain` genome: node and connection arenas plus structural edits.
//!
//! Node handles `0..inputs` are the input block and
//! `inputs..inputs + outputs` the output block. Hidden nodes are appended
//! after them as split mutations create them.

use crate::brain::{Connection, ConnectionId, MutationConfig, Node, NodeId};
use crate::error::{Error, HandleKind, Result};
use log::{trace, warn};
use rand::Rng;

/// Where a new node is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeLayer {
    /// Assign this exact layer. Used when seeding and loading.
    Fixed(u32),
    /// Place the node between two layers, renumbering the graph if the gap
    /// has no room.
    Between {
        /// Layer of the upstream endpoint.
        from: u32,
        /// Layer of the downstream endpoint.
        to: u32,
    },
}

/// One evolvable network.
#[derive(Debug, Clone, PartialEq)]
pub struct Brain {
    pub(crate) nodes: Vec<Node>,
    pub(crate) connections: Vec<Connection>,
    inputs: usize,
    outputs: usize,
    fitness: f64,
    elite: bool,
}

impl Brain {
    /// Create a seed brain: inputs at layer 0, outputs at layer 1 and one
    /// random connection between them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidShape`] if either count is zero.
    pub fn new<R: Rng>(
        inputs: usize,
        outputs: usize,
        config: &MutationConfig,
        rng: &mut R,
    ) -> Result<Self> {
        let mut brain = Self::unconnected(inputs, outputs)?;
        brain.new_rand_connection(config.connection_attempts, rng)?;
        Ok(brain)
    }

    /// Create a brain with the input and output blocks but no connections.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidShape`] if either count is zero.
    pub fn unconnected(inputs: usize, outputs: usize) -> Result<Self> {
        if inputs == 0 || outputs == 0 {
            return Err(Error::InvalidShape { inputs, outputs });
        }

        let mut brain = Self {
            nodes: Vec::with_capacity(inputs + outputs),
            connections: Vec::new(),
            inputs,
            outputs,
            fitness: 0.0,
            elite: false,
        };
        for _ in 0..inputs {
            brain.add_node(NodeLayer::Fixed(0));
        }
        for _ in 0..outputs {
            brain.add_node(NodeLayer::Fixed(1));
        }
        Ok(brain)
    }

    /// Assemble a brain from already-validated arenas.
    pub(crate) fn from_parts(
        inputs: usize,
        outputs: usize,
        nodes: Vec<Node>,
        connections: Vec<Connection>,
    ) -> Self {
        Self {
            nodes,
            connections,
            inputs,
            outputs,
            fitness: 0.0,
            elite: false,
        }
    }

    /// Structural copy for the next generation, with fitness and elite
    /// status cleared.
    #[must_use]
    pub fn offspring(&self) -> Self {
        Self {
            fitness: 0.0,
            elite: false,
            ..self.clone()
        }
    }

    /// Number of input nodes.
    #[must_use]
    pub fn input_count(&self) -> usize {
        self.inputs
    }

    /// Number of output nodes.
    #[must_use]
    pub fn output_count(&self) -> usize {
        self.outputs
    }

    /// All nodes in handle order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All connections in id order, including inactive ones.
    #[must_use]
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Connections that take part in evaluation.
    pub fn active_connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.iter().filter(|c| c.active)
    }

    /// Handles of the output block, in creation order.
    pub fn output_ids(&self) -> impl Iterator<Item = NodeId> {
        (self.inputs..self.inputs + self.outputs).map(NodeId)
    }

    /// Layer shared by the output nodes. It is the highest layer in the brain.
    #[must_use]
    pub fn output_layer(&self) -> u32 {
        self.nodes[self.inputs].layer
    }

    /// Look up a node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HandleOutOfRange`] for an unknown handle.
    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id.0).ok_or(Error::HandleOutOfRange {
            kind: HandleKind::Node,
            index: id.0,
            len: self.nodes.len(),
        })
    }

    /// Look up a connection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HandleOutOfRange`] for an unknown handle.
    pub fn connection(&self, id: ConnectionId) -> Result<&Connection> {
        self.connections.get(id.0).ok_or(Error::HandleOutOfRange {
            kind: HandleKind::Connection,
            index: id.0,
            len: self.connections.len(),
        })
    }

    /// Whether `from` already has an active connection into `to`.
    #[must_use]
    pub fn has_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.nodes.get(from.0).is_some_and(|node| {
            node.outgoing
                .iter()
                .any(|id| self.connections[id.0].to == to)
        })
    }

    /// Fitness assigned by the caller for the current generation.
    #[must_use]
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    /// Record the caller's fitness score.
    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }

    /// Whether this brain was ranked best or runner-up, or carried over as
    /// the elite survivor.
    #[must_use]
    pub fn is_elite(&self) -> bool {
        self.elite
    }

    pub(crate) fn set_elite(&mut self, elite: bool) {
        self.elite = elite;
    }

    /// Reset all accumulators and load `values` into the input nodes.
    ///
    /// Must be called before every [`Brain::feed_forward`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InputLength`] if `values` does not match the input
    /// count.
    pub fn put_input(&mut self, values: &[f64]) -> Result<()> {
        if values.len() != self.inputs {
            return Err(Error::InputLength {
                expected: self.inputs,
                got: values.len(),
            });
        }

        for node in &mut self.nodes {
            node.input_sum = 0.0;
        }
        for (node, &value) in self.nodes.iter_mut().zip(values) {
            node.output = value;
        }
        Ok(())
    }

    /// Activated values of the output block, in creation order.
    #[must_use]
    pub fn get_outputs(&self) -> Vec<f64> {
        self.nodes[self.inputs..self.inputs + self.outputs]
            .iter()
            .map(Node::output)
            .collect()
    }

    /// Append a node and return its handle.
    ///
    /// With [`NodeLayer::Between`], if there is no free layer between `from`
    /// and `to`, every node above `from` moves up one layer before the new
    /// node takes layer `from + 1`.
    pub fn add_node(&mut self, layer: NodeLayer) -> NodeId {
        let layer = match layer {
            NodeLayer::Fixed(layer) => layer,
            NodeLayer::Between { from, to } => {
                if to.saturating_sub(from) <= 1 {
                    for node in &mut self.nodes {
                        if node.layer > from {
                            node.layer += 1;
                        }
                    }
                }
                from + 1
            }
        };

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(layer));
        id
    }

    /// Append an active connection with the next sequential id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HandleOutOfRange`] for unknown nodes, and
    /// [`Error::StructuralInvariantViolation`] if the edge would not climb
    /// layers, duplicates an active edge, or has a non-finite weight.
    pub fn add_connection(&mut self, from: NodeId, to: NodeId, weight: f64) -> Result<ConnectionId> {
        let from_layer = self.node(from)?.layer;
        let to_layer = self.node(to)?.layer;

        if from_layer >= to_layer {
            return Err(Error::structural(format!(
                "{from} (layer {from_layer}) -> {to} (layer {to_layer}) does not climb layers"
            )));
        }
        if self.has_edge(from, to) {
            return Err(Error::structural(format!("{from} already connects to {to}")));
        }
        if !weight.is_finite() {
            return Err(Error::structural(format!("weight {weight} is not finite")));
        }

        Ok(self.push_connection(from, to, weight))
    }

    fn push_connection(&mut self, from: NodeId, to: NodeId, weight: f64) -> ConnectionId {
        let id = ConnectionId(self.connections.len());
        self.connections.push(Connection {
            id,
            from,
            to,
            weight,
            active: true,
        });
        self.nodes[from.0].outgoing.push(id);
        trace!("added {}", self.connections[id.0]);
        id
    }

    /// Add a connection between a uniformly drawn legal node pair.
    ///
    /// Pairs are drawn at random up to `attempts` times. If none of them is
    /// legal, the legal pairs are listed and one is picked uniformly, so a
    /// nearly saturated brain still gets its connection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SamplingBudgetExceeded`] if no legal pair exists.
    pub fn new_rand_connection<R: Rng>(&mut self, attempts: usize, rng: &mut R) -> Result<ConnectionId> {
        let count = self.nodes.len();

        for _ in 0..attempts {
            let from = NodeId(rng.gen_range(0..count));
            let to = NodeId(rng.gen_range(0..count));
            if self.is_legal_edge(from, to) {
                let weight = random_weight(rng);
                return Ok(self.push_connection(from, to, weight));
            }
        }

        let candidates: Vec<(NodeId, NodeId)> = (0..count)
            .flat_map(|a| (0..count).map(move |b| (NodeId(a), NodeId(b))))
            .filter(|&(from, to)| self.is_legal_edge(from, to))
            .collect();

        if candidates.is_empty() {
            warn!("no legal connection left among {count} nodes after {attempts} draws");
            return Err(Error::SamplingBudgetExceeded { attempts });
        }

        let (from, to) = candidates[rng.gen_range(0..candidates.len())];
        let weight = random_weight(rng);
        Ok(self.push_connection(from, to, weight))
    }

    /// Whether any legal pair is still unconnected.
    #[must_use]
    pub fn has_free_pair(&self) -> bool {
        let count = self.nodes.len();
        (0..count).any(|a| (0..count).any(|b| self.is_legal_edge(NodeId(a), NodeId(b))))
    }

    fn is_legal_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.nodes[from.0].layer < self.nodes[to.0].layer && !self.has_edge(from, to)
    }
}

/// Uniform weight in [-1, 1].
pub(crate) fn random_weight<R: Rng>(rng: &mut R) -> f64 {
    rng.gen_range(-1.0..=1.0)
}
