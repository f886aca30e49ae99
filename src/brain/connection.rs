//! Weighted directed edges between nodes.

use crate::brain::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable, sequential handle of a connection inside its brain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(pub usize);

impl ConnectionId {
    /// Position of the connection in its brain's arena.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "connection {}", self.0)
    }
}

/// A directed weighted edge.
///
/// Inactive connections stay in the arena so that ids never shift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    pub(crate) id: ConnectionId,
    pub(crate) from: NodeId,
    pub(crate) to: NodeId,
    pub(crate) weight: f64,
    pub(crate) active: bool,
}

impl Connection {
    /// Connection id, equal to its arena position.
    #[must_use]
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Source node.
    #[must_use]
    pub fn from(&self) -> NodeId {
        self.from
    }

    /// Destination node.
    #[must_use]
    pub fn to(&self) -> NodeId {
        self.to
    }

    /// Edge weight, kept within [-1, 1] by mutation.
    #[must_use]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Whether the connection takes part in evaluation.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "conn {}, from {} to {} weight {:.6}",
            self.id.0, self.from.0, self.to.0, self.weight
        )
    }
}
