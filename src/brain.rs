//! Evolvable feed-forward networks.
//!
//! A [`Brain`] is a layered directed graph stored in two append-only arenas,
//! one for nodes and one for connections. Handles into either arena stay
//! valid for the brain's whole lifetime: connections are deactivated, never
//! removed.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │              Brain                  │
//! ├─────────────────────────────────────┤
//! │ Mutation │ Evaluation │ Invariants  │
//! ├─────────────────────────────────────┤
//! │   Node arena   │ Connection arena   │
//! └─────────────────────────────────────┘
//! ```
//!
//! Every active connection runs from a lower layer to a strictly higher one,
//! so a single pass over the layers evaluates the whole network.

mod connection;
mod evaluation;
mod genome;
mod invariants;
mod mutation;
mod node;
mod summary;

pub use connection::{Connection, ConnectionId};
pub use genome::{Brain, NodeLayer};
pub use invariants::{check_invariants, InvariantViolation};
pub use mutation::{MutationConfig, DEFAULT_CONNECTION_ATTEMPTS};
pub use node::{sigmoid, Node, NodeId};
pub use summary::BrainSummary;
