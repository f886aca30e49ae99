//! Error types for the evolution engine.

use thiserror::Error;

/// Which arena a handle points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    /// A node handle.
    Node,
    /// A connection handle.
    Connection,
}

impl std::fmt::Display for HandleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandleKind::Node => write!(f, "node"),
            HandleKind::Connection => write!(f, "connection"),
        }
    }
}

/// Errors raised by brains, populations and the roster codec.
#[derive(Debug, Error)]
pub enum Error {
    /// A structural edit would break layer ordering or duplicate an edge.
    #[error("structural invariant violation: {reason}")]
    StructuralInvariantViolation {
        /// What went wrong.
        reason: String,
    },

    /// A persisted roster is malformed or internally inconsistent.
    #[error("invalid roster data: {0}")]
    Serialization(String),

    /// The roster is not valid JSON or does not match the expected shape.
    #[error("roster JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading or writing a roster file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Roulette selection cannot run because there is no fitness to draw from.
    #[error("selection exhausted: total fitness is {total}")]
    SelectionExhaustion {
        /// Sum of fitness across the roster.
        total: f64,
    },

    /// A genome carries a fitness that selection cannot use.
    #[error("genome {index} has invalid fitness {value}")]
    InvalidFitness {
        /// Roster slot of the offending genome.
        index: usize,
        /// The fitness value found.
        value: f64,
    },

    /// A handle does not name an existing node or connection.
    #[error("{kind} handle {index} out of range (len {len})")]
    HandleOutOfRange {
        /// Arena the handle was resolved against.
        kind: HandleKind,
        /// The handle value.
        index: usize,
        /// Current arena length.
        len: usize,
    },

    /// Random connection sampling found no legal pair within its budget.
    #[error("no legal connection found after {attempts} attempts")]
    SamplingBudgetExceeded {
        /// Number of pairs drawn.
        attempts: usize,
    },

    /// `put_input` got the wrong number of values.
    #[error("expected {expected} input values, got {got}")]
    InputLength {
        /// Declared input node count.
        expected: usize,
        /// Number of values supplied.
        got: usize,
    },

    /// A brain needs at least one input and one output node.
    #[error("invalid brain shape: {inputs} inputs, {outputs} outputs")]
    InvalidShape {
        /// Requested input count.
        inputs: usize,
        /// Requested output count.
        outputs: usize,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub(crate) fn structural(reason: impl Into<String>) -> Self {
        Self::StructuralInvariantViolation {
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_error_display() {
        let err = Error::HandleOutOfRange {
            kind: HandleKind::Connection,
            index: 7,
            len: 3,
        };
        assert_eq!(err.to_string(), "connection handle 7 out of range (len 3)");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
