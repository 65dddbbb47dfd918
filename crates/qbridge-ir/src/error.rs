//! Error types for the IR crate.
//!
//! Every variant is a validation failure: the caller handed in a circuit that
//! cannot be executed by any engine. These errors abort the request before an
//! engine is touched and are never retried.

use thiserror::Error;

/// Errors raised while building or validating a circuit.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum IrError {
    /// The circuit must have at least one qubit.
    #[error("Circuit must have a positive number of qubits, got {0}")]
    InvalidQubitCount(i64),

    /// A circuit generator needs more qubits than requested.
    #[error("{circuit} requires at least {required} qubits, got {got}")]
    TooFewQubits {
        /// Name of the generated circuit.
        circuit: &'static str,
        /// Minimum qubit count.
        required: usize,
        /// Requested qubit count.
        got: i64,
    },

    /// Gate name is not part of the canonical gate set.
    #[error("Unknown gate '{name}' at position {position}")]
    UnknownGate {
        /// Index of the gate in the gate list.
        position: usize,
        /// Name as supplied by the caller.
        name: String,
    },

    /// Gate received the wrong number of qubit operands.
    #[error("Gate '{gate}' at position {position} requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Index of the gate in the gate list.
        position: usize,
        /// Canonical gate name.
        gate: &'static str,
        /// Gate arity.
        expected: usize,
        /// Number of operands supplied.
        got: usize,
    },

    /// Qubit operand outside `[0, num_qubits)`.
    #[error(
        "Qubit {qubit} out of range for gate '{gate}' at position {position} (circuit has {num_qubits} qubits)"
    )]
    QubitOutOfRange {
        /// Index of the gate in the gate list.
        position: usize,
        /// Canonical gate name.
        gate: &'static str,
        /// Offending operand.
        qubit: i64,
        /// Circuit width.
        num_qubits: usize,
    },

    /// The same qubit appears twice in one gate's operand list.
    #[error("Duplicate qubit {qubit} in gate '{gate}' at position {position}")]
    DuplicateQubit {
        /// Index of the gate in the gate list.
        position: usize,
        /// Canonical gate name.
        gate: &'static str,
        /// Repeated operand.
        qubit: usize,
    },

    /// Parametric gate received the wrong number of parameters.
    #[error("Gate '{gate}' at position {position} requires {expected} parameters, got {got}")]
    ParameterCountMismatch {
        /// Index of the gate in the gate list.
        position: usize,
        /// Canonical gate name.
        gate: &'static str,
        /// Parameters the gate takes.
        expected: usize,
        /// Parameters supplied.
        got: usize,
    },

    /// Parameter is NaN or infinite.
    #[error("Gate '{gate}' at position {position} has a non-finite parameter")]
    NonFiniteParameter {
        /// Index of the gate in the gate list.
        position: usize,
        /// Canonical gate name.
        gate: &'static str,
    },
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
