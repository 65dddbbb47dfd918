//! Error types for the HAL crate.

use qbridge_ir::IrError;
use thiserror::Error;

/// Errors that can occur in HAL operations.
///
/// Everything except [`HalError::Validation`] is scoped to a single engine and
/// carries that engine's id in its message.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// The circuit failed IR validation.
    #[error("Invalid circuit: {0}")]
    Validation(#[from] IrError),

    /// The engine has no translation for a canonical gate.
    #[error("Engine '{engine}' does not support gate '{gate}'")]
    UnsupportedGate { gate: String, engine: String },

    /// The engine does not implement an optional operation.
    #[error("Engine '{engine}' does not support {operation}")]
    NotSupported { engine: String, operation: String },

    /// No engine registered under this id.
    #[error("Unknown engine: '{0}'")]
    UnknownEngine(String),

    /// The engine failed while simulating.
    #[error("Engine '{engine}' failed: {message}")]
    Execution { engine: String, message: String },

    /// Circuit exceeds the engine's qubit limit.
    #[error("Engine '{engine}' supports at most {max_qubits} qubits, circuit has {num_qubits}")]
    CircuitTooLarge {
        engine: String,
        num_qubits: usize,
        max_qubits: usize,
    },

    /// Shot count is zero or above the engine's limit.
    #[error("Engine '{engine}' accepts 1..={max_shots} shots, got {shots}")]
    InvalidShots {
        engine: String,
        shots: u32,
        max_shots: u32,
    },

    /// Interchange text could not be read or written.
    #[error("Engine '{engine}' interchange error: {message}")]
    Interchange { engine: String, message: String },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl HalError {
    /// Engine id the error is scoped to, if any.
    pub fn engine(&self) -> Option<&str> {
        match self {
            HalError::UnsupportedGate { engine, .. }
            | HalError::NotSupported { engine, .. }
            | HalError::Execution { engine, .. }
            | HalError::CircuitTooLarge { engine, .. }
            | HalError::InvalidShots { engine, .. }
            | HalError::Interchange { engine, .. } => Some(engine),
            HalError::UnknownEngine(engine) => Some(engine),
            _ => None,
        }
    }
}

/// Result type for HAL operations.
pub type HalResult<T> = Result<T, HalError>;
