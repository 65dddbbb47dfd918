//! Error types for the QASM interchange.

use qbridge_ir::IrError;
use thiserror::Error;

/// Errors that can occur while reading or writing QASM.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QasmError {
    /// Lexer error (invalid token).
    #[error("Lexer error at line {line}: {message}")]
    Lexer { line: usize, message: String },

    /// Unexpected token.
    #[error("Unexpected token at line {line}: expected {expected}, found {found}")]
    UnexpectedToken {
        line: usize,
        expected: String,
        found: String,
    },

    /// Unexpected end of input.
    #[error("Unexpected end of input: {0}")]
    UnexpectedEof(String),

    /// Only `OPENQASM 2.x` is accepted.
    #[error("Invalid OPENQASM version: {0}")]
    InvalidVersion(String),

    /// Register used before declaration.
    #[error("Undefined register: {0}")]
    UndefinedRegister(String),

    /// Register declared twice.
    #[error("Duplicate register declaration: {0}")]
    DuplicateRegister(String),

    /// Register wider than the parser accepts.
    #[error("Register '{register}' of size {size} exceeds the maximum of {max}")]
    RegisterTooLarge { register: String, size: u64, max: u64 },

    /// Index out of bounds.
    #[error("Index {index} out of bounds for register '{register}' of size {size}")]
    IndexOutOfBounds {
        register: String,
        index: u64,
        size: usize,
    },

    /// Valid QASM that the circuit model cannot represent.
    #[error("Unsupported construct at line {line}: {construct}")]
    Unsupported { line: usize, construct: String },

    /// Measurement that does not cover every qubit in order.
    #[error("Partial measurement is not supported: {0}")]
    PartialMeasurement(String),

    /// Parameter expression could not be evaluated.
    #[error("Invalid expression at line {line}: {message}")]
    Expression { line: usize, message: String },

    /// The parsed program failed circuit validation.
    #[error("Circuit error: {0}")]
    Circuit(#[from] IrError),
}

/// Result type for QASM operations.
pub type QasmResult<T> = Result<T, QasmError>;
