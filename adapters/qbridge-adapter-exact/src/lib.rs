//! qbridge exact-distribution engine
//!
//! Resolves every gate to a dense `ndarray` unitary, evolves the full state
//! once and draws the requested shots from the exact Born distribution.
//! Results therefore carry `shot_based: false` in their metadata.

mod adapter;
mod circuit;
mod unitary;

pub use adapter::{ENGINE, ExactAdapter, MAX_QUBITS};
pub use circuit::{ExactCircuit, ExactOp};
