//! qbridge stabilizer engine
//!
//! Simulates Clifford circuits (`h x y z s sdg cx cy cz swap`) on an
//! Aaronson-Gottesman tableau, which scales polynomially in the number of
//! qubits. Any non-Clifford gate is reported as unsupported for this engine.

mod adapter;
mod circuit;
mod tableau;

pub use adapter::{ENGINE, MAX_QUBITS, StabilizerAdapter};
pub use circuit::{CliffordOp, StabilizerCircuit};
