//! qbridge moment-scheduled statevector engine
//!
//! Gates are packed into moments (layers of instructions on disjoint qubits)
//! and evolved on a statevector whose basis index holds qubit 0 in its most
//! significant bit. Every two-qubit and Toffoli gate is a 2x2 unitary with a
//! control mask; SWAP runs as three CNOTs.
//!
//! The engine has no native `cp` or `cswap`; circuits using them fail with an
//! unsupported-gate error for this engine only.

mod adapter;
mod circuit;
mod engine;

pub use adapter::{ENGINE, MAX_QUBITS, MomentAdapter};
pub use circuit::{Instruction, Kernel, MomentCircuit};
