//! qbridge dense statevector engine
//!
//! Exact statevector evolution followed by sampling from the Born
//! distribution. The engine writes outcome labels with qubit 0 as the
//! rightmost character; the shared layer reverses them.
//!
//! # Performance
//!
//! | Qubits | Memory |
//! |--------|--------|
//! | 10 | ~16 KB |
//! | 20 | ~16 MB |
//! | 24 | ~256 MB |
//!
//! # Example
//!
//! ```ignore
//! use qbridge_adapter_sim::SimAdapter;
//! use qbridge_hal::Backend;
//! use qbridge_ir::library;
//!
//! let engine = SimAdapter::new();
//! let result = engine.run(&library::bell()?, 1000);
//! // Expect ~50% "00" and ~50% "11"
//! println!("{:?}", result.counts());
//! ```

mod circuit;
mod simulator;
mod statevector;

pub use circuit::{PhaseLabel, SimCircuit, SimOp};
pub use simulator::{ENGINE, MAX_QUBITS, SimAdapter};
