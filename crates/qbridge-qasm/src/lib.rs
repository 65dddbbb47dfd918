//! `OpenQASM` 2.0 interchange for qbridge
//!
//! Reads and writes the subset of `OpenQASM` 2.0 that maps one-to-one onto a
//! [`qbridge_ir::CircuitSpec`]: a single quantum register, the canonical gate
//! set, and an optional final measurement of every qubit in order.
//!
//! # Supported Features
//!
//! | Feature | Status | Example |
//! |---------|--------|---------|
//! | Version declaration | ✅ | `OPENQASM 2.0;` |
//! | Includes | ignored | `include "qelib1.inc";` |
//! | Quantum register | ✅ (one) | `qreg q[5];` |
//! | Classical registers | ✅ | `creg c[5];` |
//! | Standard gates | ✅ | `h q[0];`, `cx q[0],q[1];` |
//! | Parameterized gates | ✅ | `rz(pi/4) q[0];` |
//! | Single-qubit broadcast | ✅ | `h q;` |
//! | Full measurement | ✅ | `measure q -> c;` |
//! | Barriers | ignored | `barrier q;` |
//! | Partial measurement | ❌ | `measure q[0] -> c[0];` alone |
//! | Reset, `if`, gate definitions | ❌ | `reset q[0];` |
//!
//! # Example: Round-Trip
//!
//! ```rust
//! use qbridge_qasm::{emit, parse};
//!
//! let spec = qbridge_ir::library::ghz(3).unwrap();
//! let source = emit(&spec);
//! assert!(source.contains("cx q[0],q[2];"));
//! assert_eq!(parse(&source).unwrap(), spec);
//! ```

pub mod emitter;
pub mod error;
pub mod lexer;
mod parser;

pub use emitter::emit;
pub use error::{QasmError, QasmResult};
pub use parser::parse;
