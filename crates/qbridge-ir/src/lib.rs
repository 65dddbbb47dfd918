//! qbridge Circuit Intermediate Representation
//!
//! This crate holds the engine-neutral description of a quantum circuit that
//! every qbridge engine adapter consumes. A circuit is written once here and
//! handed unchanged to each engine.
//!
//! # Core Components
//!
//! - **Gates**: [`GateType`], the closed canonical gate set with its synonyms
//! - **Operations**: [`GateOp`], a validated gate application
//! - **Circuits**: [`CircuitSpec`], built from raw input ([`CircuitRequest`],
//!   [`RawGate`]) or from typed ops, validated on construction
//! - **Summaries**: [`CircuitInfo`] and [`DepthCounter`] for describing the
//!   circuit an engine actually realized
//! - **Library**: [`library`] with Bell, GHZ, teleportation and benchmark circuits
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use qbridge_ir::{CircuitSpec, RawGate};
//!
//! let gates = [RawGate::new("h", [0]), RawGate::new("cnot", [0, 1])];
//! let spec = CircuitSpec::build(2, &gates, true).unwrap();
//!
//! assert_eq!(spec.num_qubits(), 2);
//! assert_eq!(spec, qbridge_ir::library::bell().unwrap());
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Params |
//! |------|--------|--------|
//! | `h`, `x`, `y`, `z` | 1 | 0 |
//! | `s`, `sdg`, `t`, `tdg` | 1 | 0 |
//! | `rx`, `ry`, `rz`, `p` | 1 | 1 |
//! | `cx`, `cy`, `cz`, `swap` | 2 | 0 |
//! | `cp` | 2 | 1 |
//! | `ccx`, `cswap` | 3 | 0 |

pub mod circuit;
pub mod error;
pub mod gate;
pub mod info;
pub mod library;

pub use circuit::{CircuitRequest, CircuitSpec, GateOp, RawGate};
pub use error::{IrError, IrResult};
pub use gate::{GateType, UnknownGateName};
pub use info::{CircuitInfo, CircuitInfoBuilder, DepthCounter, MEASURE};
pub use library::BenchmarkKind;
