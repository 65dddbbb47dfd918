//! qbridge engine abstraction layer
//!
//! This crate defines how the shared layer talks to quantum-simulation
//! engines and what comes back.
//!
//! # Overview
//!
//! - [`Adapter`]: the typed contract one engine implements (translate, sample,
//!   introspect, interchange)
//! - [`Backend`]: the object-safe view of any adapter, used by registries and
//!   the orchestrator
//! - [`CircuitResult`] and [`Counts`]: the canonical result shape, with
//!   bitstrings written qubit 0 leftmost
//! - [`normalize`](normalize::normalize): conversion of engine-native
//!   histograms ([`NativeHistogram`]) according to the engine's [`BitOrder`]
//! - [`Capabilities`]: limits, gate set and conventions per engine
//! - [`EngineRegistry`]: immutable id → engine map with an availability probe
//!
//! # Implementing an Adapter
//!
//! ```ignore
//! use qbridge_hal::{Adapter, BitOrder, Capabilities, HalResult, NativeHistogram};
//! use qbridge_ir::{CircuitInfo, CircuitSpec};
//!
//! struct MyEngine {
//!     caps: Capabilities,
//! }
//!
//! impl Adapter for MyEngine {
//!     type Native = my_engine::Circuit;
//!     const BIT_ORDER: BitOrder = BitOrder::QubitZeroRight;
//!
//!     fn name(&self) -> &str { "my-engine" }
//!     fn capabilities(&self) -> &Capabilities { &self.caps }
//!
//!     fn translate(&self, spec: &CircuitSpec) -> HalResult<Self::Native> {
//!         self.ensure_fits(spec.num_qubits())?;
//!         // look every gate up in the engine's dispatch table
//!         todo!()
//!     }
//!
//!     fn width(&self, native: &Self::Native) -> usize { native.num_qubits() }
//!
//!     fn sample(&self, native: &Self::Native, shots: u32) -> HalResult<NativeHistogram> {
//!         Ok(NativeHistogram::Labels(native.run(shots)))
//!     }
//!
//!     fn info(&self, native: &Self::Native) -> CircuitInfo { todo!() }
//! }
//! ```

pub mod adapter;
pub mod capability;
pub mod error;
pub mod normalize;
pub mod probe;
pub mod registry;
pub mod result;

pub use adapter::{Adapter, Backend, EngineConfig, guarded};
pub use capability::{Capabilities, DEFAULT_MAX_SHOTS, Interchange};
pub use error::{HalError, HalResult};
pub use normalize::{BitOrder, NativeHistogram};
pub use probe::{Availability, AvailabilitySnapshot};
pub use registry::{EngineRegistry, RegistryBuilder};
pub use result::{CircuitResult, Counts, Outcome, Probabilities, ResultMetadata};
