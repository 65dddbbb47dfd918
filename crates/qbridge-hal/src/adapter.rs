//! Engine adapter contract.
//!
//! Each engine is wrapped by one [`Adapter`] implementation. The trait is
//! typed: an adapter names the engine's native circuit type and the bit order
//! of the engine's outcomes, and supplies the engine-specific steps
//! (translate, sample, introspect). The shared behaviour of turning those steps
//! into a canonical [`CircuitResult`] lives in the provided
//! [`Adapter::execute`].
//!
//! Registries and the orchestrator need to hold heterogeneous adapters, so
//! every adapter is also a [`Backend`] through a blanket implementation.
//! `Backend` is object safe and never returns an engine-scoped error for a
//! run: failures come back as an error-populated `CircuitResult`.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use qbridge_ir::{CircuitInfo, CircuitSpec, GateOp, GateType};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::capability::Capabilities;
use crate::error::{HalError, HalResult};
use crate::normalize::{BitOrder, NativeHistogram, normalize};
use crate::probe::Availability;
use crate::result::CircuitResult;

/// Construction-time settings shared by all adapters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Fixed RNG seed; each run starts from it. `None` draws from entropy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Lower the engine's qubit ceiling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_qubits: Option<usize>,
    /// Lower the engine's shot ceiling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_shots: Option<u32>,
}

impl EngineConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the qubit ceiling.
    #[must_use]
    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = Some(max_qubits);
        self
    }

    /// Set the shot ceiling.
    #[must_use]
    pub fn with_max_shots(mut self, max_shots: u32) -> Self {
        self.max_shots = Some(max_shots);
        self
    }

    /// Apply the configured limits to an engine's built-in capabilities.
    ///
    /// Configured limits can only lower the engine's own.
    pub fn apply(&self, mut caps: Capabilities) -> Capabilities {
        if let Some(max) = self.max_qubits {
            caps.max_qubits = caps.max_qubits.min(max);
        }
        if let Some(max) = self.max_shots {
            caps.max_shots = caps.max_shots.min(max);
        }
        caps
    }
}

/// Typed contract between the shared layer and one engine.
///
/// # Contract
///
/// - `translate()` MUST reject a circuit wider than `capabilities().max_qubits`
///   with [`HalError::CircuitTooLarge`] and any gate outside the engine's
///   dispatch table with [`HalError::UnsupportedGate`]. It appends a
///   measurement of every qubit iff the circuit is measured.
/// - `sample()` MUST return exactly `shots` outcomes covering every qubit of
///   the circuit, in the engine's own bit order.
/// - Engines hold only immutable configuration; every `sample()` call builds
///   its own random state, so adapters can be shared across threads.
pub trait Adapter: Send + Sync {
    /// The engine's own circuit representation.
    type Native: Send;

    /// Where the engine puts qubit 0 in its outcomes.
    const BIT_ORDER: BitOrder;

    /// Engine id.
    fn name(&self) -> &str;

    /// Engine capabilities.
    fn capabilities(&self) -> &Capabilities;

    /// Build the engine's native circuit.
    fn translate(&self, spec: &CircuitSpec) -> HalResult<Self::Native>;

    /// Number of qubits the native circuit measures.
    fn width(&self, native: &Self::Native) -> usize;

    /// Run the native circuit and return the raw histogram.
    fn sample(&self, native: &Self::Native, shots: u32) -> HalResult<NativeHistogram>;

    /// Summary of the native circuit.
    fn info(&self, native: &Self::Native) -> CircuitInfo;

    /// Write the native circuit as OpenQASM.
    fn to_interchange(&self, _native: &Self::Native) -> HalResult<String> {
        Err(self.not_supported("OpenQASM export"))
    }

    /// Build a native circuit from OpenQASM.
    fn from_interchange(&self, _source: &str) -> HalResult<Self::Native> {
        Err(self.not_supported("OpenQASM import"))
    }

    /// [`HalError::NotSupported`] for this engine.
    fn not_supported(&self, operation: &str) -> HalError {
        HalError::NotSupported {
            engine: Adapter::name(self).to_string(),
            operation: operation.to_string(),
        }
    }

    /// [`HalError::UnsupportedGate`] for this engine.
    fn unsupported_gate(&self, gate: GateType) -> HalError {
        HalError::UnsupportedGate {
            gate: gate.name().to_string(),
            engine: Adapter::name(self).to_string(),
        }
    }

    /// Reject circuits wider than the engine's qubit limit.
    fn ensure_fits(&self, num_qubits: usize) -> HalResult<()> {
        let max_qubits = Adapter::capabilities(self).max_qubits;
        if num_qubits > max_qubits {
            return Err(HalError::CircuitTooLarge {
                engine: Adapter::name(self).to_string(),
                num_qubits,
                max_qubits,
            });
        }
        Ok(())
    }

    /// Reject zero shots and shots above the engine's limit.
    fn ensure_shots(&self, shots: u32) -> HalResult<()> {
        let max_shots = Adapter::capabilities(self).max_shots;
        if shots == 0 || shots > max_shots {
            return Err(HalError::InvalidShots {
                engine: Adapter::name(self).to_string(),
                shots,
                max_shots,
            });
        }
        Ok(())
    }

    /// Run a native circuit and produce the canonical result. Never fails:
    /// engine errors and panics become an error-populated result.
    fn execute(&self, native: &Self::Native, shots: u32) -> CircuitResult {
        let engine = Adapter::name(self);
        if let Err(e) = self.ensure_shots(shots) {
            return self.failed(shots, &e);
        }

        let start = Instant::now();
        let sampled = guarded(engine, || self.sample(native, shots));
        let elapsed = start.elapsed().as_secs_f64();

        let counts = sampled
            .and_then(|histogram| normalize(engine, histogram, Self::BIT_ORDER, self.width(native)));
        match counts {
            Ok(counts) => {
                debug!(engine, shots, outcomes = counts.len(), elapsed, "engine run complete");
                self.decorate(CircuitResult::success(engine, shots, counts, elapsed))
            }
            Err(e) => self.failed(shots, &e),
        }
    }

    /// Error-populated result for this engine.
    fn failed(&self, shots: u32, error: &HalError) -> CircuitResult {
        warn!(engine = Adapter::name(self), %error, "engine run failed");
        self.decorate(CircuitResult::failure(Adapter::name(self), shots, error.to_string()))
    }

    /// Attach the engine's standard metadata entries.
    fn decorate(&self, result: CircuitResult) -> CircuitResult {
        let caps = Adapter::capabilities(self);
        result
            .with_extra("bit_order", serde_json::json!(Self::BIT_ORDER.as_str()))
            .with_extra("shot_based", serde_json::json!(caps.shot_based))
    }
}

/// Object-safe view of an engine, blanket-implemented for every [`Adapter`].
pub trait Backend: Send + Sync {
    /// Engine id.
    fn name(&self) -> &str;

    /// Engine capabilities.
    fn capabilities(&self) -> &Capabilities;

    /// Translate and execute a validated circuit.
    fn run(&self, spec: &CircuitSpec, shots: u32) -> CircuitResult;

    /// Import an OpenQASM program and execute it.
    fn run_interchange(&self, source: &str, shots: u32) -> CircuitResult;

    /// Translate a circuit and summarize the native result.
    fn inspect(&self, spec: &CircuitSpec) -> HalResult<CircuitInfo>;

    /// Translate a circuit and write it as OpenQASM.
    fn export(&self, spec: &CircuitSpec) -> HalResult<String>;

    /// Import an OpenQASM program and summarize the native result.
    fn import(&self, source: &str) -> HalResult<CircuitInfo>;

    /// Advisory availability check.
    fn probe(&self) -> Availability;
}

impl<A: Adapter> Backend for A {
    fn name(&self) -> &str {
        Adapter::name(self)
    }

    fn capabilities(&self) -> &Capabilities {
        Adapter::capabilities(self)
    }

    fn run(&self, spec: &CircuitSpec, shots: u32) -> CircuitResult {
        debug!(
            engine = Adapter::name(self),
            num_qubits = spec.num_qubits(),
            num_gates = spec.num_gates(),
            shots,
            "running circuit"
        );
        match guarded(Adapter::name(self), || self.translate(spec)) {
            Ok(native) => self.execute(&native, shots),
            Err(e) => self.failed(shots, &e),
        }
    }

    fn run_interchange(&self, source: &str, shots: u32) -> CircuitResult {
        match guarded(Adapter::name(self), || self.from_interchange(source)) {
            Ok(native) => self.execute(&native, shots),
            Err(e) => self.failed(shots, &e),
        }
    }

    fn inspect(&self, spec: &CircuitSpec) -> HalResult<CircuitInfo> {
        let native = guarded(Adapter::name(self), || self.translate(spec))?;
        Ok(self.info(&native))
    }

    fn export(&self, spec: &CircuitSpec) -> HalResult<String> {
        guarded(Adapter::name(self), || {
            let native = self.translate(spec)?;
            self.to_interchange(&native)
        })
    }

    fn import(&self, source: &str) -> HalResult<CircuitInfo> {
        let native = guarded(Adapter::name(self), || self.from_interchange(source))?;
        Ok(self.info(&native))
    }

    fn probe(&self) -> Availability {
        let probe = CircuitSpec::from_ops(1, vec![GateOp::new(GateType::X, [0], [])], true)
            .map_err(HalError::from);
        match probe.and_then(|spec| guarded(Adapter::name(self), || self.translate(&spec))) {
            Ok(_) => Availability::available(),
            Err(e) => Availability::unavailable(e.to_string()),
        }
    }
}

/// Run `f`, converting a panic into [`HalError::Execution`] for `engine`.
pub fn guarded<T>(engine: &str, f: impl FnOnce() -> HalResult<T>) -> HalResult<T> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => Err(HalError::Execution {
            engine: engine.to_string(),
            message: format!("engine panicked: {}", panic_message(payload.as_ref())),
        }),
    }
}

/// Reduce a panic payload to its message.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    /// Engine whose native circuit is the `CircuitSpec` itself; outcome fixed to
    /// "all qubits flipped by an X", reported little-endian.
    struct Echo {
        caps: Capabilities,
        panic_on_sample: bool,
    }

    impl Echo {
        fn new() -> Self {
            Self {
                caps: Capabilities::new("echo", 4, BitOrder::QubitZeroRight)
                    .with_gates([GateType::X, GateType::H])
                    .with_max_shots(1000),
                panic_on_sample: false,
            }
        }
    }

    impl Adapter for Echo {
        type Native = CircuitSpec;
        const BIT_ORDER: BitOrder = BitOrder::QubitZeroRight;

        fn name(&self) -> &str {
            "echo"
        }

        fn capabilities(&self) -> &Capabilities {
            &self.caps
        }

        fn translate(&self, spec: &CircuitSpec) -> HalResult<CircuitSpec> {
            self.ensure_fits(spec.num_qubits())?;
            if let Some(&gate) = self.caps.unsupported_gates(spec).first() {
                return Err(self.unsupported_gate(gate));
            }
            Ok(spec.clone())
        }

        fn width(&self, native: &CircuitSpec) -> usize {
            native.num_qubits()
        }

        fn sample(&self, native: &CircuitSpec, shots: u32) -> HalResult<NativeHistogram> {
            assert!(!self.panic_on_sample, "simulated engine crash");
            let mut bits = vec!['0'; native.num_qubits()];
            for op in native.gates() {
                if op.gate == GateType::X {
                    let q = op.qubits[0];
                    bits[native.num_qubits() - 1 - q] = '1';
                }
            }
            let mut counts = FxHashMap::default();
            counts.insert(bits.into_iter().collect::<String>(), u64::from(shots));
            Ok(NativeHistogram::Labels(counts))
        }

        fn info(&self, native: &CircuitSpec) -> CircuitInfo {
            let mut builder = CircuitInfo::builder("echo", native.num_qubits());
            for op in native.gates() {
                builder.instruction(op.gate.name(), &op.qubits);
            }
            builder.build()
        }
    }

    fn x0() -> CircuitSpec {
        CircuitSpec::from_ops(2, vec![GateOp::new(GateType::X, [0], [])], true).unwrap()
    }

    #[test]
    fn test_run_normalizes_bit_order() {
        let result = Echo::new().run(&x0(), 100);
        assert!(result.is_success());
        assert_eq!(result.counts().unwrap().get("10"), 100);
        assert_eq!(result.metadata.extra["bit_order"], "qubit_zero_right");
        assert!(result.execution_time().unwrap() >= 0.0);
    }

    #[test]
    fn test_unsupported_gate_becomes_error_result() {
        let spec = CircuitSpec::from_ops(1, vec![GateOp::new(GateType::T, [0], [])], true).unwrap();
        let result = Echo::new().run(&spec, 10);
        assert!(!result.is_success());
        assert_eq!(
            result.error(),
            Some("Engine 'echo' does not support gate 't'")
        );
    }

    #[test]
    fn test_too_large_and_bad_shots() {
        let wide = qbridge_ir::library::ghz(5).unwrap();
        let result = Echo::new().run(&wide, 10);
        assert!(result.error().unwrap().contains("at most 4 qubits"));

        assert!(!Echo::new().run(&x0(), 0).is_success());
        assert!(!Echo::new().run(&x0(), 1001).is_success());
    }

    #[test]
    fn test_panic_is_contained() {
        let mut echo = Echo::new();
        echo.panic_on_sample = true;
        let result = echo.run(&x0(), 10);
        let error = result.error().unwrap();
        assert!(error.contains("echo"));
        assert!(error.contains("simulated engine crash"));
    }

    #[test]
    fn test_interchange_defaults_to_not_supported() {
        let echo = Echo::new();
        assert!(matches!(
            Backend::export(&echo, &x0()),
            Err(HalError::NotSupported { .. })
        ));
        let result = echo.run_interchange("OPENQASM 2.0;", 10);
        assert!(result.error().unwrap().contains("OpenQASM import"));
    }

    #[test]
    fn test_inspect_and_probe() {
        let echo = Echo::new();
        let info = echo.inspect(&x0()).unwrap();
        assert_eq!(info.num_instructions, 1);
        assert!(Backend::probe(&echo).available);
    }

    #[test]
    fn test_config_only_lowers_limits() {
        let caps = Capabilities::new("e", 20, BitOrder::QubitZeroLeft);
        let lowered = EngineConfig::new().with_max_qubits(8).apply(caps.clone());
        assert_eq!(lowered.max_qubits, 8);
        let raised = EngineConfig::new().with_max_qubits(64).apply(caps);
        assert_eq!(raised.max_qubits, 20);
    }
}
