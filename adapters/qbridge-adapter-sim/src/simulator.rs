//! Statevector engine adapter.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, instrument};

use qbridge_hal::{Adapter, BitOrder, Capabilities, EngineConfig, HalError, HalResult, NativeHistogram};
use qbridge_ir::{CircuitInfo, CircuitSpec};

use crate::circuit::{self, SimCircuit};
use crate::statevector::Statevector;

/// Engine id.
pub const ENGINE: &str = "sim";

/// Widest circuit the dense statevector accepts (16 bytes per amplitude).
pub const MAX_QUBITS: usize = 24;

/// Dense statevector engine.
///
/// Every gate of the canonical set is native. Outcome labels are written with
/// qubit 0 as the rightmost character.
pub struct SimAdapter {
    caps: Capabilities,
    seed: Option<u64>,
}

impl SimAdapter {
    /// Create the engine with its built-in limits and an entropy-seeded RNG.
    pub fn new() -> Self {
        Self::from_config(&EngineConfig::default())
    }

    /// Create the engine from configuration.
    pub fn from_config(config: &EngineConfig) -> Self {
        let caps = Capabilities::new(ENGINE, MAX_QUBITS, BitOrder::QubitZeroRight)
            .with_description("Dense statevector simulator, little-endian outcome labels")
            .with_gates(circuit::supported_gates());
        Self {
            caps: config.apply(caps),
            seed: config.seed,
        }
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    fn interchange_error(&self, message: impl ToString) -> HalError {
        HalError::Interchange {
            engine: ENGINE.to_string(),
            message: message.to_string(),
        }
    }
}

impl Default for SimAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Adapter for SimAdapter {
    type Native = SimCircuit;
    const BIT_ORDER: BitOrder = BitOrder::QubitZeroRight;

    fn name(&self) -> &str {
        ENGINE
    }

    fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    fn translate(&self, spec: &CircuitSpec) -> HalResult<SimCircuit> {
        self.ensure_fits(spec.num_qubits())?;
        circuit::build(spec).map_err(|gate| self.unsupported_gate(gate))
    }

    fn width(&self, native: &SimCircuit) -> usize {
        native.num_qubits()
    }

    #[instrument(skip(self, native), fields(num_qubits = native.num_qubits()))]
    fn sample(&self, native: &SimCircuit, shots: u32) -> HalResult<NativeHistogram> {
        let sv = Statevector::simulate(native);
        debug!("Applied {} instructions", native.ops().len());

        let mut rng = self.rng();
        let counts = sv
            .sample(shots, &mut rng)
            .into_iter()
            .map(|(outcome, n)| (sv.outcome_to_bitstring(outcome), n))
            .collect();
        Ok(NativeHistogram::Labels(counts))
    }

    fn info(&self, native: &SimCircuit) -> CircuitInfo {
        let mut builder = CircuitInfo::builder(ENGINE, native.num_qubits());
        for op in native.ops() {
            builder.instruction(op.name(), &op.qubits());
        }
        builder.build()
    }

    fn to_interchange(&self, native: &SimCircuit) -> HalResult<String> {
        let spec = native.to_spec()?;
        Ok(qbridge_qasm::emit(&spec))
    }

    fn from_interchange(&self, source: &str) -> HalResult<SimCircuit> {
        let spec = qbridge_qasm::parse(source).map_err(|e| self.interchange_error(e))?;
        self.translate(&spec)
    }
}
