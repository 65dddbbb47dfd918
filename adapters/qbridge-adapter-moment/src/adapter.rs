//! Moment engine adapter.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, instrument};

use qbridge_hal::{Adapter, BitOrder, Capabilities, EngineConfig, HalError, HalResult, NativeHistogram};
use qbridge_ir::{CircuitInfo, CircuitSpec};

use crate::circuit::{self, MomentCircuit};
use crate::engine::State;

/// Engine id.
pub const ENGINE: &str = "moment";

/// Default qubit ceiling.
pub const MAX_QUBITS: usize = 20;

/// Moment-scheduled statevector engine.
///
/// Reports basis-state indices with qubit 0 as the most significant bit.
/// `cp` and `cswap` have no native instruction.
pub struct MomentAdapter {
    caps: Capabilities,
    seed: Option<u64>,
}

impl MomentAdapter {
    /// Create the engine with its built-in limits.
    pub fn new() -> Self {
        Self::from_config(&EngineConfig::default())
    }

    /// Create the engine from configuration.
    pub fn from_config(config: &EngineConfig) -> Self {
        let caps = Capabilities::new(ENGINE, MAX_QUBITS, BitOrder::QubitZeroLeft)
            .with_description("Moment-scheduled statevector, big-endian basis indices")
            .with_gates(circuit::supported_gates());
        Self {
            caps: config.apply(caps),
            seed: config.seed,
        }
    }
}

impl Default for MomentAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Adapter for MomentAdapter {
    type Native = MomentCircuit;
    const BIT_ORDER: BitOrder = BitOrder::QubitZeroLeft;

    fn name(&self) -> &str {
        ENGINE
    }

    fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    fn translate(&self, spec: &CircuitSpec) -> HalResult<MomentCircuit> {
        self.ensure_fits(spec.num_qubits())?;
        let circuit = circuit::build(spec).map_err(|gate| self.unsupported_gate(gate))?;
        debug!(moments = circuit.depth(), "scheduled circuit");
        Ok(circuit)
    }

    fn width(&self, native: &MomentCircuit) -> usize {
        native.num_qubits()
    }

    #[instrument(skip(self, native), fields(num_qubits = native.num_qubits()))]
    fn sample(&self, native: &MomentCircuit, shots: u32) -> HalResult<NativeHistogram> {
        let state = State::evolve(native);
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(NativeHistogram::Indices {
            counts: state.sample(shots, &mut rng),
            width: native.num_qubits(),
        })
    }

    fn info(&self, native: &MomentCircuit) -> CircuitInfo {
        let mut builder = CircuitInfo::builder(ENGINE, native.num_qubits());
        for inst in native.instructions() {
            builder.instruction(inst.gate.name(), &inst.qubits);
        }
        if native.is_measured() {
            builder.measure_all();
        }
        let mut info = builder.build();
        info.depth = native.depth();
        info
    }

    fn to_interchange(&self, native: &MomentCircuit) -> HalResult<String> {
        Ok(qbridge_qasm::emit(&native.to_spec()?))
    }

    fn from_interchange(&self, source: &str) -> HalResult<MomentCircuit> {
        let spec = qbridge_qasm::parse(source).map_err(|e| HalError::Interchange {
            engine: ENGINE.to_string(),
            message: e.to_string(),
        })?;
        self.translate(&spec)
    }
}
