//! Stabilizer engine adapter.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rustc_hash::FxHashMap;
use tracing::{debug, instrument};

use qbridge_hal::{Adapter, BitOrder, Capabilities, EngineConfig, HalError, HalResult, NativeHistogram};
use qbridge_ir::{CircuitInfo, CircuitSpec};

use crate::circuit::{self, StabilizerCircuit};
use crate::tableau::Tableau;

/// Engine id.
pub const ENGINE: &str = "stabilizer";

/// Default qubit ceiling.
pub const MAX_QUBITS: usize = 512;

/// Clifford-only tableau engine.
///
/// Labels are written in qubit order, qubit 0 first.
pub struct StabilizerAdapter {
    caps: Capabilities,
    seed: Option<u64>,
}

impl StabilizerAdapter {
    /// Create the engine with its built-in limits and an entropy-seeded RNG.
    pub fn new() -> Self {
        Self::from_config(&EngineConfig::default())
    }

    /// Create the engine from configuration.
    pub fn from_config(config: &EngineConfig) -> Self {
        let caps = Capabilities::new(ENGINE, MAX_QUBITS, BitOrder::QubitZeroLeft)
            .with_description("Aaronson-Gottesman stabilizer tableau, Clifford gates only")
            .with_gates(circuit::supported_gates());
        Self {
            caps: config.apply(caps),
            seed: config.seed,
        }
    }
}

impl Default for StabilizerAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Adapter for StabilizerAdapter {
    type Native = StabilizerCircuit;
    const BIT_ORDER: BitOrder = BitOrder::QubitZeroLeft;

    fn name(&self) -> &str {
        ENGINE
    }

    fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    fn translate(&self, spec: &CircuitSpec) -> HalResult<StabilizerCircuit> {
        self.ensure_fits(spec.num_qubits())?;
        circuit::build(spec).map_err(|gate| self.unsupported_gate(gate))
    }

    fn width(&self, native: &StabilizerCircuit) -> usize {
        native.num_qubits()
    }

    /// The tableau is evolved once; each shot measures a copy.
    #[instrument(skip(self, native), fields(num_qubits = native.num_qubits()))]
    fn sample(&self, native: &StabilizerCircuit, shots: u32) -> HalResult<NativeHistogram> {
        let mut prepared = Tableau::new(native.num_qubits());
        for op in native.gates() {
            prepared.apply(op);
        }
        let readout = native.readout();
        debug!(readout = readout.len(), "tableau prepared");

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut counts: FxHashMap<String, u64> = FxHashMap::default();
        for _ in 0..shots {
            let mut tableau = prepared.clone();
            let label: String = readout
                .iter()
                .map(|&q| if tableau.measure(q, &mut rng) { '1' } else { '0' })
                .collect();
            *counts.entry(label).or_insert(0) += 1;
        }
        Ok(NativeHistogram::Labels(counts))
    }

    fn info(&self, native: &StabilizerCircuit) -> CircuitInfo {
        let mut builder = CircuitInfo::builder(ENGINE, native.num_qubits());
        for &op in native.ops() {
            builder.instruction(op.name(), &op.qubits());
        }
        builder.build()
    }

    fn to_interchange(&self, native: &StabilizerCircuit) -> HalResult<String> {
        Ok(qbridge_qasm::emit(&native.to_spec()?))
    }

    fn from_interchange(&self, source: &str) -> HalResult<StabilizerCircuit> {
        let spec = qbridge_qasm::parse(source).map_err(|e| HalError::Interchange {
            engine: ENGINE.to_string(),
            message: e.to_string(),
        })?;
        self.translate(&spec)
    }
}
