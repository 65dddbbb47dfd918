//! Exact-distribution engine adapter.

use rand::SeedableRng;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rustc_hash::FxHashMap;
use tracing::{debug, instrument};

use qbridge_hal::{
    Adapter, BitOrder, Capabilities, EngineConfig, HalError, HalResult, Interchange, NativeHistogram,
};
use qbridge_ir::{CircuitInfo, CircuitSpec};

use crate::circuit::{self, ExactCircuit};
use crate::unitary;

/// Engine id.
pub const ENGINE: &str = "exact";

/// Default qubit ceiling.
pub const MAX_QUBITS: usize = 20;

/// Shot-free engine: computes the full output distribution, then synthesizes
/// the requested number of samples from it.
///
/// Outcomes are basis indices with qubit 0 as the least significant bit. The
/// engine has no OpenQASM support.
pub struct ExactAdapter {
    caps: Capabilities,
    seed: Option<u64>,
}

impl ExactAdapter {
    /// Create the engine with its built-in limits and an entropy-seeded sampler.
    pub fn new() -> Self {
        Self::from_config(&EngineConfig::default())
    }

    /// Create the engine from configuration.
    pub fn from_config(config: &EngineConfig) -> Self {
        let caps = Capabilities::new(ENGINE, MAX_QUBITS, BitOrder::QubitZeroRight)
            .with_description("Exact output distribution via dense unitaries, synthesized shots")
            .with_gates(unitary::supported_gates())
            .with_interchange(Interchange::NONE)
            .exact();
        Self {
            caps: config.apply(caps),
            seed: config.seed,
        }
    }
}

impl Default for ExactAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Adapter for ExactAdapter {
    type Native = ExactCircuit;
    const BIT_ORDER: BitOrder = BitOrder::QubitZeroRight;

    fn name(&self) -> &str {
        ENGINE
    }

    fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    fn translate(&self, spec: &CircuitSpec) -> HalResult<ExactCircuit> {
        self.ensure_fits(spec.num_qubits())?;
        circuit::build(spec).map_err(|gate| self.unsupported_gate(gate))
    }

    fn width(&self, native: &ExactCircuit) -> usize {
        native.num_qubits()
    }

    #[instrument(skip(self, native), fields(num_qubits = native.num_qubits()))]
    fn sample(&self, native: &ExactCircuit, shots: u32) -> HalResult<NativeHistogram> {
        let distribution = native.distribution();
        let support = distribution.iter().filter(|&&p| p > 0.0).count();
        debug!(support, "distribution computed");

        let weights = WeightedIndex::new(&distribution).map_err(|e| HalError::Execution {
            engine: ENGINE.to_string(),
            message: format!("invalid output distribution: {e}"),
        })?;
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut counts: FxHashMap<usize, u64> = FxHashMap::default();
        for _ in 0..shots {
            *counts.entry(weights.sample(&mut rng)).or_insert(0) += 1;
        }
        Ok(NativeHistogram::Indices {
            counts,
            width: native.num_qubits(),
        })
    }

    fn info(&self, native: &ExactCircuit) -> CircuitInfo {
        let mut builder = CircuitInfo::builder(ENGINE, native.num_qubits());
        for op in native.ops() {
            builder.instruction(op.gate.name(), &op.qubits);
        }
        if native.is_measured() {
            builder.measure_all();
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qbridge_hal::Backend;
    use qbridge_ir::{GateOp, GateType, library};

    #[test]
    fn test_capabilities() {
        let engine = ExactAdapter::new();
        let caps = Backend::capabilities(&engine);
        assert!(!caps.shot_based);
        assert_eq!(caps.interchange, Interchange::NONE);
        assert_eq!(caps.gate_set.len(), GateType::ALL.len());
    }

    #[test]
    fn test_x_on_qubit_zero() {
        let spec = CircuitSpec::from_ops(2, vec![GateOp::new(GateType::X, [0], [])], true).unwrap();
        let result = ExactAdapter::new().run(&spec, 100);
        assert_eq!(result.counts().unwrap().get("10"), 100);
        assert_eq!(result.metadata.extra["shot_based"], false);
    }

    #[test]
    fn test_from_config_limits_and_seed() {
        let config = EngineConfig::new().with_seed(7).with_max_qubits(2);
        let engine = ExactAdapter::from_config(&config);
        assert_eq!(Backend::capabilities(&engine).max_qubits, 2);

        let bell = library::bell().unwrap();
        let first = engine.run(&bell, 500);
        let second = ExactAdapter::from_config(&config).run(&bell, 500);
        assert_eq!(first.counts(), second.counts());

        let wide = engine.run(&library::ghz(3).unwrap(), 10);
        assert!(wide.error().unwrap().contains("at most 2 qubits"));
    }

    #[test]
    fn test_interchange_not_supported() {
        let engine = ExactAdapter::new();
        let err = engine.export(&library::bell().unwrap()).unwrap_err();
        assert!(matches!(err, HalError::NotSupported { .. }));
        let result = engine.run_interchange("OPENQASM 2.0;", 10);
        assert!(result.error().unwrap().contains("exact"));
    }
}
