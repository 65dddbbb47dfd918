//! Engine capability introspection.
//!
//! [`Capabilities`] describe what an engine can do: its qubit and shot limits,
//! the canonical gates it can translate, how it reports outcomes and whether it
//! speaks the OpenQASM interchange. They are fixed at construction time.

use std::collections::BTreeSet;

use qbridge_ir::{CircuitSpec, GateType};
use serde::{Deserialize, Serialize};

use crate::normalize::BitOrder;

/// Default per-run shot ceiling.
pub const DEFAULT_MAX_SHOTS: u32 = 1_000_000;

/// Capabilities of one engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Engine id.
    pub name: String,
    /// One-line human description.
    pub description: String,
    /// Largest circuit the engine accepts.
    pub max_qubits: usize,
    /// Largest shot count per run.
    pub max_shots: u32,
    /// Canonical gates the engine can translate.
    pub gate_set: BTreeSet<GateType>,
    /// Whether counts come from repeated sampling (`true`) or are synthesized
    /// from an exact distribution (`false`).
    pub shot_based: bool,
    /// Native outcome convention.
    pub bit_order: BitOrder,
    /// OpenQASM import/export support.
    pub interchange: Interchange,
}

/// Which interchange directions an engine supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Interchange {
    /// Can build a native circuit from OpenQASM.
    pub import: bool,
    /// Can write a native circuit as OpenQASM.
    pub export: bool,
}

impl Interchange {
    /// Both directions.
    pub const BOTH: Interchange = Interchange {
        import: true,
        export: true,
    };

    /// Neither direction.
    pub const NONE: Interchange = Interchange {
        import: false,
        export: false,
    };
}

impl Capabilities {
    /// Capabilities with every canonical gate and default limits.
    pub fn new(name: impl Into<String>, max_qubits: usize, bit_order: BitOrder) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            max_qubits,
            max_shots: DEFAULT_MAX_SHOTS,
            gate_set: GateType::ALL.into_iter().collect(),
            shot_based: true,
            bit_order,
            interchange: Interchange::BOTH,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Restrict the gate set.
    #[must_use]
    pub fn with_gates(mut self, gates: impl IntoIterator<Item = GateType>) -> Self {
        self.gate_set = gates.into_iter().collect();
        self
    }

    /// Set the shot ceiling.
    #[must_use]
    pub fn with_max_shots(mut self, max_shots: u32) -> Self {
        self.max_shots = max_shots;
        self
    }

    /// Mark the engine as synthesizing shots from an exact distribution.
    #[must_use]
    pub fn exact(mut self) -> Self {
        self.shot_based = false;
        self
    }

    /// Set interchange support.
    #[must_use]
    pub fn with_interchange(mut self, interchange: Interchange) -> Self {
        self.interchange = interchange;
        self
    }

    /// Whether the engine can translate `gate`.
    pub fn supports(&self, gate: GateType) -> bool {
        self.gate_set.contains(&gate)
    }

    /// Gates of `spec` this engine cannot translate, in canonical order.
    pub fn unsupported_gates(&self, spec: &CircuitSpec) -> Vec<GateType> {
        spec.gate_types()
            .into_iter()
            .filter(|g| !self.supports(*g))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qbridge_ir::{GateOp, library};

    #[test]
    fn test_default_is_universal() {
        let caps = Capabilities::new("sim", 24, BitOrder::QubitZeroRight);
        assert_eq!(caps.gate_set.len(), GateType::ALL.len());
        assert!(caps.shot_based);
        assert!(caps.interchange.import && caps.interchange.export);
    }

    #[test]
    fn test_unsupported_gates() {
        let caps = Capabilities::new("stab", 64, BitOrder::QubitZeroLeft)
            .with_gates(GateType::ALL.into_iter().filter(|g| g.is_clifford()));
        assert!(caps.unsupported_gates(&library::ghz(3).unwrap()).is_empty());

        let spec = CircuitSpec::from_ops(
            2,
            vec![
                GateOp::new(GateType::T, [0], []),
                GateOp::new(GateType::H, [1], []),
            ],
            true,
        )
        .unwrap();
        assert_eq!(caps.unsupported_gates(&spec), vec![GateType::T]);
    }

    #[test]
    fn test_serializes_gate_names() {
        let caps = Capabilities::new("m", 2, BitOrder::QubitZeroLeft)
            .with_gates([GateType::H, GateType::Cx])
            .with_interchange(Interchange::NONE);
        let value = serde_json::to_value(&caps).unwrap();
        assert_eq!(value["gate_set"], serde_json::json!(["h", "cx"]));
        assert_eq!(value["bit_order"], "qubit_zero_left");
        assert_eq!(value["interchange"]["import"], false);
    }
}
