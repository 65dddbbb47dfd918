//! Clifford instruction stream.

use std::sync::LazyLock;

use qbridge_ir::{CircuitSpec, GateOp, GateType};
use rustc_hash::FxHashMap;

/// One tableau instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliffordOp {
    H(usize),
    X(usize),
    Y(usize),
    Z(usize),
    S(usize),
    Sdg(usize),
    Cx(usize, usize),
    Cy(usize, usize),
    Cz(usize, usize),
    Swap(usize, usize),
    Measure(usize),
}

impl CliffordOp {
    /// Instruction name.
    pub fn name(self) -> &'static str {
        match self.gate() {
            Some(gate) => gate.name(),
            None => qbridge_ir::MEASURE,
        }
    }

    /// Canonical gate, or `None` for a measurement.
    pub fn gate(self) -> Option<GateType> {
        Some(match self {
            CliffordOp::H(_) => GateType::H,
            CliffordOp::X(_) => GateType::X,
            CliffordOp::Y(_) => GateType::Y,
            CliffordOp::Z(_) => GateType::Z,
            CliffordOp::S(_) => GateType::S,
            CliffordOp::Sdg(_) => GateType::Sdg,
            CliffordOp::Cx(..) => GateType::Cx,
            CliffordOp::Cy(..) => GateType::Cy,
            CliffordOp::Cz(..) => GateType::Cz,
            CliffordOp::Swap(..) => GateType::Swap,
            CliffordOp::Measure(_) => return None,
        })
    }

    /// Operand qubits.
    pub fn qubits(self) -> Vec<usize> {
        match self {
            CliffordOp::H(q)
            | CliffordOp::X(q)
            | CliffordOp::Y(q)
            | CliffordOp::Z(q)
            | CliffordOp::S(q)
            | CliffordOp::Sdg(q)
            | CliffordOp::Measure(q) => vec![q],
            CliffordOp::Cx(a, b) | CliffordOp::Cy(a, b) | CliffordOp::Cz(a, b) | CliffordOp::Swap(a, b) => {
                vec![a, b]
            }
        }
    }
}

/// A Clifford circuit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StabilizerCircuit {
    num_qubits: usize,
    ops: Vec<CliffordOp>,
}

impl StabilizerCircuit {
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn ops(&self) -> &[CliffordOp] {
        &self.ops
    }

    /// Unitary part, in order.
    pub fn gates(&self) -> impl Iterator<Item = &CliffordOp> {
        self.ops.iter().filter(|op| op.gate().is_some())
    }

    /// Qubits read out at the end, in qubit order. Every qubit when the
    /// circuit carries no explicit measurement.
    pub fn readout(&self) -> Vec<usize> {
        let measured: Vec<usize> = self
            .ops
            .iter()
            .filter_map(|op| match op {
                CliffordOp::Measure(q) => Some(*q),
                _ => None,
            })
            .collect();
        if measured.is_empty() {
            (0..self.num_qubits).collect()
        } else {
            measured
        }
    }

    pub fn is_measured(&self) -> bool {
        self.ops.iter().any(|op| matches!(op, CliffordOp::Measure(_)))
    }

    /// Convert back to the engine-neutral form.
    pub fn to_spec(&self) -> qbridge_ir::IrResult<CircuitSpec> {
        let ops = self
            .gates()
            .filter_map(|op| op.gate().map(|gate| GateOp::new(gate, op.qubits(), [])))
            .collect();
        CircuitSpec::from_ops(self.num_qubits, ops, self.is_measured())
    }
}

type Translator = fn(&[usize]) -> CliffordOp;

static DISPATCH: LazyLock<FxHashMap<GateType, Translator>> = LazyLock::new(|| {
    let mut table: FxHashMap<GateType, Translator> = FxHashMap::default();
    table.insert(GateType::H, |q| CliffordOp::H(q[0]));
    table.insert(GateType::X, |q| CliffordOp::X(q[0]));
    table.insert(GateType::Y, |q| CliffordOp::Y(q[0]));
    table.insert(GateType::Z, |q| CliffordOp::Z(q[0]));
    table.insert(GateType::S, |q| CliffordOp::S(q[0]));
    table.insert(GateType::Sdg, |q| CliffordOp::Sdg(q[0]));
    table.insert(GateType::Cx, |q| CliffordOp::Cx(q[0], q[1]));
    table.insert(GateType::Cy, |q| CliffordOp::Cy(q[0], q[1]));
    table.insert(GateType::Cz, |q| CliffordOp::Cz(q[0], q[1]));
    table.insert(GateType::Swap, |q| CliffordOp::Swap(q[0], q[1]));
    table
});

/// Gates the engine can translate.
pub fn supported_gates() -> impl Iterator<Item = GateType> {
    DISPATCH.keys().copied()
}

/// Build the Clifford stream. On a dispatch miss, returns the missing gate.
pub fn build(spec: &CircuitSpec) -> Result<StabilizerCircuit, GateType> {
    let mut ops = spec
        .gates()
        .iter()
        .map(|op| DISPATCH.get(&op.gate).map(|f| f(&op.qubits)).ok_or(op.gate))
        .collect::<Result<Vec<_>, _>>()?;
    if spec.measure() {
        ops.extend((0..spec.num_qubits()).map(CliffordOp::Measure));
    }
    Ok(StabilizerCircuit {
        num_qubits: spec.num_qubits(),
        ops,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_is_exactly_clifford() {
        for gate in GateType::ALL {
            assert_eq!(
                supported_gates().any(|g| g == gate),
                gate.is_clifford(),
                "{gate}"
            );
        }
    }

    #[test]
    fn test_t_gate_misses() {
        let spec = CircuitSpec::from_ops(1, vec![GateOp::new(GateType::T, [0], [])], true).unwrap();
        assert_eq!(build(&spec), Err(GateType::T));
    }

    #[test]
    fn test_readout_defaults_to_every_qubit() {
        let spec = qbridge_ir::library::ghz(3).unwrap().with_measure(false);
        let circuit = build(&spec).unwrap();
        assert!(!circuit.is_measured());
        assert_eq!(circuit.readout(), vec![0, 1, 2]);
        assert_eq!(circuit.to_spec().unwrap(), spec);
    }
}
