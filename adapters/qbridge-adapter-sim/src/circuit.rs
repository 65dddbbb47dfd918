//! Native circuit of the statevector engine.

use std::f64::consts::PI;
use std::sync::LazyLock;

use qbridge_ir::{CircuitSpec, GateOp, GateType};
use rustc_hash::FxHashMap;

/// One engine instruction. Qubit indices address bit `q` of the basis index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimOp {
    H(usize),
    X(usize),
    Y(usize),
    Z(usize),
    Phase { qubit: usize, theta: f64, label: PhaseLabel },
    Rx(usize, f64),
    Ry(usize, f64),
    Rz(usize, f64),
    Cx(usize, usize),
    Cy(usize, usize),
    Cz(usize, usize),
    Swap(usize, usize),
    Cp(usize, usize, f64),
    Ccx(usize, usize, usize),
    Cswap(usize, usize, usize),
    Measure(usize),
}

/// Which named gate a diagonal phase instruction came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseLabel {
    S,
    Sdg,
    T,
    Tdg,
    P,
}

impl SimOp {
    /// Instruction name as the engine reports it.
    pub fn name(&self) -> &'static str {
        match self {
            SimOp::H(_) => "h",
            SimOp::X(_) => "x",
            SimOp::Y(_) => "y",
            SimOp::Z(_) => "z",
            SimOp::Phase { label, .. } => match label {
                PhaseLabel::S => "s",
                PhaseLabel::Sdg => "sdg",
                PhaseLabel::T => "t",
                PhaseLabel::Tdg => "tdg",
                PhaseLabel::P => "p",
            },
            SimOp::Rx(..) => "rx",
            SimOp::Ry(..) => "ry",
            SimOp::Rz(..) => "rz",
            SimOp::Cx(..) => "cx",
            SimOp::Cy(..) => "cy",
            SimOp::Cz(..) => "cz",
            SimOp::Swap(..) => "swap",
            SimOp::Cp(..) => "cp",
            SimOp::Ccx(..) => "ccx",
            SimOp::Cswap(..) => "cswap",
            SimOp::Measure(_) => "measure",
        }
    }

    /// Operand qubits in gate order.
    pub fn qubits(&self) -> Vec<usize> {
        match *self {
            SimOp::H(q)
            | SimOp::X(q)
            | SimOp::Y(q)
            | SimOp::Z(q)
            | SimOp::Phase { qubit: q, .. }
            | SimOp::Rx(q, _)
            | SimOp::Ry(q, _)
            | SimOp::Rz(q, _)
            | SimOp::Measure(q) => vec![q],
            SimOp::Cx(a, b)
            | SimOp::Cy(a, b)
            | SimOp::Cz(a, b)
            | SimOp::Swap(a, b)
            | SimOp::Cp(a, b, _) => vec![a, b],
            SimOp::Ccx(a, b, c) | SimOp::Cswap(a, b, c) => vec![a, b, c],
        }
    }

    /// Canonical gate application, or `None` for a measurement.
    pub fn to_gate_op(&self) -> Option<GateOp> {
        let (gate, params) = match *self {
            SimOp::H(_) => (GateType::H, vec![]),
            SimOp::X(_) => (GateType::X, vec![]),
            SimOp::Y(_) => (GateType::Y, vec![]),
            SimOp::Z(_) => (GateType::Z, vec![]),
            SimOp::Phase { theta, label, .. } => match label {
                PhaseLabel::S => (GateType::S, vec![]),
                PhaseLabel::Sdg => (GateType::Sdg, vec![]),
                PhaseLabel::T => (GateType::T, vec![]),
                PhaseLabel::Tdg => (GateType::Tdg, vec![]),
                PhaseLabel::P => (GateType::P, vec![theta]),
            },
            SimOp::Rx(_, t) => (GateType::Rx, vec![t]),
            SimOp::Ry(_, t) => (GateType::Ry, vec![t]),
            SimOp::Rz(_, t) => (GateType::Rz, vec![t]),
            SimOp::Cx(..) => (GateType::Cx, vec![]),
            SimOp::Cy(..) => (GateType::Cy, vec![]),
            SimOp::Cz(..) => (GateType::Cz, vec![]),
            SimOp::Swap(..) => (GateType::Swap, vec![]),
            SimOp::Cp(_, _, t) => (GateType::Cp, vec![t]),
            SimOp::Ccx(..) => (GateType::Ccx, vec![]),
            SimOp::Cswap(..) => (GateType::Cswap, vec![]),
            SimOp::Measure(_) => return None,
        };
        Some(GateOp::new(gate, self.qubits(), params))
    }
}

/// A circuit as the statevector engine executes it.
#[derive(Debug, Clone, PartialEq)]
pub struct SimCircuit {
    num_qubits: usize,
    ops: Vec<SimOp>,
}

impl SimCircuit {
    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Instructions in execution order, measurements last.
    pub fn ops(&self) -> &[SimOp] {
        &self.ops
    }

    /// Whether the circuit ends in a measurement.
    pub fn is_measured(&self) -> bool {
        self.ops.iter().any(|op| matches!(op, SimOp::Measure(_)))
    }

    /// Convert back to the engine-neutral form.
    pub fn to_spec(&self) -> qbridge_ir::IrResult<CircuitSpec> {
        let ops = self.ops.iter().filter_map(SimOp::to_gate_op).collect();
        CircuitSpec::from_ops(self.num_qubits, ops, self.is_measured())
    }
}

type Translator = fn(&GateOp) -> SimOp;

static DISPATCH: LazyLock<FxHashMap<GateType, Translator>> = LazyLock::new(|| {
    let mut table: FxHashMap<GateType, Translator> = FxHashMap::default();
    table.insert(GateType::H, |op| SimOp::H(op.qubits[0]));
    table.insert(GateType::X, |op| SimOp::X(op.qubits[0]));
    table.insert(GateType::Y, |op| SimOp::Y(op.qubits[0]));
    table.insert(GateType::Z, |op| SimOp::Z(op.qubits[0]));
    table.insert(GateType::S, |op| SimOp::Phase {
        qubit: op.qubits[0],
        theta: PI / 2.0,
        label: PhaseLabel::S,
    });
    table.insert(GateType::Sdg, |op| SimOp::Phase {
        qubit: op.qubits[0],
        theta: -PI / 2.0,
        label: PhaseLabel::Sdg,
    });
    table.insert(GateType::T, |op| SimOp::Phase {
        qubit: op.qubits[0],
        theta: PI / 4.0,
        label: PhaseLabel::T,
    });
    table.insert(GateType::Tdg, |op| SimOp::Phase {
        qubit: op.qubits[0],
        theta: -PI / 4.0,
        label: PhaseLabel::Tdg,
    });
    table.insert(GateType::P, |op| SimOp::Phase {
        qubit: op.qubits[0],
        theta: op.param(),
        label: PhaseLabel::P,
    });
    table.insert(GateType::Rx, |op| SimOp::Rx(op.qubits[0], op.param()));
    table.insert(GateType::Ry, |op| SimOp::Ry(op.qubits[0], op.param()));
    table.insert(GateType::Rz, |op| SimOp::Rz(op.qubits[0], op.param()));
    table.insert(GateType::Cx, |op| SimOp::Cx(op.qubits[0], op.qubits[1]));
    table.insert(GateType::Cy, |op| SimOp::Cy(op.qubits[0], op.qubits[1]));
    table.insert(GateType::Cz, |op| SimOp::Cz(op.qubits[0], op.qubits[1]));
    table.insert(GateType::Swap, |op| SimOp::Swap(op.qubits[0], op.qubits[1]));
    table.insert(GateType::Cp, |op| {
        SimOp::Cp(op.qubits[0], op.qubits[1], op.param())
    });
    table.insert(GateType::Ccx, |op| {
        SimOp::Ccx(op.qubits[0], op.qubits[1], op.qubits[2])
    });
    table.insert(GateType::Cswap, |op| {
        SimOp::Cswap(op.qubits[0], op.qubits[1], op.qubits[2])
    });
    table
});

/// Gates the engine can translate.
pub fn supported_gates() -> impl Iterator<Item = GateType> {
    DISPATCH.keys().copied()
}

/// Build the native circuit. On a dispatch miss, returns the missing gate.
pub fn build(spec: &CircuitSpec) -> Result<SimCircuit, GateType> {
    let mut ops = Vec::with_capacity(spec.num_gates() + spec.num_qubits());
    for op in spec.gates() {
        let translate = DISPATCH.get(&op.gate).ok_or(op.gate)?;
        ops.push(translate(op));
    }
    if spec.measure() {
        ops.extend((0..spec.num_qubits()).map(SimOp::Measure));
    }
    Ok(SimCircuit {
        num_qubits: spec.num_qubits(),
        ops,
    })
}
