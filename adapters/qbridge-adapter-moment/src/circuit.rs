//! Moment-scheduled native circuits.
//!
//! Instructions are grouped into moments: each one lands in the earliest
//! moment after every moment that already touches one of its qubits. The
//! final all-qubit measurement occupies a moment of its own.

use std::f64::consts::{FRAC_1_SQRT_2, PI};
use std::sync::LazyLock;

use num_complex::Complex64;
use qbridge_ir::{CircuitSpec, GateOp, GateType};
use rustc_hash::FxHashMap;

/// Row-major 2x2 unitary.
pub type Matrix2 = [[Complex64; 2]; 2];

/// What the engine does for one instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Kernel {
    /// Apply `matrix` to `target` when every qubit in `controls` is 1.
    Controlled {
        matrix: Matrix2,
        controls: Vec<usize>,
        target: usize,
    },
    /// Exchange two qubits.
    Swap(usize, usize),
}

/// One scheduled instruction.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub gate: GateType,
    pub qubits: Vec<usize>,
    pub params: Vec<f64>,
    pub kernel: Kernel,
}

impl Instruction {
    fn to_gate_op(&self) -> GateOp {
        GateOp::new(self.gate, self.qubits.clone(), self.params.clone())
    }
}

/// A circuit as the moment engine executes it.
#[derive(Debug, Clone, PartialEq)]
pub struct MomentCircuit {
    num_qubits: usize,
    moments: Vec<Vec<Instruction>>,
    measured: bool,
}

impl MomentCircuit {
    fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            moments: Vec::new(),
            measured: false,
        }
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Scheduled moments, excluding the measurement moment.
    pub fn moments(&self) -> &[Vec<Instruction>] {
        &self.moments
    }

    /// Whether the circuit ends in an all-qubit measurement.
    pub fn is_measured(&self) -> bool {
        self.measured
    }

    /// Number of moments including the measurement moment.
    pub fn depth(&self) -> usize {
        self.moments.len() + usize::from(self.measured)
    }

    /// Instructions in moment order.
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.moments.iter().flatten()
    }

    /// Place `inst` in the earliest moment where none of its qubits is busy.
    fn append(&mut self, inst: Instruction) {
        let earliest = self
            .moments
            .iter()
            .rposition(|moment| {
                moment
                    .iter()
                    .any(|other| other.qubits.iter().any(|q| inst.qubits.contains(q)))
            })
            .map_or(0, |i| i + 1);
        if earliest == self.moments.len() {
            self.moments.push(Vec::new());
        }
        self.moments[earliest].push(inst);
    }

    /// Convert back to the engine-neutral form.
    ///
    /// Instructions within a moment act on disjoint qubits, so moment order is
    /// a valid execution order.
    pub fn to_spec(&self) -> qbridge_ir::IrResult<CircuitSpec> {
        let ops = self.instructions().map(Instruction::to_gate_op).collect();
        CircuitSpec::from_ops(self.num_qubits, ops, self.measured)
    }
}

// =============================================================================
// Gate matrices
// =============================================================================

fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

fn diag(phase: f64) -> Matrix2 {
    [[c(1.0, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), Complex64::from_polar(1.0, phase)]]
}

const fn pauli_x() -> Matrix2 {
    let zero = Complex64::new(0.0, 0.0);
    let one = Complex64::new(1.0, 0.0);
    [[zero, one], [one, zero]]
}

const fn pauli_y() -> Matrix2 {
    let zero = Complex64::new(0.0, 0.0);
    [[zero, Complex64::new(0.0, -1.0)], [Complex64::new(0.0, 1.0), zero]]
}

fn hadamard() -> Matrix2 {
    let h = c(FRAC_1_SQRT_2, 0.0);
    [[h, h], [h, -h]]
}

fn rx(theta: f64) -> Matrix2 {
    let (s, co) = (theta / 2.0).sin_cos();
    [[c(co, 0.0), c(0.0, -s)], [c(0.0, -s), c(co, 0.0)]]
}

fn ry(theta: f64) -> Matrix2 {
    let (s, co) = (theta / 2.0).sin_cos();
    [[c(co, 0.0), c(-s, 0.0)], [c(s, 0.0), c(co, 0.0)]]
}

fn rz(theta: f64) -> Matrix2 {
    [
        [Complex64::from_polar(1.0, -theta / 2.0), c(0.0, 0.0)],
        [c(0.0, 0.0), Complex64::from_polar(1.0, theta / 2.0)],
    ]
}

fn single(op: &GateOp, matrix: Matrix2) -> Instruction {
    Instruction {
        gate: op.gate,
        qubits: op.qubits.clone(),
        params: op.params.clone(),
        kernel: Kernel::Controlled {
            matrix,
            controls: Vec::new(),
            target: op.qubits[0],
        },
    }
}

/// Last operand is the target, the rest are controls.
fn controlled(op: &GateOp, matrix: Matrix2) -> Instruction {
    let (target, controls) = op
        .qubits
        .split_last()
        .map_or((0, &[][..]), |(t, rest)| (*t, rest));
    Instruction {
        gate: op.gate,
        qubits: op.qubits.clone(),
        params: op.params.clone(),
        kernel: Kernel::Controlled {
            matrix,
            controls: controls.to_vec(),
            target,
        },
    }
}

type Translator = fn(&GateOp) -> Instruction;

static DISPATCH: LazyLock<FxHashMap<GateType, Translator>> = LazyLock::new(|| {
    let mut table: FxHashMap<GateType, Translator> = FxHashMap::default();
    table.insert(GateType::H, |op| single(op, hadamard()));
    table.insert(GateType::X, |op| single(op, pauli_x()));
    table.insert(GateType::Y, |op| single(op, pauli_y()));
    table.insert(GateType::Z, |op| single(op, diag(PI)));
    table.insert(GateType::S, |op| single(op, diag(PI / 2.0)));
    table.insert(GateType::Sdg, |op| single(op, diag(-PI / 2.0)));
    table.insert(GateType::T, |op| single(op, diag(PI / 4.0)));
    table.insert(GateType::Tdg, |op| single(op, diag(-PI / 4.0)));
    table.insert(GateType::P, |op| single(op, diag(op.param())));
    table.insert(GateType::Rx, |op| single(op, rx(op.param())));
    table.insert(GateType::Ry, |op| single(op, ry(op.param())));
    table.insert(GateType::Rz, |op| single(op, rz(op.param())));
    table.insert(GateType::Cx, |op| controlled(op, pauli_x()));
    table.insert(GateType::Cy, |op| controlled(op, pauli_y()));
    table.insert(GateType::Cz, |op| controlled(op, diag(PI)));
    table.insert(GateType::Ccx, |op| controlled(op, pauli_x()));
    table.insert(GateType::Swap, |op| Instruction {
        gate: op.gate,
        qubits: op.qubits.clone(),
        params: Vec::new(),
        kernel: Kernel::Swap(op.qubits[0], op.qubits[1]),
    });
    table
});

/// Gates the engine can translate.
pub fn supported_gates() -> impl Iterator<Item = GateType> {
    DISPATCH.keys().copied()
}

/// Schedule the native circuit. On a dispatch miss, returns the missing gate.
pub fn build(spec: &CircuitSpec) -> Result<MomentCircuit, GateType> {
    let mut circuit = MomentCircuit::new(spec.num_qubits());
    for op in spec.gates() {
        let translate = DISPATCH.get(&op.gate).ok_or(op.gate)?;
        circuit.append(translate(op));
    }
    circuit.measured = spec.measure();
    Ok(circuit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qbridge_ir::library;

    #[test]
    fn test_cp_and_cswap_missing() {
        let gates: Vec<_> = supported_gates().collect();
        assert!(!gates.contains(&GateType::Cp));
        assert!(!gates.contains(&GateType::Cswap));
        assert_eq!(gates.len(), GateType::ALL.len() - 2);

        let spec = CircuitSpec::from_ops(2, vec![GateOp::new(GateType::Cp, [0, 1], [0.5])], true)
            .unwrap();
        assert_eq!(build(&spec), Err(GateType::Cp));
    }

    #[test]
    fn test_parallel_gates_share_moment() {
        let spec = CircuitSpec::from_ops(
            3,
            vec![
                GateOp::new(GateType::H, [0], []),
                GateOp::new(GateType::H, [1], []),
                GateOp::new(GateType::Cx, [0, 1], []),
                GateOp::new(GateType::X, [2], []),
            ],
            true,
        )
        .unwrap();
        let circuit = build(&spec).unwrap();
        assert_eq!(circuit.moments().len(), 2);
        assert_eq!(circuit.moments()[0].len(), 3);
        assert_eq!(circuit.depth(), 3);
    }

    #[test]
    fn test_controls_and_target() {
        let spec = CircuitSpec::from_ops(3, vec![GateOp::new(GateType::Ccx, [2, 0, 1], [])], false)
            .unwrap();
        let circuit = build(&spec).unwrap();
        match &circuit.moments()[0][0].kernel {
            Kernel::Controlled { controls, target, .. } => {
                assert_eq!(controls, &vec![2, 0]);
                assert_eq!(*target, 1);
            }
            other => panic!("unexpected kernel {other:?}"),
        }
    }

    #[test]
    fn test_spec_round_trip_preserves_semantics_order() {
        let spec = library::teleportation().unwrap();
        let back = build(&spec).unwrap().to_spec().unwrap();
        assert_eq!(back.num_gates(), spec.num_gates());
        assert_eq!(back.gate_types(), spec.gate_types());
    }
}
