//! Native circuit and exact evolution.

use ndarray::linalg::general_mat_vec_mul;
use ndarray::{Array1, Array2};
use num_complex::Complex64;
use qbridge_ir::{CircuitSpec, GateType};

use crate::unitary;

/// One gate, with its unitary resolved at translation time.
#[derive(Debug, Clone)]
pub struct ExactOp {
    pub gate: GateType,
    pub qubits: Vec<usize>,
    unitary: Array2<Complex64>,
}

/// A circuit as a sequence of dense unitaries on little-endian amplitudes:
/// qubit `q` is bit `q` of the basis index.
#[derive(Debug, Clone)]
pub struct ExactCircuit {
    num_qubits: usize,
    ops: Vec<ExactOp>,
    measured: bool,
}

impl ExactCircuit {
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn ops(&self) -> &[ExactOp] {
        &self.ops
    }

    pub fn is_measured(&self) -> bool {
        self.measured
    }

    /// Final amplitudes starting from |0...0⟩.
    pub fn evolve(&self) -> Array1<Complex64> {
        let mut state = Array1::from_elem(1 << self.num_qubits, Complex64::new(0.0, 0.0));
        state[0] = Complex64::new(1.0, 0.0);
        for op in &self.ops {
            apply(&mut state, &op.unitary, &op.qubits);
        }
        state
    }

    /// Born probability of every basis index.
    pub fn distribution(&self) -> Vec<f64> {
        self.evolve().iter().map(Complex64::norm_sqr).collect()
    }
}

/// Apply `u` to `qubits` by gathering each affected amplitude group, multiplying
/// into a reused buffer and scattering back.
fn apply(state: &mut Array1<Complex64>, u: &Array2<Complex64>, qubits: &[usize]) {
    let k = qubits.len();
    let offsets: Vec<usize> = (0..1usize << k)
        .map(|local| {
            qubits
                .iter()
                .enumerate()
                .filter(|&(pos, _)| (local >> (k - 1 - pos)) & 1 == 1)
                .fold(0, |acc, (_, &q)| acc | (1 << q))
        })
        .collect();
    let touched = offsets.last().copied().unwrap_or(0);

    let zero = Complex64::new(0.0, 0.0);
    let mut group = Array1::from_elem(offsets.len(), zero);
    let mut updated = Array1::from_elem(offsets.len(), zero);
    for base in 0..state.len() {
        if base & touched != 0 {
            continue;
        }
        for (slot, &off) in group.iter_mut().zip(&offsets) {
            *slot = state[base | off];
        }
        general_mat_vec_mul(Complex64::new(1.0, 0.0), u, &group, zero, &mut updated);
        for (value, &off) in updated.iter().zip(&offsets) {
            state[base | off] = *value;
        }
    }
}

/// Resolve every gate. On a dispatch miss, returns the missing gate.
pub fn build(spec: &CircuitSpec) -> Result<ExactCircuit, GateType> {
    let ops = spec
        .gates()
        .iter()
        .map(|op| {
            Ok(ExactOp {
                gate: op.gate,
                qubits: op.qubits.clone(),
                unitary: unitary::unitary(op)?,
            })
        })
        .collect::<Result<Vec<_>, GateType>>()?;
    Ok(ExactCircuit {
        num_qubits: spec.num_qubits(),
        ops,
        measured: spec.measure(),
    })
}
