//! Dense gate unitaries.
//!
//! A `k`-qubit gate is a `2^k x 2^k` matrix whose row/column index holds the
//! gate's first operand in its most significant bit, so controls come first
//! and the controlled block sits in the bottom-right corner.

use std::f64::consts::{FRAC_1_SQRT_2, PI};
use std::sync::LazyLock;

use ndarray::{Array2, array};
use num_complex::Complex64;
use qbridge_ir::{GateOp, GateType};
use rustc_hash::FxHashMap;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

fn phase(theta: f64) -> Array2<Complex64> {
    array![[ONE, ZERO], [ZERO, Complex64::from_polar(1.0, theta)]]
}

fn hadamard() -> Array2<Complex64> {
    let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
    array![[h, h], [h, -h]]
}

fn pauli_x() -> Array2<Complex64> {
    array![[ZERO, ONE], [ONE, ZERO]]
}

fn pauli_y() -> Array2<Complex64> {
    array![[ZERO, -I], [I, ZERO]]
}

fn rx(theta: f64) -> Array2<Complex64> {
    let (s, c) = (theta / 2.0).sin_cos();
    array![
        [Complex64::new(c, 0.0), Complex64::new(0.0, -s)],
        [Complex64::new(0.0, -s), Complex64::new(c, 0.0)]
    ]
}

fn ry(theta: f64) -> Array2<Complex64> {
    let (s, c) = (theta / 2.0).sin_cos();
    array![
        [Complex64::new(c, 0.0), Complex64::new(-s, 0.0)],
        [Complex64::new(s, 0.0), Complex64::new(c, 0.0)]
    ]
}

fn rz(theta: f64) -> Array2<Complex64> {
    array![
        [Complex64::from_polar(1.0, -theta / 2.0), ZERO],
        [ZERO, Complex64::from_polar(1.0, theta / 2.0)]
    ]
}

/// Embed `block` (2x2) under `controls` control qubits.
fn controlled(block: Array2<Complex64>, controls: u32) -> Array2<Complex64> {
    let dim = 1usize << (controls + 1);
    let mut u = Array2::eye(dim);
    u.slice_mut(ndarray::s![dim - 2.., dim - 2..]).assign(&block);
    u
}

/// Identity with basis states `a` and `b` exchanged.
fn permutation(dim: usize, a: usize, b: usize) -> Array2<Complex64> {
    let mut u = Array2::eye(dim);
    u[[a, a]] = ZERO;
    u[[b, b]] = ZERO;
    u[[a, b]] = ONE;
    u[[b, a]] = ONE;
    u
}

type Translator = fn(&GateOp) -> Array2<Complex64>;

static DISPATCH: LazyLock<FxHashMap<GateType, Translator>> = LazyLock::new(|| {
    let mut table: FxHashMap<GateType, Translator> = FxHashMap::default();
    table.insert(GateType::H, |_| hadamard());
    table.insert(GateType::X, |_| pauli_x());
    table.insert(GateType::Y, |_| pauli_y());
    table.insert(GateType::Z, |_| phase(PI));
    table.insert(GateType::S, |_| phase(PI / 2.0));
    table.insert(GateType::Sdg, |_| phase(-PI / 2.0));
    table.insert(GateType::T, |_| phase(PI / 4.0));
    table.insert(GateType::Tdg, |_| phase(-PI / 4.0));
    table.insert(GateType::P, |op| phase(op.param()));
    table.insert(GateType::Rx, |op| rx(op.param()));
    table.insert(GateType::Ry, |op| ry(op.param()));
    table.insert(GateType::Rz, |op| rz(op.param()));
    table.insert(GateType::Cx, |_| controlled(pauli_x(), 1));
    table.insert(GateType::Cy, |_| controlled(pauli_y(), 1));
    table.insert(GateType::Cz, |_| controlled(phase(PI), 1));
    table.insert(GateType::Cp, |op| controlled(phase(op.param()), 1));
    table.insert(GateType::Swap, |_| permutation(4, 0b01, 0b10));
    table.insert(GateType::Ccx, |_| controlled(pauli_x(), 2));
    table.insert(GateType::Cswap, |_| permutation(8, 0b101, 0b110));
    table
});

/// Gates with a known unitary.
pub fn supported_gates() -> impl Iterator<Item = GateType> {
    DISPATCH.keys().copied()
}

/// Unitary of `op`, or the gate itself when it has no entry.
pub fn unitary(op: &GateOp) -> Result<Array2<Complex64>, GateType> {
    DISPATCH.get(&op.gate).map(|f| f(op)).ok_or(op.gate)
}
