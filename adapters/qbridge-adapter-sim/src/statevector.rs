//! Statevector simulation engine.
//!
//! Amplitude `i` belongs to the basis state whose bit `q` is the value of
//! qubit `q`, so qubit 0 is the least significant bit of the index and the
//! rightmost character of an outcome label.

use num_complex::Complex64;
use rand::Rng;
use rustc_hash::FxHashMap;

use crate::circuit::{SimCircuit, SimOp};

/// A statevector representing a quantum state.
pub struct Statevector {
    amplitudes: Vec<Complex64>,
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); 1 << num_qubits];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Evolve |0...0⟩ through every instruction of `circuit`.
    pub fn simulate(circuit: &SimCircuit) -> Self {
        let mut sv = Self::new(circuit.num_qubits());
        for op in circuit.ops() {
            sv.apply(op);
        }
        sv
    }

    /// Apply one instruction. Measurements are deferred to sampling.
    pub fn apply(&mut self, op: &SimOp) {
        match *op {
            SimOp::H(q) => self.apply_h(q),
            SimOp::X(q) => self.apply_x(q),
            SimOp::Y(q) => self.apply_y(q),
            SimOp::Z(q) => self.apply_phase(q, std::f64::consts::PI),
            SimOp::Phase { qubit, theta, .. } => self.apply_phase(qubit, theta),
            SimOp::Rx(q, theta) => self.apply_rx(q, theta),
            SimOp::Ry(q, theta) => self.apply_ry(q, theta),
            SimOp::Rz(q, theta) => self.apply_rz(q, theta),
            SimOp::Cx(c, t) => self.apply_mcx(1 << c, t),
            SimOp::Cy(c, t) => self.apply_cy(c, t),
            SimOp::Cz(c, t) => self.apply_cphase(c, t, std::f64::consts::PI),
            SimOp::Swap(a, b) => self.apply_swap(0, a, b),
            SimOp::Cp(c, t, theta) => self.apply_cphase(c, t, theta),
            SimOp::Ccx(c1, c2, t) => self.apply_mcx((1 << c1) | (1 << c2), t),
            SimOp::Cswap(c, a, b) => self.apply_swap(1 << c, a, b),
            SimOp::Measure(_) => {}
        }
    }

    /// Basis indices with the `mask` bit clear, paired with their partner.
    fn pairs(&self, mask: usize) -> impl Iterator<Item = (usize, usize)> + use<> {
        (0..self.amplitudes.len())
            .filter(move |i| i & mask == 0)
            .map(move |i| (i, i | mask))
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    fn apply_x(&mut self, qubit: usize) {
        for (i, j) in self.pairs(1 << qubit) {
            self.amplitudes.swap(i, j);
        }
    }

    fn apply_y(&mut self, qubit: usize) {
        let i_val = Complex64::new(0.0, 1.0);
        for (i, j) in self.pairs(1 << qubit) {
            let a = self.amplitudes[i];
            self.amplitudes[i] = -i_val * self.amplitudes[j];
            self.amplitudes[j] = i_val * a;
        }
    }

    fn apply_h(&mut self, qubit: usize) {
        let sqrt2_inv = std::f64::consts::FRAC_1_SQRT_2;
        for (i, j) in self.pairs(1 << qubit) {
            let a = self.amplitudes[i];
            let b = self.amplitudes[j];
            self.amplitudes[i] = sqrt2_inv * (a + b);
            self.amplitudes[j] = sqrt2_inv * (a - b);
        }
    }

    fn apply_phase(&mut self, qubit: usize, theta: f64) {
        let phase = Complex64::from_polar(1.0, theta);
        for (_, j) in self.pairs(1 << qubit) {
            self.amplitudes[j] *= phase;
        }
    }

    fn apply_rx(&mut self, qubit: usize, theta: f64) {
        let c = (theta / 2.0).cos();
        let neg_i_s = Complex64::new(0.0, -(theta / 2.0).sin());
        for (i, j) in self.pairs(1 << qubit) {
            let a = self.amplitudes[i];
            let b = self.amplitudes[j];
            self.amplitudes[i] = c * a + neg_i_s * b;
            self.amplitudes[j] = neg_i_s * a + c * b;
        }
    }

    fn apply_ry(&mut self, qubit: usize, theta: f64) {
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        for (i, j) in self.pairs(1 << qubit) {
            let a = self.amplitudes[i];
            let b = self.amplitudes[j];
            self.amplitudes[i] = c * a - s * b;
            self.amplitudes[j] = s * a + c * b;
        }
    }

    fn apply_rz(&mut self, qubit: usize, theta: f64) {
        let phase_0 = Complex64::from_polar(1.0, -theta / 2.0);
        let phase_1 = Complex64::from_polar(1.0, theta / 2.0);
        for (i, j) in self.pairs(1 << qubit) {
            self.amplitudes[i] *= phase_0;
            self.amplitudes[j] *= phase_1;
        }
    }

    // =========================================================================
    // Controlled gates
    // =========================================================================

    /// X on `target` when every bit of `controls` is set (CX, CCX).
    fn apply_mcx(&mut self, controls: usize, target: usize) {
        for (i, j) in self.pairs(1 << target) {
            if i & controls == controls {
                self.amplitudes.swap(i, j);
            }
        }
    }

    fn apply_cy(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1 << control;
        let i_val = Complex64::new(0.0, 1.0);
        for (i, j) in self.pairs(1 << target) {
            if i & ctrl_mask != 0 {
                let a = self.amplitudes[i];
                self.amplitudes[i] = -i_val * self.amplitudes[j];
                self.amplitudes[j] = i_val * a;
            }
        }
    }

    /// Phase `theta` on |11⟩ of (`control`, `target`) (CZ, CP).
    fn apply_cphase(&mut self, control: usize, target: usize, theta: f64) {
        let both = (1 << control) | (1 << target);
        let phase = Complex64::from_polar(1.0, theta);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & both == both {
                *amp *= phase;
            }
        }
    }

    /// Swap qubits `a` and `b` when every bit of `controls` is set (SWAP, CSWAP).
    fn apply_swap(&mut self, controls: usize, a: usize, b: usize) {
        let mask_a = 1 << a;
        let mask_b = 1 << b;
        for i in 0..self.amplitudes.len() {
            if i & controls == controls && i & mask_a != 0 && i & mask_b == 0 {
                let j = (i & !mask_a) | mask_b;
                self.amplitudes.swap(i, j);
            }
        }
    }

    // =========================================================================
    // Measurement
    // =========================================================================

    /// Probability of each basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// Draw `shots` basis-state indices from the Born distribution.
    pub fn sample<R: Rng>(&self, shots: u32, rng: &mut R) -> FxHashMap<usize, u64> {
        let cumulative: Vec<f64> = self
            .probabilities()
            .into_iter()
            .scan(0.0, |acc, p| {
                *acc += p;
                Some(*acc)
            })
            .collect();
        let total = cumulative.last().copied().unwrap_or(1.0);
        let last = cumulative.len().saturating_sub(1);

        let mut counts = FxHashMap::default();
        for _ in 0..shots {
            let r: f64 = rng.r#gen::<f64>() * total;
            let outcome = cumulative.partition_point(|&c| c <= r).min(last);
            *counts.entry(outcome).or_insert(0) += 1;
        }
        counts
    }

    /// Outcome label as the engine writes it: qubit 0 rightmost.
    pub fn outcome_to_bitstring(&self, outcome: usize) -> String {
        format!("{:0width$b}", outcome, width = self.num_qubits)
    }
}
