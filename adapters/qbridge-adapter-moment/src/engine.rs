//! Big-endian statevector evolution.
//!
//! Qubit 0 is the most significant bit of the basis index, so for `n` qubits
//! qubit `q` lives at bit `n - 1 - q`.

use num_complex::Complex64;
use rand::Rng;
use rustc_hash::FxHashMap;

use crate::circuit::{Kernel, Matrix2, MomentCircuit};

pub struct State {
    amplitudes: Vec<Complex64>,
    num_qubits: usize,
}

impl State {
    pub fn zero(num_qubits: usize) -> Self {
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); 1 << num_qubits];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Run every moment in order.
    pub fn evolve(circuit: &MomentCircuit) -> Self {
        let mut state = Self::zero(circuit.num_qubits());
        for moment in circuit.moments() {
            for inst in moment {
                state.apply(&inst.kernel);
            }
        }
        state
    }

    fn mask(&self, qubit: usize) -> usize {
        1 << (self.num_qubits - 1 - qubit)
    }

    pub fn apply(&mut self, kernel: &Kernel) {
        match kernel {
            Kernel::Controlled {
                matrix,
                controls,
                target,
            } => {
                let controls = controls.iter().fold(0, |m, &q| m | self.mask(q));
                self.apply_controlled(matrix, controls, self.mask(*target));
            }
            Kernel::Swap(a, b) => {
                let x = pauli_x();
                let (ma, mb) = (self.mask(*a), self.mask(*b));
                self.apply_controlled(&x, ma, mb);
                self.apply_controlled(&x, mb, ma);
                self.apply_controlled(&x, ma, mb);
            }
        }
    }

    fn apply_controlled(&mut self, m: &Matrix2, controls: usize, target: usize) {
        for i in 0..self.amplitudes.len() {
            if i & target != 0 || i & controls != controls {
                continue;
            }
            let j = i | target;
            let a = self.amplitudes[i];
            let b = self.amplitudes[j];
            self.amplitudes[i] = m[0][0] * a + m[0][1] * b;
            self.amplitudes[j] = m[1][0] * a + m[1][1] * b;
        }
    }

    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// Draw `shots` basis indices.
    pub fn sample<R: Rng>(&self, shots: u32, rng: &mut R) -> FxHashMap<usize, u64> {
        let mut cumulative = self.probabilities();
        for i in 1..cumulative.len() {
            cumulative[i] += cumulative[i - 1];
        }
        let total = cumulative.last().copied().unwrap_or(1.0);
        let last = cumulative.len().saturating_sub(1);

        let mut counts = FxHashMap::default();
        for _ in 0..shots {
            let r = rng.r#gen::<f64>() * total;
            let index = cumulative.partition_point(|&p| p <= r).min(last);
            *counts.entry(index).or_insert(0) += 1;
        }
        counts
    }
}

fn pauli_x() -> Matrix2 {
    let zero = Complex64::new(0.0, 0.0);
    let one = Complex64::new(1.0, 0.0);
    [[zero, one], [one, zero]]
}
