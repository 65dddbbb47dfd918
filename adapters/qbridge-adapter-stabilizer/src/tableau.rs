//! Aaronson-Gottesman stabilizer tableau.
//!
//! Rows `0..n` are destabilizers, rows `n..2n` stabilizers, and row `2n` is
//! scratch space for deterministic measurements. Each row is a Pauli string
//! stored as X bits, Z bits and a sign bit.
//!
//! Reference: Aaronson & Gottesman, "Improved Simulation of Stabilizer
//! Circuits", Phys. Rev. A 70, 052328 (2004).

use rand::Rng;

use crate::circuit::CliffordOp;

#[derive(Debug, Clone)]
pub struct Tableau {
    n: usize,
    x: Vec<Vec<bool>>,
    z: Vec<Vec<bool>>,
    r: Vec<bool>,
}

impl Tableau {
    /// |0...0⟩: destabilizer i = X_i, stabilizer i = Z_i.
    pub fn new(n: usize) -> Self {
        let rows = 2 * n + 1;
        let mut x = vec![vec![false; n]; rows];
        let mut z = vec![vec![false; n]; rows];
        for i in 0..n {
            x[i][i] = true;
            z[n + i][i] = true;
        }
        Self {
            n,
            x,
            z,
            r: vec![false; rows],
        }
    }

    /// Apply one unitary instruction. Measurements are ignored here.
    pub fn apply(&mut self, op: &CliffordOp) {
        match *op {
            CliffordOp::H(q) => self.hadamard(q),
            CliffordOp::X(q) => self.flip_sign_where(|_, z| z[q]),
            CliffordOp::Y(q) => self.flip_sign_where(|x, z| x[q] ^ z[q]),
            CliffordOp::Z(q) => self.flip_sign_where(|x, _| x[q]),
            CliffordOp::S(q) => self.phase(q),
            CliffordOp::Sdg(q) => {
                self.phase(q);
                self.phase(q);
                self.phase(q);
            }
            CliffordOp::Cx(c, t) => self.cnot(c, t),
            CliffordOp::Cy(c, t) => {
                self.phase(t);
                self.phase(t);
                self.phase(t);
                self.cnot(c, t);
                self.phase(t);
            }
            CliffordOp::Cz(c, t) => {
                self.hadamard(t);
                self.cnot(c, t);
                self.hadamard(t);
            }
            CliffordOp::Swap(a, b) => {
                self.cnot(a, b);
                self.cnot(b, a);
                self.cnot(a, b);
            }
            CliffordOp::Measure(_) => {}
        }
    }

    /// Generator rows (scratch row excluded).
    fn generators(&self) -> std::ops::Range<usize> {
        0..2 * self.n
    }

    fn flip_sign_where(&mut self, anticommutes: impl Fn(&[bool], &[bool]) -> bool) {
        for i in self.generators() {
            if anticommutes(&self.x[i], &self.z[i]) {
                self.r[i] = !self.r[i];
            }
        }
    }

    fn hadamard(&mut self, q: usize) {
        for i in self.generators() {
            let (xi, zi) = (self.x[i][q], self.z[i][q]);
            self.r[i] ^= xi && zi;
            self.x[i][q] = zi;
            self.z[i][q] = xi;
        }
    }

    fn phase(&mut self, q: usize) {
        for i in self.generators() {
            let (xi, zi) = (self.x[i][q], self.z[i][q]);
            self.r[i] ^= xi && zi;
            self.z[i][q] = zi ^ xi;
        }
    }

    fn cnot(&mut self, c: usize, t: usize) {
        for i in self.generators() {
            let (xc, zc) = (self.x[i][c], self.z[i][c]);
            let (xt, zt) = (self.x[i][t], self.z[i][t]);
            self.r[i] ^= xc && zt && (xt == zc);
            self.x[i][t] = xt ^ xc;
            self.z[i][c] = zc ^ zt;
        }
    }

    /// Left-multiply row `h` by row `i`.
    fn rowsum(&mut self, h: usize, i: usize) {
        let mut phase = 2 * i32::from(self.r[h]) + 2 * i32::from(self.r[i]);
        for j in 0..self.n {
            phase += g(self.x[i][j], self.z[i][j], self.x[h][j], self.z[h][j]);
        }
        self.r[h] = phase.rem_euclid(4) == 2;
        for j in 0..self.n {
            let (xi, zi) = (self.x[i][j], self.z[i][j]);
            self.x[h][j] ^= xi;
            self.z[h][j] ^= zi;
        }
    }

    /// Measure qubit `a` in the Z basis, collapsing the state.
    pub fn measure<R: Rng>(&mut self, a: usize, rng: &mut R) -> bool {
        let n = self.n;
        if let Some(p) = (n..2 * n).find(|&p| self.x[p][a]) {
            for i in self.generators() {
                if i != p && self.x[i][a] {
                    self.rowsum(i, p);
                }
            }
            self.x[p - n] = self.x[p].clone();
            self.z[p - n] = self.z[p].clone();
            self.r[p - n] = self.r[p];

            self.x[p].fill(false);
            self.z[p].fill(false);
            self.z[p][a] = true;
            let outcome: bool = rng.r#gen();
            self.r[p] = outcome;
            outcome
        } else {
            let scratch = 2 * n;
            self.x[scratch].fill(false);
            self.z[scratch].fill(false);
            self.r[scratch] = false;
            for i in 0..n {
                if self.x[i][a] {
                    self.rowsum(scratch, i + n);
                }
            }
            self.r[scratch]
        }
    }
}

/// Exponent of i picked up when multiplying Pauli (x1,z1) into (x2,z2).
fn g(x1: bool, z1: bool, x2: bool, z2: bool) -> i32 {
    let (x2, z2) = (i32::from(x2), i32::from(z2));
    match (x1, z1) {
        (false, false) => 0,
        (true, true) => z2 - x2,
        (true, false) => z2 * (2 * x2 - 1),
        (false, true) => x2 * (1 - 2 * z2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn measure_all(t: &Tableau, rng: &mut StdRng) -> Vec<bool> {
        let mut t = t.clone();
        (0..t.n).map(|q| t.measure(q, rng)).collect()
    }

    #[test]
    fn test_zero_state_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(measure_all(&Tableau::new(3), &mut rng), vec![false; 3]);
    }

    #[test]
    fn test_x_flips() {
        let mut t = Tableau::new(2);
        t.apply(&CliffordOp::X(1));
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(measure_all(&t, &mut rng), vec![false, true]);
    }

    #[test]
    fn test_bell_is_correlated() {
        let mut t = Tableau::new(2);
        t.apply(&CliffordOp::H(0));
        t.apply(&CliffordOp::Cx(0, 1));
        let mut rng = StdRng::seed_from_u64(9);
        let mut seen = [0u32; 2];
        for _ in 0..200 {
            let bits = measure_all(&t, &mut rng);
            assert_eq!(bits[0], bits[1]);
            seen[usize::from(bits[0])] += 1;
        }
        assert!(seen[0] > 0 && seen[1] > 0);
    }

    #[test]
    fn test_hzh_is_x() {
        let mut t = Tableau::new(1);
        t.apply(&CliffordOp::H(0));
        t.apply(&CliffordOp::Z(0));
        t.apply(&CliffordOp::H(0));
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(measure_all(&t, &mut rng), vec![true]);
    }

    #[test]
    fn test_sdg_undoes_s() {
        let mut t = Tableau::new(1);
        t.apply(&CliffordOp::H(0));
        t.apply(&CliffordOp::S(0));
        t.apply(&CliffordOp::Sdg(0));
        t.apply(&CliffordOp::H(0));
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(measure_all(&t, &mut rng), vec![false]);
    }

    #[test]
    fn test_y_cy_and_swap() {
        let mut t = Tableau::new(3);
        t.apply(&CliffordOp::Y(0));
        t.apply(&CliffordOp::Cy(0, 1));
        t.apply(&CliffordOp::Swap(1, 2));
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(measure_all(&t, &mut rng), vec![true, false, true]);
    }
}
