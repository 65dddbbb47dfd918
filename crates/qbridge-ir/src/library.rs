//! Canned circuits.
//!
//! All generators are pure: the same arguments always produce the same
//! [`CircuitSpec`], with measurement enabled.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::circuit::{CircuitSpec, GateOp};
use crate::error::{IrError, IrResult};
use crate::gate::GateType;

fn op(gate: GateType, qubits: &[usize]) -> GateOp {
    GateOp::new(gate, qubits.to_vec(), Vec::new())
}

/// Two-qubit Bell pair: `h@0, cx@0,1`.
pub fn bell() -> IrResult<CircuitSpec> {
    CircuitSpec::from_ops(
        2,
        vec![op(GateType::H, &[0]), op(GateType::Cx, &[0, 1])],
        true,
    )
}

/// n-qubit GHZ state: `h@0` then `cx@0,i` for every other qubit.
pub fn ghz(num_qubits: usize) -> IrResult<CircuitSpec> {
    if num_qubits < 2 {
        return Err(IrError::TooFewQubits {
            circuit: "GHZ",
            required: 2,
            got: num_qubits as i64,
        });
    }
    let ops = std::iter::once(op(GateType::H, &[0]))
        .chain((1..num_qubits).map(|i| op(GateType::Cx, &[0, i])))
        .collect();
    CircuitSpec::from_ops(num_qubits, ops, true)
}

/// Three-qubit teleportation skeleton without classical feed-forward.
pub fn teleportation() -> IrResult<CircuitSpec> {
    CircuitSpec::from_ops(
        3,
        vec![
            op(GateType::H, &[1]),
            op(GateType::Cx, &[1, 2]),
            op(GateType::H, &[0]),
            op(GateType::Cx, &[0, 1]),
            op(GateType::H, &[0]),
        ],
        true,
    )
}

/// Benchmark circuit families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BenchmarkKind {
    /// Two-qubit Bell pair regardless of the requested width.
    Bell,
    /// GHZ state over the requested width.
    Ghz,
    /// Alternating Hadamard and nearest-neighbour CX layers.
    Layered,
}

impl BenchmarkKind {
    /// All kinds.
    pub const ALL: [BenchmarkKind; 3] = [BenchmarkKind::Bell, BenchmarkKind::Ghz, BenchmarkKind::Layered];

    /// Lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            BenchmarkKind::Bell => "bell",
            BenchmarkKind::Ghz => "ghz",
            BenchmarkKind::Layered => "layered",
        }
    }
}

impl fmt::Display for BenchmarkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BenchmarkKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bell" => Ok(BenchmarkKind::Bell),
            "ghz" => Ok(BenchmarkKind::Ghz),
            "layered" => Ok(BenchmarkKind::Layered),
            other => Err(format!("unknown benchmark kind '{other}'")),
        }
    }
}

/// Build a benchmark circuit of the given family.
pub fn benchmark(kind: BenchmarkKind, num_qubits: usize) -> IrResult<CircuitSpec> {
    match kind {
        BenchmarkKind::Bell => bell(),
        BenchmarkKind::Ghz => ghz(num_qubits),
        BenchmarkKind::Layered => layered(num_qubits),
    }
}

fn layered(num_qubits: usize) -> IrResult<CircuitSpec> {
    if num_qubits == 0 {
        return Err(IrError::InvalidQubitCount(0));
    }
    let n = num_qubits;
    let mut ops = Vec::with_capacity(4 * n);
    for i in 0..2 * n {
        ops.push(op(GateType::H, &[i % n]));
        if i + 1 < n {
            ops.push(op(GateType::Cx, &[i % n, (i + 1) % n]));
        }
    }
    CircuitSpec::from_ops(n, ops, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bell_shape() {
        let c = bell().unwrap();
        assert_eq!(c.num_qubits(), 2);
        assert_eq!(c.gates()[0].gate, GateType::H);
        assert_eq!(c.gates()[1].qubits, vec![0, 1]);
        assert!(c.measure());
    }

    #[test]
    fn test_ghz_two_equals_bell() {
        assert_eq!(ghz(2).unwrap(), bell().unwrap());
    }

    #[test]
    fn test_ghz_too_small() {
        assert!(matches!(ghz(1), Err(IrError::TooFewQubits { got: 1, .. })));
        assert!(ghz(0).is_err());
    }

    #[test]
    fn test_ghz_five() {
        let c = ghz(5).unwrap();
        assert_eq!(c.num_gates(), 5);
        assert_eq!(c.gates()[4].qubits, vec![0, 4]);
    }

    #[test]
    fn test_teleportation_sequence() {
        let c = teleportation().unwrap();
        let seq: Vec<_> = c
            .gates()
            .iter()
            .map(|g| (g.gate, g.qubits.clone()))
            .collect();
        assert_eq!(
            seq,
            vec![
                (GateType::H, vec![1]),
                (GateType::Cx, vec![1, 2]),
                (GateType::H, vec![0]),
                (GateType::Cx, vec![0, 1]),
                (GateType::H, vec![0]),
            ]
        );
    }

    #[test]
    fn test_benchmark_bell_ignores_width() {
        assert_eq!(benchmark(BenchmarkKind::Bell, 7).unwrap().num_qubits(), 2);
    }

    #[test]
    fn test_layered_counts() {
        let c = benchmark(BenchmarkKind::Layered, 3).unwrap();
        // 6 hadamards, cx while i < 2
        assert_eq!(c.num_gates(), 8);
        let single = benchmark(BenchmarkKind::Layered, 1).unwrap();
        assert_eq!(single.num_gates(), 2);
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("GHZ".parse::<BenchmarkKind>(), Ok(BenchmarkKind::Ghz));
        assert!("qft".parse::<BenchmarkKind>().is_err());
    }
}
