//! Canonical gate set.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Gates understood by the engine-neutral IR.
///
/// Engines are free to support a subset; a gate an engine lacks is reported
/// by that engine's adapter, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateType {
    /// Hadamard gate.
    H,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// Rotation around X axis.
    Rx,
    /// Rotation around Y axis.
    Ry,
    /// Rotation around Z axis.
    Rz,
    /// Phase gate.
    P,
    /// Controlled-X (CNOT) gate.
    Cx,
    /// Controlled-Y gate.
    Cy,
    /// Controlled-Z gate.
    Cz,
    /// SWAP gate.
    Swap,
    /// Controlled phase gate.
    Cp,
    /// Toffoli gate (CCX).
    Ccx,
    /// Fredkin gate (CSWAP).
    Cswap,
}

/// Alternative spellings accepted on input, mapped to their canonical gate.
const SYNONYMS: &[(&str, GateType)] = &[
    ("hadamard", GateType::H),
    ("pauli_x", GateType::X),
    ("not", GateType::X),
    ("pauli_y", GateType::Y),
    ("pauli_z", GateType::Z),
    ("sdag", GateType::Sdg),
    ("tdag", GateType::Tdg),
    ("phase", GateType::P),
    ("u1", GateType::P),
    ("cnot", GateType::Cx),
    ("cphase", GateType::Cp),
    ("toffoli", GateType::Ccx),
    ("fredkin", GateType::Cswap),
];

static NAME_TABLE: LazyLock<FxHashMap<&'static str, GateType>> = LazyLock::new(|| {
    GateType::ALL
        .iter()
        .map(|&g| (g.name(), g))
        .chain(SYNONYMS.iter().copied())
        .collect()
});

impl GateType {
    /// Every canonical gate, in declaration order.
    pub const ALL: [GateType; 19] = [
        GateType::H,
        GateType::X,
        GateType::Y,
        GateType::Z,
        GateType::S,
        GateType::Sdg,
        GateType::T,
        GateType::Tdg,
        GateType::Rx,
        GateType::Ry,
        GateType::Rz,
        GateType::P,
        GateType::Cx,
        GateType::Cy,
        GateType::Cz,
        GateType::Swap,
        GateType::Cp,
        GateType::Ccx,
        GateType::Cswap,
    ];

    /// Canonical lowercase name.
    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            GateType::H => "h",
            GateType::X => "x",
            GateType::Y => "y",
            GateType::Z => "z",
            GateType::S => "s",
            GateType::Sdg => "sdg",
            GateType::T => "t",
            GateType::Tdg => "tdg",
            GateType::Rx => "rx",
            GateType::Ry => "ry",
            GateType::Rz => "rz",
            GateType::P => "p",
            GateType::Cx => "cx",
            GateType::Cy => "cy",
            GateType::Cz => "cz",
            GateType::Swap => "swap",
            GateType::Cp => "cp",
            GateType::Ccx => "ccx",
            GateType::Cswap => "cswap",
        }
    }

    /// Number of qubits this gate acts on.
    #[inline]
    pub fn num_qubits(self) -> usize {
        match self {
            GateType::H
            | GateType::X
            | GateType::Y
            | GateType::Z
            | GateType::S
            | GateType::Sdg
            | GateType::T
            | GateType::Tdg
            | GateType::Rx
            | GateType::Ry
            | GateType::Rz
            | GateType::P => 1,
            GateType::Cx | GateType::Cy | GateType::Cz | GateType::Swap | GateType::Cp => 2,
            GateType::Ccx | GateType::Cswap => 3,
        }
    }

    /// Number of real parameters this gate takes.
    #[inline]
    pub fn num_params(self) -> usize {
        match self {
            GateType::Rx | GateType::Ry | GateType::Rz | GateType::P | GateType::Cp => 1,
            _ => 0,
        }
    }

    /// Whether the gate takes parameters.
    pub fn is_parametric(self) -> bool {
        self.num_params() > 0
    }

    /// Whether the gate is in the Clifford group.
    pub fn is_clifford(self) -> bool {
        matches!(
            self,
            GateType::H
                | GateType::X
                | GateType::Y
                | GateType::Z
                | GateType::S
                | GateType::Sdg
                | GateType::Cx
                | GateType::Cy
                | GateType::Cz
                | GateType::Swap
        )
    }

    /// Look up a gate by canonical name or synonym, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        let lowered = name.trim().to_ascii_lowercase();
        NAME_TABLE.get(lowered.as_str()).copied()
    }

    /// Synonyms accepted for this gate.
    pub fn synonyms(self) -> impl Iterator<Item = &'static str> {
        SYNONYMS
            .iter()
            .filter(move |(_, g)| *g == self)
            .map(|(name, _)| *name)
    }
}

impl fmt::Display for GateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown gate name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownGateName(pub String);

impl fmt::Display for UnknownGateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown gate '{}'", self.0)
    }
}

impl std::error::Error for UnknownGateName {}

impl FromStr for GateType {
    type Err = UnknownGateName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GateType::from_name(s).ok_or_else(|| UnknownGateName(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_names_round_trip() {
        for gate in GateType::ALL {
            assert_eq!(GateType::from_name(gate.name()), Some(gate));
        }
    }

    #[test]
    fn test_synonyms_resolve() {
        assert_eq!(GateType::from_name("hadamard"), Some(GateType::H));
        assert_eq!(GateType::from_name("CNOT"), Some(GateType::Cx));
        assert_eq!(GateType::from_name("Toffoli"), Some(GateType::Ccx));
        assert_eq!(GateType::from_name("pauli_z"), Some(GateType::Z));
        assert_eq!(GateType::from_name("u1"), Some(GateType::P));
        assert_eq!(GateType::from_name("bogus"), None);
    }

    #[test]
    fn test_arity_and_params() {
        assert_eq!(GateType::H.num_qubits(), 1);
        assert_eq!(GateType::Cp.num_qubits(), 2);
        assert_eq!(GateType::Cswap.num_qubits(), 3);
        assert!(GateType::Rx.is_parametric());
        assert!(GateType::Cp.is_parametric());
        assert!(!GateType::Cx.is_parametric());
    }

    #[test]
    fn test_clifford_classification() {
        assert!(GateType::Cz.is_clifford());
        assert!(!GateType::T.is_clifford());
        assert!(!GateType::Ccx.is_clifford());
    }

    #[test]
    fn test_synonym_listing() {
        let x: Vec<_> = GateType::X.synonyms().collect();
        assert_eq!(x, vec!["pauli_x", "not"]);
        assert_eq!(GateType::Swap.synonyms().count(), 0);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("RZ".parse::<GateType>(), Ok(GateType::Rz));
        assert!("qft".parse::<GateType>().is_err());
    }
}
