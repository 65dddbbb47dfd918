//! Conversion of engine-native histograms into canonical [`Counts`].
//!
//! Engines disagree on which end of a bitstring holds qubit 0, and some report
//! basis-state integers instead of strings. Each adapter declares a
//! [`BitOrder`] and hands back a [`NativeHistogram`]; [`normalize`] turns that
//! into bitstrings with qubit 0 leftmost.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{HalError, HalResult};
use crate::result::Counts;

/// Where an engine puts qubit 0 in its native outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BitOrder {
    /// Qubit 0 is the leftmost character, or the most significant bit of an
    /// index. Already canonical.
    QubitZeroLeft,
    /// Qubit 0 is the rightmost character, or the least significant bit of an
    /// index. Reversed during normalization.
    QubitZeroRight,
}

impl BitOrder {
    /// Snake-case name used in result metadata.
    pub fn as_str(self) -> &'static str {
        match self {
            BitOrder::QubitZeroLeft => "qubit_zero_left",
            BitOrder::QubitZeroRight => "qubit_zero_right",
        }
    }
}

impl std::fmt::Display for BitOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Histogram exactly as an engine reported it.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeHistogram {
    /// Outcome labels as the engine writes them.
    Labels(FxHashMap<String, u64>),
    /// Basis-state indices of a `width`-qubit register.
    Indices {
        counts: FxHashMap<usize, u64>,
        width: usize,
    },
}

impl NativeHistogram {
    /// Total number of recorded shots.
    pub fn total(&self) -> u64 {
        match self {
            NativeHistogram::Labels(counts) => counts.values().sum(),
            NativeHistogram::Indices { counts, .. } => counts.values().sum(),
        }
    }
}

/// Convert a native histogram of a `num_qubits` circuit into canonical counts.
///
/// Labels must be binary strings of exactly `num_qubits` characters; anything
/// narrower means the engine measured a subset of qubits and is rejected.
pub fn normalize(
    engine: &str,
    histogram: NativeHistogram,
    order: BitOrder,
    num_qubits: usize,
) -> HalResult<Counts> {
    let fail = |message: String| HalError::Execution {
        engine: engine.to_string(),
        message,
    };

    let labels: Vec<(String, u64)> = match histogram {
        NativeHistogram::Labels(counts) => counts.into_iter().collect(),
        NativeHistogram::Indices { counts, width } => {
            if width != num_qubits {
                return Err(fail(format!(
                    "partial measurement: engine reported {width} of {num_qubits} qubits"
                )));
            }
            counts
                .into_iter()
                .map(|(index, count)| {
                    if width < usize::BITS as usize && index >> width != 0 {
                        return Err(fail(format!(
                            "outcome index {index} does not fit in {width} qubits"
                        )));
                    }
                    Ok((format!("{index:0width$b}"), count))
                })
                .collect::<HalResult<_>>()?
        }
    };

    let mut out = Counts::new();
    for (label, count) in labels {
        if label.len() != num_qubits {
            return Err(fail(format!(
                "partial measurement: outcome '{label}' has {} bits, circuit has {num_qubits} qubits",
                label.len()
            )));
        }
        if !label.bytes().all(|b| b == b'0' || b == b'1') {
            return Err(fail(format!("outcome '{label}' is not a bitstring")));
        }
        let canonical = match order {
            BitOrder::QubitZeroLeft => label,
            BitOrder::QubitZeroRight => label.chars().rev().collect(),
        };
        out.insert(canonical, count);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(pairs: &[(&str, u64)]) -> NativeHistogram {
        NativeHistogram::Labels(pairs.iter().map(|(k, v)| ((*k).to_string(), *v)).collect())
    }

    fn indices(pairs: &[(usize, u64)], width: usize) -> NativeHistogram {
        NativeHistogram::Indices {
            counts: pairs.iter().copied().collect(),
            width,
        }
    }

    #[test]
    fn test_little_endian_labels_are_reversed() {
        // x@0 on two qubits: engine writes qubit 0 rightmost.
        let counts = normalize("sim", labels(&[("01", 100)]), BitOrder::QubitZeroRight, 2).unwrap();
        assert_eq!(counts.get("10"), 100);
    }

    #[test]
    fn test_big_endian_labels_unchanged() {
        let counts =
            normalize("stabilizer", labels(&[("10", 7)]), BitOrder::QubitZeroLeft, 2).unwrap();
        assert_eq!(counts.get("10"), 7);
    }

    #[test]
    fn test_indices_msb_first() {
        // index 2 = 0b10: qubit 0 is the MSB.
        let counts = normalize("moment", indices(&[(2, 5)], 2), BitOrder::QubitZeroLeft, 2).unwrap();
        assert_eq!(counts.get("10"), 5);
    }

    #[test]
    fn test_indices_lsb_first() {
        // index 1 = 0b001: qubit 0 is the LSB.
        let counts = normalize("exact", indices(&[(1, 9)], 3), BitOrder::QubitZeroRight, 3).unwrap();
        assert_eq!(counts.get("100"), 9);
    }

    #[test]
    fn test_partial_measurement_rejected() {
        let err = normalize("sim", labels(&[("1", 3)]), BitOrder::QubitZeroRight, 2).unwrap_err();
        assert!(err.to_string().contains("partial measurement"));
        assert!(err.to_string().contains("sim"));

        let err = normalize("exact", indices(&[(0, 3)], 1), BitOrder::QubitZeroRight, 2).unwrap_err();
        assert!(matches!(err, HalError::Execution { .. }));
    }

    #[test]
    fn test_rejects_non_binary_and_overflow() {
        assert!(normalize("sim", labels(&[("0 1", 1)]), BitOrder::QubitZeroLeft, 3).is_err());
        assert!(normalize("moment", indices(&[(4, 1)], 2), BitOrder::QubitZeroLeft, 2).is_err());
    }

    #[test]
    fn test_total() {
        assert_eq!(indices(&[(0, 3), (3, 4)], 2).total(), 7);
    }
}
