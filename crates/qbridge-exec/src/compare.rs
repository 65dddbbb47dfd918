//! Cross-engine comparison.
//!
//! Comparisons use only measurement statistics, so any two engines can be
//! compared regardless of whether they expose a statevector.

use std::collections::BTreeMap;

use qbridge_hal::Probabilities;
use serde::{Deserialize, Deserializer, Serialize};

use crate::report::EngineOutput;

/// Comparison of two successful engine runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// Distribution overlap in `[0, 1]`.
    pub similarity: f64,
    /// `time(a) / time(b)`. Infinite or NaN when `b` reported zero time;
    /// serialized as `null` in that case.
    #[serde(deserialize_with = "nullable_f64")]
    pub time_ratio: f64,
}

fn nullable_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

/// Overlap of two outcome distributions: the sum over every observed
/// bit-string of the smaller of its two probabilities.
///
/// Exactly symmetric, exactly 1 for identical distributions and 0 for
/// disjoint supports.
pub fn similarity(a: &Probabilities, b: &Probabilities) -> f64 {
    if !a.is_empty() && a == b {
        return 1.0;
    }
    // States present in only one map contribute min(p, 0) = 0. Summing in
    // bit-string order makes the result independent of argument order and
    // of hash iteration order.
    let mut shared: Vec<(&str, f64)> = a
        .iter()
        .filter_map(|(state, &pa)| b.get(state).map(|&pb| (state.as_str(), pa.min(pb))))
        .collect();
    shared.sort_unstable_by(|x, y| x.0.cmp(y.0));
    shared.iter().map(|&(_, p)| p).sum::<f64>().clamp(0.0, 1.0)
}

/// Ratio of execution times. Never panics on a zero denominator.
pub fn time_ratio(time_a: f64, time_b: f64) -> f64 {
    time_a / time_b
}

/// Key under which the pair `(a, b)` is reported.
pub fn pair_key(a: &str, b: &str) -> String {
    format!("{a}_vs_{b}")
}

/// Compare two successful outputs.
pub fn compare(a: &EngineOutput, b: &EngineOutput) -> Comparison {
    Comparison {
        similarity: similarity(&a.probabilities, &b.probabilities),
        time_ratio: time_ratio(a.execution_time, b.execution_time),
    }
}

/// Compare every unordered pair of outputs; the earlier engine in `outputs`
/// is the left side of each key.
pub fn pairwise(outputs: &[(&str, &EngineOutput)]) -> BTreeMap<String, Comparison> {
    let mut comparison = BTreeMap::new();
    for (i, (a, out_a)) in outputs.iter().enumerate() {
        for (b, out_b) in &outputs[i + 1..] {
            comparison.insert(pair_key(a, b), compare(out_a, out_b));
        }
    }
    comparison
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dist(pairs: &[(&str, f64)]) -> Probabilities {
        pairs.iter().map(|&(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn test_identical_and_disjoint() {
        let bell = dist(&[("00", 0.5), ("11", 0.5)]);
        assert_eq!(similarity(&bell, &bell), 1.0);
        let other = dist(&[("01", 0.5), ("10", 0.5)]);
        assert_eq!(similarity(&bell, &other), 0.0);
    }

    #[test]
    fn test_self_similarity_is_exact_for_uneven_sums() {
        let states = ["0000", "0001", "0010", "0011", "0100", "0101", "0110", "0111", "1000", "1001"];
        let a: Probabilities = states.iter().map(|s| (s.to_string(), 0.1)).collect();
        assert_ne!(a.values().sum::<f64>(), 1.0);
        assert_eq!(similarity(&a, &a), 1.0);
        assert_eq!(similarity(&a, &a.clone()), 1.0);
    }

    #[test]
    fn test_partial_overlap() {
        let a = dist(&[("00", 0.7), ("11", 0.3)]);
        let b = dist(&[("00", 0.4), ("01", 0.6)]);
        assert!((similarity(&a, &b) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_time_ratio_zero_denominator() {
        assert!(time_ratio(1.0, 0.0).is_infinite());
        assert!(time_ratio(0.0, 0.0).is_nan());
        assert_eq!(time_ratio(2.0, 4.0), 0.5);
    }

    #[test]
    fn test_non_finite_ratio_round_trips_as_null() {
        let c = Comparison {
            similarity: 1.0,
            time_ratio: f64::INFINITY,
        };
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, r#"{"similarity":1.0,"time_ratio":null}"#);
        let back: Comparison = serde_json::from_str(&json).unwrap();
        assert!(back.time_ratio.is_nan());
    }

    #[test]
    fn test_zero_over_zero_ratio_serializes_as_null() {
        let c = Comparison {
            similarity: 0.5,
            time_ratio: time_ratio(0.0, 0.0),
        };
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, r#"{"similarity":0.5,"time_ratio":null}"#);
        let back: Comparison = serde_json::from_str(&json).unwrap();
        assert_eq!(back.similarity, 0.5);
        assert!(back.time_ratio.is_nan());
    }

    #[test]
    fn test_pair_keys_follow_order() {
        let out = EngineOutput {
            counts: qbridge_hal::Counts::from_pairs([("0", 1)]),
            probabilities: dist(&[("0", 1.0)]),
            execution_time: 1.0,
        };
        let keys: Vec<_> = pairwise(&[("sim", &out), ("moment", &out), ("exact", &out)])
            .into_keys()
            .collect();
        assert_eq!(keys, vec!["moment_vs_exact", "sim_vs_exact", "sim_vs_moment"]);
    }

    fn arb_dist() -> impl Strategy<Value = Probabilities> {
        prop::collection::hash_map("[01]{3}", 1u32..100, 1..8).prop_map(|weights| {
            let total: u32 = weights.values().sum();
            weights
                .into_iter()
                .map(|(k, w)| (k, f64::from(w) / f64::from(total)))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn similarity_is_symmetric_and_bounded(a in arb_dist(), b in arb_dist()) {
            let ab = similarity(&a, &b);
            prop_assert_eq!(ab, similarity(&b, &a));
            prop_assert!((0.0..=1.0).contains(&ab));
        }

        #[test]
        fn self_similarity_is_one(a in arb_dist()) {
            prop_assert_eq!(similarity(&a, &a), 1.0);
            prop_assert_eq!(similarity(&a, &a.clone()), 1.0);
        }
    }
}
