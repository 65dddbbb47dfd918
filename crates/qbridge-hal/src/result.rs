//! Canonical execution result types.
//!
//! Bitstring ordering: the leftmost character is qubit 0. For example, the
//! string `"10"` means qubit 0 measured `1` and qubit 1 measured `0`. Every
//! engine's native output is converted to this convention by
//! [`crate::normalize`] before it reaches a [`CircuitResult`].

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Probability per bitstring.
pub type Probabilities = FxHashMap<String, f64>;

/// Measurement counts from circuit execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counts {
    counts: FxHashMap<String, u64>,
}

impl Counts {
    /// Create empty counts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create counts from (bitstring, count) pairs; duplicates are summed.
    pub fn from_pairs(iter: impl IntoIterator<Item = (impl Into<String>, u64)>) -> Self {
        let mut counts = Self::new();
        for (k, v) in iter {
            counts.insert(k, v);
        }
        counts
    }

    /// Add `count` occurrences of a bitstring.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u64) {
        *self.counts.entry(bitstring.into()).or_default() += count;
    }

    /// Count for a bitstring.
    pub fn get(&self, bitstring: &str) -> u64 {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Iterate over (bitstring, count) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &u64)> {
        self.counts.iter()
    }

    /// Total number of shots.
    pub fn total_shots(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Most frequent bitstring; ties break toward the smaller bitstring.
    pub fn most_frequent(&self) -> Option<(&String, &u64)> {
        self.counts
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
    }

    /// Relative frequency of each bitstring.
    #[allow(clippy::cast_precision_loss)]
    pub fn probabilities(&self) -> Probabilities {
        let total = self.total_shots() as f64;
        if total == 0.0 {
            return FxHashMap::default();
        }
        self.counts
            .iter()
            .map(|(k, &v)| (k.clone(), v as f64 / total))
            .collect()
    }

    /// Counts sorted by count descending, then bitstring ascending.
    pub fn sorted(&self) -> Vec<(&String, &u64)> {
        let mut items: Vec<_> = self.counts.iter().collect();
        items.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        items
    }

    /// Number of distinct bitstrings.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether no outcome was recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl FromIterator<(String, u64)> for Counts {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

/// Per-result metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultMetadata {
    /// Requested shot count.
    pub shots: u32,
    /// Whether the engine produced counts.
    pub success: bool,
    /// Engine-specific extras such as `bit_order` and `shot_based`.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Success payload or error, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Outcome {
    /// The engine produced a histogram.
    Success {
        /// Canonical bitstring counts.
        counts: Counts,
        /// `count / total` per bitstring.
        probabilities: Probabilities,
        /// Seconds spent in the engine's simulate step.
        execution_time: f64,
    },
    /// The engine failed.
    Failure {
        /// Description including the engine id.
        error: String,
    },
}

/// Canonical result of running one circuit on one engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitResult {
    /// Engine id.
    pub engine: String,
    /// Shots, success flag and engine extras.
    pub metadata: ResultMetadata,
    /// Counts or error.
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl CircuitResult {
    /// Successful result; probabilities are derived from `counts`.
    pub fn success(
        engine: impl Into<String>,
        shots: u32,
        counts: Counts,
        execution_time: f64,
    ) -> Self {
        let probabilities = counts.probabilities();
        Self {
            engine: engine.into(),
            metadata: ResultMetadata {
                shots,
                success: true,
                extra: serde_json::Map::new(),
            },
            outcome: Outcome::Success {
                counts,
                probabilities,
                execution_time,
            },
        }
    }

    /// Failed result.
    pub fn failure(engine: impl Into<String>, shots: u32, error: impl Into<String>) -> Self {
        Self {
            engine: engine.into(),
            metadata: ResultMetadata {
                shots,
                success: false,
                extra: serde_json::Map::new(),
            },
            outcome: Outcome::Failure {
                error: error.into(),
            },
        }
    }

    /// Attach an engine-specific metadata entry.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.extra.insert(key.into(), value);
        self
    }

    /// Whether the engine produced counts.
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success { .. })
    }

    /// Counts, if successful.
    pub fn counts(&self) -> Option<&Counts> {
        match &self.outcome {
            Outcome::Success { counts, .. } => Some(counts),
            Outcome::Failure { .. } => None,
        }
    }

    /// Probabilities, if successful.
    pub fn probabilities(&self) -> Option<&Probabilities> {
        match &self.outcome {
            Outcome::Success { probabilities, .. } => Some(probabilities),
            Outcome::Failure { .. } => None,
        }
    }

    /// Simulate-step duration in seconds, if successful.
    pub fn execution_time(&self) -> Option<f64> {
        match &self.outcome {
            Outcome::Success { execution_time, .. } => Some(*execution_time),
            Outcome::Failure { .. } => None,
        }
    }

    /// Error message, if failed.
    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Failure { error } => Some(error),
            Outcome::Success { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_accumulate() {
        let counts = Counts::from_pairs([("00", 30), ("11", 70), ("00", 20)]);
        assert_eq!(counts.get("00"), 50);
        assert_eq!(counts.total_shots(), 120);
        assert_eq!(counts.most_frequent(), Some((&"11".to_string(), &70)));
    }

    #[test]
    fn test_sorted_breaks_ties_by_key() {
        let counts = Counts::from_pairs([("11", 5), ("00", 5), ("01", 9)]);
        let keys: Vec<_> = counts.sorted().into_iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["01", "00", "11"]);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let counts = Counts::from_pairs([("0", 1), ("1", 3)]);
        let probs = counts.probabilities();
        assert!((probs.values().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!((probs["1"] - 0.75).abs() < 1e-12);
        assert!(Counts::new().probabilities().is_empty());
    }

    #[test]
    fn test_success_json_shape() {
        let result = CircuitResult::success("sim", 10, Counts::from_pairs([("1", 10)]), 0.5)
            .with_extra("bit_order", serde_json::json!("qubit_zero_right"));
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["engine"], "sim");
        assert_eq!(value["counts"]["1"], 10);
        assert_eq!(value["probabilities"]["1"], 1.0);
        assert_eq!(value["metadata"]["success"], true);
        assert_eq!(value["metadata"]["bit_order"], "qubit_zero_right");
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_failure_json_shape() {
        let result = CircuitResult::failure("exact", 5, "Engine 'exact' failed: boom");
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["error"], "Engine 'exact' failed: boom");
        assert_eq!(value["metadata"]["success"], false);
        assert!(value.get("counts").is_none());
        assert!(value.get("execution_time").is_none());

        let back: CircuitResult = serde_json::from_value(value).unwrap();
        assert_eq!(back.error(), Some("Engine 'exact' failed: boom"));
    }
}
