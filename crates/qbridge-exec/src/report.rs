//! Multi-engine report.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use qbridge_hal::{CircuitResult, Counts, Outcome, Probabilities};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::compare::Comparison;

/// Successful output of one engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineOutput {
    pub counts: Counts,
    pub probabilities: Probabilities,
    /// Seconds spent in the engine's simulate step.
    pub execution_time: f64,
}

impl EngineOutput {
    /// Split a result into its output or its error message.
    pub fn from_result(result: &CircuitResult) -> Result<Self, String> {
        match &result.outcome {
            Outcome::Success {
                counts,
                probabilities,
                execution_time,
            } => Ok(Self {
                counts: counts.clone(),
                probabilities: probabilities.clone(),
                execution_time: *execution_time,
            }),
            Outcome::Failure { error } => Err(error.clone()),
        }
    }
}

/// Request-level metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub num_qubits: usize,
    pub num_gates: usize,
    pub shots: u32,
    /// Unique id of this request.
    pub run_id: Uuid,
    /// When execution began.
    pub started_at: DateTime<Utc>,
}

/// Aggregate of one circuit run on several engines.
///
/// An engine appears in exactly one of `results` and `errors`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiEngineReport {
    pub results: BTreeMap<String, EngineOutput>,
    pub errors: BTreeMap<String, String>,
    pub comparison: BTreeMap<String, Comparison>,
    /// Engines that produced a successful result.
    pub num_engines_executed: usize,
    pub metadata: ReportMetadata,
}

impl MultiEngineReport {
    /// Whether every requested engine succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.errors.is_empty()
    }

    /// Engine with the shortest execution time, if any succeeded.
    pub fn fastest(&self) -> Option<(&str, f64)> {
        self.results
            .iter()
            .map(|(name, out)| (name.as_str(), out.execution_time))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}
