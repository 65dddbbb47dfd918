//! Benchmark runner.
//!
//! Runs a canned benchmark circuit on every engine the availability probe
//! reports as usable and summarizes timing and agreement.

use qbridge_hal::HalResult;
use qbridge_ir::library::{self, BenchmarkKind};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::orchestrator::Orchestrator;
use crate::report::MultiEngineReport;

/// Result of one benchmark run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub kind: BenchmarkKind,
    pub num_qubits: usize,
    /// Engines the probe marked available, in registry order.
    pub engines: Vec<String>,
    /// Engines skipped by the probe, with the reason.
    pub skipped: Vec<(String, String)>,
    /// Fastest successful engine.
    pub fastest: Option<String>,
    /// Smallest pairwise similarity, if at least two engines succeeded.
    pub min_similarity: Option<f64>,
    pub report: MultiEngineReport,
}

/// Benchmark driver bound to an orchestrator.
#[derive(Debug, Clone)]
pub struct Benchmark {
    orchestrator: Orchestrator,
}

impl Benchmark {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self { orchestrator }
    }

    /// Build the benchmark circuit and run it on every available engine.
    ///
    /// Fails only if the benchmark circuit itself is invalid (for example a
    /// zero-width layered circuit).
    #[instrument(skip(self))]
    pub async fn run(&self, kind: BenchmarkKind, num_qubits: usize, shots: u32) -> HalResult<BenchmarkReport> {
        let spec = library::benchmark(kind, num_qubits)?;
        let snapshot = self.orchestrator.registry().probe();

        let engines: Vec<String> = snapshot.available().map(str::to_string).collect();
        let skipped: Vec<(String, String)> = snapshot
            .iter()
            .filter(|(_, availability)| !availability.available)
            .map(|(name, availability)| {
                let reason = availability.reason.clone().unwrap_or_default();
                (name.to_string(), reason)
            })
            .collect();

        let report = self.orchestrator.execute_on(&spec, &engines, shots).await;
        let fastest = report.fastest().map(|(name, _)| name.to_string());
        let min_similarity = report
            .comparison
            .values()
            .map(|c| c.similarity)
            .min_by(f64::total_cmp);

        info!(
            %kind,
            num_qubits = spec.num_qubits(),
            engines = engines.len(),
            fastest = fastest.as_deref().unwrap_or("-"),
            "benchmark complete"
        );
        Ok(BenchmarkReport {
            kind,
            num_qubits: spec.num_qubits(),
            engines,
            skipped,
            fastest,
            min_similarity,
            report,
        })
    }
}
