//! Multi-engine execution.
//!
//! Engines always run on blocking worker threads and share no state, so
//! whether they run one after another or side by side only changes latency. Either way the report
//! is assembled after every engine has produced a result or been recorded as
//! failed, and one engine's failure never stops another.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use qbridge_hal::{Backend, CircuitResult, EngineRegistry, HalError, HalResult};
use qbridge_ir::CircuitSpec;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::compare;
use crate::report::{EngineOutput, MultiEngineReport, ReportMetadata};

/// How engines are scheduled within one request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// One engine at a time, in request order.
    #[default]
    Sequential,
    /// Every engine on its own blocking worker thread.
    Parallel,
}

/// Runs circuits against engines from an immutable registry.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    registry: Arc<EngineRegistry>,
    mode: ExecutionMode,
}

impl Orchestrator {
    /// Sequential orchestrator over `registry`.
    pub fn new(registry: Arc<EngineRegistry>) -> Self {
        Self {
            registry,
            mode: ExecutionMode::Sequential,
        }
    }

    /// Set the scheduling mode.
    #[must_use]
    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    /// The registry engines are resolved from.
    pub fn registry(&self) -> &EngineRegistry {
        &self.registry
    }

    /// Scheduling mode.
    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Run one circuit on one engine.
    ///
    /// Fails only for an unknown engine id; engine failures come back as an
    /// error-populated result.
    #[instrument(skip(self, spec), fields(num_qubits = spec.num_qubits()))]
    pub async fn execute(&self, spec: &CircuitSpec, engine: &str, shots: u32) -> HalResult<CircuitResult> {
        let backend = self.registry.get(engine)?;
        let spec = spec.clone();
        run_blocking(engine, move || backend.run(&spec, shots)).await
    }

    /// Import an OpenQASM program on one engine and run it.
    #[instrument(skip(self, source))]
    pub async fn execute_interchange(&self, source: &str, engine: &str, shots: u32) -> HalResult<CircuitResult> {
        let backend = self.registry.get(engine)?;
        let source = source.to_string();
        run_blocking(engine, move || backend.run_interchange(&source, shots)).await
    }

    /// Run one circuit on several engines and compare the successful results.
    ///
    /// Unknown ids are reported under `errors`; repeated ids run once.
    #[instrument(skip(self, spec, engines), fields(num_qubits = spec.num_qubits(), mode = ?self.mode))]
    pub async fn execute_on<S: AsRef<str>>(
        &self,
        spec: &CircuitSpec,
        engines: &[S],
        shots: u32,
    ) -> MultiEngineReport {
        let metadata = ReportMetadata {
            num_qubits: spec.num_qubits(),
            num_gates: spec.num_gates(),
            shots,
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
        };

        let mut requested: Vec<&str> = Vec::with_capacity(engines.len());
        for name in engines.iter().map(AsRef::as_ref) {
            if !requested.contains(&name) {
                requested.push(name);
            }
        }

        let mut errors = BTreeMap::new();
        let mut targets: Vec<(String, Arc<dyn Backend>)> = Vec::new();
        for name in requested {
            match self.registry.get(name) {
                Ok(backend) => targets.push((name.to_string(), backend)),
                Err(e) => {
                    warn!(engine = name, "unknown engine requested");
                    errors.insert(name.to_string(), e.to_string());
                }
            }
        }

        info!(
            run_id = %metadata.run_id,
            engines = targets.len(),
            shots,
            "executing circuit on engines"
        );
        let outcomes = match self.mode {
            ExecutionMode::Sequential => run_sequential(spec, targets, shots).await,
            ExecutionMode::Parallel => run_parallel(spec, targets, shots).await,
        };

        let mut succeeded: Vec<(String, EngineOutput)> = Vec::new();
        for (name, outcome) in outcomes {
            match outcome.and_then(|result| EngineOutput::from_result(&result)) {
                Ok(output) => succeeded.push((name, output)),
                Err(reason) => {
                    errors.insert(name, reason);
                }
            }
        }

        let pairs: Vec<(&str, &EngineOutput)> =
            succeeded.iter().map(|(name, out)| (name.as_str(), out)).collect();
        let comparison = compare::pairwise(&pairs);

        let report = MultiEngineReport {
            num_engines_executed: succeeded.len(),
            results: succeeded.into_iter().collect(),
            errors,
            comparison,
            metadata,
        };
        info!(
            run_id = %report.metadata.run_id,
            executed = report.num_engines_executed,
            failed = report.errors.len(),
            "multi-engine run complete"
        );
        report
    }
}

type EngineOutcome = (String, Result<CircuitResult, String>);

/// One engine at a time, each on the blocking pool so the runtime keeps
/// serving other tasks while it computes.
async fn run_sequential(
    spec: &CircuitSpec,
    targets: Vec<(String, Arc<dyn Backend>)>,
    shots: u32,
) -> Vec<EngineOutcome> {
    let spec = Arc::new(spec.clone());
    let mut outcomes = Vec::with_capacity(targets.len());
    for (name, backend) in targets {
        debug!(engine = %name, "running engine");
        let spec = Arc::clone(&spec);
        let outcome = run_blocking(&name, move || backend.run(&spec, shots))
            .await
            .map_err(|e| {
                warn!(engine = %name, error = %e, "engine worker died");
                e.to_string()
            });
        outcomes.push((name, outcome));
    }
    outcomes
}

/// Spawn every engine before awaiting any, then collect in request order.
async fn run_parallel(
    spec: &CircuitSpec,
    targets: Vec<(String, Arc<dyn Backend>)>,
    shots: u32,
) -> Vec<EngineOutcome> {
    let spec = Arc::new(spec.clone());
    let handles: Vec<_> = targets
        .into_iter()
        .map(|(name, backend)| {
            let spec = Arc::clone(&spec);
            debug!(engine = %name, "spawning engine worker");
            let handle = tokio::task::spawn_blocking(move || backend.run(&spec, shots));
            (name, handle)
        })
        .collect();

    let mut outcomes = Vec::with_capacity(handles.len());
    for (name, handle) in handles {
        let outcome = handle.await.map_err(|e| {
            warn!(engine = %name, error = %e, "engine worker died");
            worker_died(&name, &e).to_string()
        });
        outcomes.push((name, outcome));
    }
    outcomes
}

async fn run_blocking(
    engine: &str,
    f: impl FnOnce() -> CircuitResult + Send + 'static,
) -> HalResult<CircuitResult> {
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| worker_died(engine, &e))
}

fn worker_died(engine: &str, e: &tokio::task::JoinError) -> HalError {
    HalError::Execution {
        engine: engine.to_string(),
        message: format!("worker task failed: {e}"),
    }
}
