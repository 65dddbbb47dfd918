//! Benchmark command implementation.

use anyhow::Result;
use console::style;

use qbridge_exec::{Benchmark, ExecutionMode};
use qbridge_ir::BenchmarkKind;

use super::common::{Context, OutputFormat, print_json, spinner};
use super::compare::print_report;

/// Run a benchmark circuit on every available engine.
pub async fn execute(
    ctx: &Context,
    kind: BenchmarkKind,
    num_qubits: usize,
    shots: Option<u32>,
    parallel: bool,
    format: OutputFormat,
) -> Result<()> {
    let shots = ctx.shots(shots);
    let orchestrator = if parallel {
        ctx.orchestrator.clone().with_mode(ExecutionMode::Parallel)
    } else {
        ctx.orchestrator.clone()
    };
    let benchmark = Benchmark::new(orchestrator);

    let report = if format == OutputFormat::Table {
        let spinner = spinner(format!("Benchmarking {kind} on {num_qubits} qubits..."))?;
        let report = benchmark.run(kind, num_qubits, shots).await;
        spinner.finish_and_clear();
        report?
    } else {
        benchmark.run(kind, num_qubits, shots).await?
    };

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => {
            print_report(&report.report);
            for (engine, reason) in &report.skipped {
                println!("  {} {} skipped: {}", style("-").dim(), engine, reason);
            }
            println!();
            if let Some(fastest) = &report.fastest {
                println!("  Fastest: {}", style(fastest).green().bold());
            }
            if let Some(similarity) = report.min_similarity {
                println!("  Lowest pairwise similarity: {}", style(format!("{similarity:.4}")).yellow());
            }
        }
    }
    Ok(())
}
