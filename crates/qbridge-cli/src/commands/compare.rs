//! Compare command implementation.

use anyhow::Result;
use console::style;

use qbridge_exec::{ExecutionMode, MultiEngineReport};

use super::common::{CircuitInput, Context, OutputFormat, print_json, spinner};

/// Run one circuit on several engines and report their agreement.
pub async fn execute(
    ctx: &Context,
    engines: Option<Vec<String>>,
    input: CircuitInput,
    shots: Option<u32>,
    parallel: bool,
    format: OutputFormat,
) -> Result<()> {
    let shots = ctx.shots(shots);
    let engines = engines.unwrap_or_else(|| ctx.config.engines.clone());
    let spec = input.to_spec()?;

    let orchestrator = if parallel {
        ctx.orchestrator.clone().with_mode(ExecutionMode::Parallel)
    } else {
        ctx.orchestrator.clone()
    };

    let report = if format == OutputFormat::Table {
        let spinner = spinner(format!("Running on {}...", engines.join(", ")))?;
        let report = orchestrator.execute_on(&spec, &engines, shots).await;
        spinner.finish_and_clear();
        report
    } else {
        orchestrator.execute_on(&spec, &engines, shots).await
    };

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => print_report(&report),
    }

    if report.num_engines_executed == 0 {
        anyhow::bail!("No engine produced a result");
    }
    Ok(())
}

/// Per-engine summary, failures and pairwise comparisons.
pub fn print_report(report: &MultiEngineReport) {
    let meta = &report.metadata;
    println!(
        "{} {} qubits, {} gates, {} shots (run {})\n",
        style("qbridge").cyan().bold(),
        meta.num_qubits,
        meta.num_gates,
        meta.shots,
        meta.run_id
    );

    for (engine, output) in &report.results {
        let top = output
            .counts
            .most_frequent()
            .map(|(bits, count)| format!("{bits} ({count})"))
            .unwrap_or_default();
        println!(
            "  {} {:<12} {:>10.3} ms   top: {}",
            style("●").green(),
            style(engine).bold(),
            output.execution_time * 1000.0,
            style(top).cyan()
        );
    }
    for (engine, error) in &report.errors {
        println!("  {} {:<12} {}", style("○").red(), style(engine).bold(), style(error).red());
    }

    if !report.comparison.is_empty() {
        println!("\n  Comparison:");
        for (pair, comparison) in &report.comparison {
            let ratio = if comparison.time_ratio.is_finite() {
                format!("{:.2}x", comparison.time_ratio)
            } else {
                "-".to_string()
            };
            println!(
                "    {:<24} similarity {}   time ratio {}",
                pair,
                style(format!("{:.4}", comparison.similarity)).yellow(),
                ratio
            );
        }
    }
}
