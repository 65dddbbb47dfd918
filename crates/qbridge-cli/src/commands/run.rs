//! Run command implementation.

use anyhow::Result;
use console::style;

use super::common::{CircuitInput, Context, OutputFormat, print_json, print_result};

/// Run one circuit on one engine.
///
/// OpenQASM input is imported by the engine itself, so engines without
/// interchange support reject it.
pub async fn execute(
    ctx: &Context,
    engine: &str,
    input: CircuitInput,
    shots: Option<u32>,
    format: OutputFormat,
) -> Result<()> {
    let shots = ctx.shots(shots);
    if format == OutputFormat::Table {
        println!(
            "{} Running on {} ({} shots)",
            style("→").cyan().bold(),
            style(engine).yellow(),
            shots
        );
    }

    let result = match &input {
        CircuitInput::Spec(spec) => {
            if format == OutputFormat::Table {
                println!("  Circuit: {} qubits, {} gates", spec.num_qubits(), spec.num_gates());
            }
            ctx.orchestrator.execute(spec, engine, shots).await?
        }
        CircuitInput::Qasm(source) => ctx.orchestrator.execute_interchange(source, engine, shots).await?,
    };

    match format {
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Table => print_result(&result),
    }

    if let Some(error) = result.error() {
        anyhow::bail!("{error}");
    }
    Ok(())
}
