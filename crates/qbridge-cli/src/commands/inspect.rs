//! Inspect command implementation.

use anyhow::Result;
use console::style;
use serde_json::json;

use qbridge_hal::{Backend, HalError};

use super::common::{CircuitInput, Context, OutputFormat, print_json};

/// Show how one engine realizes a circuit and its OpenQASM export.
pub async fn execute(ctx: &Context, engine: &str, input: CircuitInput, format: OutputFormat) -> Result<()> {
    let backend = ctx.orchestrator.registry().get(engine)?;

    let (info, spec) = match &input {
        CircuitInput::Spec(spec) => (backend.inspect(spec)?, spec.clone()),
        CircuitInput::Qasm(source) => (backend.import(source)?, input.to_spec()?),
    };

    let qasm = match backend.export(&spec) {
        Ok(qasm) => Some(qasm),
        Err(HalError::NotSupported { .. }) => None,
        Err(e) => return Err(e.into()),
    };

    match format {
        OutputFormat::Json => print_json(&json!({ "info": info, "qasm": qasm }))?,
        OutputFormat::Table => {
            println!("{} {}", style("Engine:").bold(), style(&info.engine).yellow());
            println!("  Qubits:       {}", info.num_qubits);
            println!("  Instructions: {}", info.num_instructions);
            println!("  Depth:        {}", info.depth);
            let names: Vec<&str> = info.gate_types.iter().map(String::as_str).collect();
            println!("  Gate types:   {}", names.join(", "));
            match qasm {
                Some(qasm) => {
                    println!("\n{}", style("OpenQASM export:").bold());
                    print!("{qasm}");
                }
                None => println!("\n  {}", style("OpenQASM export not supported").dim()),
            }
        }
    }
    Ok(())
}
