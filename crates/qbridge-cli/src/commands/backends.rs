//! Backends command implementation.

use anyhow::Result;
use console::style;
use serde_json::json;

use qbridge_hal::Backend;

use super::common::{Context, OutputFormat, print_json};

/// List registered engines with their availability and capabilities.
pub async fn execute(ctx: &Context, format: OutputFormat) -> Result<()> {
    let registry = ctx.orchestrator.registry();
    let snapshot = registry.probe();

    if format == OutputFormat::Json {
        let engines: Vec<_> = registry
            .iter()
            .map(|backend| {
                json!({
                    "capabilities": backend.capabilities(),
                    "availability": snapshot.get(backend.name()),
                })
            })
            .collect();
        return print_json(&engines);
    }

    println!("{} Registered engines:\n", style("qbridge").cyan().bold());

    for backend in registry.iter() {
        let caps = backend.capabilities();
        let availability = snapshot.get(backend.name());
        let available = availability.is_some_and(|a| a.available);

        println!(
            "  {} {} {}",
            if available {
                style("●").green()
            } else {
                style("○").red()
            },
            style(&caps.name).bold(),
            style(&caps.description).dim()
        );
        println!("    Qubits: {}", caps.max_qubits);
        println!("    Max shots: {}", caps.max_shots);
        println!(
            "    Sampling: {}",
            if caps.shot_based { "shot-based" } else { "exact distribution" }
        );
        println!("    Native bit order: {}", caps.bit_order);
        println!(
            "    OpenQASM: import {}, export {}",
            yes_no(caps.interchange.import),
            yes_no(caps.interchange.export)
        );
        let gates: Vec<&str> = caps.gate_set.iter().map(|g| g.name()).collect();
        println!("    Gates: {}", gates.join(", "));
        if let Some(reason) = availability.and_then(|a| a.reason.as_deref()) {
            println!("    Status: {}", style(reason).red());
        }
        println!();
    }

    Ok(())
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}
