//! Shared helpers for CLI commands.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context as _, Result};
use clap::{Args, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use qbridge_exec::Orchestrator;
use qbridge_hal::CircuitResult;
use qbridge_ir::{CircuitRequest, CircuitSpec, library};

use crate::config::Config;

/// State shared by every command.
pub struct Context {
    pub config: Config,
    pub orchestrator: Orchestrator,
}

impl Context {
    /// Requested shots, else the configured default.
    pub fn shots(&self, shots: Option<u32>) -> u32 {
        shots.unwrap_or(self.config.shots)
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Built-in circuits selectable with `--circuit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CannedCircuit {
    Bell,
    Ghz,
    Teleport,
}

impl CannedCircuit {
    pub fn build(self, num_qubits: usize) -> Result<CircuitSpec> {
        let spec = match self {
            CannedCircuit::Bell => library::bell()?,
            CannedCircuit::Ghz => library::ghz(num_qubits)?,
            CannedCircuit::Teleport => library::teleportation()?,
        };
        Ok(spec)
    }
}

/// Where a command's circuit comes from.
#[derive(Debug, Clone, Args)]
pub struct CircuitArgs {
    /// Input file (.qasm for OpenQASM 2.0, .json for a circuit request)
    #[arg(short, long, conflicts_with = "circuit")]
    pub input: Option<PathBuf>,

    /// Built-in circuit
    #[arg(short, long, value_enum)]
    pub circuit: Option<CannedCircuit>,

    /// Width of the built-in GHZ circuit
    #[arg(short, long, default_value_t = 3)]
    pub qubits: usize,
}

impl CircuitArgs {
    pub fn resolve(&self) -> Result<CircuitInput> {
        match (&self.input, self.circuit) {
            (Some(path), _) => load_input(path),
            (None, Some(canned)) => Ok(CircuitInput::Spec(canned.build(self.qubits)?)),
            (None, None) => anyhow::bail!("Pass --input FILE or --circuit bell|ghz|teleport"),
        }
    }
}

/// A loaded circuit.
#[derive(Debug, Clone)]
pub enum CircuitInput {
    /// Already validated.
    Spec(CircuitSpec),
    /// OpenQASM source, imported by the engine that runs it.
    Qasm(String),
}

impl CircuitInput {
    /// Validated circuit, parsing OpenQASM if needed.
    pub fn to_spec(&self) -> Result<CircuitSpec> {
        match self {
            CircuitInput::Spec(spec) => Ok(spec.clone()),
            CircuitInput::Qasm(source) => {
                qbridge_qasm::parse(source).map_err(|e| anyhow::anyhow!("Parse error: {e}"))
            }
        }
    }
}

/// Load a circuit from an OpenQASM or JSON file.
pub fn load_input(path: &Path) -> Result<CircuitInput> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }

    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext.to_lowercase().as_str() {
        "qasm" => Ok(CircuitInput::Qasm(source)),
        "json" => {
            let request: CircuitRequest = serde_json::from_str(&source)
                .with_context(|| format!("Invalid circuit request in {}", path.display()))?;
            Ok(CircuitInput::Spec(request.into_spec()?))
        }
        other => anyhow::bail!("Unsupported input extension '.{other}'. Use .qasm or .json"),
    }
}

/// Pretty-print any serializable value as JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Steady-ticking spinner for long-running work.
pub fn spinner(message: impl Into<String>) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}

/// Print one engine's counts as a bar table.
pub fn print_result(result: &CircuitResult) {
    let Some(counts) = result.counts() else {
        return;
    };

    println!(
        "\n{} {} ({} shots):",
        style("✓").green().bold(),
        style(&result.engine).yellow(),
        result.metadata.shots
    );

    let sorted = counts.sorted();
    let total = counts.total_shots() as f64;

    for (bitstring, count) in sorted.iter().take(16) {
        let prob = **count as f64 / total * 100.0;
        let bar_len = (prob / 2.0).round() as usize;
        let bar: String = "█".repeat(bar_len);

        println!(
            "  {}: {:>6} ({:>5.2}%) {}",
            style(bitstring).cyan(),
            count,
            prob,
            style(bar).green()
        );
    }

    if sorted.len() > 16 {
        println!("  ... and {} more outcomes", sorted.len() - 16);
    }

    if let Some(seconds) = result.execution_time() {
        println!(
            "\n  Execution time: {} ms",
            style(format!("{:.3}", seconds * 1000.0)).yellow()
        );
    }
}
