//! qbridge command-line interface
//!
//! Describe a circuit once, run it on any of the bundled simulation engines,
//! and compare what they report.
//!
//! ```text
//! qbridge backends
//! qbridge bell --engine stabilizer
//! qbridge compare --circuit ghz --qubits 5 --engines sim,moment,exact --parallel
//! qbridge run --engine moment --input circuit.qasm --format json
//! qbridge benchmark --kind layered --qubits 10
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

use qbridge_exec::Orchestrator;
use qbridge_ir::BenchmarkKind;

mod commands;
mod config;
mod engines;

use commands::common::{CannedCircuit, CircuitArgs, CircuitInput, Context, OutputFormat};
use commands::{backends, benchmark, compare, inspect, run};
use config::Config;

/// qbridge - one circuit, many simulation engines
#[derive(Parser)]
#[command(name = "qbridge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (defaults to ~/.qbridge/config.yaml)
    #[arg(long, global = true, env = "QBRIDGE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List engines, their availability and capabilities
    Backends {
        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Run a circuit on one engine
    Run {
        /// Engine id
        #[arg(short, long, default_value = "sim")]
        engine: String,

        #[command(flatten)]
        circuit: CircuitArgs,

        /// Number of shots
        #[arg(short, long)]
        shots: Option<u32>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Run a circuit on several engines and compare the results
    Compare {
        /// Engine ids, comma separated (defaults to the configured engines)
        #[arg(short, long, value_delimiter = ',')]
        engines: Option<Vec<String>>,

        #[command(flatten)]
        circuit: CircuitArgs,

        /// Number of shots
        #[arg(short, long)]
        shots: Option<u32>,

        /// Run engines side by side
        #[arg(long)]
        parallel: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Show how an engine realizes a circuit
    Inspect {
        /// Engine id
        #[arg(short, long, default_value = "sim")]
        engine: String,

        #[command(flatten)]
        circuit: CircuitArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Run a Bell pair
    Bell {
        /// Engine id
        #[arg(short, long, default_value = "sim")]
        engine: String,

        /// Number of shots
        #[arg(short, long)]
        shots: Option<u32>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Run a GHZ state
    Ghz {
        /// Engine id
        #[arg(short, long, default_value = "sim")]
        engine: String,

        /// Number of qubits
        #[arg(short, long, default_value_t = 3)]
        qubits: usize,

        /// Number of shots
        #[arg(short, long)]
        shots: Option<u32>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Run the teleportation circuit
    Teleport {
        /// Engine id
        #[arg(short, long, default_value = "sim")]
        engine: String,

        /// Number of shots
        #[arg(short, long)]
        shots: Option<u32>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Benchmark every available engine
    Benchmark {
        /// Circuit family (bell, ghz, layered)
        #[arg(short, long, default_value = "ghz")]
        kind: BenchmarkKind,

        /// Number of qubits
        #[arg(short, long, default_value_t = 4)]
        qubits: usize,

        /// Number of shots
        #[arg(short, long)]
        shots: Option<u32>,

        /// Run engines side by side
        #[arg(long)]
        parallel: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },
}

fn log_filter(verbose: u8, configured: &str) -> String {
    match verbose {
        0 => configured.to_string(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

async fn dispatch(ctx: &Context, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Backends { format } => backends::execute(ctx, format).await,

        Commands::Run {
            engine,
            circuit,
            shots,
            format,
        } => run::execute(ctx, &engine, circuit.resolve()?, shots, format).await,

        Commands::Compare {
            engines,
            circuit,
            shots,
            parallel,
            format,
        } => compare::execute(ctx, engines, circuit.resolve()?, shots, parallel, format).await,

        Commands::Inspect {
            engine,
            circuit,
            format,
        } => inspect::execute(ctx, &engine, circuit.resolve()?, format).await,

        Commands::Bell { engine, shots, format } => {
            let input = CircuitInput::Spec(CannedCircuit::Bell.build(2)?);
            run::execute(ctx, &engine, input, shots, format).await
        }

        Commands::Ghz {
            engine,
            qubits,
            shots,
            format,
        } => {
            let input = CircuitInput::Spec(CannedCircuit::Ghz.build(qubits)?);
            run::execute(ctx, &engine, input, shots, format).await
        }

        Commands::Teleport { engine, shots, format } => {
            let input = CircuitInput::Spec(CannedCircuit::Teleport.build(3)?);
            run::execute(ctx, &engine, input, shots, format).await
        }

        Commands::Benchmark {
            kind,
            qubits,
            shots,
            parallel,
            format,
        } => benchmark::execute(ctx, kind, qubits, shots, parallel, format).await,
    }
}

async fn run_cli(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_filter(cli.verbose, &config.log_level)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let registry = engines::build_registry(&config)?;
    let orchestrator = Orchestrator::new(Arc::new(registry)).with_mode(config.execution_mode());
    let ctx = Context { config, orchestrator };

    dispatch(&ctx, cli.command).await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Err(e) = run_cli(cli).await {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_compare() {
        let cli = Cli::try_parse_from([
            "qbridge", "compare", "--engines", "sim,exact", "--circuit", "ghz", "--qubits", "4", "--parallel",
        ])
        .unwrap();
        let Commands::Compare {
            engines,
            circuit,
            parallel,
            format,
            ..
        } = cli.command
        else {
            panic!("expected compare");
        };
        assert_eq!(engines.unwrap(), vec!["sim", "exact"]);
        assert_eq!(circuit.circuit, Some(CannedCircuit::Ghz));
        assert_eq!(circuit.qubits, 4);
        assert!(parallel);
        assert_eq!(format, OutputFormat::Table);
    }

    #[test]
    fn test_parse_benchmark_kind() {
        let cli = Cli::try_parse_from(["qbridge", "benchmark", "--kind", "layered", "-q", "6"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Benchmark {
                kind: BenchmarkKind::Layered,
                qubits: 6,
                ..
            }
        ));
        assert!(Cli::try_parse_from(["qbridge", "benchmark", "--kind", "qft"]).is_err());
    }

    #[test]
    fn test_input_conflicts_with_circuit() {
        let result = Cli::try_parse_from(["qbridge", "run", "--input", "a.qasm", "--circuit", "bell"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_verbosity() {
        let cli = Cli::try_parse_from(["qbridge", "backends", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(log_filter(cli.verbose, "warn"), "debug");
        assert_eq!(log_filter(0, "error"), "error");
    }
}
