//! qbridge execution layer
//!
//! Runs one validated circuit on any number of registered engines and
//! compares what came back.
//!
//! - [`Orchestrator`]: single-engine, interchange and multi-engine entry points,
//!   sequential or parallel ([`ExecutionMode`])
//! - [`compare`]: distribution overlap ([`similarity`]) and [`time_ratio`]
//! - [`MultiEngineReport`]: per-engine outputs, per-engine errors and pairwise
//!   comparisons for one request
//! - [`Benchmark`]: canned benchmark circuits on every available engine
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use qbridge_exec::Orchestrator;
//!
//! let orchestrator = Orchestrator::new(Arc::new(registry));
//! let report = orchestrator
//!     .execute_on(&qbridge_ir::library::bell()?, &["sim", "moment"], 1000)
//!     .await;
//! println!("{:?}", report.comparison["sim_vs_moment"]);
//! ```

pub mod benchmark;
pub mod compare;
pub mod orchestrator;
pub mod report;

pub use benchmark::{Benchmark, BenchmarkReport};
pub use compare::{Comparison, similarity, time_ratio};
pub use orchestrator::{ExecutionMode, Orchestrator};
pub use report::{EngineOutput, MultiEngineReport, ReportMetadata};
