//! Structural summary of an engine-native circuit.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Instruction name used for the final measurement layer.
pub const MEASURE: &str = "measure";

/// Summary of a realized circuit as one engine built it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitInfo {
    /// Engine that realized the circuit.
    pub engine: String,
    /// Circuit width.
    pub num_qubits: usize,
    /// Native instructions, counting one measurement per measured qubit.
    pub num_instructions: usize,
    /// Longest chain of dependent instructions.
    pub depth: usize,
    /// Distinct native instruction names.
    pub gate_types: BTreeSet<String>,
}

impl CircuitInfo {
    /// Start accumulating instructions for `engine`.
    pub fn builder(engine: impl Into<String>, num_qubits: usize) -> CircuitInfoBuilder {
        CircuitInfoBuilder {
            engine: engine.into(),
            num_qubits,
            num_instructions: 0,
            depth: DepthCounter::new(num_qubits),
            gate_types: BTreeSet::new(),
        }
    }
}

/// Incremental builder for [`CircuitInfo`].
#[derive(Debug, Clone)]
pub struct CircuitInfoBuilder {
    engine: String,
    num_qubits: usize,
    num_instructions: usize,
    depth: DepthCounter,
    gate_types: BTreeSet<String>,
}

impl CircuitInfoBuilder {
    /// Record one native instruction.
    pub fn instruction(&mut self, name: &str, qubits: &[usize]) -> &mut Self {
        self.num_instructions += 1;
        self.depth.push(qubits);
        if !self.gate_types.contains(name) {
            self.gate_types.insert(name.to_string());
        }
        self
    }

    /// Record a measurement of every qubit.
    pub fn measure_all(&mut self) -> &mut Self {
        for q in 0..self.num_qubits {
            self.instruction(MEASURE, &[q]);
        }
        self
    }

    /// Finish.
    pub fn build(&self) -> CircuitInfo {
        CircuitInfo {
            engine: self.engine.clone(),
            num_qubits: self.num_qubits,
            num_instructions: self.num_instructions,
            depth: self.depth.depth(),
            gate_types: self.gate_types.clone(),
        }
    }
}

/// Tracks the critical path length over a sequence of instructions.
///
/// Each instruction lands one layer after the latest layer of any qubit it
/// touches.
#[derive(Debug, Clone)]
pub struct DepthCounter {
    layers: Vec<usize>,
}

impl DepthCounter {
    /// Counter for a circuit of `num_qubits` qubits.
    pub fn new(num_qubits: usize) -> Self {
        Self {
            layers: vec![0; num_qubits],
        }
    }

    /// Place an instruction acting on `qubits`; returns its layer (1-based).
    pub fn push(&mut self, qubits: &[usize]) -> usize {
        let layer = qubits
            .iter()
            .filter_map(|&q| self.layers.get(q))
            .max()
            .copied()
            .unwrap_or(0)
            + 1;
        for &q in qubits {
            if let Some(slot) = self.layers.get_mut(q) {
                *slot = layer;
            }
        }
        layer
    }

    /// Current depth.
    pub fn depth(&self) -> usize {
        self.layers.iter().copied().max().unwrap_or(0)
    }
}
