//! Validated circuit specification.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::GateType;

/// A gate as supplied by a caller, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawGate {
    /// Gate name or synonym.
    #[serde(rename = "type")]
    pub kind: String,
    /// Qubit operands. Signed so that negative indices surface as range errors.
    pub qubits: Vec<i64>,
    /// Gate parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<f64>,
}

impl RawGate {
    /// Create a raw gate.
    pub fn new(kind: impl Into<String>, qubits: impl Into<Vec<i64>>) -> Self {
        Self {
            kind: kind.into(),
            qubits: qubits.into(),
            params: Vec::new(),
        }
    }

    /// Attach parameters.
    #[must_use]
    pub fn with_params(mut self, params: impl Into<Vec<f64>>) -> Self {
        self.params = params.into();
        self
    }
}

/// A validated gate application.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GateOp {
    /// Canonical gate.
    #[serde(rename = "type")]
    pub gate: GateType,
    /// Qubit operands in gate order (controls first).
    pub qubits: Vec<usize>,
    /// Gate parameters.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<f64>,
}

impl GateOp {
    /// Create a gate application. Checked when the op enters a [`CircuitSpec`].
    pub fn new(gate: GateType, qubits: impl Into<Vec<usize>>, params: impl Into<Vec<f64>>) -> Self {
        Self {
            gate,
            qubits: qubits.into(),
            params: params.into(),
        }
    }

    /// First parameter, or zero for non-parametric gates.
    #[inline]
    pub fn param(&self) -> f64 {
        self.params.first().copied().unwrap_or(0.0)
    }
}

/// An engine-neutral circuit that has passed validation.
///
/// Fields are private: the only way to obtain one is through [`CircuitSpec::build`],
/// [`CircuitSpec::from_ops`] or a [`CircuitRequest`], so every instance an
/// engine adapter sees satisfies the gate, qubit and parameter invariants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircuitSpec {
    num_qubits: usize,
    gates: Vec<GateOp>,
    measure: bool,
}

impl CircuitSpec {
    /// Validate raw caller input and build a circuit.
    pub fn build(num_qubits: i64, gates: &[RawGate], measure: bool) -> IrResult<Self> {
        let width = check_width(num_qubits)?;
        let ops = gates
            .iter()
            .enumerate()
            .map(|(position, raw)| {
                let gate = GateType::from_name(&raw.kind).ok_or_else(|| IrError::UnknownGate {
                    position,
                    name: raw.kind.clone(),
                })?;
                let qubits = check_qubits(position, gate, raw.qubits.iter().copied(), width)?;
                check_params(position, gate, &raw.params)?;
                Ok(GateOp {
                    gate,
                    qubits,
                    params: raw.params.clone(),
                })
            })
            .collect::<IrResult<Vec<_>>>()?;

        Ok(Self {
            num_qubits: width,
            gates: ops,
            measure,
        })
    }

    /// Validate programmatically constructed ops and build a circuit.
    pub fn from_ops(num_qubits: usize, ops: Vec<GateOp>, measure: bool) -> IrResult<Self> {
        let width = check_width(i64::try_from(num_qubits).unwrap_or(i64::MAX))?;
        for (position, op) in ops.iter().enumerate() {
            let qubits = op.qubits.iter().map(|&q| i64::try_from(q).unwrap_or(i64::MAX));
            check_qubits(position, op.gate, qubits, width)?;
            check_params(position, op.gate, &op.params)?;
        }
        Ok(Self {
            num_qubits: width,
            gates: ops,
            measure,
        })
    }

    /// Number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Gates in execution order.
    #[inline]
    pub fn gates(&self) -> &[GateOp] {
        &self.gates
    }

    /// Number of gates.
    #[inline]
    pub fn num_gates(&self) -> usize {
        self.gates.len()
    }

    /// Whether every qubit is measured at the end.
    #[inline]
    pub fn measure(&self) -> bool {
        self.measure
    }

    /// Distinct gates used, in canonical order.
    pub fn gate_types(&self) -> std::collections::BTreeSet<GateType> {
        self.gates.iter().map(|op| op.gate).collect()
    }

    /// Same gates with a different measurement flag.
    #[must_use]
    pub fn with_measure(&self, measure: bool) -> Self {
        Self {
            measure,
            ..self.clone()
        }
    }

    /// Convert back into the raw request shape.
    pub fn to_request(&self) -> CircuitRequest {
        CircuitRequest {
            num_qubits: self.num_qubits as i64,
            gates: self
                .gates
                .iter()
                .map(|op| RawGate {
                    kind: op.gate.name().to_string(),
                    qubits: op.qubits.iter().map(|&q| q as i64).collect(),
                    params: op.params.clone(),
                })
                .collect(),
            measure: self.measure,
        }
    }
}

/// Raw circuit request as accepted on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitRequest {
    /// Requested qubit count.
    pub num_qubits: i64,
    /// Gate list in execution order.
    #[serde(default)]
    pub gates: Vec<RawGate>,
    /// Measure all qubits at the end.
    #[serde(default = "default_measure")]
    pub measure: bool,
}

fn default_measure() -> bool {
    true
}

impl CircuitRequest {
    /// Validate into a [`CircuitSpec`].
    pub fn into_spec(self) -> IrResult<CircuitSpec> {
        CircuitSpec::build(self.num_qubits, &self.gates, self.measure)
    }
}

impl TryFrom<CircuitRequest> for CircuitSpec {
    type Error = IrError;

    fn try_from(request: CircuitRequest) -> IrResult<Self> {
        request.into_spec()
    }
}

fn check_width(num_qubits: i64) -> IrResult<usize> {
    if num_qubits <= 0 {
        return Err(IrError::InvalidQubitCount(num_qubits));
    }
    usize::try_from(num_qubits).map_err(|_| IrError::InvalidQubitCount(num_qubits))
}

fn check_qubits(
    position: usize,
    gate: GateType,
    qubits: impl ExactSizeIterator<Item = i64>,
    num_qubits: usize,
) -> IrResult<Vec<usize>> {
    let expected = gate.num_qubits();
    if qubits.len() != expected {
        return Err(IrError::QubitCountMismatch {
            position,
            gate: gate.name(),
            expected,
            got: qubits.len(),
        });
    }

    let mut checked: Vec<usize> = Vec::with_capacity(expected);
    for qubit in qubits {
        let index = usize::try_from(qubit)
            .ok()
            .filter(|&q| q < num_qubits)
            .ok_or(IrError::QubitOutOfRange {
                position,
                gate: gate.name(),
                qubit,
                num_qubits,
            })?;
        if checked.contains(&index) {
            return Err(IrError::DuplicateQubit {
                position,
                gate: gate.name(),
                qubit: index,
            });
        }
        checked.push(index);
    }
    Ok(checked)
}

fn check_params(position: usize, gate: GateType, params: &[f64]) -> IrResult<()> {
    let expected = gate.num_params();
    if params.len() != expected {
        return Err(IrError::ParameterCountMismatch {
            position,
            gate: gate.name(),
            expected,
            got: params.len(),
        });
    }
    if params.iter().any(|p| !p.is_finite()) {
        return Err(IrError::NonFiniteParameter {
            position,
            gate: gate.name(),
        });
    }
    Ok(())
}
