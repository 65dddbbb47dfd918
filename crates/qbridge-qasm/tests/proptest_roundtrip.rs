//! Property-based tests for QASM roundtrip conversion.
//!
//! circuit → QASM → circuit must preserve gates, operands, parameters and the
//! measurement flag.

use proptest::prelude::*;
use qbridge_ir::{CircuitSpec, GateOp, GateType};
use qbridge_qasm::{QasmError, emit, parse};

/// Random gate application on a circuit of `num_qubits` qubits.
fn arb_gate_op(num_qubits: usize) -> impl Strategy<Value = GateOp> {
    let gates: Vec<GateType> = GateType::ALL
        .into_iter()
        .filter(|g| g.num_qubits() <= num_qubits)
        .collect();
    (
        prop::sample::select(gates),
        Just((0..num_qubits).collect::<Vec<_>>()).prop_shuffle(),
        -10.0f64..10.0,
    )
        .prop_map(|(gate, order, theta)| {
            let qubits = order[..gate.num_qubits()].to_vec();
            let params = vec![theta; gate.num_params()];
            GateOp::new(gate, qubits, params)
        })
}

fn arb_circuit() -> impl Strategy<Value = CircuitSpec> {
    (1usize..=5).prop_flat_map(|num_qubits| {
        (
            prop::collection::vec(arb_gate_op(num_qubits), 0..=12),
            any::<bool>(),
        )
            .prop_map(move |(ops, measure)| {
                CircuitSpec::from_ops(num_qubits, ops, measure).expect("generated circuit is valid")
            })
    })
}

proptest! {
    #[test]
    fn roundtrip_preserves_circuit(spec in arb_circuit()) {
        let source = emit(&spec);
        let parsed = parse(&source).expect("emitted QASM parses");

        prop_assert_eq!(parsed.num_qubits(), spec.num_qubits());
        prop_assert_eq!(parsed.measure(), spec.measure());
        prop_assert_eq!(parsed.num_gates(), spec.num_gates());
        for (a, b) in parsed.gates().iter().zip(spec.gates()) {
            prop_assert_eq!(a.gate, b.gate);
            prop_assert_eq!(&a.qubits, &b.qubits);
            prop_assert_eq!(a.params.len(), b.params.len());
            for (x, y) in a.params.iter().zip(&b.params) {
                prop_assert!((x - y).abs() < 1e-9, "param {} vs {}", x, y);
            }
        }
    }

    #[test]
    fn dropping_any_measurement_is_rejected(n in 2usize..6, skip in 0usize..6) {
        let skip = skip % n;
        let mut source = format!("OPENQASM 2.0;\nqreg q[{n}];\ncreg c[{n}];\n");
        for q in (0..n).filter(|&q| q != skip) {
            source.push_str(&format!("measure q[{q}] -> c[{q}];\n"));
        }
        let rejected = matches!(parse(&source), Err(QasmError::PartialMeasurement(_)));
        prop_assert!(rejected);
    }
}

#[test]
fn canned_circuits_roundtrip_exactly() {
    for spec in [
        qbridge_ir::library::bell().unwrap(),
        qbridge_ir::library::ghz(4).unwrap(),
        qbridge_ir::library::teleportation().unwrap(),
    ] {
        assert_eq!(parse(&emit(&spec)).unwrap(), spec);
    }
}
