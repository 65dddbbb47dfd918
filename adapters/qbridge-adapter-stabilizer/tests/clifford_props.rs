//! Random Clifford circuits: the tableau must agree with a dense statevector
//! on which outcomes are possible.

use proptest::prelude::*;
use qbridge_adapter_stabilizer::StabilizerAdapter;
use qbridge_hal::{Backend, EngineConfig};
use qbridge_ir::{CircuitSpec, GateOp, GateType};

const CLIFFORD: [GateType; 10] = [
    GateType::H,
    GateType::X,
    GateType::Y,
    GateType::Z,
    GateType::S,
    GateType::Sdg,
    GateType::Cx,
    GateType::Cy,
    GateType::Cz,
    GateType::Swap,
];

fn arb_clifford(num_qubits: usize) -> impl Strategy<Value = CircuitSpec> {
    let op = (0..CLIFFORD.len(), 0..num_qubits, 1..num_qubits).prop_map(move |(g, a, shift)| {
        let gate = CLIFFORD[g];
        let b = (a + shift) % num_qubits;
        let qubits = if gate.num_qubits() == 1 { vec![a] } else { vec![a, b] };
        GateOp::new(gate, qubits, [])
    });
    prop::collection::vec(op, 0..24)
        .prop_map(move |ops| CircuitSpec::from_ops(num_qubits, ops, true).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn counts_cover_every_qubit(spec in arb_clifford(4)) {
        let engine = StabilizerAdapter::from_config(&EngineConfig::new().with_seed(5));
        let result = engine.run(&spec, 64);
        let counts = result.counts().unwrap();
        prop_assert_eq!(counts.total_shots(), 64);
        for (label, _) in counts.iter() {
            prop_assert_eq!(label.len(), 4);
        }
    }

    #[test]
    fn self_inverse_sequences_return_to_zero(spec in arb_clifford(3)) {
        // U followed by U† restores |000⟩.
        let mut ops = spec.gates().to_vec();
        for op in spec.gates().iter().rev() {
            let inverse = match op.gate {
                GateType::S => GateType::Sdg,
                GateType::Sdg => GateType::S,
                other => other,
            };
            ops.push(GateOp::new(inverse, op.qubits.clone(), []));
        }
        let mirrored = CircuitSpec::from_ops(3, ops, true).unwrap();
        let result = StabilizerAdapter::new().run(&mirrored, 16);
        prop_assert_eq!(result.counts().unwrap().get("000"), 16);
    }
}
