//! End-to-end behaviour of the statevector engine through the shared layer.

use proptest::prelude::*;
use qbridge_adapter_sim::SimAdapter;
use qbridge_hal::{Backend, EngineConfig};
use qbridge_ir::{CircuitSpec, GateOp, GateType};

fn x_on(num_qubits: usize, qubit: usize) -> CircuitSpec {
    CircuitSpec::from_ops(num_qubits, vec![GateOp::new(GateType::X, [qubit], [])], true).unwrap()
}

#[test]
fn canonical_labels_put_qubit_zero_left() {
    let result = SimAdapter::new().run(&x_on(2, 0), 100);
    assert_eq!(result.counts().unwrap().get("10"), 100);
    assert_eq!(result.metadata.extra["bit_order"], "qubit_zero_right");
}

#[test]
fn seeded_runs_repeat() {
    let engine = SimAdapter::from_config(&EngineConfig::new().with_seed(42));
    let spec = qbridge_ir::library::ghz(4).unwrap();
    let a = engine.run(&spec, 2000);
    let b = engine.run(&spec, 2000);
    assert_eq!(a.counts(), b.counts());
}

#[test]
fn unmeasured_circuit_still_samples_every_qubit() {
    let spec = x_on(3, 2).with_measure(false);
    let engine = SimAdapter::new();
    let result = engine.run(&spec, 10);
    assert_eq!(result.counts().unwrap().get("001"), 10);
    assert!(!engine.inspect(&spec).unwrap().gate_types.contains("measure"));
}

#[test]
fn export_round_trips_through_import() {
    let engine = SimAdapter::new();
    let spec = qbridge_ir::library::teleportation().unwrap();
    let qasm = engine.export(&spec).unwrap();
    let reimported = engine.import(&qasm).unwrap();
    assert_eq!(reimported, engine.inspect(&spec).unwrap());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn single_flip_lands_on_its_label(num_qubits in 1usize..8, pick in any::<prop::sample::Index>()) {
        let qubit = pick.index(num_qubits);
        let result = SimAdapter::new().run(&x_on(num_qubits, qubit), 16);
        let mut expected = vec!['0'; num_qubits];
        expected[qubit] = '1';
        let label: String = expected.into_iter().collect();
        prop_assert_eq!(result.counts().unwrap().get(&label), 16);
    }
}
