//! The exact engine through the shared layer.

use proptest::prelude::*;
use qbridge_adapter_exact::ExactAdapter;
use qbridge_hal::{Backend, EngineConfig};
use qbridge_ir::{CircuitSpec, GateOp, GateType, library};

#[test]
fn teleportation_probabilities_sum_to_one() {
    let result = ExactAdapter::new().run(&library::teleportation().unwrap(), 4096);
    let probabilities = result.probabilities().unwrap();
    let total: f64 = probabilities.values().sum();
    assert!((total - 1.0).abs() < 1e-6);
    assert!(probabilities.keys().all(|k| k.len() == 3));
}

#[test]
fn seeded_runs_repeat() {
    let engine = ExactAdapter::from_config(&EngineConfig::new().with_seed(11));
    let spec = library::ghz(5).unwrap();
    assert_eq!(engine.run(&spec, 300).counts(), engine.run(&spec, 300).counts());
}

#[test]
fn inspect_reports_native_gates() {
    let info = ExactAdapter::new()
        .inspect(&library::teleportation().unwrap())
        .unwrap();
    assert_eq!(info.num_instructions, 8);
    let names: Vec<_> = info.gate_types.iter().map(String::as_str).collect();
    assert_eq!(names, vec!["cx", "h", "measure"]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn rotation_pair_cancels(theta in -6.0f64..6.0, qubit in 0usize..3) {
        let spec = CircuitSpec::from_ops(
            3,
            vec![
                GateOp::new(GateType::Ry, [qubit], [theta]),
                GateOp::new(GateType::Ry, [qubit], [-theta]),
            ],
            true,
        )
        .unwrap();
        let result = ExactAdapter::new().run(&spec, 32);
        prop_assert_eq!(result.counts().unwrap().get("000"), 32);
    }
}
