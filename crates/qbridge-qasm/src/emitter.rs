//! QASM 2.0 emitter.

use std::fmt::Write;

use qbridge_ir::{CircuitSpec, GateOp};

/// Emit a circuit as QASM 2.0 source code.
///
/// Register declarations use `qreg q[n];` and, when the circuit is measured,
/// `creg c[n];` followed by one `measure q[i] -> c[i];` per qubit.
pub fn emit(spec: &CircuitSpec) -> String {
    let mut out = String::new();
    out.push_str("OPENQASM 2.0;\n");
    out.push_str("include \"qelib1.inc\";\n");

    let n = spec.num_qubits();
    let _ = writeln!(out, "qreg q[{n}];");
    if spec.measure() {
        let _ = writeln!(out, "creg c[{n}];");
    }

    for op in spec.gates() {
        emit_gate(&mut out, op);
    }

    if spec.measure() {
        for q in 0..n {
            let _ = writeln!(out, "measure q[{q}] -> c[{q}];");
        }
    }
    out
}

fn emit_gate(out: &mut String, op: &GateOp) {
    let qubits = op
        .qubits
        .iter()
        .map(|q| format!("q[{q}]"))
        .collect::<Vec<_>>()
        .join(",");
    if op.params.is_empty() {
        let _ = writeln!(out, "{} {qubits};", op.gate);
    } else {
        let params = op
            .params
            .iter()
            .map(|&v| format_param(v))
            .collect::<Vec<_>>()
            .join(",");
        let _ = writeln!(out, "{}({params}) {qubits};", op.gate);
    }
}

/// Format a parameter, using `pi` fractions where the value is close to one.
pub(crate) fn format_param(v: f64) -> String {
    const FRACTIONS: [(f64, &str); 4] = [
        (1.0, "pi"),
        (0.5, "pi/2"),
        (0.25, "pi/4"),
        (0.125, "pi/8"),
    ];
    let pi = std::f64::consts::PI;
    for (fraction, text) in FRACTIONS {
        if (v - pi * fraction).abs() < 1e-10 {
            return text.to_string();
        }
        if (v + pi * fraction).abs() < 1e-10 {
            return format!("-{text}");
        }
    }
    // Debug keeps full precision and switches to exponent form for extreme
    // magnitudes, both of which the lexer reads back exactly.
    format!("{v:?}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use qbridge_ir::library;

    #[test]
    fn test_emit_bell() {
        let qasm = emit(&library::bell().unwrap());
        assert!(qasm.starts_with("OPENQASM 2.0;"));
        assert!(qasm.contains("qreg q[2];"));
        assert!(qasm.contains("creg c[2];"));
        assert!(qasm.contains("h q[0];"));
        assert!(qasm.contains("cx q[0],q[1];"));
        assert!(qasm.contains("measure q[1] -> c[1];"));
    }

    #[test]
    fn test_unmeasured_has_no_creg() {
        let spec = library::bell().unwrap().with_measure(false);
        let qasm = emit(&spec);
        assert!(!qasm.contains("creg"));
        assert!(!qasm.contains("measure"));
    }

    #[test]
    fn test_format_param() {
        let pi = std::f64::consts::PI;
        assert_eq!(format_param(pi), "pi");
        assert_eq!(format_param(-pi / 2.0), "-pi/2");
        assert_eq!(format_param(pi / 8.0), "pi/8");
        assert_eq!(format_param(0.3), "0.3");
        assert_eq!(format_param(1.0), "1.0");
        assert_eq!(format_param(1e300), "1e300");
    }
}
