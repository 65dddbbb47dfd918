//! Parser for `OpenQASM` 2.0.

mod expression;

use qbridge_ir::{CircuitSpec, RawGate};

use crate::error::{QasmError, QasmResult};
use crate::lexer::{SpannedToken, Token, tokenize};

/// Widest register accepted; no engine simulates more qubits than this.
const MAX_REGISTER_SIZE: u64 = 1024;

/// Parse a QASM 2.0 source string into a validated circuit.
pub fn parse(source: &str) -> QasmResult<CircuitSpec> {
    let mut parser = Parser::new(source)?;
    parser.parse_program()?;
    parser.finish()
}

/// Register operand: a whole register or one element.
#[derive(Debug, Clone, PartialEq)]
enum Argument {
    Register(String),
    Indexed(String, u64),
}

impl Argument {
    fn register(&self) -> &str {
        match self {
            Argument::Register(name) | Argument::Indexed(name, _) => name,
        }
    }
}

/// Parser state.
pub(super) struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
    qreg: Option<(String, usize)>,
    cregs: Vec<(String, usize)>,
    gates: Vec<RawGate>,
    /// Qubits measured so far; measurement must proceed q[0], q[1], ...
    measured: usize,
}

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
impl Parser {
    fn new(source: &str) -> QasmResult<Self> {
        let tokens =
            tokenize(source).map_err(|(line, message)| QasmError::Lexer { line, message })?;
        Ok(Self {
            tokens,
            pos: 0,
            qreg: None,
            cregs: Vec::new(),
            gates: Vec::new(),
            measured: 0,
        })
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub(super) fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(1, |t| t.line)
    }

    pub(super) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    pub(super) fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos)?.token.clone();
        self.pos += 1;
        Some(token)
    }

    #[allow(clippy::needless_pass_by_value)]
    pub(super) fn expect(&mut self, expected: Token) -> QasmResult<()> {
        let line = self.line();
        let found = self
            .advance()
            .ok_or_else(|| QasmError::UnexpectedEof(format!("expected {expected}")))?;

        if std::mem::discriminant(&found) != std::mem::discriminant(&expected) {
            return Err(QasmError::UnexpectedToken {
                line,
                expected: expected.to_string(),
                found: found.to_string(),
            });
        }
        Ok(())
    }

    pub(super) fn check(&self, token: &Token) -> bool {
        self.peek()
            .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(token))
    }

    pub(super) fn consume(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn unexpected(&self, expected: &str, found: Option<Token>) -> QasmError {
        match found {
            Some(token) => QasmError::UnexpectedToken {
                line: self.line(),
                expected: expected.into(),
                found: token.to_string(),
            },
            None => QasmError::UnexpectedEof(expected.into()),
        }
    }

    fn unsupported(&self, construct: &str) -> QasmError {
        QasmError::Unsupported {
            line: self.line(),
            construct: construct.into(),
        }
    }

    fn parse_program(&mut self) -> QasmResult<()> {
        self.expect(Token::OpenQasm)?;
        self.parse_version()?;
        self.expect(Token::Semicolon)?;

        while let Some(token) = self.peek().cloned() {
            match token {
                Token::Include => {
                    self.advance();
                    match self.advance() {
                        Some(Token::StringLiteral(_)) => {}
                        other => return Err(self.unexpected("include path", other)),
                    }
                    self.expect(Token::Semicolon)?;
                }
                Token::Qreg => self.parse_qreg()?,
                Token::Creg => self.parse_creg()?,
                Token::Measure => self.parse_measure()?,
                Token::Barrier => {
                    self.advance();
                    let args = self.parse_argument_list()?;
                    for arg in &args {
                        self.resolve_qreg(arg)?;
                    }
                    self.expect(Token::Semicolon)?;
                }
                Token::Identifier(_) => self.parse_gate_call()?,
                Token::Reset => return Err(self.unsupported("reset")),
                Token::Gate | Token::Opaque => return Err(self.unsupported("gate definition")),
                Token::If => return Err(self.unsupported("classically controlled operation")),
                other => return Err(self.unexpected("statement", Some(other))),
            }
        }
        Ok(())
    }

    fn parse_version(&mut self) -> QasmResult<()> {
        match self.advance() {
            Some(Token::FloatLiteral(v)) if (2.0..3.0).contains(&v) => Ok(()),
            Some(Token::IntLiteral(2)) => Ok(()),
            Some(other) => Err(QasmError::InvalidVersion(other.to_string())),
            None => Err(QasmError::UnexpectedEof("version number".into())),
        }
    }

    fn parse_identifier(&mut self) -> QasmResult<String> {
        match self.advance() {
            Some(Token::Identifier(s)) => Ok(s),
            other => Err(self.unexpected("identifier", other)),
        }
    }

    fn parse_int_literal(&mut self) -> QasmResult<u64> {
        match self.advance() {
            Some(Token::IntLiteral(v)) => Ok(v),
            other => Err(self.unexpected("integer", other)),
        }
    }

    /// `name[size]` shared by `qreg` and `creg`.
    fn parse_declaration(&mut self) -> QasmResult<(String, usize)> {
        self.advance();
        let name = self.parse_identifier()?;
        self.expect(Token::LBracket)?;
        let size = self.parse_int_literal()?;
        if size > MAX_REGISTER_SIZE {
            return Err(QasmError::RegisterTooLarge {
                register: name,
                size,
                max: MAX_REGISTER_SIZE,
            });
        }
        let size = size as usize;
        self.expect(Token::RBracket)?;
        self.expect(Token::Semicolon)?;
        if self.is_declared(&name) {
            return Err(QasmError::DuplicateRegister(name));
        }
        Ok((name, size))
    }

    fn is_declared(&self, name: &str) -> bool {
        self.qreg.as_ref().is_some_and(|(q, _)| q == name)
            || self.cregs.iter().any(|(c, _)| c == name)
    }

    fn parse_qreg(&mut self) -> QasmResult<()> {
        let line = self.line();
        let decl = self.parse_declaration()?;
        if self.qreg.is_some() {
            return Err(QasmError::Unsupported {
                line,
                construct: "multiple quantum registers".into(),
            });
        }
        self.qreg = Some(decl);
        Ok(())
    }

    fn parse_creg(&mut self) -> QasmResult<()> {
        let decl = self.parse_declaration()?;
        self.cregs.push(decl);
        Ok(())
    }

    fn parse_argument(&mut self) -> QasmResult<Argument> {
        let name = self.parse_identifier()?;
        if self.consume(&Token::LBracket) {
            let index = self.parse_int_literal()?;
            self.expect(Token::RBracket)?;
            Ok(Argument::Indexed(name, index))
        } else {
            Ok(Argument::Register(name))
        }
    }

    fn parse_argument_list(&mut self) -> QasmResult<Vec<Argument>> {
        let mut args = vec![self.parse_argument()?];
        while self.consume(&Token::Comma) {
            args.push(self.parse_argument()?);
        }
        Ok(args)
    }

    /// Check a quantum operand; returns the register size.
    fn resolve_qreg(&self, arg: &Argument) -> QasmResult<usize> {
        let (name, size) = self
            .qreg
            .as_ref()
            .filter(|(name, _)| name == arg.register())
            .ok_or_else(|| QasmError::UndefinedRegister(arg.register().to_string()))?;
        if let Argument::Indexed(_, index) = arg {
            if *index as usize >= *size {
                return Err(QasmError::IndexOutOfBounds {
                    register: name.clone(),
                    index: *index,
                    size: *size,
                });
            }
        }
        Ok(*size)
    }

    /// Check a classical operand; returns the register size.
    fn resolve_creg(&self, arg: &Argument) -> QasmResult<usize> {
        let (name, size) = self
            .cregs
            .iter()
            .find(|(name, _)| name == arg.register())
            .ok_or_else(|| QasmError::UndefinedRegister(arg.register().to_string()))?;
        if let Argument::Indexed(_, index) = arg {
            if *index as usize >= *size {
                return Err(QasmError::IndexOutOfBounds {
                    register: name.clone(),
                    index: *index,
                    size: *size,
                });
            }
        }
        Ok(*size)
    }

    fn parse_gate_call(&mut self) -> QasmResult<()> {
        let line = self.line();
        let name = self.parse_identifier()?;
        let params = if self.consume(&Token::LParen) {
            let params = self.parse_expression_list()?;
            self.expect(Token::RParen)?;
            params
        } else {
            Vec::new()
        };
        let args = self.parse_argument_list()?;
        self.expect(Token::Semicolon)?;

        if self.measured > 0 {
            return Err(QasmError::PartialMeasurement(format!(
                "gate '{name}' at line {line} follows a measurement"
            )));
        }

        let mut qubits = Vec::with_capacity(args.len());
        for arg in &args {
            let size = self.resolve_qreg(arg)?;
            match arg {
                Argument::Indexed(_, index) => qubits.push(*index as i64),
                Argument::Register(_) if args.len() == 1 => {
                    for q in 0..size {
                        self.gates
                            .push(RawGate::new(name.clone(), [q as i64]).with_params(params.clone()));
                    }
                    return Ok(());
                }
                Argument::Register(_) => {
                    return Err(QasmError::Unsupported {
                        line,
                        construct: format!("register broadcast on multi-qubit gate '{name}'"),
                    });
                }
            }
        }
        self.gates.push(RawGate::new(name, qubits).with_params(params));
        Ok(())
    }

    fn parse_measure(&mut self) -> QasmResult<()> {
        self.advance();
        let source = self.parse_argument()?;
        self.expect(Token::Arrow)?;
        let target = self.parse_argument()?;
        self.expect(Token::Semicolon)?;

        let qsize = self.resolve_qreg(&source)?;
        let csize = self.resolve_creg(&target)?;

        match (&source, &target) {
            (Argument::Register(_), Argument::Register(_)) => {
                if self.measured > 0 {
                    return Err(QasmError::PartialMeasurement(
                        "register measured after individual qubits".into(),
                    ));
                }
                if csize != qsize {
                    return Err(QasmError::PartialMeasurement(format!(
                        "classical register of size {csize} cannot hold {qsize} qubits"
                    )));
                }
                self.measured = qsize;
            }
            (Argument::Indexed(_, q), Argument::Indexed(_, c)) => {
                let q = *q as usize;
                if q != self.measured || *c as usize != q {
                    return Err(QasmError::PartialMeasurement(format!(
                        "measurements must map q[i] -> c[i] in ascending order; expected q[{0}] -> c[{0}]",
                        self.measured
                    )));
                }
                self.measured += 1;
            }
            _ => {
                return Err(QasmError::PartialMeasurement(
                    "mixed register and indexed measurement operands".into(),
                ));
            }
        }
        Ok(())
    }

    fn finish(self) -> QasmResult<CircuitSpec> {
        let (_, num_qubits) = self
            .qreg
            .ok_or_else(|| QasmError::UndefinedRegister("no qreg declared".into()))?;

        let measure = match self.measured {
            0 => false,
            m if m == num_qubits => true,
            m => {
                return Err(QasmError::PartialMeasurement(format!(
                    "{m} of {num_qubits} qubits measured"
                )));
            }
        };

        Ok(CircuitSpec::build(num_qubits as i64, &self.gates, measure)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qbridge_ir::GateType;

    const BELL: &str = r#"
        OPENQASM 2.0;
        include "qelib1.inc";
        qreg q[2];
        creg c[2];
        h q[0];
        cx q[0],q[1];
        measure q[0] -> c[0];
        measure q[1] -> c[1];
    "#;

    #[test]
    fn test_parse_bell() {
        let spec = parse(BELL).unwrap();
        assert_eq!(spec, qbridge_ir::library::bell().unwrap());
    }

    #[test]
    fn test_register_measure() {
        let spec = parse("OPENQASM 2.0; qreg q[3]; creg c[3]; x q[2]; measure q -> c;").unwrap();
        assert!(spec.measure());
        assert_eq!(spec.num_qubits(), 3);
    }

    #[test]
    fn test_unmeasured() {
        let spec = parse("OPENQASM 2.0; qreg q[1]; h q[0];").unwrap();
        assert!(!spec.measure());
    }

    #[test]
    fn test_broadcast_single_qubit_gate() {
        let spec = parse("OPENQASM 2.0; qreg q[3]; h q; barrier q;").unwrap();
        assert_eq!(spec.num_gates(), 3);
        assert!(spec.gates().iter().all(|g| g.gate == GateType::H));
    }

    #[test]
    fn test_parameters() {
        let spec = parse("OPENQASM 2.0; qreg q[2]; rz(-pi/2) q[0]; cp(2*pi/8) q[0],q[1];").unwrap();
        let gates = spec.gates();
        assert!((gates[0].param() + std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!((gates[1].param() - std::f64::consts::FRAC_PI_4).abs() < 1e-12);
    }

    #[test]
    fn test_partial_measurement_rejected() {
        let err = parse("OPENQASM 2.0; qreg q[2]; creg c[2]; measure q[0] -> c[0];").unwrap_err();
        assert!(matches!(err, QasmError::PartialMeasurement(_)));

        let err = parse("OPENQASM 2.0; qreg q[2]; creg c[2]; measure q[1] -> c[1]; measure q[0] -> c[0];")
            .unwrap_err();
        assert!(matches!(err, QasmError::PartialMeasurement(_)));

        let err = parse("OPENQASM 2.0; qreg q[1]; creg c[1]; measure q[0] -> c[0]; x q[0];")
            .unwrap_err();
        assert!(matches!(err, QasmError::PartialMeasurement(_)));
    }

    #[test]
    fn test_unsupported_constructs() {
        for source in [
            "OPENQASM 2.0; qreg q[1]; reset q[0];",
            "OPENQASM 2.0; gate foo a { h a; }",
            "OPENQASM 2.0; qreg q[1]; creg c[1]; if (c==1) x q[0];",
            "OPENQASM 2.0; qreg a[1]; qreg b[1];",
        ] {
            assert!(
                matches!(parse(source), Err(QasmError::Unsupported { .. })),
                "{source}"
            );
        }
    }

    #[test]
    fn test_version_and_registers() {
        assert!(matches!(
            parse("OPENQASM 3.0; qubit[1] q;"),
            Err(QasmError::InvalidVersion(_))
        ));
        assert!(matches!(
            parse("OPENQASM 2.0; qreg q[1]; h r[0];"),
            Err(QasmError::UndefinedRegister(_))
        ));
        assert!(matches!(
            parse("OPENQASM 2.0; qreg q[1]; h q[4];"),
            Err(QasmError::IndexOutOfBounds { index: 4, .. })
        ));
    }

    #[test]
    fn test_oversized_register_rejected() {
        let err = parse("OPENQASM 2.0; qreg q[4000000000]; h q;").unwrap_err();
        assert!(matches!(
            err,
            QasmError::RegisterTooLarge { size: 4_000_000_000, max: MAX_REGISTER_SIZE, .. }
        ));
        assert!(matches!(
            parse("OPENQASM 2.0; qreg q[2]; creg c[18446744073709551615];"),
            Err(QasmError::RegisterTooLarge { .. })
        ));

        let spec = parse("OPENQASM 2.0; qreg q[1024]; x q[1023];").unwrap();
        assert_eq!(spec.num_qubits(), 1024);
    }

    #[test]
    fn test_unknown_gate_surfaces_circuit_error() {
        let err = parse("OPENQASM 2.0; qreg q[1]; u3(0,0,0) q[0];").unwrap_err();
        assert!(matches!(err, QasmError::Circuit(qbridge_ir::IrError::UnknownGate { .. })));
    }
}
