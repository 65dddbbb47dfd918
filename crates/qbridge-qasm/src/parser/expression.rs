//! Parameter expressions, evaluated as they are parsed.

use super::Parser;
use crate::error::{QasmError, QasmResult};
use crate::lexer::Token;

#[derive(Debug, Clone, Copy, PartialEq)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinOp {
    fn precedence(self) -> u8 {
        match self {
            BinOp::Add | BinOp::Sub => 1,
            BinOp::Mul | BinOp::Div => 2,
            BinOp::Pow => 3,
        }
    }

    fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            BinOp::Add => left + right,
            BinOp::Sub => left - right,
            BinOp::Mul => left * right,
            BinOp::Div => left / right,
            BinOp::Pow => left.powf(right),
        }
    }
}

impl Parser {
    /// Parse and evaluate an expression.
    pub(super) fn parse_expression(&mut self) -> QasmResult<f64> {
        self.parse_binary_expr(0)
    }

    /// Precedence climbing; `^` is right-associative.
    fn parse_binary_expr(&mut self, min_prec: u8) -> QasmResult<f64> {
        let mut left = self.parse_unary_expr()?;

        while let Some(op) = self.peek_binary_op() {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.advance();

            let next_min = if op == BinOp::Pow { prec } else { prec + 1 };
            let right = self.parse_binary_expr(next_min)?;
            left = op.apply(left, right);
        }

        Ok(left)
    }

    fn parse_unary_expr(&mut self) -> QasmResult<f64> {
        if self.consume(&Token::Minus) {
            return Ok(-self.parse_unary_expr()?);
        }
        if self.consume(&Token::Plus) {
            return self.parse_unary_expr();
        }
        self.parse_primary_expr()
    }

    #[allow(clippy::cast_precision_loss)]
    fn parse_primary_expr(&mut self) -> QasmResult<f64> {
        let line = self.line();
        let token = self
            .advance()
            .ok_or_else(|| QasmError::UnexpectedEof("expression".into()))?;

        match token {
            Token::IntLiteral(v) => Ok(v as f64),
            Token::FloatLiteral(v) => Ok(v),
            Token::Pi => Ok(std::f64::consts::PI),
            Token::LParen => {
                let value = self.parse_expression()?;
                self.expect(Token::RParen)?;
                Ok(value)
            }
            Token::Identifier(name) => {
                let function: fn(f64) -> f64 = match name.as_str() {
                    "sin" => f64::sin,
                    "cos" => f64::cos,
                    "tan" => f64::tan,
                    "exp" => f64::exp,
                    "ln" => f64::ln,
                    "sqrt" => f64::sqrt,
                    _ => {
                        return Err(QasmError::Expression {
                            line,
                            message: format!("unknown identifier '{name}'"),
                        });
                    }
                };
                self.expect(Token::LParen)?;
                let arg = self.parse_expression()?;
                self.expect(Token::RParen)?;
                Ok(function(arg))
            }
            other => Err(QasmError::UnexpectedToken {
                line,
                expected: "expression".into(),
                found: other.to_string(),
            }),
        }
    }

    fn peek_binary_op(&self) -> Option<BinOp> {
        match self.peek()? {
            Token::Plus => Some(BinOp::Add),
            Token::Minus => Some(BinOp::Sub),
            Token::Star => Some(BinOp::Mul),
            Token::Slash => Some(BinOp::Div),
            Token::Caret => Some(BinOp::Pow),
            _ => None,
        }
    }

    /// Comma-separated expressions up to (not including) `)`.
    pub(super) fn parse_expression_list(&mut self) -> QasmResult<Vec<f64>> {
        if self.check(&Token::RParen) {
            return Ok(vec![]);
        }
        let mut values = vec![self.parse_expression()?];
        while self.consume(&Token::Comma) {
            values.push(self.parse_expression()?);
        }
        Ok(values)
    }
}
