//! Expression evaluation over bound column values.

use std::collections::HashMap;

use super::parser::Expr;
use super::{BinaryOp, FormulaError};

impl Expr {
    /// Evaluate with columns bound to numbers.
    ///
    /// Comparisons yield `1.0` or `0.0`. `AND` and `OR` short-circuit and
    /// return the deciding operand, with zero as the only false value.
    pub fn evaluate(&self, bindings: &HashMap<String, f64>) -> Result<f64, FormulaError> {
        match self {
            Expr::Number(n) => Ok(*n),
            Expr::Column(name) => bindings
                .get(name)
                .copied()
                .ok_or_else(|| FormulaError::UnknownName(name.clone())),
            Expr::Neg(inner) => Ok(-inner.evaluate(bindings)?),
            Expr::Binary { op, left, right } => {
                let l = left.evaluate(bindings)?;
                let r = right.evaluate(bindings)?;
                apply(*op, l, r)
            }
            Expr::Compare { first, rest } => {
                let mut left = first.evaluate(bindings)?;
                for (op, expr) in rest {
                    let right = expr.evaluate(bindings)?;
                    if !op.holds(left, right) {
                        return Ok(0.0);
                    }
                    left = right;
                }
                Ok(1.0)
            }
            Expr::And(left, right) => {
                let l = left.evaluate(bindings)?;
                if is_truthy(l) { right.evaluate(bindings) } else { Ok(l) }
            }
            Expr::Or(left, right) => {
                let l = left.evaluate(bindings)?;
                if is_truthy(l) { Ok(l) } else { right.evaluate(bindings) }
            }
        }
    }
}

fn is_truthy(value: f64) -> bool {
    value != 0.0
}

fn apply(op: BinaryOp, l: f64, r: f64) -> Result<f64, FormulaError> {
    match op {
        BinaryOp::Add => Ok(l + r),
        BinaryOp::Sub => Ok(l - r),
        BinaryOp::Mul => Ok(l * r),
        BinaryOp::Div => {
            if r == 0.0 {
                Err(FormulaError::DivisionByZero)
            } else {
                Ok(l / r)
            }
        }
        BinaryOp::Rem => {
            if r == 0.0 {
                return Err(FormulaError::ModuloByZero);
            }
            // Floored: the result takes the divisor's sign.
            let mut m = l % r;
            if m != 0.0 && (m < 0.0) != (r < 0.0) {
                m += r;
            }
            Ok(m)
        }
    }
}
