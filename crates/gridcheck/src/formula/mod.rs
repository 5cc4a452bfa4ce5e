//! Formula rules: arithmetic and comparison checks across columns.
//!
//! Expressions are tokenized, parsed into an [`Expr`] tree and evaluated with
//! column values bound as `f64`. Nothing is evaluated dynamically.

mod column_rule;
mod eval;
mod lexer;
mod parser;

use std::fmt;

use thiserror::Error;

pub use column_rule::{FormulaOptions, FormulaOutcome, evaluate_column_rule, parse_number};
pub use parser::Expr;

/// Why a formula could not be parsed or evaluated for a row.
///
/// Never escapes the engine as an `Err`: it becomes the reason text of a
/// `FormulaEvaluation` finding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    #[error("invalid syntax: {0}")]
    Syntax(String),

    #[error("name '{0}' is not defined")]
    UnknownName(String),

    #[error("float division by zero")]
    DivisionByZero,

    #[error("float modulo")]
    ModuloByZero,
}

/// Arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    /// Whether `left op right` holds.
    pub fn holds(self, left: f64, right: f64) -> bool {
        match self {
            CompareOp::Eq => left == right,
            CompareOp::Ne => left != right,
            CompareOp::Lt => left < right,
            CompareOp::Le => left <= right,
            CompareOp::Gt => left > right,
            CompareOp::Ge => left >= right,
        }
    }

    /// Operator spelling as written in formulas.
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
