//! Arithmetic over decimal numbers with `+`, `-`, `*`, `/`, unary signs and
//! parentheses, and nothing else.
//!
//! Input is parsed by a recursive descent parser whose output type can only
//! represent that grammar, then evaluated as a pure function of the tree.

pub use ast::{Expr, Operator, Sign};
pub use config::Limits;
pub use error::{ExpressionError, Parenthesis};
pub use number::Number;
pub use parser::parse;

mod ast;
mod config;
mod error;
mod eval;
mod number;
mod parser;
mod token;

/// Parses and evaluates `input`
pub fn evaluate(input: &str, limits: &Limits) -> Result<Number, ExpressionError> {
    parse(input, limits)?.evaluate(limits)
}
