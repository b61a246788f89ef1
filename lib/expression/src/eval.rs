use crate::ast::{Expr, Operator, Sign};
use crate::config::Limits;
use crate::error::ExpressionError;
use crate::number::Number;

impl Operator {
    pub fn apply(self, left: Number, right: Number) -> Result<Number, ExpressionError> {
        match self {
            Operator::Add => left.checked_add(right),
            Operator::Sub => left.checked_sub(right),
            Operator::Mul => left.checked_mul(right),
            Operator::Div => left.checked_div(right),
        }
    }
}

impl Sign {
    pub fn apply(self, operand: Number) -> Result<Number, ExpressionError> {
        match self {
            Sign::Plus => Ok(operand),
            Sign::Minus => operand.checked_neg(),
        }
    }
}

impl Expr {
    /// Computes the value of this tree.
    ///
    /// Trees produced by [`crate::parse`] always fit within `limits`; a
    /// hand-built tree taller than [`Limits::max_height`] is rejected with
    /// [`ExpressionError::NestingTooDeep`] instead of recursing further.
    pub fn evaluate(&self, limits: &Limits) -> Result<Number, ExpressionError> {
        self.evaluate_at(1, limits.max_height())
    }

    fn evaluate_at(&self, depth: usize, max_height: usize) -> Result<Number, ExpressionError> {
        if depth > max_height {
            return Err(ExpressionError::NestingTooDeep { limit: max_height });
        }
        match self {
            Expr::Literal(v) => Ok(*v),
            Expr::Unary(sign, operand) => sign.apply(operand.evaluate_at(depth + 1, max_height)?),
            Expr::Binary(op, l, r) => {
                let left = l.evaluate_at(depth + 1, max_height)?;
                let right = r.evaluate_at(depth + 1, max_height)?;
                op.apply(left, right)
            }
        }
    }
}
