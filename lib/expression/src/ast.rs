use crate::number::Number;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sign {
    Plus,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

/// Syntax tree of an arithmetic expression.
///
/// Only numbers, signs and the four binary operators can be represented;
/// grouping parentheses leave no node behind.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Number),
    Unary(Sign, Box<Expr>),
    Binary(Operator, Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn unary(sign: Sign, operand: Expr) -> Expr {
        Expr::Unary(sign, Box::new(operand))
    }

    pub fn binary(operator: Operator, left: Expr, right: Expr) -> Expr {
        Expr::Binary(operator, Box::new(left), Box::new(right))
    }
}
