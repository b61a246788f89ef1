use std::fmt;

use crate::error::ExpressionError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

macro_rules! checked_op {
    ( $f: ident, $checked: ident, $op: tt ) => {
        pub fn $f(self, rhs: Self) -> Result<Number, ExpressionError> {
            match (self, rhs) {
                (Self::Int(l), Self::Int(r)) => match l.$checked(r) {
                    Some(v) => Ok(Self::Int(v)),
                    None => Self::finite(l as f64 $op r as f64),
                },
                (l, r) => Self::finite(l.as_float() $op r.as_float()),
            }
        }
    };
}

impl Number {
    pub fn as_float(self) -> f64 {
        match self {
            Self::Int(i) => i as f64,
            Self::Float(f) => f,
        }
    }

    pub fn is_zero(self) -> bool {
        match self {
            Self::Int(i) => i == 0,
            Self::Float(f) => f == 0.0,
        }
    }

    /// Rejects infinities and NaN so no non-finite value ever escapes
    pub(crate) fn finite(f: f64) -> Result<Number, ExpressionError> {
        if f.is_finite() {
            Ok(Self::Float(f))
        } else {
            Err(ExpressionError::Overflow)
        }
    }

    /// Reads a literal that the lexer has already validated as
    /// `digits` or `digits.digits`
    pub(crate) fn from_literal(literal: &str) -> Result<Number, ExpressionError> {
        if !literal.contains('.') {
            if let Ok(i) = literal.parse::<i64>() {
                return Ok(Self::Int(i));
            }
        }
        literal
            .parse::<f64>()
            .map_err(|_| ExpressionError::Overflow)
            .and_then(Self::finite)
    }

    checked_op!(checked_add, checked_add, +);
    checked_op!(checked_sub, checked_sub, -);
    checked_op!(checked_mul, checked_mul, *);

    /// True division, always yielding a float
    pub fn checked_div(self, rhs: Self) -> Result<Number, ExpressionError> {
        if rhs.is_zero() {
            return Err(ExpressionError::DivisionByZero);
        }
        Self::finite(self.as_float() / rhs.as_float())
    }

    pub fn checked_neg(self) -> Result<Number, ExpressionError> {
        match self {
            Self::Int(i) => match i.checked_neg() {
                Some(v) => Ok(Self::Int(v)),
                None => Self::finite(-(i as f64)),
            },
            Self::Float(f) => Ok(Self::Float(-f)),
        }
    }
}

/// Shortest round-trip form with a two-digit signed exponent outside
/// `1e-4 <= |v| < 1e16`, and a trailing ".0" on integral values.
fn write_float(f: &mut fmt::Formatter<'_>, v: f64) -> fmt::Result {
    let sci = format!("{:e}", v);
    let (mantissa, exponent) = match sci.split_once('e') {
        Some((mantissa, exponent)) => match exponent.parse::<i32>() {
            Ok(exponent) => (mantissa, exponent),
            Err(_) => return write!(f, "{:?}", v),
        },
        None => return write!(f, "{:?}", v),
    };

    if (-4..16).contains(&exponent) {
        let plain = v.to_string();
        if plain.contains('.') {
            write!(f, "{}", plain)
        } else {
            write!(f, "{}.0", plain)
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        write!(f, "{}e{}{:02}", mantissa, sign, exponent.abs())
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(v) => write_float(f, *v),
        }
    }
}
