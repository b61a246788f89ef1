use derive_more::Display;

#[derive(Debug, Display, Clone, Copy, PartialEq)]
pub enum Parenthesis {
    #[display(fmt = "Unclosed")]
    Unclosed,
    #[display(fmt = "Unmatched closing")]
    Unopened,
}

#[derive(Debug, Display, Clone, PartialEq)]
pub enum ExpressionError {
    #[display(fmt = "Unexpected character '{}' at position {}", character, position)]
    UnexpectedCharacter { character: char, position: usize },

    #[display(fmt = "{} parenthesis at position {}", kind, position)]
    UnbalancedParenthesis { kind: Parenthesis, position: usize },

    #[display(fmt = "Empty expression")]
    EmptyExpression,

    #[display(fmt = "Malformed number \"{}\" at position {}", literal, position)]
    MalformedNumber { literal: String, position: usize },

    #[display(fmt = "Unexpected trailing input \"{}\" at position {}", fragment, position)]
    TrailingInput { fragment: String, position: usize },

    #[display(fmt = "Unexpected \"{}\" at position {}", token, position)]
    UnexpectedToken { token: String, position: usize },

    #[display(fmt = "Unexpected end of expression")]
    UnexpectedEnd,

    #[display(fmt = "Expression nested deeper than {} levels", limit)]
    NestingTooDeep { limit: usize },

    #[display(fmt = "Expression contains more than {} operators", limit)]
    TooManyOperators { limit: usize },

    #[display(fmt = "Division by zero")]
    DivisionByZero,

    #[display(fmt = "Numeric value out of range")]
    Overflow,
}

impl std::error::Error for ExpressionError {}
