use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct Limits {
    /// Parentheses and unary signs that may be open at once
    pub max_depth: usize,
    /// Unary and binary operators in one expression
    pub max_operators: usize,
}

impl Limits {
    /// Tallest tree the parser can build within these limits
    pub fn max_height(&self) -> usize {
        self.max_operators + 1
    }
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_depth: 64,
            max_operators: 1024,
        }
    }
}
