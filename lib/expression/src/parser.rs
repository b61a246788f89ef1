use crate::ast::{Expr, Operator, Sign};
use crate::config::Limits;
use crate::error::{ExpressionError, Parenthesis};
use crate::token::{Lexeme, Lexer, Token};

fn additive(token: Token) -> Option<Operator> {
    match token {
        Token::Plus => Some(Operator::Add),
        Token::Minus => Some(Operator::Sub),
        _ => None,
    }
}

fn multiplicative(token: Token) -> Option<Operator> {
    match token {
        Token::Star => Some(Operator::Mul),
        Token::Slash => Some(Operator::Div),
        _ => None,
    }
}

fn unexpected(lexeme: &Lexeme<'_>) -> ExpressionError {
    ExpressionError::UnexpectedToken {
        token: lexeme.fragment.to_string(),
        position: lexeme.position,
    }
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    limits: Limits,
    depth: usize,
    operators: usize,
    // Positions of the currently unclosed '('
    open: Vec<usize>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str, limits: Limits) -> Parser<'a> {
        Parser {
            lexer: Lexer::new(input),
            limits,
            depth: 0,
            operators: 0,
            open: Vec::new(),
        }
    }

    fn descend(&mut self) -> Result<(), ExpressionError> {
        self.depth += 1;
        if self.depth > self.limits.max_depth {
            return Err(ExpressionError::NestingTooDeep {
                limit: self.limits.max_depth,
            });
        }
        Ok(())
    }

    fn ascend(&mut self) {
        self.depth -= 1;
    }

    fn count_operator(&mut self) -> Result<(), ExpressionError> {
        self.operators += 1;
        if self.operators > self.limits.max_operators {
            return Err(ExpressionError::TooManyOperators {
                limit: self.limits.max_operators,
            });
        }
        Ok(())
    }

    /// Consumes the next token if it is one of the operators `select`
    /// accepts. Anything else, including unlexable input, ends the
    /// current level and is left for the caller to report.
    fn next_operator(
        &mut self,
        select: fn(Token) -> Option<Operator>,
    ) -> Result<Option<Operator>, ExpressionError> {
        let lexeme = match self.lexer.peek() {
            Ok(Some(lexeme)) => lexeme,
            _ => return Ok(None),
        };
        match select(lexeme.token) {
            Some(op) => {
                self.lexer.advance(&lexeme);
                self.count_operator()?;
                Ok(Some(op))
            }
            None => Ok(None),
        }
    }

    /// The next token where a number, sign or group must follow
    fn operand(&self) -> Result<Lexeme<'a>, ExpressionError> {
        match self.lexer.peek()? {
            Some(lexeme) => Ok(lexeme),
            None => Err(match self.open.last() {
                Some(&position) => ExpressionError::UnbalancedParenthesis {
                    kind: Parenthesis::Unclosed,
                    position,
                },
                None => ExpressionError::UnexpectedEnd,
            }),
        }
    }

    // expression := term (('+' | '-') term)*
    fn expression(&mut self) -> Result<Expr, ExpressionError> {
        let mut expr = self.term()?;
        while let Some(op) = self.next_operator(additive)? {
            let rhs = self.term()?;
            expr = Expr::binary(op, expr, rhs);
        }
        Ok(expr)
    }

    // term := factor (('*' | '/') factor)*
    fn term(&mut self) -> Result<Expr, ExpressionError> {
        let mut expr = self.factor()?;
        while let Some(op) = self.next_operator(multiplicative)? {
            let rhs = self.factor()?;
            expr = Expr::binary(op, expr, rhs);
        }
        Ok(expr)
    }

    // factor := ('+' | '-') factor | primary
    fn factor(&mut self) -> Result<Expr, ExpressionError> {
        let lexeme = self.operand()?;
        let sign = match lexeme.token {
            Token::Plus => Sign::Plus,
            Token::Minus => Sign::Minus,
            _ => return self.primary(lexeme),
        };

        self.lexer.advance(&lexeme);
        self.count_operator()?;
        self.descend()?;
        let operand = self.factor()?;
        self.ascend();
        Ok(Expr::unary(sign, operand))
    }

    // primary := NUMBER | '(' expression ')'
    fn primary(&mut self, lexeme: Lexeme<'a>) -> Result<Expr, ExpressionError> {
        match lexeme.token {
            Token::Number(n) => {
                self.lexer.advance(&lexeme);
                Ok(Expr::Literal(n))
            }
            Token::LParen => {
                self.lexer.advance(&lexeme);
                self.descend()?;
                self.open.push(lexeme.position);

                let inner = self.expression()?;
                self.close()?;

                self.open.pop();
                self.ascend();
                Ok(inner)
            }
            Token::RParen if self.open.is_empty() => Err(ExpressionError::UnbalancedParenthesis {
                kind: Parenthesis::Unopened,
                position: lexeme.position,
            }),
            _ => Err(unexpected(&lexeme)),
        }
    }

    fn close(&mut self) -> Result<(), ExpressionError> {
        match self.lexer.peek()? {
            Some(lexeme) if lexeme.token == Token::RParen => {
                self.lexer.advance(&lexeme);
                Ok(())
            }
            Some(lexeme) => Err(unexpected(&lexeme)),
            None => Err(ExpressionError::UnbalancedParenthesis {
                kind: Parenthesis::Unclosed,
                position: self.open.last().copied().unwrap_or_default(),
            }),
        }
    }

    /// Checks nothing but whitespace follows a complete expression
    fn finish(&self) -> Result<(), ExpressionError> {
        let (rest, position) = self.lexer.remaining();
        if rest.is_empty() {
            return Ok(());
        }
        if let Ok(Some(lexeme)) = self.lexer.peek() {
            if lexeme.token == Token::RParen {
                return Err(ExpressionError::UnbalancedParenthesis {
                    kind: Parenthesis::Unopened,
                    position,
                });
            }
        }
        Err(ExpressionError::TrailingInput {
            fragment: rest.trim_end().to_string(),
            position,
        })
    }
}

/// Parses `input` into a syntax tree, consuming all of it.
pub fn parse(input: &str, limits: &Limits) -> Result<Expr, ExpressionError> {
    let mut parser = Parser::new(input, *limits);
    if parser.lexer.remaining().0.is_empty() {
        return Err(ExpressionError::EmptyExpression);
    }

    let expr = parser.expression()?;
    parser.finish()?;
    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::number::Number;

    fn ast(input: &str) -> Expr {
        parse(input, &Limits::default())
            .unwrap_or_else(|e| panic!("Expression parsing failed: {}\n{}", input, e))
    }

    fn err(input: &str) -> ExpressionError {
        match parse(input, &Limits::default()) {
            Ok(expr) => panic!("{} parsed as {:?}", input, expr),
            Err(e) => e,
        }
    }

    fn int(i: i64) -> Expr {
        Expr::Literal(Number::Int(i))
    }

    #[test]
    fn test_parse_expression() {
        match ast("332+23.0- 15") {
            Expr::Binary(Operator::Sub, l, r) => {
                match *l {
                    Expr::Binary(Operator::Add, l, r) => {
                        assert_eq!(*l, int(332));
                        assert_eq!(*r, Expr::Literal(Number::Float(23.0)));
                    }
                    other => panic!("{:?} doesn't match", other),
                }
                assert_eq!(*r, int(15));
            }
            other => panic!("{:?} doesn't match", other),
        }
    }

    #[test]
    fn test_precedence() {
        assert_eq!(ast("2*3+4"), ast("(2*3)+4"));
        assert_eq!(ast("2+3*4"), ast("2+(3*4)"));
        assert_eq!(ast("2-3-4"), ast("(2-3)-4"));
        assert_eq!(ast("100/10/2"), ast("(100/10)/2"));
        assert_eq!(ast("1+2-3+4-5"), ast("(((1+2)-3)+4)-5"));
        assert_eq!(ast("-2*3"), ast("(-2)*3"));
    }

    #[test]
    fn test_parentheses_leave_no_node() {
        assert_eq!(ast("((7))"), int(7));
        assert_eq!(
            ast("(2+3)*4"),
            Expr::binary(
                Operator::Mul,
                Expr::binary(Operator::Add, int(2), int(3)),
                int(4)
            )
        );
    }

    #[test]
    fn test_unary() {
        assert_eq!(
            ast("+-5"),
            Expr::unary(Sign::Plus, Expr::unary(Sign::Minus, int(5)))
        );
        assert_eq!(
            ast("2 - -3"),
            Expr::binary(Operator::Sub, int(2), Expr::unary(Sign::Minus, int(3)))
        );
    }

    #[test]
    fn test_rejections() {
        assert_eq!(err(""), ExpressionError::EmptyExpression);
        assert_eq!(err(" \t\n"), ExpressionError::EmptyExpression);

        assert_eq!(
            err("__import__('os')"),
            ExpressionError::UnexpectedCharacter {
                character: '_',
                position: 0
            }
        );
        assert_eq!(
            err("a+1"),
            ExpressionError::UnexpectedCharacter {
                character: 'a',
                position: 0
            }
        );
        assert_eq!(
            err("2**3"),
            ExpressionError::UnexpectedToken {
                token: "*".to_string(),
                position: 2
            }
        );
        assert_eq!(
            err("1;2"),
            ExpressionError::TrailingInput {
                fragment: ";2".to_string(),
                position: 1
            }
        );
        assert_eq!(
            err("2+2 garbage "),
            ExpressionError::TrailingInput {
                fragment: "garbage".to_string(),
                position: 4
            }
        );
        assert_eq!(
            err("2 3"),
            ExpressionError::TrailingInput {
                fragment: "3".to_string(),
                position: 2
            }
        );
        assert_eq!(err("2+"), ExpressionError::UnexpectedEnd);
        assert_eq!(
            err("1 + 2.3.4"),
            ExpressionError::MalformedNumber {
                literal: "2.3.4".to_string(),
                position: 4
            }
        );
    }

    #[test]
    fn test_parentheses() {
        assert_eq!(
            err("(2+3"),
            ExpressionError::UnbalancedParenthesis {
                kind: Parenthesis::Unclosed,
                position: 0
            }
        );
        assert_eq!(
            err("1 * ((2+3)"),
            ExpressionError::UnbalancedParenthesis {
                kind: Parenthesis::Unclosed,
                position: 4
            }
        );
        assert_eq!(
            err("(1+("),
            ExpressionError::UnbalancedParenthesis {
                kind: Parenthesis::Unclosed,
                position: 3
            }
        );
        assert_eq!(
            err("2+3)"),
            ExpressionError::UnbalancedParenthesis {
                kind: Parenthesis::Unopened,
                position: 3
            }
        );
        assert_eq!(
            err("()"),
            ExpressionError::UnexpectedToken {
                token: ")".to_string(),
                position: 1
            }
        );
        assert_eq!(
            err("(2 3)"),
            ExpressionError::UnexpectedToken {
                token: "3".to_string(),
                position: 3
            }
        );
        assert_eq!(
            err("(2 x)"),
            ExpressionError::UnexpectedCharacter {
                character: 'x',
                position: 3
            }
        );
    }

    #[test]
    fn test_closing_without_open() {
        for (input, position) in &[(")", 0), ("2+)", 2), (")1", 0), ("1*)", 2), ("- )", 2)] {
            assert_eq!(
                err(input),
                ExpressionError::UnbalancedParenthesis {
                    kind: Parenthesis::Unopened,
                    position: *position
                },
                "{}",
                input
            );
        }

        // Inside a group a stray ')' is a missing operand
        assert_eq!(
            err("(1+)"),
            ExpressionError::UnexpectedToken {
                token: ")".to_string(),
                position: 3
            }
        );
    }

    #[test]
    fn test_nesting_limit() {
        let limits = Limits::default();
        let nested = |n: usize| format!("{}5{}", "(".repeat(n), ")".repeat(n));

        assert_eq!(parse(&nested(64), &limits), Ok(int(5)));
        assert_eq!(
            parse(&nested(65), &limits),
            Err(ExpressionError::NestingTooDeep { limit: 64 })
        );

        let signs = |n: usize| format!("{}5", "-".repeat(n));
        assert!(parse(&signs(64), &limits).is_ok());
        assert_eq!(
            parse(&signs(65), &limits),
            Err(ExpressionError::NestingTooDeep { limit: 64 })
        );

        // Sibling groups do not accumulate depth
        let siblings = vec![nested(64); 10].join("+");
        assert!(parse(&siblings, &limits).is_ok());
    }

    #[test]
    fn test_configured_depth() {
        let limits = Limits {
            max_depth: 2,
            ..Limits::default()
        };
        assert!(parse("-(1)", &limits).is_ok());
        assert_eq!(
            parse("-(-1)", &limits),
            Err(ExpressionError::NestingTooDeep { limit: 2 })
        );
    }

    #[test]
    fn test_operator_limit() {
        let limits = Limits {
            max_operators: 3,
            ..Limits::default()
        };
        assert!(parse("1+2*3-4", &limits).is_ok());
        assert_eq!(
            parse("1+2*3-4/5", &limits),
            Err(ExpressionError::TooManyOperators { limit: 3 })
        );
        assert_eq!(
            parse("1+2*3--4", &limits),
            Err(ExpressionError::TooManyOperators { limit: 3 })
        );

        let chain = vec!["1"; 2000].join("+");
        assert_eq!(
            parse(&chain, &Limits::default()),
            Err(ExpressionError::TooManyOperators { limit: 1024 })
        );
    }
}
