use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, digit1, multispace0},
    combinator::{map, opt, recognize, value},
    sequence::pair,
    IResult,
};

use crate::error::ExpressionError;
use crate::number::Number;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    Number(Number),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

/// A token together with the slice of input it was read from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lexeme<'a> {
    pub token: Token,
    pub fragment: &'a str,
    pub position: usize,
}

impl<'a> Lexeme<'a> {
    pub fn end(&self) -> usize {
        self.position + self.fragment.len()
    }
}

fn symbol(i: &str) -> IResult<&str, Token> {
    alt((
        value(Token::Plus, char('+')),
        value(Token::Minus, char('-')),
        value(Token::Star, char('*')),
        value(Token::Slash, char('/')),
        value(Token::LParen, char('(')),
        value(Token::RParen, char(')')),
    ))(i)
}

fn literal(i: &str) -> IResult<&str, &str> {
    recognize(pair(digit1, opt(pair(char('.'), digit1))))(i)
}

// Everything that could plausibly be meant as part of a number
fn numeric_run(i: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_digit() || c == '.')(i)
}

fn whitespace(i: &str) -> IResult<&str, &str> {
    multispace0(i)
}

/// Reads tokens on demand so the parser decides how to report input it
/// never needs to look at.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    offset: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Lexer<'a> {
        Lexer { input, offset: 0 }
    }

    fn skip_whitespace(&self) -> usize {
        let rest = &self.input[self.offset..];
        match whitespace(rest) {
            Ok((remaining, _)) => self.input.len() - remaining.len(),
            Err(_) => self.offset,
        }
    }

    /// Remaining input after any leading whitespace, with its position
    pub fn remaining(&self) -> (&'a str, usize) {
        let position = self.skip_whitespace();
        (&self.input[position..], position)
    }

    /// Returns the next token without consuming it, `None` at end of input
    pub fn peek(&self) -> Result<Option<Lexeme<'a>>, ExpressionError> {
        let (rest, position) = self.remaining();
        if rest.is_empty() {
            return Ok(None);
        }

        if let Ok((after, fragment)) = literal(rest) {
            if after.starts_with('.') {
                return Err(malformed(rest, position));
            }
            let number = Number::from_literal(fragment)?;
            return Ok(Some(Lexeme {
                token: Token::Number(number),
                fragment,
                position,
            }));
        }

        if rest.starts_with('.') {
            return Err(malformed(rest, position));
        }

        let lexed = map(symbol, move |token| (token, &rest[..1]))(rest);
        match lexed {
            Ok((_, (token, fragment))) => Ok(Some(Lexeme {
                token,
                fragment,
                position,
            })),
            Err(_) => Err(ExpressionError::UnexpectedCharacter {
                character: rest.chars().next().unwrap_or_default(),
                position,
            }),
        }
    }

    pub fn advance(&mut self, lexeme: &Lexeme<'a>) {
        self.offset = lexeme.end();
    }
}

fn malformed(rest: &str, position: usize) -> ExpressionError {
    let literal = match numeric_run(rest) {
        Ok((_, run)) => run,
        Err(_) => rest,
    };
    ExpressionError::MalformedNumber {
        literal: literal.to_string(),
        position,
    }
}
