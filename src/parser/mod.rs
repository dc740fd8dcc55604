//! Recursive-descent parser for numeric field expressions.
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := '-'* primary
//! primary := NUMBER | '(' expr ')'
//! ```
//!
//! Recursion only happens through parentheses, and their depth is capped by
//! [`ExpressionLimits::max_depth`], so malformed input is rejected in a single
//! left-to-right pass.

use crate::ast::Expression;
use crate::config::ExpressionLimits;
use crate::error::ParseError;

pub mod lexer;

use lexer::{Lexer, Token, TokenKind};

/// Parses `source` into an [`Expression`] under the given limits.
pub fn parse(source: &str, limits: &ExpressionLimits) -> Result<Expression, ParseError> {
    if source.len() > limits.max_length {
        return Err(ParseError::TooLong {
            length: source.len(),
            limit: limits.max_length,
        });
    }
    if source.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let mut parser = Parser::new(source, limits)?;
    let expr = parser.parse_expr()?;
    match parser.lookahead {
        None => Ok(expr),
        Some(Token {
            kind: TokenKind::RParen,
            position,
        }) => Err(ParseError::UnmatchedParenthesis { position }),
        Some(token) => Err(token.unexpected()),
    }
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    lookahead: Option<Token>,
    max_depth: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str, limits: &ExpressionLimits) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(source);
        let lookahead = lexer.next_token()?;
        Ok(Self {
            lexer,
            lookahead,
            max_depth: limits.max_depth,
            depth: 0,
        })
    }

    /// Consumes the current token and pulls the next one from the lexer.
    fn advance(&mut self) -> Result<Option<Token>, ParseError> {
        let current = self.lookahead.take();
        self.lookahead = self.lexer.next_token()?;
        Ok(current)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.lookahead.map(|t| t.kind)
    }

    fn parse_expr(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_term()?;
        loop {
            match self.peek_kind() {
                Some(TokenKind::Plus) => {
                    self.advance()?;
                    left = Expression::sum(left, self.parse_term()?);
                }
                Some(TokenKind::Minus) => {
                    self.advance()?;
                    left = Expression::subtract(left, self.parse_term()?);
                }
                _ => return Ok(left),
            }
        }
    }

    fn parse_term(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_unary()?;
        loop {
            match self.peek_kind() {
                Some(TokenKind::Star) => {
                    self.advance()?;
                    left = Expression::multiply(left, self.parse_unary()?);
                }
                Some(TokenKind::Slash) => {
                    self.advance()?;
                    left = Expression::divide(left, self.parse_unary()?);
                }
                _ => return Ok(left),
            }
        }
    }

    fn parse_unary(&mut self) -> Result<Expression, ParseError> {
        // Runs of '-' fold into at most one Negate node.
        let mut negated = false;
        while self.peek_kind() == Some(TokenKind::Minus) {
            self.advance()?;
            negated = !negated;
        }
        let operand = self.parse_primary()?;
        Ok(if negated {
            Expression::negate(operand)
        } else {
            operand
        })
    }

    fn parse_primary(&mut self) -> Result<Expression, ParseError> {
        let token = self.advance()?.ok_or(ParseError::UnexpectedEnd)?;
        match token.kind {
            TokenKind::Number(n) => Ok(Expression::Literal(n)),
            TokenKind::LParen => {
                self.depth += 1;
                if self.depth > self.max_depth {
                    return Err(ParseError::NestingTooDeep {
                        limit: self.max_depth,
                    });
                }
                let inner = self.parse_expr()?;
                match self.lookahead {
                    Some(Token {
                        kind: TokenKind::RParen,
                        ..
                    }) => {
                        self.advance()?;
                        self.depth -= 1;
                        Ok(inner)
                    }
                    None => Err(ParseError::UnclosedParenthesis {
                        opened_at: token.position,
                    }),
                    Some(other) => Err(other.unexpected()),
                }
            }
            TokenKind::RParen if self.depth == 0 => Err(ParseError::UnmatchedParenthesis {
                position: token.position,
            }),
            _ => Err(token.unexpected()),
        }
    }
}
