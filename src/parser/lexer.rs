use crate::error::ParseError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number(n) => write!(f, "{}", n),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Star => write!(f, "*"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
        }
    }
}

/// A token together with the byte offset it starts at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

impl Token {
    pub fn unexpected(&self) -> ParseError {
        ParseError::UnexpectedToken {
            found: self.kind.to_string(),
            position: self.position,
        }
    }
}

/// Streaming tokenizer. Produces one token per call and never looks back.
pub struct Lexer<'a> {
    source: &'a str,
    position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
        }
    }

    fn peek_byte(&self, offset: usize) -> Option<u8> {
        self.source.as_bytes().get(self.position + offset).copied()
    }

    /// Returns the next token, `Ok(None)` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>, ParseError> {
        while let Some(b) = self.peek_byte(0) {
            if !b.is_ascii_whitespace() {
                break;
            }
            self.position += 1;
        }

        let Some(b) = self.peek_byte(0) else {
            return Ok(None);
        };
        let start = self.position;

        let kind = match b {
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'*' => TokenKind::Star,
            b'/' => TokenKind::Slash,
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'0'..=b'9' => return self.lex_number(start).map(Some),
            b'.' if self.peek_byte(1).is_some_and(|n| n.is_ascii_digit()) => {
                return self.lex_number(start).map(Some);
            }
            _ => {
                let found = self.source[start..].chars().next().unwrap_or('\u{FFFD}');
                return Err(ParseError::UnexpectedCharacter {
                    found,
                    position: start,
                });
            }
        };
        self.position += 1;
        Ok(Some(Token {
            kind,
            position: start,
        }))
    }

    fn lex_number(&mut self, start: usize) -> Result<Token, ParseError> {
        self.skip_digits();
        if self.peek_byte(0) == Some(b'.') {
            self.position += 1;
            self.skip_digits();
        }
        let literal = &self.source[start..self.position];
        let value = literal
            .parse::<f64>()
            .map_err(|_| ParseError::InvalidNumber {
                literal: literal.to_string(),
                position: start,
            })?;
        Ok(Token {
            kind: TokenKind::Number(value),
            position: start,
        })
    }

    fn skip_digits(&mut self) {
        while self.peek_byte(0).is_some_and(|b| b.is_ascii_digit()) {
            self.position += 1;
        }
    }
}
