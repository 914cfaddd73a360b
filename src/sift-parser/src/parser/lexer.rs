//! Tokenizer
//!
//! Turns filter text into a flat token list. Positions are character
//! offsets, so they line up with what a user sees in the expression.

use crate::ast::{lookup_keyword, Conjunctive, Keyword, Literal, Operator};
use crate::error::{ParseError, Result};
use crate::target::{breaks_pointer, parse_pointer, Target};

use super::literals::{is_delimiter, number_text, string_len, word_text};

/// Kinds of token, with their decoded payload
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// `(`
    GroupOpen,
    /// `)`
    GroupClose,
    /// JSON pointer
    Field(Target),
    /// Quoted string, without the quotes
    String(String),
    /// Integer or floating point number
    Number(Literal),
    /// `true` or `false`
    Boolean(bool),
    /// Clause operator keyword
    Operator(Operator),
    /// `and` or `or`
    Conjunctive(Conjunctive),
    /// `,`
    Comma,
    /// `[`
    ArrayOpen,
    /// `]`
    ArrayClose,
}

/// One token with its source text and character offset
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    /// What the token is
    pub kind: TokenKind,
    /// Source text of the token
    pub text: &'a str,
    /// Character offset of the first character
    pub position: usize,
}

/// Split `input` into tokens
pub fn tokenize(input: &str) -> Result<Vec<Token<'_>>> {
    Lexer::new(input).run()
}

struct Lexer<'a> {
    input: &'a str,
    /// byte offset into `input`
    offset: usize,
    /// character offset into `input`
    position: usize,
    tokens: Vec<Token<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Lexer {
            input,
            offset: 0,
            position: 0,
            tokens: Vec::new(),
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.offset..]
    }

    fn run(mut self) -> Result<Vec<Token<'a>>> {
        while let Some(c) = self.rest().chars().next() {
            match c {
                c if c.is_ascii_whitespace() => self.skip(c.len_utf8()),
                '(' => self.push(TokenKind::GroupOpen, 1),
                ')' => self.push(TokenKind::GroupClose, 1),
                '[' => self.push(TokenKind::ArrayOpen, 1),
                ']' => self.push(TokenKind::ArrayClose, 1),
                ',' => self.push(TokenKind::Comma, 1),
                '"' => self.string()?,
                '/' => self.field()?,
                '-' | '0'..='9' => self.number()?,
                c if c.is_ascii_alphabetic() => self.word()?,
                found => {
                    return Err(ParseError::UnexpectedCharacter {
                        found,
                        position: self.position,
                    })
                }
            }
        }
        Ok(self.tokens)
    }

    fn skip(&mut self, len: usize) {
        let consumed = &self.input[self.offset..self.offset + len];
        self.position += consumed.chars().count();
        self.offset += len;
    }

    fn push(&mut self, kind: TokenKind, len: usize) {
        let text = &self.input[self.offset..self.offset + len];
        self.tokens.push(Token {
            kind,
            text,
            position: self.position,
        });
        self.skip(len);
    }

    fn string(&mut self) -> Result<()> {
        let len = string_len(self.rest()).ok_or(ParseError::UnterminatedString {
            position: self.position,
        })?;
        let content = &self.rest()[1..len - 1];
        self.push(TokenKind::String(content.to_string()), len);
        Ok(())
    }

    fn field(&mut self) -> Result<()> {
        let rest = self.rest();
        let len = rest.find(breaks_pointer).unwrap_or(rest.len());
        let path = parse_pointer(&rest[..len]).map_err(|(offset, message)| {
            ParseError::InvalidPointer {
                message,
                position: self.position + offset,
            }
        })?;
        let target = Target::from_segments(path).map_err(|e| ParseError::InvalidPointer {
            message: e.to_string(),
            position: self.position,
        })?;
        self.push(TokenKind::Field(target), len);
        Ok(())
    }

    fn number(&mut self) -> Result<()> {
        let (remaining, text) =
            number_text(self.rest()).map_err(|_| ParseError::UnexpectedCharacter {
                found: '-',
                position: self.position,
            })?;
        if let Some(next) = remaining.chars().next().filter(|&c| !is_delimiter(c)) {
            return Err(ParseError::UnexpectedCharacter {
                found: next,
                position: self.position + text.chars().count(),
            });
        }
        let literal = number_literal(text).ok_or_else(|| ParseError::InvalidNumber {
            number: text.to_string(),
            position: self.position,
        })?;
        self.push(TokenKind::Number(literal), text.len());
        Ok(())
    }

    fn word(&mut self) -> Result<()> {
        let word = match word_text(self.rest()) {
            Ok((_, word)) => word,
            Err(_) => {
                return Err(ParseError::UnexpectedCharacter {
                    found: self.rest().chars().next().unwrap_or_default(),
                    position: self.position,
                })
            }
        };
        let kind = match lookup_keyword(word) {
            Some(Keyword::Operator(operator)) => TokenKind::Operator(operator),
            Some(Keyword::Conjunctive(conjunctive)) => TokenKind::Conjunctive(conjunctive),
            Some(Keyword::Boolean(value)) => TokenKind::Boolean(value),
            None => {
                return Err(ParseError::UnknownKeyword {
                    word: word.to_string(),
                    position: self.position,
                })
            }
        };
        self.push(kind, word.len());
        Ok(())
    }
}

/// Integers that fit `i64` stay exact; everything else is a finite float
fn number_literal(text: &str) -> Option<Literal> {
    let is_integral = !text.contains(['.', 'e', 'E']);
    if is_integral {
        if let Ok(int) = text.parse::<i64>() {
            return Some(Literal::Int(int));
        }
    }
    text.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(Literal::Float)
}
