//! Recursive descent over the token list
//!
//! ```text
//! filter := term (conjunctive term)*
//! term   := '(' filter ')' | clause
//! clause := operand operator object
//! ```
//!
//! The object grammar depends on the operator class.

use crate::ast::{
    ArrayObject, Clause, Filter, Literal, Node, Object, Operand, OperatorClass, Range,
};
use crate::error::{ParseError, Result};
use crate::pattern::Like;

use super::lexer::{Token, TokenKind};

const OPERAND: &[&str] = &["field reference", "literal"];
const LITERAL: &[&str] = &["string", "number", "boolean"];
const OPERATOR: &[&str] = &["operator"];

pub(crate) struct TokenStream<'t, 'a> {
    tokens: &'t [Token<'a>],
    cursor: usize,
    /// input length in characters, reported for errors at end of input
    end: usize,
    max_depth: usize,
}

impl<'t, 'a> TokenStream<'t, 'a> {
    pub(crate) fn new(tokens: &'t [Token<'a>], end: usize, max_depth: usize) -> Self {
        TokenStream {
            tokens,
            cursor: 0,
            end,
            max_depth,
        }
    }

    fn peek(&self) -> Option<&'t Token<'a>> {
        self.tokens.get(self.cursor)
    }

    fn next(&mut self) -> Option<&'t Token<'a>> {
        let token = self.tokens.get(self.cursor)?;
        self.cursor += 1;
        Some(token)
    }

    fn unexpected(&self, token: Option<&Token<'_>>, expected: &[&str]) -> ParseError {
        let expected = expected.iter().map(ToString::to_string).collect();
        match token {
            Some(token) => ParseError::UnexpectedToken {
                found: token.text.to_string(),
                expected,
                position: token.position,
            },
            None => ParseError::UnexpectedEnd {
                expected,
                position: self.end,
            },
        }
    }

    /// Parse the whole token list as the root filter
    pub(crate) fn filter(&mut self) -> Result<Filter> {
        self.statements(0, None)
    }

    /// Parse statements until end of input (root) or the `)` closing `open`
    fn statements(&mut self, depth: usize, open: Option<&Token<'_>>) -> Result<Filter> {
        let mut filter = Filter::from_node(self.term(depth)?);
        loop {
            let Some(token) = self.next() else {
                return match open {
                    Some(open) => Err(ParseError::UnclosedGroup {
                        position: open.position,
                    }),
                    None => Ok(filter),
                };
            };
            match &token.kind {
                TokenKind::Conjunctive(conjunctive) => {
                    let node = self.term(depth)?;
                    filter = filter.push(*conjunctive, node);
                }
                TokenKind::GroupClose if open.is_some() => return Ok(filter),
                TokenKind::GroupClose => {
                    return Err(ParseError::UnmatchedGroupClose {
                        position: token.position,
                    })
                }
                _ if open.is_some() => return Err(self.unexpected(Some(token), &["and", "or", ")"])),
                _ => return Err(self.unexpected(Some(token), &["and", "or", "end of input"])),
            }
        }
    }

    fn term(&mut self, depth: usize) -> Result<Node> {
        match self.peek() {
            Some(open) if open.kind == TokenKind::GroupOpen => {
                self.cursor += 1;
                if depth >= self.max_depth {
                    return Err(ParseError::NestingTooDeep {
                        max_depth: self.max_depth,
                        position: open.position,
                    });
                }
                let group = self.statements(depth + 1, Some(open))?;
                Ok(Node::Group(group))
            }
            _ => Ok(Node::Clause(self.clause()?)),
        }
    }

    fn clause(&mut self) -> Result<Clause> {
        let subject = self.operand()?;
        let operator = match self.next() {
            Some(Token {
                kind: TokenKind::Operator(operator),
                ..
            }) => *operator,
            other => return Err(self.unexpected(other, OPERATOR)),
        };
        let object = match operator.class() {
            OperatorClass::Compare => Object::Operand(self.operand()?),
            OperatorClass::Array => Object::Array(self.array_object()?),
            OperatorClass::Range => Object::Range(self.range()?),
            OperatorClass::Search => Object::Like(self.pattern()?),
        };
        Ok(Clause::from_parts(subject, operator, object))
    }

    fn operand(&mut self) -> Result<Operand> {
        let token = self.next();
        if let Some(Token {
            kind: TokenKind::Field(target),
            ..
        }) = token
        {
            return Ok(Operand::Target(target.clone()));
        }
        literal_of(token)
            .map(Operand::Literal)
            .ok_or_else(|| self.unexpected(token, OPERAND))
    }

    fn literal(&mut self) -> Result<(Literal, usize)> {
        let token = self.next();
        match literal_of(token) {
            Some(literal) => Ok((literal, token.map_or(self.end, |t| t.position))),
            None => Err(self.unexpected(token, LITERAL)),
        }
    }

    fn array_object(&mut self) -> Result<ArrayObject> {
        match self.next() {
            Some(Token {
                kind: TokenKind::Field(target),
                ..
            }) => Ok(ArrayObject::Target(target.clone())),
            Some(Token {
                kind: TokenKind::ArrayOpen,
                ..
            }) => self.literal_list().map(ArrayObject::Literals),
            other => Err(self.unexpected(other, &["[", "field reference"])),
        }
    }

    /// The part of `[a,b,c]` after the opening bracket
    fn literal_list(&mut self) -> Result<Vec<Literal>> {
        let mut values = Vec::new();
        if matches!(self.peek(), Some(t) if t.kind == TokenKind::ArrayClose) {
            self.cursor += 1;
            return Ok(values);
        }
        loop {
            values.push(self.literal()?.0);
            match self.next() {
                Some(Token {
                    kind: TokenKind::Comma,
                    ..
                }) => continue,
                Some(Token {
                    kind: TokenKind::ArrayClose,
                    ..
                }) => return Ok(values),
                other => return Err(self.unexpected(other, &[",", "]"])),
            }
        }
    }

    fn range(&mut self) -> Result<Range> {
        let (lower, lower_position) = self.literal()?;
        if !lower.is_orderable() {
            return Err(ParseError::InvalidRange {
                message: format!("range bounds must be strings or numbers, found {}", lower.type_name()),
                position: lower_position,
            });
        }
        match self.next() {
            Some(Token {
                kind: TokenKind::Comma,
                ..
            }) => {}
            other => return Err(self.unexpected(other, &[","])),
        }
        let (upper, upper_position) = self.literal()?;
        Range::new(lower, upper).map_err(|e| ParseError::InvalidRange {
            message: e.to_string(),
            position: upper_position,
        })
    }

    fn pattern(&mut self) -> Result<Like> {
        match self.next() {
            Some(Token {
                kind: TokenKind::String(pattern),
                ..
            }) => Ok(Like::new(pattern.as_str())),
            other => Err(self.unexpected(other, &["pattern string"])),
        }
    }
}

fn literal_of(token: Option<&Token<'_>>) -> Option<Literal> {
    match &token?.kind {
        TokenKind::String(s) => Some(Literal::String(s.clone())),
        TokenKind::Number(n) => Some(n.clone()),
        TokenKind::Boolean(b) => Some(Literal::Bool(*b)),
        _ => None,
    }
}
