//! Field references expressed as RFC 6901 JSON pointers

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{InvariantError, ParseError};

/// One step of a field reference path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Object member name
    Key(String),
    /// Array index
    Index(usize),
}

impl Segment {
    fn from_token(token: String) -> Self {
        if is_index(&token) {
            if let Ok(index) = token.parse::<usize>() {
                return Segment::Index(index);
            }
        }
        Segment::Key(token)
    }

    /// The raw (unescaped) text of this segment
    pub fn as_key(&self) -> std::borrow::Cow<'_, str> {
        match self {
            Segment::Key(key) => std::borrow::Cow::Borrowed(key),
            Segment::Index(index) => std::borrow::Cow::Owned(index.to_string()),
        }
    }
}

/// `0` or a decimal number without leading zeros
fn is_index(token: &str) -> bool {
    match token.as_bytes() {
        [] => false,
        [b'0'] => true,
        [b'0', ..] => false,
        bytes => bytes.iter().all(u8::is_ascii_digit),
    }
}

/// A reference to a field in the filtered data
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Target {
    path: Vec<Segment>,
}

impl Target {
    /// Parse a JSON pointer such as `/user/addresses/0/city`
    ///
    /// Error positions are character offsets into `pointer`.
    pub fn parse(pointer: &str) -> Result<Self, ParseError> {
        parse_pointer(pointer)
            .map(|path| Target { path })
            .map_err(|(position, message)| ParseError::InvalidPointer { message, position })
    }

    /// Build a target from already split segments
    ///
    /// Keys are normalized the way the pointer text would parse them, so
    /// `Key("0")` becomes `Index(0)`.
    pub fn from_segments(path: Vec<Segment>) -> Result<Self, InvariantError> {
        if path.is_empty() {
            return Err(InvariantError::EmptyTarget);
        }
        let path = path
            .into_iter()
            .map(|segment| match segment {
                Segment::Key(key) if key.chars().any(breaks_pointer) => {
                    Err(InvariantError::UnrepresentableKey { key })
                }
                Segment::Key(key) => Ok(Segment::from_token(key)),
                index => Ok(index),
            })
            .collect::<Result<_, _>>()?;
        Ok(Target { path })
    }

    /// Path segments in declaration order
    pub fn path(&self) -> &[Segment] {
        &self.path
    }

    /// Pointer form of the path up to (not including) the first index segment
    ///
    /// `/foo/0/bar` has the field `/foo`.
    pub fn field(&self) -> String {
        let mut field = String::new();
        for segment in &self.path {
            match segment {
                Segment::Key(key) => {
                    field.push('/');
                    escape_into(key, &mut field);
                }
                Segment::Index(_) => break,
            }
        }
        field
    }
}

/// Characters that end a field reference token in filter text
pub(crate) fn breaks_pointer(c: char) -> bool {
    c.is_ascii_whitespace() || c == '(' || c == ')'
}

/// Split and unescape a pointer, reporting `(char offset, message)` on failure
pub(crate) fn parse_pointer(pointer: &str) -> Result<Vec<Segment>, (usize, String)> {
    let mut chars = pointer.chars().enumerate().peekable();
    match chars.next() {
        Some((_, '/')) => {}
        Some((position, found)) => {
            return Err((position, format!("expected '/' but found '{found}'")));
        }
        None => return Err((0, "field reference is empty".to_string())),
    }

    let mut path = Vec::new();
    let mut current = String::new();
    while let Some((position, ch)) = chars.next() {
        match ch {
            '/' => path.push(Segment::from_token(std::mem::take(&mut current))),
            '~' => match chars.next() {
                Some((_, '0')) => current.push('~'),
                Some((_, '1')) => current.push('/'),
                _ => return Err((position, "'~' must be followed by '0' or '1'".to_string())),
            },
            other if breaks_pointer(other) => {
                return Err((position, format!("unexpected '{other}' in field reference")));
            }
            other => current.push(other),
        }
    }
    path.push(Segment::from_token(current));
    Ok(path)
}

fn escape_into(key: &str, out: &mut String) {
    for ch in key.chars() {
        match ch {
            '~' => out.push_str("~0"),
            '/' => out.push_str("~1"),
            other => out.push(other),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pointer = String::new();
        for segment in &self.path {
            pointer.push('/');
            escape_into(&segment.as_key(), &mut pointer);
        }
        f.write_str(&pointer)
    }
}

impl TryFrom<String> for Target {
    type Error = ParseError;

    fn try_from(pointer: String) -> Result<Self, Self::Error> {
        Target::parse(&pointer)
    }
}

impl From<Target> for String {
    fn from(target: Target) -> Self {
        target.to_string()
    }
}
