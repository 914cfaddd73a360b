//! Wildcard patterns for the `like` and `nlike` operators
//!
//! `*` matches any run of characters, `_` exactly one character and `\`
//! takes the next character literally. Matching is anchored at both ends.

use std::fmt;

use once_cell::sync::OnceCell;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::InvariantError;

/// A wildcard pattern, compiled on first use
#[derive(Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Like {
    pattern: String,
    compiled: OnceCell<Regex>,
}

impl Like {
    /// Create a pattern; compilation is deferred until the first match
    pub fn new(pattern: impl Into<String>) -> Self {
        Like {
            pattern: pattern.into(),
            compiled: OnceCell::new(),
        }
    }

    /// The pattern source text
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether `text` matches the whole pattern
    pub fn is_match(&self, text: &str) -> Result<bool, InvariantError> {
        let regex = self.compiled.get_or_try_init(|| {
            Regex::new(&translate(&self.pattern)).map_err(|e| InvariantError::Pattern {
                pattern: self.pattern.clone(),
                message: e.to_string(),
            })
        })?;
        Ok(regex.is_match(text))
    }
}

/// Translate wildcard syntax into an anchored regular expression
fn translate(pattern: &str) -> String {
    let mut regex = String::with_capacity(pattern.len() + 8);
    regex.push_str("(?s)^");
    let mut chars = pattern.chars();
    let mut buf = [0u8; 4];
    while let Some(ch) = chars.next() {
        match ch {
            '*' => regex.push_str(".*"),
            '_' => regex.push('.'),
            '\\' => {
                // a trailing backslash stands for itself
                let literal = chars.next().unwrap_or('\\');
                regex.push_str(&regex::escape(literal.encode_utf8(&mut buf)));
            }
            other => regex.push_str(&regex::escape(other.encode_utf8(&mut buf))),
        }
    }
    regex.push('$');
    regex
}

impl PartialEq for Like {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl fmt::Debug for Like {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Like").field(&self.pattern).finish()
    }
}

impl From<String> for Like {
    fn from(pattern: String) -> Self {
        Like::new(pattern)
    }
}

impl From<&str> for Like {
    fn from(pattern: &str) -> Self {
        Like::new(pattern)
    }
}

impl From<Like> for String {
    fn from(like: Like) -> Self {
        like.pattern
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(pattern: &str, text: &str) -> bool {
        Like::new(pattern).is_match(text).unwrap()
    }

    #[test]
    fn test_star_matches_any_run() {
        assert!(matches("He*o", "Hello"));
        assert!(matches("He*o", "Heo"));
        assert!(!matches("He*o", "Ho"));
        assert!(!matches("He*o", "Help"));
        assert!(matches("*", ""));
        assert!(matches("*", "anything at all"));
    }

    #[test]
    fn test_underscore_matches_one() {
        assert!(matches("H_llo", "Hello"));
        assert!(matches("H_llo", "Hallo"));
        assert!(!matches("H_llo", "Heello"));
        assert!(!matches("H_llo", "Hllo"));
        assert!(matches("_", "é"));
    }

    #[test]
    fn test_escapes() {
        assert!(matches(r"a\*b", "a*b"));
        assert!(!matches(r"a\*b", "axb"));
        assert!(!matches(r"a\*b", "ab"));
        assert!(matches(r"a\_b", "a_b"));
        assert!(!matches(r"a\_b", "acb"));
        assert!(matches(r"a\\b", r"a\b"));
        assert!(matches(r"a\", r"a\"));
    }

    #[test]
    fn test_anchored() {
        assert!(!matches("ell", "Hello"));
        assert!(matches("*ell*", "Hello"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        assert!(matches("a.c", "a.c"));
        assert!(!matches("a.c", "abc"));
        assert!(matches("(x)+[y]", "(x)+[y]"));
    }

    #[test]
    fn test_empty_pattern() {
        assert!(matches("", ""));
        assert!(!matches("", "a"));
    }

    #[test]
    fn test_newlines_match_wildcards() {
        assert!(matches("a*b", "a\nb"));
        assert!(matches("a_b", "a\nb"));
    }

    #[test]
    fn test_compiled_once_and_reused() {
        let like = Like::new("x*");
        assert!(like.is_match("xy").unwrap());
        assert!(like.compiled.get().is_some());
        assert!(!like.is_match("yx").unwrap());
    }
}
