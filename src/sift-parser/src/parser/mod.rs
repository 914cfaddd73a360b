//! Parser implementation for the sift filter language
//!
//! This module contains the main parser that converts filter text into a
//! [`Filter`] graph: the tokenizer runs first, then a recursive-descent pass
//! over the token list builds statements and groups.

use std::str::FromStr;

use sift_shared::constants::DEFAULT_MAX_DEPTH;

use crate::ast::Filter;
use crate::error::{ParseError, Result};

mod grammar;
mod lexer;
pub(crate) mod literals;

pub use lexer::{tokenize, Token, TokenKind};

use grammar::TokenStream;

/// Main parser for filter expressions
#[derive(Debug, Clone)]
pub struct FilterParser {
    max_depth: usize,
}

impl FilterParser {
    /// Create a new parser instance
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Limit how deeply groups may nest
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// The configured nesting limit
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Parse filter text into a graph
    pub fn parse(&self, input: &str) -> Result<Filter> {
        if input.trim().is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let tokens = tokenize(input)?;
        let mut stream = TokenStream::new(&tokens, input.chars().count(), self.max_depth);
        let filter = stream.filter()?;
        log::debug!(
            "parsed filter with {} top-level statements from {} tokens",
            filter.len(),
            tokens.len()
        );
        Ok(filter)
    }

    /// Percent-decode `input` (as taken from a query string), then parse it
    pub fn parse_url_encoded(&self, input: &str) -> Result<Filter> {
        let decoded = urlencoding::decode(input).map_err(|e| ParseError::InvalidEncoding {
            message: e.to_string(),
        })?;
        self.parse(&decoded)
    }
}

impl Default for FilterParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse filter text with the default parser
pub fn parse(input: &str) -> Result<Filter> {
    FilterParser::new().parse(input)
}

impl FromStr for Filter {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self> {
        parse(s)
    }
}
