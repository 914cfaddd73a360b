//! Output formatting for the sift CLI
//!
//! Renders filters, graphs and records according to the output
//! configuration, and points at the offending character of a parse error.

use crate::config::Config;
use serde::Serialize;
use serde_json::Value;
use sift_parser::{Filter, ParseError};
use sift_shared::Result;

/// Formats command results
#[derive(Debug, Clone)]
pub struct OutputWriter {
    pretty: bool,
    url_encode: bool,
}

impl OutputWriter {
    /// Create a writer from the output configuration
    pub fn new(config: &Config) -> Self {
        Self {
            pretty: config.output.pretty,
            url_encode: config.output.url_encode,
        }
    }

    /// Canonical filter text, percent-encoded when configured or requested
    pub fn filter_text(&self, filter: &Filter, url_encode: bool) -> String {
        filter.to_query_string(url_encode || self.url_encode)
    }

    /// The filter graph as JSON
    pub fn graph(&self, filter: &Filter) -> Result<String> {
        self.json(filter)
    }

    /// A record as JSON; `compact` forces a single line
    pub fn record(&self, value: &Value, compact: bool) -> Result<String> {
        if compact {
            Ok(serde_json::to_string(value)?)
        } else {
            self.json(value)
        }
    }

    fn json<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        let text = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(text)
    }
}

/// The error message followed by the expression and a caret under the offending character
pub fn render_parse_error(expression: &str, error: &ParseError) -> String {
    match error {
        ParseError::EmptyInput | ParseError::InvalidEncoding { .. } => error.to_string(),
        _ => format!(
            "{}\n  {}\n  {}^",
            error,
            expression,
            " ".repeat(error.position())
        ),
    }
}
