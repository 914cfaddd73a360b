//! # sift-filter
//!
//! Matches sift filter graphs against JSON data.
//!
//! This crate provides:
//! - JSON-pointer field resolution over `serde_json::Value`
//! - Typed comparison, membership, range and wildcard semantics
//! - Strict left-to-right evaluation of `and`/`or` statements
//! - Structural checks for graphs that did not come from the parser
//!
//! ```rust
//! use serde_json::json;
//! use sift_filter::{parse, Matches};
//!
//! let filter = parse("/age gte 18 and /tags in /allowed")?;
//! let user = json!({"age": 30, "tags": "beta", "allowed": ["beta", "gamma"]});
//! assert!(filter.matches(&user)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod compare;
pub mod evaluate;
pub mod resolve;

pub use evaluate::{matches, select, Matches};
pub use resolve::{resolve, Scalar};

/// Re-export the graph and parser API
pub use sift_parser::{parse, Filter, FilterParser, InvariantError, ParseError};

/// Re-export commonly used types from sift-shared
pub use sift_shared::Result;

/// Convenience function to parse a filter string and match it against a value
pub fn match_str(filter: &str, value: &serde_json::Value) -> Result<bool> {
    let filter = parse(filter)?;
    Ok(filter.matches(value)?)
}
