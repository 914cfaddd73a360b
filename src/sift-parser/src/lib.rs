//! sift-parser: Parser for the sift filter language
//!
//! This crate turns filter expressions such as
//! `/age gte 18 and (/role eq "admin" or /tags in ["beta"])` into a
//! [`Filter`] graph, offers a staged builder for constructing the same graph
//! in code, and renders graphs back to canonical text.
//!
//! # Quick Start
//!
//! ```rust
//! use sift_parser::{FilterParser, Filter, Node};
//!
//! let parser = FilterParser::new();
//! let filter: Filter = parser.parse("/name like \"J*\" or (/age gt 30 and /active eq true)")?;
//!
//! assert_eq!(filter.len(), 2);
//! assert!(matches!(filter.statements()[1].node(), Node::Group(_)));
//! assert_eq!(filter.fields(), vec!["/name", "/age", "/active"]);
//! # Ok::<(), sift_parser::ParseError>(())
//! ```
//!
//! # Supported Syntax
//!
//! - **Field references**: RFC 6901 JSON pointers, `/user/emails/0`
//! - **Literals**: `"strings"`, numbers (`42`, `-1.5`, `2e3`), `true`, `false`
//! - **Comparisons**: `eq`, `neq`, `gt`, `gte`, `lt`, `lte`
//! - **Membership**: `in`, `nin` with `[a,b,c]` or a field reference
//! - **Ranges**: `between`, `nbetween` with `lower,upper`
//! - **Wildcards**: `like`, `nlike` with `*`, `_` and `\` escapes
//! - **Conjunctives**: `and`, `or`, applied strictly left to right
//! - **Groups**: `( ... )`
//!
//! # Error Handling
//!
//! Parse errors carry the character offset of the first offending token:
//!
//! ```rust
//! use sift_parser::{FilterParser, ParseError};
//!
//! let parser = FilterParser::new();
//! match parser.parse("/a eq [1,2]") {
//!     Ok(_) => {}
//!     Err(ParseError::UnexpectedToken { found, position, .. }) => {
//!         assert_eq!((found.as_str(), position), ("[", 6));
//!     }
//!     Err(e) => panic!("unexpected error: {}", e),
//! }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate
)]

pub mod ast;
pub mod builder;
pub mod error;
mod parser;
pub mod pattern;
mod serialize;
pub mod target;

// Re-export main types
pub use ast::*;
pub use builder::{ClauseBuilder, NeedsObject, NeedsOperator};
pub use error::*;
pub use parser::*;
pub use pattern::Like;
pub use target::{Segment, Target};

// Re-export shared types
pub use sift_shared::VERSION;
