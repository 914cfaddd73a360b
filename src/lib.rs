//! # sift
//!
//! A filter language for REST-style queries. Expressions such as
//!
//! ```text
//! /age between 18,65 and (/role eq "admin" or /tags in ["beta"])
//! ```
//!
//! reference fields with JSON pointers, compare them with typed operators and
//! join statements with `and`/`or`, evaluated strictly left to right.
//!
//! This crate re-exports the workspace crates:
//! - [`parser`]: tokenizer, parser, filter graph, builder and serializer
//! - [`filter`]: evaluator matching graphs against `serde_json::Value`
//!
//! ```rust
//! use serde_json::json;
//! use sift::{Clause, Filter, Matches, Target};
//!
//! let filter: Filter = r#"/name like "J*" and /age gte 21"#.parse()?;
//! assert!(filter.matches(&json!({"name": "Jane", "age": 30}))?);
//!
//! // the same filter, built in code
//! let built = Filter::new(Clause::builder(Target::parse("/name")?).like("J*")?)
//!     .and(Clause::builder(Target::parse("/age")?).gte(21)?);
//! assert_eq!(built, filter);
//! assert_eq!(built.to_query_string(true), "%2Fname%20like%20%22J%2A%22%20and%20%2Fage%20gte%2021");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use sift_filter as filter;
pub use sift_parser as parser;

pub use sift_filter::{match_str, matches, select, Matches};
pub use sift_parser::{
    parse, ArrayObject, Clause, ClauseBuilder, Conjunctive, Filter, FilterParser,
    InvariantError, Like, Literal, Node, Object, Operand, Operator, OperatorClass, ParseError,
    Range, Segment, Statement, Target,
};
pub use sift_shared::{Result, VERSION};
