//! Error types for the sift parser and filter graph

use thiserror::Error;

use crate::ast::Operator;

/// Errors that can occur while tokenizing or parsing filter text
///
/// Every variant except [`ParseError::InvalidEncoding`] carries the character
/// offset of the first token (or character) that made the input unparsable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// Input was empty or whitespace only
    #[error("Empty input")]
    EmptyInput,

    /// A character that cannot start any token
    #[error("Unexpected character '{found}' at position {position}")]
    UnexpectedCharacter {
        /// The offending character
        found: char,
        /// Position in the input
        position: usize,
    },

    /// A string literal without a closing quote
    #[error("Unterminated string literal starting at position {position}")]
    UnterminatedString {
        /// Position of the opening quote
        position: usize,
    },

    /// A numeric literal that does not denote a finite number
    #[error("Invalid number '{number}' at position {position}")]
    InvalidNumber {
        /// The invalid number text
        number: String,
        /// Position in the input
        position: usize,
    },

    /// A bare word that is neither an operator, a conjunctive nor a boolean
    #[error("Unknown keyword '{word}' at position {position}")]
    UnknownKeyword {
        /// The unrecognized word
        word: String,
        /// Position in the input
        position: usize,
    },

    /// A malformed JSON pointer
    #[error("Invalid field reference at position {position}: {message}")]
    InvalidPointer {
        /// Description of the problem
        message: String,
        /// Position of the offending character
        position: usize,
    },

    /// A token that does not fit the grammar at this point
    #[error("Unexpected token '{found}' at position {position}{}", expected_suffix(.expected))]
    UnexpectedToken {
        /// Source text of the unexpected token
        found: String,
        /// What the grammar would have accepted
        expected: Vec<String>,
        /// Position in the input
        position: usize,
    },

    /// Input ended while the grammar still expected a token
    #[error("Unexpected end of input at position {position}{}", expected_suffix(.expected))]
    UnexpectedEnd {
        /// What the grammar would have accepted
        expected: Vec<String>,
        /// Length of the input in characters
        position: usize,
    },

    /// A `)` without a matching `(`
    #[error("Unmatched ')' at position {position}")]
    UnmatchedGroupClose {
        /// Position of the `)`
        position: usize,
    },

    /// A `(` whose group is never closed
    #[error("Group opened at position {position} is never closed")]
    UnclosedGroup {
        /// Position of the `(`
        position: usize,
    },

    /// Groups nested deeper than the parser allows
    #[error("Groups nested deeper than {max_depth} at position {position}")]
    NestingTooDeep {
        /// The configured limit
        max_depth: usize,
        /// Position of the `(` that crossed the limit
        position: usize,
    },

    /// Range bounds that are not both strings or both numbers
    #[error("Invalid range at position {position}: {message}")]
    InvalidRange {
        /// Description of the problem
        message: String,
        /// Position of the offending bound
        position: usize,
    },

    /// Percent-encoded input that does not decode to UTF-8
    #[error("Invalid percent-encoding: {message}")]
    InvalidEncoding {
        /// Decoder message
        message: String,
    },
}

impl ParseError {
    /// Character offset of the offending token or character
    pub fn position(&self) -> usize {
        match self {
            ParseError::EmptyInput | ParseError::InvalidEncoding { .. } => 0,
            ParseError::UnexpectedCharacter { position, .. }
            | ParseError::UnterminatedString { position }
            | ParseError::InvalidNumber { position, .. }
            | ParseError::UnknownKeyword { position, .. }
            | ParseError::InvalidPointer { position, .. }
            | ParseError::UnexpectedToken { position, .. }
            | ParseError::UnexpectedEnd { position, .. }
            | ParseError::UnmatchedGroupClose { position }
            | ParseError::UnclosedGroup { position }
            | ParseError::NestingTooDeep { position, .. }
            | ParseError::InvalidRange { position, .. } => *position,
        }
    }
}

fn expected_suffix(expected: &[String]) -> String {
    if expected.is_empty() {
        String::new()
    } else {
        format!(". Expected one of: {}", expected.join(", "))
    }
}

/// A filter graph that violates its structural invariants
///
/// Raised by the construction API when an object does not fit its operator,
/// and by the evaluator when it meets a malformed graph (for example one
/// deserialized from hand-written JSON).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvariantError {
    /// The object shape does not match the operator class
    #[error("operator '{operator}' expects {expected}, found {found}")]
    ObjectMismatch {
        /// The clause operator
        operator: Operator,
        /// Object shape the operator requires
        expected: &'static str,
        /// Object shape that was supplied
        found: &'static str,
    },

    /// Range bounds that are not both strings or both numbers
    #[error("range bounds must both be strings or both be numbers, found {lower} and {upper}")]
    RangeBounds {
        /// Type of the lower bound
        lower: &'static str,
        /// Type of the upper bound
        upper: &'static str,
    },

    /// A field reference without segments
    #[error("field reference must have at least one segment")]
    EmptyTarget,

    /// A pointer key the text form cannot carry
    #[error("key {key:?} contains whitespace or a parenthesis")]
    UnrepresentableKey {
        /// The offending key
        key: String,
    },

    /// A string or pattern whose quoted form would end early
    #[error("string {value:?} contains '\"' followed by a delimiter")]
    UnrepresentableString {
        /// The offending string
        value: String,
    },

    /// NaN or an infinity
    #[error("number {value} is not finite")]
    NonFiniteNumber {
        /// The offending number
        value: f64,
    },

    /// A filter without statements
    #[error("filter has no statements")]
    EmptyFilter,

    /// The first statement carries a conjunctive
    #[error("first statement must not carry a conjunctive")]
    LeadingConjunctive,

    /// A later statement has no conjunctive
    #[error("statement {index} is missing its conjunctive")]
    MissingConjunctive {
        /// Index of the statement
        index: usize,
    },

    /// A like pattern that could not be compiled
    #[error("pattern '{pattern}' failed to compile: {message}")]
    Pattern {
        /// The pattern text
        pattern: String,
        /// Compiler message
        message: String,
    },
}

/// Result type for parsing operations
pub type Result<T> = std::result::Result<T, ParseError>;
