//! Staged construction of clauses
//!
//! A [`ClauseBuilder`] starts from a subject and only exposes the calls that
//! are legal at each step. Every finished clause is checked, so a string or
//! number without a text form is rejected here rather than at print time:
//!
//! ```rust
//! use sift_parser::{Clause, Filter, Literal, Operator, Target};
//!
//! let age = Target::parse("/age")?;
//! let name = Target::parse("/name")?;
//! let filter = Filter::new(Clause::builder(age).between(18, 65)?)
//!     .and(Clause::builder(name).like("J*")?);
//! assert_eq!(filter.to_string(), r#"/age between 18,65 and /name like "J*""#);
//!
//! // the generic path checks the object against the operator class
//! let status = Target::parse("/status")?;
//! let clause = Clause::builder(status)
//!     .operator(Operator::In)
//!     .object(vec![Literal::from("a"), Literal::from("b")])?;
//! assert_eq!(clause.to_string(), r#"/status in ["a","b"]"#);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::ast::{ArrayObject, Clause, Literal, Object, Operand, Operator, Range};
use crate::error::InvariantError;
use crate::pattern::Like;
use crate::target::Target;

/// Builder state: waiting for an operator
#[derive(Debug)]
pub struct NeedsOperator;

/// Builder state: operator chosen, waiting for an object
#[derive(Debug)]
pub struct NeedsObject {
    operator: Operator,
}

/// Clause under construction
#[derive(Debug)]
pub struct ClauseBuilder<S> {
    subject: Operand,
    state: S,
}

impl Clause {
    /// Begin building a clause about `subject`
    pub fn builder(subject: impl Into<Operand>) -> ClauseBuilder<NeedsOperator> {
        ClauseBuilder::new(subject)
    }
}

impl ClauseBuilder<NeedsOperator> {
    /// Begin building a clause about `subject`
    pub fn new(subject: impl Into<Operand>) -> Self {
        ClauseBuilder {
            subject: subject.into(),
            state: NeedsOperator,
        }
    }

    /// Choose the operator; the object is checked when supplied
    pub fn operator(self, operator: Operator) -> ClauseBuilder<NeedsObject> {
        ClauseBuilder {
            subject: self.subject,
            state: NeedsObject { operator },
        }
    }

    fn compare(
        self,
        operator: Operator,
        object: impl Into<Operand>,
    ) -> Result<Clause, InvariantError> {
        Clause::new(self.subject, operator, object.into())
    }

    /// `subject eq object`
    pub fn eq(self, object: impl Into<Operand>) -> Result<Clause, InvariantError> {
        self.compare(Operator::Eq, object)
    }

    /// `subject neq object`
    pub fn neq(self, object: impl Into<Operand>) -> Result<Clause, InvariantError> {
        self.compare(Operator::Neq, object)
    }

    /// `subject gt object`
    pub fn gt(self, object: impl Into<Operand>) -> Result<Clause, InvariantError> {
        self.compare(Operator::Gt, object)
    }

    /// `subject gte object`
    pub fn gte(self, object: impl Into<Operand>) -> Result<Clause, InvariantError> {
        self.compare(Operator::Gte, object)
    }

    /// `subject lt object`
    pub fn lt(self, object: impl Into<Operand>) -> Result<Clause, InvariantError> {
        self.compare(Operator::Lt, object)
    }

    /// `subject lte object`
    pub fn lte(self, object: impl Into<Operand>) -> Result<Clause, InvariantError> {
        self.compare(Operator::Lte, object)
    }

    fn membership<I>(self, operator: Operator, values: I) -> Result<Clause, InvariantError>
    where
        I: IntoIterator,
        I::Item: Into<Literal>,
    {
        let values: Vec<Literal> = values.into_iter().map(Into::into).collect();
        Clause::new(self.subject, operator, values)
    }

    /// `subject in [values]`
    pub fn is_in<I>(self, values: I) -> Result<Clause, InvariantError>
    where
        I: IntoIterator,
        I::Item: Into<Literal>,
    {
        self.membership(Operator::In, values)
    }

    /// `subject nin [values]`
    pub fn not_in<I>(self, values: I) -> Result<Clause, InvariantError>
    where
        I: IntoIterator,
        I::Item: Into<Literal>,
    {
        self.membership(Operator::Nin, values)
    }

    /// `subject in target`, where the target resolves to an array
    pub fn in_field(self, target: Target) -> Result<Clause, InvariantError> {
        Clause::new(self.subject, Operator::In, ArrayObject::Target(target))
    }

    /// `subject between lower,upper`
    pub fn between(
        self,
        lower: impl Into<Literal>,
        upper: impl Into<Literal>,
    ) -> Result<Clause, InvariantError> {
        Clause::new(self.subject, Operator::Between, Range::new(lower, upper)?)
    }

    /// `subject nbetween lower,upper`
    pub fn not_between(
        self,
        lower: impl Into<Literal>,
        upper: impl Into<Literal>,
    ) -> Result<Clause, InvariantError> {
        Clause::new(self.subject, Operator::NBetween, Range::new(lower, upper)?)
    }

    /// `subject like "pattern"`
    pub fn like(self, pattern: impl Into<String>) -> Result<Clause, InvariantError> {
        Clause::new(self.subject, Operator::Like, Like::new(pattern))
    }

    /// `subject nlike "pattern"`
    pub fn not_like(self, pattern: impl Into<String>) -> Result<Clause, InvariantError> {
        Clause::new(self.subject, Operator::NLike, Like::new(pattern))
    }
}

impl ClauseBuilder<NeedsObject> {
    /// Supply the object, checked against the operator class
    pub fn object(self, object: impl Into<Object>) -> Result<Clause, InvariantError> {
        Clause::new(self.subject, self.state.operator, object)
    }
}
