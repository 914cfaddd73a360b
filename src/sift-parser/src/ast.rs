//! Filter graph definitions for the sift filter language
//!
//! A [`Filter`] is an ordered list of statements joined by `and`/`or`. Each
//! statement holds either a [`Clause`] or a nested filter (a group).

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::InvariantError;
use crate::parser::literals::fits_string_literal;
use crate::pattern::Like;
use crate::target::Target;

/// A static scalar value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    /// String literal
    String(String),
    /// Boolean literal
    Bool(bool),
    /// Integer literal
    Int(i64),
    /// Floating point literal
    Float(f64),
}

impl Literal {
    /// Name of the literal's type, for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::String(_) => "string",
            Literal::Bool(_) => "boolean",
            Literal::Int(_) | Literal::Float(_) => "number",
        }
    }

    /// Whether this literal is a number
    pub fn is_number(&self) -> bool {
        matches!(self, Literal::Int(_) | Literal::Float(_))
    }

    /// Whether this literal can bound a range (string or number)
    pub fn is_orderable(&self) -> bool {
        matches!(self, Literal::String(_)) || self.is_number()
    }

    /// Check that the literal has a text form that parses back to it
    pub fn check_representable(&self) -> Result<(), InvariantError> {
        match self {
            Literal::String(value) => check_string(value),
            Literal::Float(value) if !value.is_finite() => {
                Err(InvariantError::NonFiniteNumber { value: *value })
            }
            _ => Ok(()),
        }
    }
}

pub(crate) fn check_string(value: &str) -> Result<(), InvariantError> {
    if fits_string_literal(value) {
        Ok(())
    } else {
        Err(InvariantError::UnrepresentableString {
            value: value.to_string(),
        })
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::String(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::String(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Int(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Literal::Int(i64::from(value))
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Float(value)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Bool(value)
    }
}

/// Subject of a clause, or the object of a comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operand {
    /// Field reference resolved against the data
    Target(Target),
    /// Static value
    Literal(Literal),
}

impl Operand {
    /// The target, if this operand is a field reference
    pub fn as_target(&self) -> Option<&Target> {
        match self {
            Operand::Target(target) => Some(target),
            Operand::Literal(_) => None,
        }
    }
}

impl From<Target> for Operand {
    fn from(target: Target) -> Self {
        Operand::Target(target)
    }
}

impl From<Literal> for Operand {
    fn from(literal: Literal) -> Self {
        Operand::Literal(literal)
    }
}

/// `From` impls for the scalar types that convert into a [`Literal`]
macro_rules! literal_conversions {
    ($target:ty => $wrap:expr; $($source:ty),+) => {
        $(
            impl From<$source> for $target {
                fn from(value: $source) -> Self {
                    $wrap(Literal::from(value))
                }
            }
        )+
    };
}

literal_conversions!(Operand => Operand::Literal; &str, String, i64, i32, f64, bool);

/// Operator classes; each determines the legal object shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorClass {
    /// `eq neq gt gte lt lte`: a literal or field reference
    Compare,
    /// `in nin`: a literal list or a field reference to an array
    Array,
    /// `between nbetween`: a range
    Range,
    /// `like nlike`: a wildcard pattern
    Search,
}

impl OperatorClass {
    /// Description of the object shape this class requires
    pub fn expected_object(self) -> &'static str {
        match self {
            OperatorClass::Compare => "a literal or field reference",
            OperatorClass::Array => "a literal list or field reference",
            OperatorClass::Range => "a range",
            OperatorClass::Search => "a pattern",
        }
    }
}

/// Clause operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    /// Equal (eq)
    Eq,
    /// Not equal (neq)
    Neq,
    /// Greater than (gt)
    Gt,
    /// Greater than or equal (gte)
    Gte,
    /// Less than (lt)
    Lt,
    /// Less than or equal (lte)
    Lte,
    /// Member of (in)
    In,
    /// Not a member of (nin)
    Nin,
    /// Within a closed range (between)
    Between,
    /// Outside a closed range (nbetween)
    NBetween,
    /// Matches a wildcard pattern (like)
    Like,
    /// Does not match a wildcard pattern (nlike)
    NLike,
}

impl Operator {
    /// The textual keyword
    pub fn keyword(self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Neq => "neq",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::In => "in",
            Operator::Nin => "nin",
            Operator::Between => "between",
            Operator::NBetween => "nbetween",
            Operator::Like => "like",
            Operator::NLike => "nlike",
        }
    }

    /// The class that decides the object shape
    pub fn class(self) -> OperatorClass {
        match self {
            Operator::Eq
            | Operator::Neq
            | Operator::Gt
            | Operator::Gte
            | Operator::Lt
            | Operator::Lte => OperatorClass::Compare,
            Operator::In | Operator::Nin => OperatorClass::Array,
            Operator::Between | Operator::NBetween => OperatorClass::Range,
            Operator::Like | Operator::NLike => OperatorClass::Search,
        }
    }

    /// Whether this is the negation of another operator
    pub fn is_negated(self) -> bool {
        matches!(
            self,
            Operator::Neq | Operator::Nin | Operator::NBetween | Operator::NLike
        )
    }

    /// The non-negated counterpart (identity for positive operators)
    pub fn positive(self) -> Operator {
        match self {
            Operator::Neq => Operator::Eq,
            Operator::Nin => Operator::In,
            Operator::NBetween => Operator::Between,
            Operator::NLike => Operator::Like,
            other => other,
        }
    }
}

/// Joiner between two statements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Conjunctive {
    /// Both sides must hold
    And,
    /// Either side must hold
    Or,
}

impl Conjunctive {
    /// The textual keyword
    pub fn keyword(self) -> &'static str {
        match self {
            Conjunctive::And => "and",
            Conjunctive::Or => "or",
        }
    }
}

/// A word with grammatical meaning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    /// Clause operator
    Operator(Operator),
    /// Statement joiner
    Conjunctive(Conjunctive),
    /// Boolean literal
    Boolean(bool),
}

/// Every recognized keyword; matching is case-sensitive
pub const KEYWORDS: &[(&str, Keyword)] = &[
    ("eq", Keyword::Operator(Operator::Eq)),
    ("neq", Keyword::Operator(Operator::Neq)),
    ("gt", Keyword::Operator(Operator::Gt)),
    ("gte", Keyword::Operator(Operator::Gte)),
    ("lt", Keyword::Operator(Operator::Lt)),
    ("lte", Keyword::Operator(Operator::Lte)),
    ("in", Keyword::Operator(Operator::In)),
    ("nin", Keyword::Operator(Operator::Nin)),
    ("between", Keyword::Operator(Operator::Between)),
    ("nbetween", Keyword::Operator(Operator::NBetween)),
    ("like", Keyword::Operator(Operator::Like)),
    ("nlike", Keyword::Operator(Operator::NLike)),
    ("and", Keyword::Conjunctive(Conjunctive::And)),
    ("or", Keyword::Conjunctive(Conjunctive::Or)),
    ("true", Keyword::Boolean(true)),
    ("false", Keyword::Boolean(false)),
];

/// Look up a bare word in [`KEYWORDS`]
pub fn lookup_keyword(word: &str) -> Option<Keyword> {
    KEYWORDS
        .iter()
        .find(|(text, _)| *text == word)
        .map(|(_, keyword)| *keyword)
}

/// Closed interval used by `between` and `nbetween`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RangeRepr")]
pub struct Range {
    lower: Literal,
    upper: Literal,
}

#[derive(Deserialize)]
struct RangeRepr {
    lower: Literal,
    upper: Literal,
}

impl TryFrom<RangeRepr> for Range {
    type Error = InvariantError;

    fn try_from(repr: RangeRepr) -> Result<Self, Self::Error> {
        Range::new(repr.lower, repr.upper)
    }
}

impl Range {
    /// Create a range; both bounds must be strings or both numbers
    ///
    /// `lower > upper` is accepted and simply never matches.
    pub fn new(
        lower: impl Into<Literal>,
        upper: impl Into<Literal>,
    ) -> Result<Self, InvariantError> {
        let (lower, upper) = (lower.into(), upper.into());
        lower.check_representable()?;
        upper.check_representable()?;
        let compatible = match (&lower, &upper) {
            (Literal::String(_), Literal::String(_)) => true,
            (l, u) => l.is_number() && u.is_number(),
        };
        if !compatible {
            return Err(InvariantError::RangeBounds {
                lower: lower.type_name(),
                upper: upper.type_name(),
            });
        }
        Ok(Range { lower, upper })
    }

    /// Inclusive lower bound
    pub fn lower(&self) -> &Literal {
        &self.lower
    }

    /// Inclusive upper bound
    pub fn upper(&self) -> &Literal {
        &self.upper
    }
}

/// Object of the `in`/`nin` operators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrayObject {
    /// Inline literal list
    Literals(Vec<Literal>),
    /// Field reference expected to resolve to an array
    Target(Target),
}

/// Clause object, shaped by the operator class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Object {
    /// Comparison object
    Operand(Operand),
    /// Membership object
    Array(ArrayObject),
    /// Range object
    Range(Range),
    /// Wildcard pattern object
    Like(Like),
}

impl Object {
    /// The operator class this shape belongs to
    pub fn class(&self) -> OperatorClass {
        match self {
            Object::Operand(_) => OperatorClass::Compare,
            Object::Array(_) => OperatorClass::Array,
            Object::Range(_) => OperatorClass::Range,
            Object::Like(_) => OperatorClass::Search,
        }
    }

    /// Description of this shape, for error messages
    pub fn describe(&self) -> &'static str {
        match self {
            Object::Operand(Operand::Target(_)) => "a field reference",
            Object::Operand(Operand::Literal(_)) => "a literal",
            Object::Array(ArrayObject::Literals(_)) => "a literal list",
            Object::Array(ArrayObject::Target(_)) => "an array field reference",
            Object::Range(_) => "a range",
            Object::Like(_) => "a pattern",
        }
    }

    fn check_representable(&self) -> Result<(), InvariantError> {
        match self {
            Object::Operand(Operand::Literal(literal)) => literal.check_representable(),
            Object::Array(ArrayObject::Literals(values)) => {
                values.iter().try_for_each(Literal::check_representable)
            }
            Object::Range(range) => {
                range.lower.check_representable()?;
                range.upper.check_representable()
            }
            Object::Like(like) => check_string(like.pattern()),
            Object::Operand(Operand::Target(_)) | Object::Array(ArrayObject::Target(_)) => Ok(()),
        }
    }
}

impl From<Operand> for Object {
    fn from(operand: Operand) -> Self {
        Object::Operand(operand)
    }
}

impl From<Target> for Object {
    fn from(target: Target) -> Self {
        Object::Operand(Operand::Target(target))
    }
}

impl From<Literal> for Object {
    fn from(literal: Literal) -> Self {
        Object::Operand(Operand::Literal(literal))
    }
}

literal_conversions!(Object => Object::from; &str, String, i64, i32, f64, bool);

impl From<Vec<Literal>> for Object {
    fn from(values: Vec<Literal>) -> Self {
        Object::Array(ArrayObject::Literals(values))
    }
}

impl From<ArrayObject> for Object {
    fn from(array: ArrayObject) -> Self {
        Object::Array(array)
    }
}

impl From<Range> for Object {
    fn from(range: Range) -> Self {
        Object::Range(range)
    }
}

impl From<Like> for Object {
    fn from(like: Like) -> Self {
        Object::Like(like)
    }
}

/// A single subject-operator-object condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ClauseRepr")]
pub struct Clause {
    subject: Operand,
    operator: Operator,
    object: Object,
}

#[derive(Deserialize)]
struct ClauseRepr {
    subject: Operand,
    operator: Operator,
    object: Object,
}

impl TryFrom<ClauseRepr> for Clause {
    type Error = InvariantError;

    fn try_from(repr: ClauseRepr) -> Result<Self, Self::Error> {
        Clause::new(repr.subject, repr.operator, repr.object)
    }
}

impl Clause {
    /// Create a clause, checking the object against the operator class
    ///
    /// A field reference given to `in`/`nin` is taken as an array reference.
    pub fn new(
        subject: impl Into<Operand>,
        operator: Operator,
        object: impl Into<Object>,
    ) -> Result<Self, InvariantError> {
        let object = match (operator.class(), object.into()) {
            (OperatorClass::Array, Object::Operand(Operand::Target(target))) => {
                Object::Array(ArrayObject::Target(target))
            }
            (_, object) => object,
        };
        if object.class() != operator.class() {
            return Err(InvariantError::ObjectMismatch {
                operator,
                expected: operator.class().expected_object(),
                found: object.describe(),
            });
        }
        let subject = subject.into();
        if let Operand::Literal(literal) = &subject {
            literal.check_representable()?;
        }
        object.check_representable()?;
        Ok(Clause::from_parts(subject, operator, object))
    }

    /// Assemble a clause whose object class is known to fit
    pub(crate) fn from_parts(subject: Operand, operator: Operator, object: Object) -> Self {
        debug_assert_eq!(operator.class(), object.class());
        Clause {
            subject,
            operator,
            object,
        }
    }

    /// Left-hand side
    pub fn subject(&self) -> &Operand {
        &self.subject
    }

    /// The operator
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Right-hand side
    pub fn object(&self) -> &Object {
        &self.object
    }

    fn collect_fields(&self, fields: &mut IndexSet<String>) {
        if let Some(target) = self.subject.as_target() {
            fields.insert(target.field());
        }
        match &self.object {
            Object::Operand(Operand::Target(target))
            | Object::Array(ArrayObject::Target(target)) => {
                fields.insert(target.field());
            }
            _ => {}
        }
    }
}

/// Statement payload: a clause or a nested filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    /// Single condition
    Clause(Clause),
    /// Parenthesised sub-filter
    Group(Filter),
}

/// One entry of a filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    conjunctive: Option<Conjunctive>,
    node: Node,
}

impl Statement {
    /// Joiner to the previous statement; `None` for the first one
    pub fn conjunctive(&self) -> Option<Conjunctive> {
        self.conjunctive
    }

    /// The clause or group
    pub fn node(&self) -> &Node {
        &self.node
    }
}

/// Ordered, conjunctively joined statements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    statements: Vec<Statement>,
}

impl Filter {
    /// Start a filter with a single clause
    pub fn new(clause: Clause) -> Self {
        Filter::from_node(Node::Clause(clause))
    }

    /// Start a filter whose first statement is a group
    pub fn group(filter: Filter) -> Self {
        Filter::from_node(Node::Group(filter))
    }

    pub(crate) fn from_node(node: Node) -> Self {
        Filter {
            statements: vec![Statement {
                conjunctive: None,
                node,
            }],
        }
    }

    pub(crate) fn push(mut self, conjunctive: Conjunctive, node: Node) -> Self {
        self.statements.push(Statement {
            conjunctive: Some(conjunctive),
            node,
        });
        self
    }

    /// Append a clause joined with `and`
    pub fn and(self, clause: Clause) -> Self {
        self.push(Conjunctive::And, Node::Clause(clause))
    }

    /// Append a clause joined with `or`
    pub fn or(self, clause: Clause) -> Self {
        self.push(Conjunctive::Or, Node::Clause(clause))
    }

    /// Append a group joined with `and`
    pub fn and_group(self, filter: Filter) -> Self {
        self.push(Conjunctive::And, Node::Group(filter))
    }

    /// Append a group joined with `or`
    pub fn or_group(self, filter: Filter) -> Self {
        self.push(Conjunctive::Or, Node::Group(filter))
    }

    /// Statements in order
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Number of top-level statements
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Only a deserialized filter can be empty
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Every referenced field, deduplicated, in first-seen order
    pub fn fields(&self) -> Vec<String> {
        let mut fields = IndexSet::new();
        self.collect_fields(&mut fields);
        fields.into_iter().collect()
    }

    fn collect_fields(&self, fields: &mut IndexSet<String>) {
        for statement in &self.statements {
            match &statement.node {
                Node::Clause(clause) => clause.collect_fields(fields),
                Node::Group(group) => group.collect_fields(fields),
            }
        }
    }
}

impl From<Clause> for Filter {
    fn from(clause: Clause) -> Self {
        Filter::new(clause)
    }
}
