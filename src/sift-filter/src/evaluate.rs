//! Matching filter graphs against JSON values
//!
//! Statements are folded strictly left to right: `a or b and c` means
//! `(a or b) and c`. A statement whose outcome cannot change the running
//! result is not evaluated. Groups are evaluated recursively.

use std::cmp::Ordering;

use serde_json::Value;
use sift_parser::{
    ArrayObject, Clause, Conjunctive, Filter, InvariantError, Node, Object, Operand, Operator,
    Range, Statement,
};

use crate::compare::{equals, ordering};
use crate::resolve::{operand_scalar, resolve, Scalar};

/// Types that can be tested against a JSON value
pub trait Matches {
    /// Whether `data` satisfies `self`
    fn matches(&self, data: &Value) -> Result<bool, InvariantError>;
}

impl Matches for Filter {
    fn matches(&self, data: &Value) -> Result<bool, InvariantError> {
        check_statements(self.statements())?;

        let mut statements = self.statements().iter();
        let mut result = match statements.next() {
            Some(first) => node_matches(first.node(), data)?,
            None => return Err(InvariantError::EmptyFilter),
        };
        for statement in statements {
            result = match (statement.conjunctive(), result) {
                (Some(Conjunctive::And), false) | (Some(Conjunctive::Or), true) => result,
                _ => node_matches(statement.node(), data)?,
            };
        }
        Ok(result)
    }
}

impl Matches for Clause {
    fn matches(&self, data: &Value) -> Result<bool, InvariantError> {
        let operator = self.operator();
        let positive = positive_matches(self, operator.positive(), data)?;
        let result = if operator.is_negated() {
            !positive
        } else {
            positive
        };
        log::trace!("{} -> {}", self, result);
        Ok(result)
    }
}

impl Matches for Node {
    fn matches(&self, data: &Value) -> Result<bool, InvariantError> {
        node_matches(self, data)
    }
}

/// Whether `data` satisfies `filter`
pub fn matches(filter: &Filter, data: &Value) -> Result<bool, InvariantError> {
    filter.matches(data)
}

/// Keep the values that satisfy `filter`, in their original order
pub fn select<'a, I>(filter: &Filter, values: I) -> Result<Vec<&'a Value>, InvariantError>
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut selected = Vec::new();
    let mut seen = 0usize;
    for value in values {
        seen += 1;
        if filter.matches(value)? {
            selected.push(value);
        }
    }
    log::debug!("selected {} of {} values", selected.len(), seen);
    Ok(selected)
}

fn node_matches(node: &Node, data: &Value) -> Result<bool, InvariantError> {
    match node {
        Node::Clause(clause) => clause.matches(data),
        Node::Group(group) => group.matches(data),
    }
}

/// The first statement has no conjunctive and every later one has one
fn check_statements(statements: &[Statement]) -> Result<(), InvariantError> {
    let Some((first, rest)) = statements.split_first() else {
        return Err(InvariantError::EmptyFilter);
    };
    if first.conjunctive().is_some() {
        return Err(InvariantError::LeadingConjunctive);
    }
    if let Some(index) = rest.iter().position(|s| s.conjunctive().is_none()) {
        return Err(InvariantError::MissingConjunctive { index: index + 1 });
    }
    Ok(())
}

/// Evaluate `clause` as if its operator were the positive `operator`
fn positive_matches(
    clause: &Clause,
    operator: Operator,
    data: &Value,
) -> Result<bool, InvariantError> {
    let subject = operand_scalar(clause.subject(), data);
    let result = match (operator, clause.object()) {
        (Operator::Eq, Object::Operand(object)) => compare(subject, object, data, equals),
        (Operator::Gt, Object::Operand(object)) => compare(subject, object, data, |l, r| {
            ordering(l, r) == Some(Ordering::Greater)
        }),
        (Operator::Gte, Object::Operand(object)) => compare(subject, object, data, |l, r| {
            matches!(ordering(l, r), Some(Ordering::Greater | Ordering::Equal))
        }),
        (Operator::Lt, Object::Operand(object)) => compare(subject, object, data, |l, r| {
            ordering(l, r) == Some(Ordering::Less)
        }),
        (Operator::Lte, Object::Operand(object)) => compare(subject, object, data, |l, r| {
            matches!(ordering(l, r), Some(Ordering::Less | Ordering::Equal))
        }),
        (Operator::In, Object::Array(array)) => subject.is_some_and(|s| contains(array, s, data)),
        (Operator::Between, Object::Range(range)) => subject.is_some_and(|s| within(range, s)),
        (Operator::Like, Object::Like(like)) => match subject.and_then(Scalar::as_str) {
            Some(text) => like.is_match(text)?,
            None => false,
        },
        (operator, object) => {
            return Err(InvariantError::ObjectMismatch {
                operator,
                expected: operator.class().expected_object(),
                found: object.describe(),
            })
        }
    };
    Ok(result)
}

fn compare<F>(subject: Option<Scalar<'_>>, object: &Operand, data: &Value, test: F) -> bool
where
    F: Fn(Scalar<'_>, Scalar<'_>) -> bool,
{
    match (subject, operand_scalar(object, data)) {
        (Some(subject), Some(object)) => test(subject, object),
        _ => false,
    }
}

fn contains(array: &ArrayObject, subject: Scalar<'_>, data: &Value) -> bool {
    match array {
        ArrayObject::Literals(values) => values
            .iter()
            .any(|value| equals(subject, Scalar::from_literal(value))),
        ArrayObject::Target(target) => match resolve(target, data) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Scalar::from_json)
                .any(|item| equals(subject, item)),
            _ => false,
        },
    }
}

fn within(range: &Range, subject: Scalar<'_>) -> bool {
    let lower = ordering(subject, Scalar::from_literal(range.lower()));
    let upper = ordering(subject, Scalar::from_literal(range.upper()));
    matches!(lower, Some(Ordering::Greater | Ordering::Equal))
        && matches!(upper, Some(Ordering::Less | Ordering::Equal))
}
