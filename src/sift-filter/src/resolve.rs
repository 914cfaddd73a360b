//! Field resolution against JSON data
//!
//! A [`Target`] is walked segment by segment. Anything that cannot be walked
//! (a missing member, an out-of-range index, a step into a scalar) leaves the
//! target unresolved, and so does a JSON `null` at the end of the path.

use serde_json::Value;
use sift_parser::{Literal, Operand, Segment, Target};

/// Follow `target` into `data`
pub fn resolve<'a>(target: &Target, data: &'a Value) -> Option<&'a Value> {
    let mut current = data;
    for segment in target.path() {
        current = match (segment, current) {
            (Segment::Key(key), Value::Object(map)) => map.get(key)?,
            (Segment::Index(index), Value::Array(items)) => items.get(*index)?,
            (Segment::Index(index), Value::Object(map)) => map.get(&index.to_string())?,
            _ => return None,
        };
    }
    match current {
        Value::Null => None,
        value => Some(value),
    }
}

/// A comparable scalar, borrowed from a literal or from the data
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    /// String value
    String(&'a str),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Boolean value
    Bool(bool),
}

impl<'a> Scalar<'a> {
    /// View a JSON value as a scalar; `None` for null, arrays and objects
    pub fn from_json(value: &'a Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Scalar::String(s)),
            Value::Bool(b) => Some(Scalar::Bool(*b)),
            Value::Number(n) => n
                .as_i64()
                .map(Scalar::Int)
                .or_else(|| n.as_f64().map(Scalar::Float)),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// View a literal as a scalar
    pub fn from_literal(literal: &'a Literal) -> Self {
        match literal {
            Literal::String(s) => Scalar::String(s),
            Literal::Bool(b) => Scalar::Bool(*b),
            Literal::Int(i) => Scalar::Int(*i),
            Literal::Float(f) => Scalar::Float(*f),
        }
    }

    /// The string payload, if this is a string
    pub fn as_str(self) -> Option<&'a str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Resolve an operand to a scalar
///
/// Literals always resolve. Targets resolve when they reach a non-null
/// scalar; arrays and objects count as unresolved for scalar comparison.
pub fn operand_scalar<'a>(operand: &'a Operand, data: &'a Value) -> Option<Scalar<'a>> {
    match operand {
        Operand::Literal(literal) => Some(Scalar::from_literal(literal)),
        Operand::Target(target) => resolve(target, data).and_then(Scalar::from_json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn target(pointer: &str) -> Target {
        Target::parse(pointer).unwrap()
    }

    #[test]
    fn test_resolve_nested_paths() {
        let data = json!({
            "user": {"name": "Ada", "emails": ["a@x.io", "b@x.io"]},
            "a/b": 1,
            "m~n": 2
        });
        assert_eq!(resolve(&target("/user/name"), &data), Some(&json!("Ada")));
        assert_eq!(
            resolve(&target("/user/emails/1"), &data),
            Some(&json!("b@x.io"))
        );
        assert_eq!(resolve(&target("/a~1b"), &data), Some(&json!(1)));
        assert_eq!(resolve(&target("/m~0n"), &data), Some(&json!(2)));
        assert_eq!(
            resolve(&target("/user"), &data).map(Value::is_object),
            Some(true)
        );
    }

    #[test]
    fn test_unresolved_paths() {
        let data = json!({"a": {"b": null}, "list": [1, 2], "n": 5});
        assert_eq!(resolve(&target("/missing"), &data), None);
        assert_eq!(resolve(&target("/a/b"), &data), None);
        assert_eq!(resolve(&target("/list/2"), &data), None);
        assert_eq!(resolve(&target("/list/x"), &data), None);
        assert_eq!(resolve(&target("/n/0"), &data), None);
        assert_eq!(resolve(&target("/n/k"), &data), None);
    }

    #[test]
    fn test_index_segment_on_object_uses_member_name() {
        let data = json!({"codes": {"0": "zero", "10": "ten"}});
        assert_eq!(resolve(&target("/codes/0"), &data), Some(&json!("zero")));
        assert_eq!(resolve(&target("/codes/10"), &data), Some(&json!("ten")));
    }

    #[test]
    fn test_scalars() {
        assert_eq!(Scalar::from_json(&json!(3)), Some(Scalar::Int(3)));
        assert_eq!(Scalar::from_json(&json!(3.5)), Some(Scalar::Float(3.5)));
        assert_eq!(
            Scalar::from_json(&json!(u64::MAX)),
            Some(Scalar::Float(u64::MAX as f64))
        );
        assert_eq!(Scalar::from_json(&json!("x")), Some(Scalar::String("x")));
        assert_eq!(Scalar::from_json(&json!([1])), None);
        assert_eq!(Scalar::from_json(&json!(null)), None);
    }

    #[test]
    fn test_operand_scalar() {
        let data = json!({"a": [1], "b": true});
        let literal = Operand::from(2.5);
        assert_eq!(operand_scalar(&literal, &data), Some(Scalar::Float(2.5)));
        assert_eq!(
            operand_scalar(&Operand::Target(target("/b")), &data),
            Some(Scalar::Bool(true))
        );
        assert_eq!(operand_scalar(&Operand::Target(target("/a")), &data), None);
    }
}
