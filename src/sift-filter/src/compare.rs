//! Scalar equality and ordering
//!
//! Values only compare within a type. Integers and floats are both numbers
//! and compare numerically; booleans have equality but no ordering.

use std::cmp::Ordering;

use crate::resolve::Scalar;

/// Same type and equal value
pub fn equals(left: Scalar<'_>, right: Scalar<'_>) -> bool {
    match (left, right) {
        (Scalar::String(l), Scalar::String(r)) => l == r,
        (Scalar::Bool(l), Scalar::Bool(r)) => l == r,
        (l, r) => ordering(l, r) == Some(Ordering::Equal),
    }
}

/// Ordering of two strings or two numbers; `None` for anything else
pub fn ordering(left: Scalar<'_>, right: Scalar<'_>) -> Option<Ordering> {
    match (left, right) {
        (Scalar::String(l), Scalar::String(r)) => Some(l.cmp(r)),
        (Scalar::Int(l), Scalar::Int(r)) => Some(l.cmp(&r)),
        (Scalar::Float(l), Scalar::Float(r)) => l.partial_cmp(&r),
        (Scalar::Int(l), Scalar::Float(r)) => int_float(l, r),
        (Scalar::Float(l), Scalar::Int(r)) => int_float(r, l).map(Ordering::reverse),
        _ => None,
    }
}

/// Compare an integer with a float without rounding the integer
#[allow(clippy::cast_possible_truncation)]
fn int_float(int: i64, float: f64) -> Option<Ordering> {
    // 2^63, exact as an f64
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if float.is_nan() {
        return None;
    }
    if float >= LIMIT {
        return Some(Ordering::Less);
    }
    if float < -LIMIT {
        return Some(Ordering::Greater);
    }
    let whole = float.trunc();
    match int.cmp(&(whole as i64)) {
        Ordering::Equal => 0.0_f64.partial_cmp(&(float - whole)),
        unequal => Some(unequal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_is_typed() {
        assert!(equals(Scalar::Int(5), Scalar::Int(5)));
        assert!(equals(Scalar::Int(5), Scalar::Float(5.0)));
        assert!(!equals(Scalar::Int(5), Scalar::String("5")));
        assert!(!equals(Scalar::Bool(true), Scalar::Int(1)));
        assert!(equals(Scalar::String("a"), Scalar::String("a")));
        assert!(!equals(Scalar::String("a"), Scalar::String("A")));
    }

    #[test]
    fn test_ordering() {
        assert_eq!(
            ordering(Scalar::Int(2), Scalar::Int(10)),
            Some(Ordering::Less)
        );
        assert_eq!(
            ordering(Scalar::Float(2.5), Scalar::Int(2)),
            Some(Ordering::Greater)
        );
        // lexicographic, not numeric
        assert_eq!(
            ordering(Scalar::String("10"), Scalar::String("9")),
            Some(Ordering::Less)
        );
        assert_eq!(ordering(Scalar::Bool(false), Scalar::Bool(true)), None);
        assert_eq!(ordering(Scalar::String("1"), Scalar::Int(1)), None);
    }

    #[test]
    fn test_int_float_comparison_is_exact() {
        let two_53 = 1_i64 << 53;
        assert!(!equals(Scalar::Int(two_53 + 1), Scalar::Float(two_53 as f64)));
        assert!(equals(Scalar::Int(two_53), Scalar::Float(two_53 as f64)));
        assert_eq!(
            ordering(Scalar::Int(two_53 + 1), Scalar::Float(two_53 as f64)),
            Some(Ordering::Greater)
        );
        assert_eq!(
            ordering(Scalar::Float(two_53 as f64), Scalar::Int(two_53 + 1)),
            Some(Ordering::Less)
        );
        // i64::MAX as f64 rounds up to 2^63
        assert!(!equals(Scalar::Int(i64::MAX), Scalar::Float(i64::MAX as f64)));
        assert_eq!(
            ordering(Scalar::Int(i64::MAX), Scalar::Float(9.3e18)),
            Some(Ordering::Less)
        );
        assert!(equals(Scalar::Int(i64::MIN), Scalar::Float(i64::MIN as f64)));
        assert_eq!(
            ordering(Scalar::Int(-2), Scalar::Float(-2.5)),
            Some(Ordering::Greater)
        );
        assert_eq!(
            ordering(Scalar::Int(-3), Scalar::Float(-2.5)),
            Some(Ordering::Less)
        );
        assert_eq!(ordering(Scalar::Int(1), Scalar::Float(f64::NAN)), None);
    }

    #[test]
    fn test_large_integers_compare_exactly() {
        let big = i64::MAX;
        assert!(!equals(Scalar::Int(big), Scalar::Int(big - 1)));
        assert_eq!(
            ordering(Scalar::Int(big - 1), Scalar::Int(big)),
            Some(Ordering::Less)
        );
    }
}
