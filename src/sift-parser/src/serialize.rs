//! Canonical text rendering of filter graphs
//!
//! `Display` on every graph type produces text that the parser accepts and
//! that parses back to an equal graph.

use std::fmt;

use crate::ast::{
    ArrayObject, Clause, Conjunctive, Filter, Literal, Node, Object, Operand, Operator, Range,
};
use crate::pattern::Like;

impl Filter {
    /// Render the filter, percent-encoded for a query string when `url_encode` is set
    pub fn to_query_string(&self, url_encode: bool) -> String {
        let text = self.to_string();
        if url_encode {
            urlencoding::encode(&text).into_owned()
        } else {
            text
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for statement in self.statements() {
            if let Some(conjunctive) = statement.conjunctive() {
                write!(f, " {} ", conjunctive)?;
            }
            match statement.node() {
                Node::Clause(clause) => write!(f, "{}", clause)?,
                Node::Group(group) => write!(f, "({})", group)?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject(), self.operator(), self.object())
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Operand(operand) => write!(f, "{}", operand),
            Object::Array(array) => write!(f, "{}", array),
            Object::Range(range) => write!(f, "{}", range),
            Object::Like(like) => write!(f, "{}", like),
        }
    }
}

impl fmt::Display for ArrayObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayObject::Literals(values) => {
                write!(f, "[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", value)?;
                }
                write!(f, "]")
            }
            ArrayObject::Target(target) => write!(f, "{}", target),
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lower(), self.upper())
    }
}

impl fmt::Display for Like {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.pattern())
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Target(target) => write!(f, "{}", target),
            Operand::Literal(literal) => write!(f, "{}", literal),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => write!(f, "\"{}\"", s),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Int(i) => write!(f, "{}", i),
            // Debug keeps the fractional part or exponent, so the text
            // lexes back as a float
            Literal::Float(x) => write!(f, "{:?}", x),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl fmt::Display for Conjunctive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::Target;
    use pretty_assertions::assert_eq;

    fn target(pointer: &str) -> Target {
        Target::parse(pointer).unwrap()
    }

    #[test]
    fn test_literals() {
        assert_eq!(Literal::from("a b").to_string(), "\"a b\"");
        assert_eq!(Literal::Int(-3).to_string(), "-3");
        assert_eq!(Literal::Float(2.0).to_string(), "2.0");
        assert_eq!(Literal::Float(0.25).to_string(), "0.25");
        assert_eq!(Literal::Float(1e-7).to_string(), "1e-7");
        assert_eq!(Literal::Bool(false).to_string(), "false");
    }

    #[test]
    fn test_clause_forms() {
        assert_eq!(
            Clause::builder(target("/a")).is_in([1, 2, 3]).unwrap().to_string(),
            "/a in [1,2,3]"
        );
        assert_eq!(
            Clause::builder(target("/a")).not_in(Vec::<Literal>::new()).unwrap().to_string(),
            "/a nin []"
        );
        assert_eq!(
            Clause::builder(target("/a")).between("a", "m").unwrap().to_string(),
            "/a between \"a\",\"m\""
        );
        assert_eq!(
            Clause::builder(target("/a/0")).neq(target("/b~1c")).unwrap().to_string(),
            "/a/0 neq /b~1c"
        );
        assert_eq!(
            Clause::builder(target("/n")).not_like(r"a\*b").unwrap().to_string(),
            r#"/n nlike "a\*b""#
        );
    }

    #[test]
    fn test_groups_and_conjunctives() {
        let a1 = Clause::builder(target("/a")).eq(1).unwrap();
        let a2 = Clause::builder(target("/a")).eq(2).unwrap();
        let filter = Filter::group(Filter::new(a1).or(a2))
        .and(Clause::builder(target("/b")).eq(3).unwrap());
        assert_eq!(filter.to_string(), "(/a eq 1 or /a eq 2) and /b eq 3");
    }

    #[test]
    fn test_query_string_encoding() {
        let filter = Filter::new(Clause::builder(target("/name")).like("J* D").unwrap());
        assert_eq!(filter.to_query_string(false), "/name like \"J* D\"");
        assert_eq!(
            filter.to_query_string(true),
            "%2Fname%20like%20%22J%2A%20D%22"
        );
    }
}
