//! Filter expressions applied to querysets / 查询条件表达式

use std::fmt;
use std::ops::{BitAnd, BitOr};

/// A scalar compared by [`Predicate::Exact`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Bool(bool),
    Null,
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

/// A boolean condition over the fields of a row.
///
/// `All` is the always-true predicate and the identity of `&`.
/// `a | b` and `a & b` flatten nested groups of the same kind, so reducing a
/// list of predicates yields a single `Or`/`And` node.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    All,
    /// Case-insensitive substring match.
    Contains { field: String, value: String },
    Exact { field: String, value: FieldValue },
    Or { any: Vec<Predicate> },
    And { all: Vec<Predicate> },
}

impl Predicate {
    pub fn icontains(field: impl Into<String>, value: impl Into<String>) -> Self {
        Predicate::Contains {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn exact(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Predicate::Exact {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Predicate::All)
    }

    /// Field names referenced by this predicate, in order of appearance.
    pub fn fields(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Predicate::All => {}
            Predicate::Contains { field, .. } | Predicate::Exact { field, .. } => out.push(field.as_str()),
            Predicate::Or { any: items } | Predicate::And { all: items } => {
                for item in items {
                    item.collect_fields(out);
                }
            }
        }
    }
}

impl BitOr for Predicate {
    type Output = Predicate;

    fn bitor(self, rhs: Predicate) -> Predicate {
        match (self, rhs) {
            // always-true absorbs anything OR'ed with it
            (Predicate::All, _) | (_, Predicate::All) => Predicate::All,
            (Predicate::Or { any: mut left }, Predicate::Or { any: right }) => {
                left.extend(right);
                Predicate::Or { any: left }
            }
            (Predicate::Or { mut any }, other) => {
                any.push(other);
                Predicate::Or { any }
            }
            (other, Predicate::Or { any }) => {
                let mut items = Vec::with_capacity(any.len() + 1);
                items.push(other);
                items.extend(any);
                Predicate::Or { any: items }
            }
            (left, right) => Predicate::Or {
                any: vec![left, right],
            },
        }
    }
}

impl BitAnd for Predicate {
    type Output = Predicate;

    fn bitand(self, rhs: Predicate) -> Predicate {
        match (self, rhs) {
            (Predicate::All, other) | (other, Predicate::All) => other,
            (Predicate::And { all: mut left }, Predicate::And { all: right }) => {
                left.extend(right);
                Predicate::And { all: left }
            }
            (Predicate::And { mut all }, other) => {
                all.push(other);
                Predicate::And { all }
            }
            (other, Predicate::And { all }) => {
                let mut items = Vec::with_capacity(all.len() + 1);
                items.push(other);
                items.extend(all);
                Predicate::And { all: items }
            }
            (left, right) => Predicate::And {
                all: vec![left, right],
            },
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{:?}", s),
            FieldValue::Integer(n) => write!(f, "{}", n),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Null => write!(f, "NULL"),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::All => write!(f, "TRUE"),
            Predicate::Contains { field, value } => write!(f, "{} icontains {:?}", field, value),
            Predicate::Exact { field, value } => write!(f, "{} = {}", field, value),
            Predicate::Or { any } => write_group(f, any, " OR ", "FALSE"),
            Predicate::And { all } => write_group(f, all, " AND ", "TRUE"),
        }
    }
}

fn write_group(f: &mut fmt::Formatter<'_>, items: &[Predicate], sep: &str, empty: &str) -> fmt::Result {
    if items.is_empty() {
        return write!(f, "{}", empty);
    }
    write!(f, "(")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", sep)?;
        }
        write!(f, "{}", item)?;
    }
    write!(f, ")")
}

/// Escape `\`, `%` and `_` so `value` matches literally inside `LIKE ... ESCAPE '\'`.
pub fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
