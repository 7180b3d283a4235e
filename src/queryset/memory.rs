//! In-process queryset over JSON rows / 内存查询集
//!
//! Rows are JSON objects. Filters are only evaluated when the rows are
//! materialized. Every row must carry every field the predicate names, even
//! fields an earlier OR/AND branch already made irrelevant.

use serde_json::{Map, Value};

use super::QuerySet;
use crate::error::QueryError;
use crate::search::{FieldValue, Predicate};

pub type Row = Map<String, Value>;

#[derive(Debug, Clone, Default)]
pub struct MemoryQuerySet {
    rows: Vec<Row>,
    filters: Vec<Predicate>,
}

impl MemoryQuerySet {
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows,
            filters: Vec::new(),
        }
    }

    /// Build from JSON values; anything that is not an object is skipped.
    pub fn from_values(values: impl IntoIterator<Item = Value>) -> Self {
        let rows = values
            .into_iter()
            .filter_map(|v| match v {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect();
        Self::new(rows)
    }

    /// Matching rows in their original order.
    pub fn into_rows(self) -> Result<Vec<Row>, QueryError> {
        let predicate = self.predicate();
        let mut out = Vec::new();
        for row in self.rows {
            if evaluate(&predicate, &row)? {
                out.push(row);
            }
        }
        Ok(out)
    }

    pub fn count(&self) -> Result<usize, QueryError> {
        let predicate = self.predicate();
        let mut n = 0;
        for row in &self.rows {
            if evaluate(&predicate, row)? {
                n += 1;
            }
        }
        Ok(n)
    }
}

impl QuerySet for MemoryQuerySet {
    fn filter(mut self, predicate: Predicate) -> Self {
        if !predicate.is_all() {
            self.filters.push(predicate);
        }
        self
    }

    fn predicate(&self) -> Predicate {
        self.filters
            .iter()
            .cloned()
            .fold(Predicate::All, |acc, p| acc & p)
    }
}

fn evaluate(predicate: &Predicate, row: &Row) -> Result<bool, QueryError> {
    for field in predicate.fields() {
        lookup(row, field)?;
    }
    matches(predicate, row)
}

fn lookup<'a>(row: &'a Row, field: &str) -> Result<&'a Value, QueryError> {
    row.get(field)
        .ok_or_else(|| QueryError::UnknownField(field.to_string()))
}

/// Text form used for substring matching; `None` for null and containers.
fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn equals(value: &Value, expected: &FieldValue) -> bool {
    match (value, expected) {
        (Value::Null, FieldValue::Null) => true,
        (Value::String(s), FieldValue::Text(t)) => s == t,
        (Value::Number(n), FieldValue::Integer(i)) => n.as_i64() == Some(*i),
        (Value::Bool(b), FieldValue::Bool(e)) => b == e,
        // booleans stored as 0/1
        (Value::Number(n), FieldValue::Bool(e)) => n.as_i64() == Some(*e as i64),
        _ => false,
    }
}

fn matches(predicate: &Predicate, row: &Row) -> Result<bool, QueryError> {
    match predicate {
        Predicate::All => Ok(true),
        Predicate::Contains { field, value } => {
            let haystack = lookup(row, field)?;
            Ok(as_text(haystack)
                .map(|text| text.to_lowercase().contains(&value.to_lowercase()))
                .unwrap_or(false))
        }
        Predicate::Exact { field, value } => Ok(equals(lookup(row, field)?, value)),
        Predicate::Or { any } => {
            for item in any {
                if matches(item, row)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        Predicate::And { all } => {
            for item in all {
                if !matches(item, row)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
    }
}
