//! SQLite-backed queryset / SQLite 查询集
//!
//! Builds a single `SELECT` with `sqlx::QueryBuilder`. Field names are quoted
//! but never checked against the schema: an unknown column only fails when
//! the statement runs.

use sqlx::sqlite::{Sqlite, SqlitePool, SqliteRow};
use sqlx::{FromRow, QueryBuilder};

use super::QuerySet;
use crate::search::predicate::escape_like;
use crate::search::{FieldValue, Predicate};

/// Sort direction / 排序方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    fn as_sql(self) -> &'static str {
        match self {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SqlQuerySet {
    table: String,
    filters: Vec<Predicate>,
    order_by: Vec<(String, Order)>,
    limit: Option<i64>,
}

impl SqlQuerySet {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            filters: Vec::new(),
            order_by: Vec::new(),
            limit: None,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn order_by(mut self, field: impl Into<String>, order: Order) -> Self {
        self.order_by.push((field.into(), order));
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Statement text executed by [`fetch_all`](Self::fetch_all), with `?` placeholders.
    pub fn to_sql(&self) -> String {
        self.select_builder().sql().to_string()
    }

    pub async fn fetch_all<T>(&self, pool: &SqlitePool) -> Result<Vec<T>, sqlx::Error>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let mut qb = self.select_builder();
        tracing::debug!("queryset sql: {}", qb.sql());
        qb.build_query_as::<T>().fetch_all(pool).await
    }

    /// Number of matching rows. Ordering and limit are ignored.
    pub async fn count(&self, pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM ");
        qb.push(quote_ident(&self.table));
        self.push_where(&mut qb);
        qb.build_query_scalar::<i64>().fetch_one(pool).await
    }

    fn select_builder(&self) -> QueryBuilder<'static, Sqlite> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM ");
        qb.push(quote_ident(&self.table));
        self.push_where(&mut qb);

        if !self.order_by.is_empty() {
            qb.push(" ORDER BY ");
            for (i, (field, order)) in self.order_by.iter().enumerate() {
                if i > 0 {
                    qb.push(", ");
                }
                qb.push(quote_ident(field)).push(" ").push(order.as_sql());
            }
        }

        if let Some(limit) = self.limit {
            qb.push(" LIMIT ").push_bind(limit);
        }
        qb
    }

    fn push_where(&self, qb: &mut QueryBuilder<'static, Sqlite>) {
        let predicate = self.predicate();
        if !predicate.is_all() {
            qb.push(" WHERE ");
            push_predicate(qb, &predicate);
        }
    }
}

impl QuerySet for SqlQuerySet {
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

/// Backtick quoting: unlike `"name"`, SQLite never reads it as a string literal.
fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

fn push_predicate(qb: &mut QueryBuilder<'static, Sqlite>, predicate: &Predicate) {
    match predicate {
        Predicate::All => {
            qb.push("1 = 1");
        }
        Predicate::Contains { field, value } => {
            qb.push("LOWER(")
                .push(quote_ident(field))
                .push(") LIKE LOWER(")
                .push_bind(format!("%{}%", escape_like(value)))
                .push(") ESCAPE '\\'");
        }
        Predicate::Exact { field, value } => {
            qb.push(quote_ident(field));
            match value {
                FieldValue::Null => {
                    qb.push(" IS NULL");
                }
                FieldValue::Text(s) => {
                    qb.push(" = ").push_bind(s.clone());
                }
                FieldValue::Integer(n) => {
                    qb.push(" = ").push_bind(*n);
                }
                FieldValue::Bool(b) => {
                    qb.push(" = ").push_bind(*b);
                }
            }
        }
        Predicate::Or { any } => push_group(qb, any, " OR ", "1 = 0"),
        Predicate::And { all } => push_group(qb, all, " AND ", "1 = 1"),
    }
}

fn push_group(qb: &mut QueryBuilder<'static, Sqlite>, items: &[Predicate], sep: &str, empty: &str) {
    if items.is_empty() {
        qb.push(empty);
        return;
    }
    qb.push("(");
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            qb.push(sep);
        }
        push_predicate(qb, item);
    }
    qb.push(")");
}
