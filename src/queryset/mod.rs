//! Lazy, composable data-retrieval requests / 可组合的惰性查询集

pub mod memory;
pub mod sql;

pub use memory::MemoryQuerySet;
pub use sql::{Order, SqlQuerySet};

use crate::search::Predicate;

/// A queryset narrows with [`filter`](QuerySet::filter) and runs later.
///
/// Every call to `filter` is AND'ed with the constraints already present.
/// Filtering with [`Predicate::All`] must leave the queryset equivalent to
/// its input.
pub trait QuerySet: Sized {
    fn filter(self, predicate: Predicate) -> Self;

    /// Combined constraint of every filter applied so far.
    fn predicate(&self) -> Predicate;
}
