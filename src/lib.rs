pub mod config;
pub mod error;
pub mod models;
pub mod queryset;
pub mod search;
pub mod view;

pub use error::{ConfigurationError, QueryError, ViewError};
pub use queryset::{MemoryQuerySet, Order, QuerySet, SqlQuerySet};
pub use search::{FieldValue, Predicate, SearchConfig, SearchFilter};
pub use view::{ListRequest, ListView, SearchView};
