//! Keyword search over list views / 列表搜索
//!
//! - `config`: per-view search settings
//! - `predicate`: filter expressions
//! - `filter`: the `SearchFilter` trait turning a request into a predicate

pub mod config;
pub mod filter;
pub mod predicate;

pub use config::{SearchConfig, DEFAULT_SEARCH_PARAM};
pub use filter::SearchFilter;
pub use predicate::{FieldValue, Predicate};
