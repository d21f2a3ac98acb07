//! Generic tabular data engine
//!
//! Turns an in-memory collection into a searched, filtered, sorted and
//! paginated view, and exposes the controls a list page binds to its table.

pub mod engine;
pub mod pipeline;
pub mod predicates;
pub mod state;

pub use engine::{TableEngine, TableEngineBuilder, TablePage};
pub use predicates::{FilterMatch, search_fields};
pub use state::EngineState;

use std::sync::Arc;

/// Free-text search predicate, called with the normalized term
pub type SearchFn<T> = Arc<dyn Fn(&T, &str) -> bool + Send + Sync>;

/// Named filter predicate, called with the active filter value
pub type FilterFn<T> = Arc<dyn Fn(&T, &str) -> bool + Send + Sync>;

/// Default page size of a table
pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;
