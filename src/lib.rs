//! # estate-table
//!
//! The list and form plumbing behind a real-estate back office: partners,
//! properties, leads and portfolio pages all render an in-memory collection
//! through the same table engine.
//!
//! ## Features
//!
//! - **Table Engine**: search, named filters, nested-key sort and pagination over any record type
//! - **Stable Controls**: page, search, filter and sort setters that keep the page in range
//! - **Dot-Path Fields**: sort and filter on nested fields such as `title.en`
//! - **Declarative Tables**: describe search fields and filters in YAML
//! - **Dynamic Forms**: compile field definitions into constraints, filters and validators
//! - **Mock Data Source**: async in-memory CRUD with simulated latency
//!
//! ## Quick Start
//!
//! ```rust
//! use estate_table::prelude::*;
//! use serde_json::{Value, json};
//!
//! let properties: Vec<Value> = (1..=23)
//!     .map(|i| json!({"title": {"en": format!("Unit {i}")}, "price": i * 100_000}))
//!     .collect();
//!
//! let mut table = TableEngine::builder()
//!     .data(properties)
//!     .items_per_page(10)
//!     .initial_sort(SortSpec::desc("price"))
//!     .search_fn(search_fields(vec!["title.en".into()]))
//!     .filter_fn("minPrice", FilterMatch::Min.predicate("price"))
//!     .build()?;
//!
//! assert_eq!(table.total_pages(), 3);
//! table.set_current_page(3);
//! table.set_filter("minPrice", "2000000");
//! assert_eq!(table.current_page(), 1);
//! assert_eq!(table.total_items(), 4);
//! # Ok::<(), TableError>(())
//! ```

pub mod config;
pub mod core;
pub mod form;
pub mod storage;
pub mod table;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        ConfigError, FieldValue, FilterSet, FilterValue, PaginationMeta, Record, SortDirection,
        SortIndicator, SortSpec, StorageError, TableError, TableQuery, ValidationError,
    };

    // === Table ===
    pub use crate::table::{
        EngineState, FilterFn, FilterMatch, SearchFn, TableEngine, TableEngineBuilder, TablePage,
        search_fields,
    };

    // === Config ===
    pub use crate::config::{FilterRule, TableConfig, TablesConfig};

    // === Forms ===
    pub use crate::form::{DynamicForm, FieldKind, FieldRule, FormField};

    // === Storage ===
    pub use crate::storage::{DataSource, InMemoryDataSource, refresh_table};
}
