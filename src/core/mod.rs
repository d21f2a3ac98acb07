//! Core module containing the fundamental types shared by tables, forms and data sources

pub mod error;
pub mod field;
pub mod filter;
pub mod query;
pub mod record;

pub use error::{ConfigError, FieldValidationError, StorageError, TableError, ValidationError};
pub use field::FieldValue;
pub use filter::{FilterSet, FilterValue};
pub use query::{PaginationMeta, SortDirection, SortIndicator, SortSpec, TableQuery};
pub use record::{Record, resolve_path};
