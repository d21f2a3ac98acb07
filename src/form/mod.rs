//! Dynamic forms
//!
//! Admin create/edit dialogs are described by field definitions. A
//! [`DynamicForm`] compiles them into rendering constraints, input filters and
//! validators, and turns a raw submission into a clean payload. The payload
//! reaches list tables only through a data source, never directly.

pub mod engine;
pub mod field;
pub mod filters;
pub mod validators;

pub use engine::DynamicForm;
pub use field::{FieldKind, FieldRule, FormField, InputConstraints, SelectOption};
