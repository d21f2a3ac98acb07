//! Typed error handling
//!
//! The table engine itself never fails once built: unknown sort keys, unknown
//! filter keys and out-of-range pages all degrade to "no effect". Errors exist
//! for programmer mistakes caught at construction, for form submissions and for
//! the data source collaborator.
//!
//! # Error Categories
//!
//! - [`ConfigError`]: invalid engine or table configuration
//! - [`ValidationError`]: dynamic form rules and submissions
//! - [`StorageError`]: the in-memory data source

use serde::Serialize;
use uuid::Uuid;

/// The main error type of the crate
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Data source errors
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl TableError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            TableError::Config(e) => e.error_code(),
            TableError::Validation(e) => e.error_code(),
            TableError::Storage(e) => e.error_code(),
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Page size must be a positive integer
    #[error("Invalid items per page: {value} (must be at least 1)")]
    InvalidItemsPerPage { value: usize },

    /// A table cannot be built without an initial sort
    #[error("Missing initial sort for table")]
    MissingInitialSort,

    /// Sort expression could not be parsed
    #[error("Invalid sort expression '{value}': {message}")]
    InvalidSort { value: String, message: String },

    /// Failed to parse configuration file
    #[error("Failed to parse config{}: {message}", .file.as_ref().map(|f| format!(" file '{}'", f)).unwrap_or_default())]
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Named table does not exist in the configuration
    #[error("Unknown table: {name}")]
    UnknownTable { name: String },

    /// Invalid value in configuration
    #[error("Invalid value '{value}' for field '{field}': {message}")]
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },
}

impl ConfigError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigError::InvalidItemsPerPage { .. } => "INVALID_ITEMS_PER_PAGE",
            ConfigError::MissingInitialSort => "MISSING_INITIAL_SORT",
            ConfigError::InvalidSort { .. } => "INVALID_SORT",
            ConfigError::ParseError { .. } => "CONFIG_PARSE_ERROR",
            ConfigError::UnknownTable { .. } => "UNKNOWN_TABLE",
            ConfigError::InvalidValue { .. } => "INVALID_CONFIG_VALUE",
        }
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl FieldValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors related to form definitions and submissions
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// One or more fields failed their rules
    #[error("Validation errors: {}", format_field_errors(.0))]
    FieldErrors(Vec<FieldValidationError>),

    /// Submitted payload is not a JSON object
    #[error("Invalid payload: {message}")]
    InvalidPayload { message: String },

    /// A field definition carries a rule that cannot be compiled
    #[error("Invalid rule for field '{field}': {message}")]
    InvalidRule { field: String, message: String },
}

fn format_field_errors(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::FieldErrors(_) => "VALIDATION_ERROR",
            ValidationError::InvalidPayload { .. } => "INVALID_PAYLOAD",
            ValidationError::InvalidRule { .. } => "INVALID_RULE",
        }
    }

    /// Field errors, empty for non-field variants
    pub fn field_errors(&self) -> &[FieldValidationError] {
        match self {
            ValidationError::FieldErrors(errors) => errors,
            _ => &[],
        }
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to the data source
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Record was not found
    #[error("Record with id '{id}' not found")]
    NotFound { id: Uuid },

    /// A lock guarding the collection was poisoned
    #[error("Failed to acquire {kind} lock: {message}")]
    LockPoisoned { kind: &'static str, message: String },
}

impl StorageError {
    pub fn error_code(&self) -> &'static str {
        match self {
            StorageError::NotFound { .. } => "RECORD_NOT_FOUND",
            StorageError::LockPoisoned { .. } => "LOCK_POISONED",
        }
    }
}
