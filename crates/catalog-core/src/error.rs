//! # Error Types
//!
//! Domain-specific error types for catalog-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  catalog-core errors (this file)                                       │
//! │  ├── CoreError         - Domain failures (not found, bad keyword)      │
//! │  ├── ValidationErrors  - Every field that failed on a candidate        │
//! │  └── ValidationError   - One field constraint violation                │
//! │                                                                         │
//! │  catalog-db errors (separate crate)                                    │
//! │  └── DbError           - Database operation failures                   │
//! │                                                                         │
//! │  catalog-web errors (app)                                              │
//! │  └── ApiError          - What the HTTP client sees                     │
//! │                                                                         │
//! │  Flow: ValidationError → ValidationErrors → CoreError → ApiError       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Domain failures raised by catalog operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No product has the requested id.
    ///
    /// ## When This Occurs
    /// - Details or Delete on an id that was never assigned
    /// - Details or Delete on an id that was already deleted
    /// - A concurrent Delete won the race for the same row
    #[error("Product with ID {0} not found.")]
    ProductNotFound(i64),

    /// Search was called with an empty or whitespace-only keyword.
    #[error("A search keyword is required.")]
    MissingSearchKeyword,

    /// The candidate product failed one or more field constraints.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),
}

// =============================================================================
// Validation Error
// =============================================================================

/// A single field constraint violation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value is outside `(min, max]`.
    #[error("{field} must be greater than {min} and at most {max}")]
    OutOfRange {
        field: String,
        min: String,
        max: String,
    },

    /// Value could not be parsed.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Name of the field this error belongs to.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Every constraint violation found on one candidate, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, err: ValidationError) {
        self.0.push(err);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// Returns true if any error was recorded for `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field() == field)
    }

    /// Messages recorded for a single field.
    pub fn messages_for(&self, field: &str) -> Vec<String> {
        self.0
            .iter()
            .filter(|e| e.field() == field)
            .map(ToString::to_string)
            .collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

// =============================================================================
// Unit Tests
// =============================================================================
