//! Unified error types for the domain layer
//!
//! The two planning derivations are total and never return errors. This type
//! covers the fallible edges around them: parsing node vocabulary from strings
//! and explicit hierarchy edits on a plot canvas.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Entity not found
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Hierarchy rule violation (cycles, self-parenting, duplicates)
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// Parse error (for vocabulary types)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Creates a validation error for malformed input.
    ///
    /// # Example
    /// ```ignore
    /// if title.trim().is_empty() {
    ///     return Err(DomainError::validation("Act title cannot be empty"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Create a constraint violation error
    pub fn constraint(msg: impl Into<String>) -> Self {
        Self::Constraint(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    ///
    /// Used by the `FromStr` implementations of node vocabulary:
    ///
    /// ```ignore
    /// impl FromStr for NodeStatus {
    ///     type Err = DomainError;
    ///     fn from_str(s: &str) -> Result<Self, Self::Err> {
    ///         match s {
    ///             "completed" => Ok(Self::Completed),
    ///             _ => Err(DomainError::parse(format!("Unknown node status: {}", s))),
    ///         }
    ///     }
    /// }
    /// ```
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}
