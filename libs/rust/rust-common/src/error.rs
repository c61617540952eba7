//! Centralized error type for storage collaborators.
//!
//! Persistence adapters (relational stores, caches, in-memory test doubles)
//! report failures through [`PlatformError`] so that services can classify
//! them without knowing which backend produced them.

use thiserror::Error;

/// Common error type for persistence operations.
///
/// All errors are classified as either retryable or non-retryable. The
/// classification is advisory: retry policy belongs to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// Backend is temporarily unavailable (connection refused, pool exhausted)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Storage call exceeded its deadline
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Query was rejected by the backend
    #[error("Query failed: {0}")]
    Query(String),

    /// Write violated a storage constraint
    #[error("Constraint violated: {0}")]
    Constraint(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PlatformError {
    /// Check if this error is retryable.
    ///
    /// Retryable errors are transient failures that may succeed on retry,
    /// such as network issues or temporary unavailability.
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_common::PlatformError;
    ///
    /// let err = PlatformError::unavailable("pool exhausted");
    /// assert!(err.is_retryable());
    ///
    /// let err = PlatformError::query("syntax error");
    /// assert!(!err.is_retryable());
    /// ```
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Timeout(_))
    }

    /// Create an unavailable error with the given message.
    #[must_use]
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create a timeout error with the given message.
    #[must_use]
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Create a query error with the given message.
    #[must_use]
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Create a constraint error with the given message.
    #[must_use]
    pub fn constraint(msg: impl Into<String>) -> Self {
        Self::Constraint(msg.into())
    }
}
