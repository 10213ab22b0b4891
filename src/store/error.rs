//! StoreError - failures surfaced by storage backends.

use thiserror::Error;

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from a [`super::VisitStore`] backend.
///
/// Every error carries the operation and key it happened on so the HTTP layer
/// can log it without extra context. No operation is retried; errors
/// propagate as-is.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing table service or transport failed.
    #[error("store: {op} {key}: {message}")]
    Service {
        /// Operation that failed, e.g. "get item".
        op: &'static str,
        /// Record key (or table name for scans).
        key: String,
        /// Underlying service error chain, flattened.
        message: String,
    },

    /// Stored data did not parse back into a visit record.
    #[error("store: corrupt record {key}: {message}")]
    Corrupt {
        /// Record key the bad data belongs to.
        key: String,
        /// What failed to parse.
        message: String,
    },
}

impl StoreError {
    /// Wrap a service failure with operation context.
    pub fn service(
        op: &'static str,
        key: impl Into<String>,
        err: impl std::fmt::Display,
    ) -> Self {
        Self::Service {
            op,
            key: key.into(),
            message: err.to_string(),
        }
    }

    /// Wrap a parse failure on stored data.
    pub fn corrupt(key: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Corrupt {
            key: key.into(),
            message: err.to_string(),
        }
    }
}
