//! Error types for the ACL engine

use thiserror::Error;

use crate::types::Operation;

/// ACL engine errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AclError {
    /// The resolved roles do not grant the operation on the resource
    #[error("Not authorized: {operation} on '{resource}'")]
    NotAuthorized {
        resource: String,
        operation: Operation,
    },

    /// The identity store could not be reached or rejected the lookup
    #[error("Identity store lookup failed: {0}")]
    UpstreamLookupFailed(String),

    /// A parent chain loops back onto itself
    #[error("Circular parent chain: {0}")]
    CircularParent(String),

    /// Role registered more than once
    #[error("Duplicate role: {0}")]
    DuplicateRole(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Identity store errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// No user with that name in the pool
    #[error("User not found: {pool}/{username}")]
    UserNotFound { pool: String, username: String },

    /// The store could not serve the request
    #[error("Identity store unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for AclError {
    fn from(err: StoreError) -> Self {
        AclError::UpstreamLookupFailed(err.to_string())
    }
}

/// Result type for ACL operations
pub type Result<T> = std::result::Result<T, AclError>;
