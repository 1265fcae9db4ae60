//! Error types for the store layer.

use linkset_types::{MemberId, OwnerId};
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in repository operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store cannot be reached (connection lost, lock contention, timeout).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The association is already present.
    #[error("association {owner} -> {member} already exists")]
    AlreadyExists { owner: OwnerId, member: MemberId },

    /// The association is not present.
    #[error("association {owner} -> {member} not found")]
    NotFound { owner: OwnerId, member: MemberId },

    /// Adding would exceed the per-owner association cap.
    #[error("owner {owner} already has the maximum of {limit} associations")]
    LimitExceeded { owner: OwnerId, limit: usize },

    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Stored data failed to parse back into typed values.
    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl StoreError {
    /// True for failures that may clear up on retry.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Unavailable(_) => true,
            Self::Database(rusqlite::Error::SqliteFailure(e, _)) => matches!(
                e.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ),
            _ => false,
        }
    }
}
