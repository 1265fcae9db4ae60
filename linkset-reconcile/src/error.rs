//! Error types for the reconciliation service.

use crate::outcome::{Change, ReconciliationOutcome};
use linkset_authz::AuthzError;
use linkset_store::StoreError;
use linkset_types::ValidationError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for reconciliation operations.
pub type ReconcileResult<T> = Result<T, ReconcileError>;

/// Coarse classification of a [`ReconcileError`], for callers that map
/// failures to user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ValidationFailed,
    Unauthorized,
    ReconciliationFailed,
    Cancelled,
}

/// Errors returned by the reconciliation service.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Malformed input. Nothing was read or written.
    #[error("validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    /// The caller may not modify this owner. Nothing was read or written.
    #[error("unauthorized: {0}")]
    Unauthorized(#[from] AuthzError),

    /// A repository call failed. `partial` lists the changes applied before
    /// the failure; `failed_change` is `None` when reading current state failed.
    #[error("reconciliation failed after {} change(s): {source}", .partial.change_count())]
    ReconciliationFailed {
        #[source]
        source: StoreError,
        failed_change: Option<Change>,
        partial: ReconciliationOutcome,
    },

    /// Cancellation was observed; no further mutations were issued.
    #[error("reconciliation cancelled after {} change(s)", .partial.change_count())]
    Cancelled { partial: ReconciliationOutcome },
}

impl ReconcileError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ValidationFailed(_) => ErrorKind::ValidationFailed,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::ReconciliationFailed { .. } => ErrorKind::ReconciliationFailed,
            Self::Cancelled { .. } => ErrorKind::Cancelled,
        }
    }

    /// True when calling again with the same target is safe and may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ReconciliationFailed { .. } | Self::Cancelled { .. }
        )
    }

    /// Changes applied before the call stopped, if it got that far.
    pub fn partial(&self) -> Option<&ReconciliationOutcome> {
        match self {
            Self::ReconciliationFailed { partial, .. } | Self::Cancelled { partial } => {
                Some(partial)
            }
            _ => None,
        }
    }

    /// The change the store rejected.
    pub fn failed_change(&self) -> Option<&Change> {
        match self {
            Self::ReconciliationFailed { failed_change, .. } => failed_change.as_ref(),
            _ => None,
        }
    }
}

/// Errors loading service configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("identifier max_length {value} is outside 1..={max}")]
    MaxLength { value: usize, max: usize },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid identifier pattern: {0}")]
    Pattern(#[from] regex_lite::Error),
}
