//! Caller authorization for association changes.
//!
//! The reconciliation service only depends on the [`Authorizer`] trait. Rule
//! sets are swappable: [`AllowAll`], any closure with the right signature, or
//! the file-driven [`PolicyAuthorizer`].

mod policy;

pub use policy::{AccessPolicy, PolicyAuthorizer, PolicyError, PolicyMode};

use linkset_types::{CallerIdentity, OwnerId};
use std::fmt;
use thiserror::Error;

/// Result type for authorization decisions.
pub type AuthzResult<T> = Result<T, AuthzError>;

/// Why a caller was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    /// The caller is on the deny list.
    CallerDenied,
    /// Allowlist mode and the caller is not listed.
    NotAllowlisted,
    /// The owner is restricted to other privileged callers.
    OwnerRestricted,
    /// The policy refuses every caller.
    Locked,
    /// Decision made by a custom authorizer.
    Custom(String),
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CallerDenied => f.write_str("caller is denied"),
            Self::NotAllowlisted => f.write_str("caller is not allowlisted"),
            Self::OwnerRestricted => f.write_str("owner is restricted to privileged callers"),
            Self::Locked => f.write_str("policy is locked"),
            Self::Custom(reason) => f.write_str(reason),
        }
    }
}

/// Authorization failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthzError {
    #[error("caller {caller} may not modify associations of {owner}: {reason}")]
    NotAuthorized {
        caller: CallerIdentity,
        owner: OwnerId,
        reason: DenyReason,
    },
}

impl AuthzError {
    pub fn not_authorized(caller: &CallerIdentity, owner: &OwnerId, reason: DenyReason) -> Self {
        Self::NotAuthorized {
            caller: caller.clone(),
            owner: owner.clone(),
            reason,
        }
    }
}

/// Decides whether a caller may change the association set of an owner.
pub trait Authorizer: Send + Sync {
    /// Returns `Ok(())` when access is granted.
    fn authorize(&self, caller: &CallerIdentity, owner: &OwnerId) -> AuthzResult<()>;
}

impl<F> Authorizer for F
where
    F: Fn(&CallerIdentity, &OwnerId) -> AuthzResult<()> + Send + Sync,
{
    fn authorize(&self, caller: &CallerIdentity, owner: &OwnerId) -> AuthzResult<()> {
        self(caller, owner)
    }
}

/// Grants every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl Authorizer for AllowAll {
    fn authorize(&self, _caller: &CallerIdentity, _owner: &OwnerId) -> AuthzResult<()> {
        Ok(())
    }
}
