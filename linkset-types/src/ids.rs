//! Identifier types used throughout the Linkset core.
//!
//! `OwnerId` and `MemberId` are opaque string tokens that can only be built
//! through validation, so holding one proves it is well-formed.
//! `CallerIdentity` is never validated; only the authorizer interprets it.

use crate::validate::{IdField, IdentifierRules, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of the entity that owns an association set (e.g. a parent).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OwnerId(String);

impl OwnerId {
    /// Parses an owner ID, enforcing the identifier format and the absolute
    /// length ceiling.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        IdentifierRules::ceiling().check(IdField::Owner, s)?;
        Ok(Self(s.to_string()))
    }

    /// Builds an ID that has already passed `IdentifierRules::check`.
    pub(crate) fn from_checked(s: &str) -> Self {
        Self(s.to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for OwnerId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for OwnerId {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        IdentifierRules::ceiling().check(IdField::Owner, &s)?;
        Ok(Self(s))
    }
}

impl AsRef<str> for OwnerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<OwnerId> for String {
    fn from(id: OwnerId) -> Self {
        id.0
    }
}

/// Identifier of an entity linked to an owner (e.g. a student).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MemberId(String);

impl MemberId {
    /// Parses a member ID, enforcing the identifier format and the absolute
    /// length ceiling.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        IdentifierRules::ceiling().check(IdField::Member, s)?;
        Ok(Self(s.to_string()))
    }

    pub(crate) fn from_checked(s: &str) -> Self {
        Self(s.to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for MemberId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MemberId {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        IdentifierRules::ceiling().check(IdField::Member, &s)?;
        Ok(Self(s))
    }
}

impl AsRef<str> for MemberId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<MemberId> for String {
    fn from(id: MemberId) -> Self {
        id.0
    }
}

/// Opaque identity of the actor requesting a change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallerIdentity(String);

impl CallerIdentity {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CallerIdentity {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for CallerIdentity {
    fn from(s: String) -> Self {
        Self(s)
    }
}
