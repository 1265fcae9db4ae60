//! Syntactic validation of owner and member identifiers.
//!
//! Validation never consults the store: an identifier that passes here may
//! still be unknown to the repository.

use crate::ids::{MemberId, OwnerId};
use crate::set::AssociationSet;
use regex_lite::Regex;
use std::fmt;
use thiserror::Error;

/// Absolute length ceiling for any identifier, regardless of configuration.
pub const MAX_IDENTIFIER_LENGTH: usize = 255;

/// Default length bound applied to incoming requests.
pub const DEFAULT_MAX_LENGTH: usize = 64;

/// Which side of the association an identifier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdField {
    Owner,
    Member,
}

impl fmt::Display for IdField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owner => f.write_str("owner"),
            Self::Member => f.write_str("member"),
        }
    }
}

/// Why an identifier was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidReason {
    #[error("empty or whitespace-only")]
    Empty,

    #[error("longer than {max} characters ({actual})")]
    TooLong { max: usize, actual: usize },

    #[error("contains non-alphanumeric characters")]
    InvalidCharacters,

    #[error("does not match the configured identifier pattern")]
    PatternMismatch,
}

/// Errors produced by identifier and request-shape validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A single identifier is malformed.
    #[error("invalid {field} identifier {value:?}: {reason}")]
    InvalidIdentifier {
        field: IdField,
        value: String,
        reason: InvalidReason,
    },

    /// The target set is larger than the configured member limit.
    #[error("{count} members exceeds the limit of {max}")]
    TooManyMembers { count: usize, max: usize },

    /// A member was listed both for assignment and removal.
    #[error("member {0} is both assigned and removed")]
    ConflictingChange(MemberId),
}

/// Result type for validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Format rules for identifiers: an alphanumeric token of bounded length,
/// optionally narrowed by a deployment-specific pattern.
#[derive(Debug, Clone)]
pub struct IdentifierRules {
    max_length: usize,
    pattern: Option<Regex>,
}

impl Default for IdentifierRules {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            pattern: None,
        }
    }
}

impl IdentifierRules {
    /// Creates rules with the given length bound, clamped to
    /// `1..=MAX_IDENTIFIER_LENGTH`. Callers taking the bound from user input
    /// should reject out-of-range values before calling this.
    pub fn new(max_length: usize) -> Self {
        Self {
            max_length: max_length.clamp(1, MAX_IDENTIFIER_LENGTH),
            pattern: None,
        }
    }

    /// The loosest rules any identifier must satisfy.
    pub(crate) fn ceiling() -> Self {
        Self::new(MAX_IDENTIFIER_LENGTH)
    }

    /// Adds a pattern that must match the whole identifier.
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self, regex_lite::Error> {
        self.pattern = Some(Regex::new(pattern)?);
        Ok(self)
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_ref().map(Regex::as_str)
    }

    /// Checks one identifier against these rules.
    pub fn check(&self, field: IdField, id: &str) -> ValidationResult<()> {
        let reject = |reason| ValidationError::InvalidIdentifier {
            field,
            value: id.to_string(),
            reason,
        };

        if id.trim().is_empty() {
            return Err(reject(InvalidReason::Empty));
        }
        if !id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(reject(InvalidReason::InvalidCharacters));
        }
        if id.len() > self.max_length {
            return Err(reject(InvalidReason::TooLong {
                max: self.max_length,
                actual: id.len(),
            }));
        }
        if let Some(re) = &self.pattern {
            let whole = re
                .find(id)
                .is_some_and(|m| m.start() == 0 && m.end() == id.len());
            if !whole {
                return Err(reject(InvalidReason::PatternMismatch));
            }
        }
        Ok(())
    }
}

/// Validates request identifiers and turns them into typed IDs.
#[derive(Debug, Clone, Default)]
pub struct IdentifierValidator {
    rules: IdentifierRules,
    max_members: Option<usize>,
}

impl IdentifierValidator {
    pub fn new(rules: IdentifierRules) -> Self {
        Self {
            rules,
            max_members: None,
        }
    }

    /// Rejects target sets with more than `max` distinct members.
    #[must_use]
    pub fn with_max_members(mut self, max: usize) -> Self {
        self.max_members = Some(max);
        self
    }

    pub fn rules(&self) -> &IdentifierRules {
        &self.rules
    }

    pub fn max_members(&self) -> Option<usize> {
        self.max_members
    }

    pub fn validate_owner_id(&self, id: &str) -> ValidationResult<OwnerId> {
        self.rules.check(IdField::Owner, id)?;
        Ok(OwnerId::from_checked(id))
    }

    pub fn validate_member_id(&self, id: &str) -> ValidationResult<MemberId> {
        self.rules.check(IdField::Member, id)?;
        Ok(MemberId::from_checked(id))
    }

    /// Validates every ID, stopping at the first invalid one.
    /// Duplicates collapse into a single member; they are not an error.
    pub fn validate_member_ids<I, S>(&self, ids: I) -> ValidationResult<AssociationSet>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = AssociationSet::new();
        for id in ids {
            set.insert(self.validate_member_id(id.as_ref())?);
        }
        self.check_member_count(set.len())?;
        Ok(set)
    }

    /// Enforces the member limit, if one is configured.
    pub fn check_member_count(&self, count: usize) -> ValidationResult<()> {
        match self.max_members {
            Some(max) if count > max => Err(ValidationError::TooManyMembers { count, max }),
            _ => Ok(()),
        }
    }
}

/// Validates an owner ID with the default rules.
pub fn validate_owner_id(id: &str) -> ValidationResult<OwnerId> {
    IdentifierValidator::default().validate_owner_id(id)
}

/// Validates member IDs with the default rules.
pub fn validate_member_ids<I, S>(ids: I) -> ValidationResult<AssociationSet>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    IdentifierValidator::default().validate_member_ids(ids)
}
