//! Core type definitions for Linkset.
//!
//! This crate defines the vocabulary shared by every other Linkset crate:
//! - Owner and member identifiers (validated, opaque string tokens)
//! - Caller identities (opaque, interpreted only by an authorizer)
//! - Association sets (set semantics, deterministic order)
//! - The identifier validator
//!
//! What an owner or member *is* (parent, student, team, group) is left to the
//! embedding application.

mod ids;
mod set;
mod validate;

pub use ids::{CallerIdentity, MemberId, OwnerId};
pub use set::AssociationSet;
pub use validate::{
    DEFAULT_MAX_LENGTH, IdField, IdentifierRules, IdentifierValidator, InvalidReason,
    MAX_IDENTIFIER_LENGTH, ValidationError, ValidationResult, validate_member_ids,
    validate_owner_id,
};
