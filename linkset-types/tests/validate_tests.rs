//! Tests for the identifier validator.

use linkset_types::{
    IdField, IdentifierRules, IdentifierValidator, InvalidReason, MemberId, ValidationError,
    validate_member_ids, validate_owner_id,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn reason_of(err: ValidationError) -> InvalidReason {
    match err {
        ValidationError::InvalidIdentifier { reason, .. } => reason,
        other => panic!("expected InvalidIdentifier, got {other:?}"),
    }
}

// ── validate_owner_id ────────────────────────────────────────────

#[test]
fn owner_valid() {
    let owner = validate_owner_id("P001").unwrap();
    assert_eq!(owner.as_str(), "P001");
}

#[test]
fn owner_empty() {
    assert_eq!(reason_of(validate_owner_id("").unwrap_err()), InvalidReason::Empty);
}

#[test]
fn owner_whitespace_only() {
    assert_eq!(
        reason_of(validate_owner_id(" \t ").unwrap_err()),
        InvalidReason::Empty
    );
}

#[test]
fn owner_with_surrounding_whitespace_is_not_trimmed() {
    assert_eq!(
        reason_of(validate_owner_id(" P001").unwrap_err()),
        InvalidReason::InvalidCharacters
    );
}

#[test]
fn owner_non_ascii() {
    assert_eq!(
        reason_of(validate_owner_id("Pé01").unwrap_err()),
        InvalidReason::InvalidCharacters
    );
}

#[test]
fn owner_too_long_for_default_rules() {
    let id = "P".repeat(65);
    assert_eq!(
        reason_of(validate_owner_id(&id).unwrap_err()),
        InvalidReason::TooLong { max: 64, actual: 65 }
    );
}

#[test]
fn owner_error_reports_field_and_value() {
    let err = validate_owner_id("P_1").unwrap_err();
    match err {
        ValidationError::InvalidIdentifier { field, value, .. } => {
            assert_eq!(field, IdField::Owner);
            assert_eq!(value, "P_1");
        }
        other => panic!("unexpected {other:?}"),
    }
}

// ── validate_member_ids ──────────────────────────────────────────

#[test]
fn members_valid() {
    let set = validate_member_ids(["S1", "S2"]).unwrap();
    assert_eq!(set.len(), 2);
}

#[test]
fn members_empty_collection_is_valid() {
    let set = validate_member_ids(Vec::<String>::new()).unwrap();
    assert!(set.is_empty());
}

#[test]
fn members_duplicates_collapse() {
    let set = validate_member_ids(["S1", "S1", "S2"]).unwrap();
    assert_eq!(set.len(), 2);
    assert!(set.contains(&MemberId::parse("S1").unwrap()));
}

#[test]
fn members_first_invalid_aborts() {
    let err = validate_member_ids(["S1", "", "bad id"]).unwrap_err();
    match err {
        ValidationError::InvalidIdentifier { field, value, reason } => {
            assert_eq!(field, IdField::Member);
            assert_eq!(value, "");
            assert_eq!(reason, InvalidReason::Empty);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn members_accepts_owned_strings() {
    let ids = vec!["S1".to_string(), "S2".to_string()];
    assert_eq!(validate_member_ids(&ids).unwrap().len(), 2);
}

// ── Custom rules ─────────────────────────────────────────────────

#[test]
fn custom_length_bound() {
    let validator = IdentifierValidator::new(IdentifierRules::new(4));
    assert!(validator.validate_owner_id("P001").is_ok());
    assert_eq!(
        reason_of(validator.validate_owner_id("P0001").unwrap_err()),
        InvalidReason::TooLong { max: 4, actual: 5 }
    );
}

#[test]
fn custom_pattern() {
    let rules = IdentifierRules::default().with_pattern("P[0-9]+").unwrap();
    let validator = IdentifierValidator::new(rules);
    assert!(validator.validate_owner_id("P42").is_ok());
    assert_eq!(
        reason_of(validator.validate_owner_id("S42").unwrap_err()),
        InvalidReason::PatternMismatch
    );
}

#[test]
fn invalid_pattern_is_reported() {
    assert!(IdentifierRules::default().with_pattern("(unclosed").is_err());
}

#[test]
fn max_members_counts_distinct_ids() {
    let validator = IdentifierValidator::default().with_max_members(1);
    assert!(validator.validate_member_ids(["S1", "S1"]).is_ok());
    assert!(matches!(
        validator.validate_member_ids(["S1", "S2"]),
        Err(ValidationError::TooManyMembers { count: 2, max: 1 })
    ));
}

// ── Properties ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn alphanumeric_tokens_within_bound_are_valid(id in "[A-Za-z0-9]{1,64}") {
        prop_assert!(validate_owner_id(&id).is_ok());
        prop_assert!(validate_member_ids([id.as_str()]).is_ok());
    }

    #[test]
    fn tokens_with_punctuation_are_rejected(
        prefix in "[A-Za-z0-9]{0,10}",
        bad in "[-_ ./@#]",
        suffix in "[A-Za-z0-9]{0,10}",
    ) {
        let id = format!("{prefix}{bad}{suffix}");
        prop_assert!(validate_owner_id(&id).is_err());
    }

    #[test]
    fn set_size_equals_distinct_inputs(ids in prop::collection::vec("[a-z0-9]{1,4}", 0..30)) {
        let distinct: std::collections::HashSet<_> = ids.iter().collect();
        let set = validate_member_ids(&ids).unwrap();
        prop_assert_eq!(set.len(), distinct.len());
    }
}
