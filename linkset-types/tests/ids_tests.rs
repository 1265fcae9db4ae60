use linkset_types::{CallerIdentity, MemberId, OwnerId, ValidationError};
use std::collections::HashSet;
use std::str::FromStr;

// ── OwnerId ──────────────────────────────────────────────────────

#[test]
fn owner_id_parse_and_display() {
    let id = OwnerId::parse("P001").unwrap();
    assert_eq!(id.as_str(), "P001");
    assert_eq!(id.to_string(), "P001");
}

#[test]
fn owner_id_from_str() {
    let id: OwnerId = OwnerId::from_str("parent42").unwrap();
    assert_eq!(id, OwnerId::parse("parent42").unwrap());
}

#[test]
fn owner_id_parse_empty() {
    assert!(OwnerId::parse("").is_err());
}

#[test]
fn owner_id_parse_rejects_punctuation() {
    assert!(OwnerId::parse("P-001").is_err());
    assert!(OwnerId::parse("P 001").is_err());
}

#[test]
fn owner_id_parse_allows_up_to_ceiling() {
    let long = "a".repeat(255);
    assert!(OwnerId::parse(&long).is_ok());
    let too_long = "a".repeat(256);
    assert!(OwnerId::parse(&too_long).is_err());
}

#[test]
fn owner_id_serde_roundtrip() {
    let id = OwnerId::parse("P001").unwrap();
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"P001\"");
    let back: OwnerId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
}

#[test]
fn owner_id_deserialize_rejects_malformed() {
    let result: Result<OwnerId, _> = serde_json::from_str("\"not valid\"");
    assert!(result.is_err());
}

// ── MemberId ─────────────────────────────────────────────────────

#[test]
fn member_id_parse_and_display() {
    let id = MemberId::parse("S001").unwrap();
    assert_eq!(id.to_string(), "S001");
}

#[test]
fn member_id_parse_error_names_member_field() {
    let err = MemberId::parse("").unwrap_err();
    assert!(matches!(err, ValidationError::InvalidIdentifier { .. }));
    assert!(err.to_string().contains("member"));
}

#[test]
fn member_id_ordering_is_lexicographic() {
    let a = MemberId::parse("S1").unwrap();
    let b = MemberId::parse("S2").unwrap();
    assert!(a < b);
}

#[test]
fn member_id_hash_and_eq() {
    let id = MemberId::parse("S1").unwrap();
    let mut set = HashSet::new();
    set.insert(id.clone());
    set.insert(id); // duplicate
    assert_eq!(set.len(), 1);
}

#[test]
fn member_id_into_string() {
    let id = MemberId::parse("S9").unwrap();
    let s: String = id.into();
    assert_eq!(s, "S9");
}

// ── CallerIdentity ───────────────────────────────────────────────

#[test]
fn caller_identity_is_opaque() {
    // Callers are never validated, any token is accepted.
    let caller = CallerIdentity::new("admin@school / session 7");
    assert_eq!(caller.as_str(), "admin@school / session 7");
}

#[test]
fn caller_identity_from_conversions() {
    let a: CallerIdentity = "admin".into();
    let b: CallerIdentity = String::from("admin").into();
    assert_eq!(a, b);
    assert_eq!(a.to_string(), "admin");
}

#[test]
fn caller_identity_serde_is_transparent() {
    let caller = CallerIdentity::new("admin");
    assert_eq!(serde_json::to_string(&caller).unwrap(), "\"admin\"");
}
