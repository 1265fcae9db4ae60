//! Shared helpers for store tests.

#![allow(dead_code)]

use linkset_store::{AssociationRepository, StoreError};
use linkset_types::{AssociationSet, MemberId, OwnerId};

pub fn owner(s: &str) -> OwnerId {
    OwnerId::parse(s).unwrap()
}

pub fn member(s: &str) -> MemberId {
    MemberId::parse(s).unwrap()
}

pub fn set(ids: &[&str]) -> AssociationSet {
    ids.iter().map(|s| member(s)).collect()
}

/// Checks the repository contract every implementation must honor.
pub fn assert_repository_contract(repo: &dyn AssociationRepository) {
    let p1 = owner("P1");
    let p2 = owner("P2");

    // Unknown owner has no links
    assert!(repo.get_associations(&p1).unwrap().is_empty());

    repo.add_association(&p1, &member("S1")).unwrap();
    repo.add_association(&p1, &member("S2")).unwrap();
    repo.add_association(&p2, &member("S1")).unwrap();
    assert_eq!(repo.get_associations(&p1).unwrap(), set(&["S1", "S2"]));
    assert_eq!(repo.get_associations(&p2).unwrap(), set(&["S1"]));

    // Duplicate add
    assert!(matches!(
        repo.add_association(&p1, &member("S1")),
        Err(StoreError::AlreadyExists { .. })
    ));

    // Remove, then remove again
    repo.remove_association(&p1, &member("S1")).unwrap();
    assert!(matches!(
        repo.remove_association(&p1, &member("S1")),
        Err(StoreError::NotFound { .. })
    ));
    assert_eq!(repo.get_associations(&p1).unwrap(), set(&["S2"]));

    // Other owners are untouched
    assert_eq!(repo.get_associations(&p2).unwrap(), set(&["S1"]));
}
