use linkset_types::{AssociationSet, MemberId};

fn set(ids: &[&str]) -> AssociationSet {
    ids.iter().map(|s| MemberId::parse(s).unwrap()).collect()
}

#[test]
fn insert_is_idempotent() {
    let mut s = AssociationSet::new();
    assert!(s.insert(MemberId::parse("S1").unwrap()));
    assert!(!s.insert(MemberId::parse("S1").unwrap()));
    assert_eq!(s.len(), 1);
}

#[test]
fn remove_reports_presence() {
    let mut s = set(&["S1"]);
    assert!(s.remove(&MemberId::parse("S1").unwrap()));
    assert!(!s.remove(&MemberId::parse("S1").unwrap()));
    assert!(s.is_empty());
}

#[test]
fn difference_both_ways() {
    let current = set(&["S1", "S2"]);
    let target = set(&["S2", "S3"]);
    assert_eq!(target.difference(&current), set(&["S3"]));
    assert_eq!(current.difference(&target), set(&["S1"]));
}

#[test]
fn union_and_intersection() {
    let a = set(&["S1", "S2"]);
    let b = set(&["S2", "S3"]);
    assert_eq!(a.union(&b), set(&["S1", "S2", "S3"]));
    assert_eq!(a.intersection(&b), set(&["S2"]));
    assert!(!a.is_disjoint(&b));
    assert!(set(&["S1"]).is_disjoint(&set(&["S9"])));
}

#[test]
fn order_is_irrelevant_for_equality() {
    assert_eq!(set(&["S3", "S1", "S2"]), set(&["S1", "S2", "S3"]));
}

#[test]
fn iteration_is_sorted() {
    let s = set(&["S3", "S1", "S2"]);
    let ids: Vec<&str> = s.iter().map(MemberId::as_str).collect();
    assert_eq!(ids, vec!["S1", "S2", "S3"]);
}

#[test]
fn display_lists_members() {
    assert_eq!(set(&["S2", "S1"]).to_string(), "{S1, S2}");
    assert_eq!(AssociationSet::new().to_string(), "{}");
}

#[test]
fn serializes_as_sorted_array() {
    let json = serde_json::to_string(&set(&["S2", "S1"])).unwrap();
    assert_eq!(json, r#"["S1","S2"]"#);
    let back: AssociationSet = serde_json::from_str(r#"["S2","S1","S1"]"#).unwrap();
    assert_eq!(back, set(&["S1", "S2"]));
}

#[test]
fn extend_and_into_iter() {
    let mut s = set(&["S1"]);
    s.extend(set(&["S2", "S3"]));
    let owned: Vec<MemberId> = s.into_iter().collect();
    assert_eq!(owned.len(), 3);
}
