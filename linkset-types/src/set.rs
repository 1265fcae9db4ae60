//! The set of members linked to one owner.

use crate::ids::MemberId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::collections::btree_set;
use std::fmt;

/// Members currently (or desired to be) linked to an owner.
///
/// Set semantics: inserting a member twice keeps one copy. Iteration is in
/// sorted order so diffs and logs are reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssociationSet(BTreeSet<MemberId>);

impl AssociationSet {
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, member: &MemberId) -> bool {
        self.0.contains(member)
    }

    /// Returns true if the member was not already present.
    pub fn insert(&mut self, member: MemberId) -> bool {
        self.0.insert(member)
    }

    /// Returns true if the member was present.
    pub fn remove(&mut self, member: &MemberId) -> bool {
        self.0.remove(member)
    }

    pub fn iter(&self) -> btree_set::Iter<'_, MemberId> {
        self.0.iter()
    }

    /// Members in `self` that are not in `other` (`self \ other`).
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        self.0.difference(&other.0).cloned().collect()
    }

    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        self.0.union(&other.0).cloned().collect()
    }

    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        self.0.intersection(&other.0).cloned().collect()
    }

    pub fn is_disjoint(&self, other: &Self) -> bool {
        self.0.is_disjoint(&other.0)
    }
}

impl fmt::Display for AssociationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, member) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{member}")?;
        }
        f.write_str("}")
    }
}

impl FromIterator<MemberId> for AssociationSet {
    fn from_iter<T: IntoIterator<Item = MemberId>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<MemberId> for AssociationSet {
    fn extend<T: IntoIterator<Item = MemberId>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl IntoIterator for AssociationSet {
    type Item = MemberId;
    type IntoIter = btree_set::IntoIter<MemberId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a AssociationSet {
    type Item = &'a MemberId;
    type IntoIter = btree_set::Iter<'a, MemberId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
