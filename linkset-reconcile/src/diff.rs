//! Set difference between the stored and the desired association set.

use crate::outcome::Change;
use linkset_types::AssociationSet;

/// Changes needed to turn `current` into `target`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssociationDiff {
    /// `target \ current`
    pub to_add: AssociationSet,
    /// `current \ target`
    pub to_remove: AssociationSet,
}

impl AssociationDiff {
    pub fn compute(current: &AssociationSet, target: &AssociationSet) -> Self {
        Self {
            to_add: target.difference(current),
            to_remove: current.difference(target),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }

    pub fn len(&self) -> usize {
        self.to_add.len() + self.to_remove.len()
    }

    /// Planned changes in application order: every removal before any
    /// addition, so an owner never holds more than
    /// `max(|current|, |target|)` members mid-flight.
    pub fn planned_changes(&self) -> impl Iterator<Item = Change> + '_ {
        self.to_remove
            .iter()
            .cloned()
            .map(Change::Remove)
            .chain(self.to_add.iter().cloned().map(Change::Add))
    }
}
