//! In-memory association store.

use crate::error::{StoreError, StoreResult};
use crate::repository::AssociationRepository;
use linkset_types::{AssociationSet, MemberId, OwnerId};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::trace;

/// Reference [`AssociationRepository`] backed by a locked hash map.
#[derive(Debug, Default)]
pub struct InMemoryAssociationStore {
    links: RwLock<HashMap<OwnerId, AssociationSet>>,
    max_per_owner: Option<usize>,
}

impl InMemoryAssociationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the number of members any single owner may hold.
    #[must_use]
    pub fn with_max_per_owner(mut self, limit: usize) -> Self {
        self.max_per_owner = Some(limit);
        self
    }

    /// Inserts links directly, bypassing the cap. Used to prepare fixtures.
    pub fn seed<I>(&self, owner: &OwnerId, members: I) -> StoreResult<()>
    where
        I: IntoIterator<Item = MemberId>,
    {
        self.write()?
            .entry(owner.clone())
            .or_default()
            .extend(members);
        Ok(())
    }

    /// Number of owners with at least one link.
    pub fn owner_count(&self) -> StoreResult<usize> {
        Ok(self.read()?.values().filter(|set| !set.is_empty()).count())
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, HashMap<OwnerId, AssociationSet>>> {
        self.links
            .read()
            .map_err(|_| StoreError::Unavailable("association map lock poisoned".into()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, HashMap<OwnerId, AssociationSet>>> {
        self.links
            .write()
            .map_err(|_| StoreError::Unavailable("association map lock poisoned".into()))
    }
}

impl AssociationRepository for InMemoryAssociationStore {
    fn get_associations(&self, owner: &OwnerId) -> StoreResult<AssociationSet> {
        Ok(self.read()?.get(owner).cloned().unwrap_or_default())
    }

    fn add_association(&self, owner: &OwnerId, member: &MemberId) -> StoreResult<()> {
        let mut links = self.write()?;
        let set = links.entry(owner.clone()).or_default();
        if set.contains(member) {
            return Err(StoreError::AlreadyExists {
                owner: owner.clone(),
                member: member.clone(),
            });
        }
        if let Some(limit) = self.max_per_owner {
            if set.len() >= limit {
                return Err(StoreError::LimitExceeded {
                    owner: owner.clone(),
                    limit,
                });
            }
        }
        set.insert(member.clone());
        trace!(%owner, %member, "link added");
        Ok(())
    }

    fn remove_association(&self, owner: &OwnerId, member: &MemberId) -> StoreResult<()> {
        let mut links = self.write()?;
        let removed = links
            .get_mut(owner)
            .is_some_and(|set| set.remove(member));
        if !removed {
            return Err(StoreError::NotFound {
                owner: owner.clone(),
                member: member.clone(),
            });
        }
        trace!(%owner, %member, "link removed");
        Ok(())
    }
}
