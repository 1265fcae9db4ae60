//! The storage contract the reconciliation service consumes.

use crate::error::StoreResult;
use linkset_types::{AssociationSet, MemberId, OwnerId};

/// Durable store of owner → member associations.
///
/// Implementations must serialize conflicting writes to the same owner; the
/// reconciliation service does not lock across its read and its mutations.
/// Every call should be bounded by the store's own timeout and report a
/// timeout as [`StoreError::Unavailable`](crate::StoreError::Unavailable).
pub trait AssociationRepository: Send + Sync {
    /// Lists the members currently linked to `owner`. An owner without links
    /// yields an empty set.
    fn get_associations(&self, owner: &OwnerId) -> StoreResult<AssociationSet>;

    /// Links one member. Fails with `AlreadyExists` if the link is present.
    fn add_association(&self, owner: &OwnerId, member: &MemberId) -> StoreResult<()>;

    /// Unlinks one member. Fails with `NotFound` if the link is absent.
    fn remove_association(&self, owner: &OwnerId, member: &MemberId) -> StoreResult<()>;
}
