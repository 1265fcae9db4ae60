//! What a reconciliation call did.

use linkset_types::{AssociationSet, MemberId, OwnerId};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// One repository mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "member", rename_all = "lowercase")]
pub enum Change {
    Add(MemberId),
    Remove(MemberId),
}

impl Change {
    pub fn member(&self) -> &MemberId {
        match self {
            Self::Add(m) | Self::Remove(m) => m,
        }
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add(m) => write!(f, "add {m}"),
            Self::Remove(m) => write!(f, "remove {m}"),
        }
    }
}

/// Per-call state machine. Nothing carries over between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcilePhase {
    Validating,
    Authorizing,
    Fetching,
    Diffing,
    Mutating,
    Succeeded,
    Failed,
}

impl fmt::Display for ReconcilePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validating => "validating",
            Self::Authorizing => "authorizing",
            Self::Fetching => "fetching",
            Self::Diffing => "diffing",
            Self::Mutating => "mutating",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Result of a reconcile call: members added, members removed, and whether
/// every planned change was applied.
///
/// On failure the same type describes the partial progress: exactly the
/// changes that the store accepted before the call stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationOutcome {
    /// Time-ordered id shared by the call's log lines and audit entry.
    pub reconcile_id: Uuid,
    pub owner: OwnerId,
    pub added: AssociationSet,
    pub removed: AssociationSet,
    pub success: bool,
}

impl ReconciliationOutcome {
    pub(crate) fn started(reconcile_id: Uuid, owner: OwnerId) -> Self {
        Self {
            reconcile_id,
            owner,
            added: AssociationSet::new(),
            removed: AssociationSet::new(),
            success: false,
        }
    }

    pub(crate) fn record(&mut self, change: Change) {
        match change {
            Change::Add(m) => self.added.insert(m),
            Change::Remove(m) => self.removed.insert(m),
        };
    }

    /// Number of applied changes.
    pub fn change_count(&self) -> usize {
        self.added.len() + self.removed.len()
    }

    /// True if nothing needed to change.
    pub fn is_noop(&self) -> bool {
        self.change_count() == 0
    }
}

impl fmt::Display for ReconciliationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "owner {}: removed {}, added {}",
            self.owner, self.removed, self.added
        )
    }
}
