//! Audit records of reconciliation calls.

use crate::error::{StoreError, StoreResult};
use linkset_types::{AssociationSet, CallerIdentity, OwnerId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;
use std::time::SystemTime;
use uuid::Uuid;

/// How a reconciliation call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditDecision {
    /// All planned changes were applied.
    Applied,
    /// Some changes were applied before a store failure.
    Partial,
    /// The store failed before any change was applied.
    Failed,
    /// The caller was refused.
    Denied,
    /// The call was cancelled.
    Cancelled,
}

impl AuditDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Partial => "partial",
            Self::Failed => "failed",
            Self::Denied => "denied",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for AuditDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditDecision {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "applied" => Ok(Self::Applied),
            "partial" => Ok(Self::Partial),
            "failed" => Ok(Self::Failed),
            "denied" => Ok(Self::Denied),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(StoreError::InvalidData(format!("unknown audit decision: {s}"))),
        }
    }
}

/// One audited reconciliation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub reconcile_id: Uuid,
    pub caller: CallerIdentity,
    pub owner: OwnerId,
    pub decision: AuditDecision,
    pub added: AssociationSet,
    pub removed: AssociationSet,
    pub detail: String,
    pub timestamp: SystemTime,
}

/// Receives audit entries. Failures are reported but must not affect the
/// audited call.
pub trait AuditSink: Send + Sync {
    fn record(&self, entry: &AuditEntry) -> StoreResult<()>;
}

/// Audit sink that keeps entries in memory.
#[derive(Debug, Default)]
pub struct InMemoryAuditLog {
    entries: Mutex<Vec<AuditEntry>>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all entries, oldest first.
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AuditSink for InMemoryAuditLog {
    fn record(&self, entry: &AuditEntry) -> StoreResult<()> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Unavailable("audit log lock poisoned".into()))?
            .push(entry.clone());
        Ok(())
    }
}
