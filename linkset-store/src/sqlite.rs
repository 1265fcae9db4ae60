//! SQLite-backed association store.
//!
//! One connection behind a mutex: every repository call holds the lock for
//! its whole statement (or transaction), which serializes writes to the same
//! owner within a process. The unique constraint on `(owner_id, member_id)`
//! guards against duplicates across processes.

use crate::audit::{AuditEntry, AuditSink};
use crate::error::{StoreError, StoreResult};
use crate::repository::AssociationRepository;
use linkset_types::{AssociationSet, CallerIdentity, MemberId, OwnerId};
use rusqlite::{Connection, ErrorCode, params};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, UNIX_EPOCH};
use tracing::{debug, trace};
use uuid::Uuid;

/// How long a statement waits on a locked database before reporting
/// the store as unavailable.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Persistent association store backed by SQLite.
pub struct SqliteAssociationStore {
    conn: Arc<Mutex<Connection>>,
    max_per_owner: Option<usize>,
}

impl SqliteAssociationStore {
    /// Opens (or creates) a store at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path).map_err(classify)?;
        debug!("Opened association store at {}", path.display());
        Self::with_connection(conn)
    }

    /// Opens an in-memory store (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::with_connection(Connection::open_in_memory().map_err(classify)?)
    }

    fn with_connection(conn: Connection) -> StoreResult<Self> {
        conn.busy_timeout(BUSY_TIMEOUT).map_err(classify)?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
            max_per_owner: None,
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Caps the number of members any single owner may hold.
    #[must_use]
    pub fn with_max_per_owner(mut self, limit: usize) -> Self {
        self.max_per_owner = Some(limit);
        self
    }

    fn init_schema(&self) -> StoreResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS associations (
                owner_id TEXT NOT NULL,
                member_id TEXT NOT NULL,
                UNIQUE(owner_id, member_id)
            );

            CREATE INDEX IF NOT EXISTS idx_associations_owner
                ON associations(owner_id);

            CREATE TABLE IF NOT EXISTS audit_log (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                reconcile_id TEXT NOT NULL,
                caller TEXT NOT NULL,
                owner_id TEXT NOT NULL,
                decision TEXT NOT NULL,
                added TEXT NOT NULL,
                removed TEXT NOT NULL,
                detail TEXT NOT NULL,
                timestamp INTEGER NOT NULL
            );
            ",
        )
        .map_err(classify)?;
        Ok(())
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("connection lock poisoned".into()))
    }

    // ── Audit log ────────────────────────────────────────────────

    /// Loads audit log entries, newest first, with pagination.
    pub fn load_audit_log(&self, limit: usize, offset: usize) -> StoreResult<Vec<AuditEntry>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT reconcile_id, caller, owner_id, decision, added, removed, detail, timestamp
                 FROM audit_log ORDER BY id DESC LIMIT ?1 OFFSET ?2",
            )
            .map_err(classify)?;

        let rows = stmt
            .query_map(params![limit as i64, offset as i64], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, String>(6)?,
                    row.get::<_, i64>(7)?,
                ))
            })
            .map_err(classify)?;

        let mut result = Vec::new();
        for row in rows {
            let (id, caller, owner, decision, added, removed, detail, ts) =
                row.map_err(classify)?;
            result.push(AuditEntry {
                reconcile_id: Uuid::parse_str(&id)
                    .map_err(|e| StoreError::InvalidData(format!("invalid reconcile_id: {e}")))?,
                caller: CallerIdentity::new(caller),
                owner: OwnerId::parse(&owner)
                    .map_err(|e| StoreError::InvalidData(e.to_string()))?,
                decision: decision.parse()?,
                added: serde_json::from_str(&added)?,
                removed: serde_json::from_str(&removed)?,
                detail,
                timestamp: UNIX_EPOCH + Duration::from_millis(u64::try_from(ts).unwrap_or(0)),
            });
        }
        Ok(result)
    }

    /// Returns the total number of audit log entries.
    pub fn audit_log_count(&self) -> StoreResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM audit_log", [], |row| row.get(0))
            .map_err(classify)?;
        Ok(count as usize)
    }
}

impl AssociationRepository for SqliteAssociationStore {
    fn get_associations(&self, owner: &OwnerId) -> StoreResult<AssociationSet> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT member_id FROM associations WHERE owner_id = ?1")
            .map_err(classify)?;
        let rows = stmt
            .query_map(params![owner.as_str()], |row| row.get::<_, String>(0))
            .map_err(classify)?;

        let mut set = AssociationSet::new();
        for row in rows {
            let raw = row.map_err(classify)?;
            let member = MemberId::parse(&raw)
                .map_err(|e| StoreError::InvalidData(format!("stored member id: {e}")))?;
            set.insert(member);
        }
        Ok(set)
    }

    fn add_association(&self, owner: &OwnerId, member: &MemberId) -> StoreResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(classify)?;

        let inserted = tx.execute(
            "INSERT INTO associations (owner_id, member_id) VALUES (?1, ?2)",
            params![owner.as_str(), member.as_str()],
        );
        match inserted {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                return Err(StoreError::AlreadyExists {
                    owner: owner.clone(),
                    member: member.clone(),
                });
            }
            Err(e) => return Err(classify(e)),
        }

        if let Some(limit) = self.max_per_owner {
            let count: i64 = tx
                .query_row(
                    "SELECT COUNT(*) FROM associations WHERE owner_id = ?1",
                    params![owner.as_str()],
                    |row| row.get(0),
                )
                .map_err(classify)?;
            if count as usize > limit {
                // Dropping the transaction rolls the insert back.
                return Err(StoreError::LimitExceeded {
                    owner: owner.clone(),
                    limit,
                });
            }
        }

        tx.commit().map_err(classify)?;
        trace!(%owner, %member, "link added");
        Ok(())
    }

    fn remove_association(&self, owner: &OwnerId, member: &MemberId) -> StoreResult<()> {
        let conn = self.lock()?;
        let changed = conn
            .execute(
                "DELETE FROM associations WHERE owner_id = ?1 AND member_id = ?2",
                params![owner.as_str(), member.as_str()],
            )
            .map_err(classify)?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                owner: owner.clone(),
                member: member.clone(),
            });
        }
        trace!(%owner, %member, "link removed");
        Ok(())
    }
}

impl AuditSink for SqliteAssociationStore {
    fn record(&self, entry: &AuditEntry) -> StoreResult<()> {
        let added = serde_json::to_string(&entry.added)?;
        let removed = serde_json::to_string(&entry.removed)?;
        let ts = entry
            .timestamp
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as i64;

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO audit_log (reconcile_id, caller, owner_id, decision, added, removed, detail, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                entry.reconcile_id.to_string(),
                entry.caller.as_str(),
                entry.owner.as_str(),
                entry.decision.as_str(),
                added,
                removed,
                entry.detail,
                ts,
            ],
        )
        .map_err(classify)?;
        Ok(())
    }
}

/// Maps lock contention and I/O failures to `Unavailable`; everything else
/// stays a database error.
fn classify(e: rusqlite::Error) -> StoreError {
    match &e {
        rusqlite::Error::SqliteFailure(err, _)
            if matches!(
                err.code,
                ErrorCode::DatabaseBusy
                    | ErrorCode::DatabaseLocked
                    | ErrorCode::CannotOpen
                    | ErrorCode::SystemIoFailure
            ) =>
        {
            StoreError::Unavailable(e.to_string())
        }
        _ => StoreError::Database(e),
    }
}
