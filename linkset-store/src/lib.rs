//! Association storage for Linkset.
//!
//! The reconciliation core consumes storage only through the
//! [`AssociationRepository`] trait. This crate also ships two reference
//! implementations and the audit sink contract.
//!
//! # Architecture
//!
//! - [`InMemoryAssociationStore`]: a locked hash map, handy for tests and
//!   embedding
//! - [`SqliteAssociationStore`]: durable links plus an `audit_log` table
//! - Both can enforce a per-owner association cap, failing adds with
//!   [`StoreError::LimitExceeded`]

mod audit;
mod error;
mod memory;
mod repository;
mod sqlite;

pub use audit::{AuditDecision, AuditEntry, AuditSink, InMemoryAuditLog};
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryAssociationStore;
pub use repository::AssociationRepository;
pub use sqlite::SqliteAssociationStore;
