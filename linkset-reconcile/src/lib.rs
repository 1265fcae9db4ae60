//! Association reconciliation for Linkset.
//!
//! Given an owner and the complete set of members that should be linked to
//! it, [`Reconciler`] computes the difference against what the repository
//! currently holds and applies exactly the additions and removals needed.
//!
//! # Ordering
//!
//! 1. Validate the owner id and every requested member id
//! 2. Authorize the caller for the owner
//! 3. Read the current association set
//! 4. Diff current against target
//! 5. Apply removals, then additions, one repository call per change
//!
//! A failed step stops the call. Validation and authorization failures touch
//! no storage at all. A store failure mid-way reports the changes that were
//! already applied; they are not rolled back, and re-running the call
//! converges because the diff is recomputed from current state.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use linkset_authz::AllowAll;
//! use linkset_reconcile::Reconciler;
//! use linkset_store::InMemoryAssociationStore;
//! use linkset_types::CallerIdentity;
//!
//! let reconciler = Reconciler::new(
//!     Arc::new(InMemoryAssociationStore::new()),
//!     Arc::new(AllowAll),
//! );
//! let caller = CallerIdentity::new("admin");
//!
//! let outcome = reconciler.reconcile("P001", ["S1", "S2"], &caller).unwrap();
//! assert_eq!(outcome.added.len(), 2);
//!
//! let outcome = reconciler.reconcile("P001", ["S2", "S3"], &caller).unwrap();
//! assert_eq!(outcome.to_string(), "owner P001: removed {S1}, added {S3}");
//! ```

mod cancel;
mod config;
mod diff;
mod error;
mod outcome;
mod service;

pub use cancel::CancellationFlag;
pub use config::{IdentifierConfig, LimitsConfig, ReconcilerConfig};
pub use diff::AssociationDiff;
pub use error::{ConfigError, ErrorKind, ReconcileError, ReconcileResult};
pub use outcome::{Change, ReconcilePhase, ReconciliationOutcome};
pub use service::Reconciler;
