//! The reconciliation service.
//!
//! Every call walks the same steps: validate the owner and the requested
//! members, authorize the caller, read the owner's current links, diff, then
//! apply removals followed by additions one repository call at a time. The
//! first failing call stops the run. Nothing is rolled back; calling again
//! with the same target only applies what is still missing.

use crate::cancel::CancellationFlag;
use crate::config::ReconcilerConfig;
use crate::diff::AssociationDiff;
use crate::error::{ConfigError, ReconcileError, ReconcileResult};
use crate::outcome::{Change, ReconcilePhase, ReconciliationOutcome};
use linkset_authz::Authorizer;
use linkset_store::{
    AssociationRepository, AuditDecision, AuditEntry, AuditSink, StoreError, StoreResult,
};
use linkset_types::{
    AssociationSet, CallerIdentity, IdentifierValidator, OwnerId, ValidationError,
    ValidationResult,
};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

/// Desired end state, before current state is known.
enum Target {
    /// Replace the owner's links with exactly this set.
    Exact(AssociationSet),
    /// Add `assign` and drop `remove`, leaving other links alone.
    Delta {
        assign: AssociationSet,
        remove: AssociationSet,
    },
}

impl Target {
    fn resolve(self, current: &AssociationSet) -> AssociationSet {
        match self {
            Self::Exact(target) => target,
            Self::Delta { assign, remove } => current.union(&assign).difference(&remove),
        }
    }
}

/// Brings an owner's stored associations in line with a target set.
///
/// Stateless between calls; collaborators are injected at construction.
pub struct Reconciler {
    repository: Arc<dyn AssociationRepository>,
    authorizer: Arc<dyn Authorizer>,
    validator: IdentifierValidator,
    audit: Option<Arc<dyn AuditSink>>,
}

impl Reconciler {
    pub fn new(
        repository: Arc<dyn AssociationRepository>,
        authorizer: Arc<dyn Authorizer>,
    ) -> Self {
        Self {
            repository,
            authorizer,
            validator: IdentifierValidator::default(),
            audit: None,
        }
    }

    /// Creates a service with the validator described by `config`.
    pub fn from_config(
        repository: Arc<dyn AssociationRepository>,
        authorizer: Arc<dyn Authorizer>,
        config: &ReconcilerConfig,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(repository, authorizer).with_validator(config.validator()?))
    }

    #[must_use]
    pub fn with_validator(mut self, validator: IdentifierValidator) -> Self {
        self.validator = validator;
        self
    }

    #[must_use]
    pub fn with_audit_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.audit = Some(sink);
        self
    }

    pub fn validator(&self) -> &IdentifierValidator {
        &self.validator
    }

    /// Makes `owner`'s links equal to `target`.
    pub fn reconcile<I, S>(
        &self,
        owner: &str,
        target: I,
        caller: &CallerIdentity,
    ) -> ReconcileResult<ReconciliationOutcome>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.run(owner, caller, None, |v| {
            v.validate_member_ids(target).map(Target::Exact)
        })
    }

    /// [`reconcile`](Self::reconcile), stopping early once `cancel` is set.
    pub fn reconcile_with_cancel<I, S>(
        &self,
        owner: &str,
        target: I,
        caller: &CallerIdentity,
        cancel: &CancellationFlag,
    ) -> ReconcileResult<ReconciliationOutcome>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.run(owner, caller, Some(cancel), |v| {
            v.validate_member_ids(target).map(Target::Exact)
        })
    }

    /// Links every member of `assign` and unlinks every member of `remove`,
    /// leaving the owner's other links untouched.
    pub fn apply_changes<A, R, S>(
        &self,
        owner: &str,
        assign: A,
        remove: R,
        caller: &CallerIdentity,
    ) -> ReconcileResult<ReconciliationOutcome>
    where
        A: IntoIterator<Item = S>,
        R: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.run(owner, caller, None, |v| delta_target(v, assign, remove))
    }

    /// [`apply_changes`](Self::apply_changes), stopping early once `cancel`
    /// is set.
    pub fn apply_changes_with_cancel<A, R, S>(
        &self,
        owner: &str,
        assign: A,
        remove: R,
        caller: &CallerIdentity,
        cancel: &CancellationFlag,
    ) -> ReconcileResult<ReconciliationOutcome>
    where
        A: IntoIterator<Item = S>,
        R: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.run(owner, caller, Some(cancel), |v| {
            delta_target(v, assign, remove)
        })
    }

    /// Reads the members currently linked to `owner`, subject to the same
    /// validation and authorization as a change.
    pub fn associations(
        &self,
        owner: &str,
        caller: &CallerIdentity,
    ) -> ReconcileResult<AssociationSet> {
        let owner = self.validator.validate_owner_id(owner)?;
        self.authorizer.authorize(caller, &owner)?;
        self.repository
            .get_associations(&owner)
            .map_err(|source| ReconcileError::ReconciliationFailed {
                source,
                failed_change: None,
                partial: ReconciliationOutcome::started(Uuid::now_v7(), owner.clone()),
            })
    }

    fn run<F>(
        &self,
        owner: &str,
        caller: &CallerIdentity,
        cancel: Option<&CancellationFlag>,
        validate_target: F,
    ) -> ReconcileResult<ReconciliationOutcome>
    where
        F: FnOnce(&IdentifierValidator) -> ValidationResult<Target>,
    {
        let reconcile_id = Uuid::now_v7();
        let span = info_span!("reconcile", %reconcile_id, owner, %caller);
        let _enter = span.enter();

        debug!(phase = %ReconcilePhase::Validating);
        let validated = self
            .validator
            .validate_owner_id(owner)
            .and_then(|owner| Ok((owner, validate_target(&self.validator)?)));
        let (owner, target) = match validated {
            Ok(validated) => validated,
            Err(e) => {
                warn!(phase = %ReconcilePhase::Failed, error = %e, "request rejected");
                return Err(e.into());
            }
        };
        let mut outcome = ReconciliationOutcome::started(reconcile_id, owner.clone());

        debug!(phase = %ReconcilePhase::Authorizing);
        if let Err(e) = self.authorizer.authorize(caller, &owner) {
            warn!(error = %e, "caller refused");
            self.audit(caller, &outcome, AuditDecision::Denied, e.to_string());
            return Err(e.into());
        }

        debug!(phase = %ReconcilePhase::Fetching);
        let current = match self.repository.get_associations(&owner) {
            Ok(current) => current,
            Err(source) => {
                warn!(phase = %ReconcilePhase::Failed, error = %source, "could not read current links");
                self.audit(caller, &outcome, AuditDecision::Failed, source.to_string());
                return Err(ReconcileError::ReconciliationFailed {
                    source,
                    failed_change: None,
                    partial: outcome,
                });
            }
        };

        debug!(phase = %ReconcilePhase::Diffing, current = current.len());
        let target = target.resolve(&current);
        if let Err(e) = self.validator.check_member_count(target.len()) {
            self.audit(caller, &outcome, AuditDecision::Failed, e.to_string());
            return Err(e.into());
        }
        let diff = AssociationDiff::compute(&current, &target);
        debug!(
            to_remove = diff.to_remove.len(),
            to_add = diff.to_add.len(),
            "computed diff"
        );

        debug!(phase = %ReconcilePhase::Mutating);
        if is_cancelled(cancel) {
            return Err(self.cancelled(caller, outcome));
        }
        for change in diff.planned_changes() {
            if is_cancelled(cancel) {
                return Err(self.cancelled(caller, outcome));
            }
            match self.apply(&owner, &change) {
                Ok(()) => outcome.record(change),
                Err(source) => {
                    warn!(
                        phase = %ReconcilePhase::Failed,
                        %change,
                        applied = outcome.change_count(),
                        error = %source,
                        "store rejected change, stopping"
                    );
                    let decision = if outcome.is_noop() {
                        AuditDecision::Failed
                    } else {
                        AuditDecision::Partial
                    };
                    self.audit(
                        caller,
                        &outcome,
                        decision,
                        format!("{change} failed: {source}"),
                    );
                    return Err(ReconcileError::ReconciliationFailed {
                        source,
                        failed_change: Some(change),
                        partial: outcome,
                    });
                }
            }
        }

        outcome.success = true;
        info!(
            phase = %ReconcilePhase::Succeeded,
            removed = outcome.removed.len(),
            added = outcome.added.len(),
            "reconciled"
        );
        self.audit(
            caller,
            &outcome,
            AuditDecision::Applied,
            format!(
                "removed {}, added {}",
                outcome.removed.len(),
                outcome.added.len()
            ),
        );
        Ok(outcome)
    }

    /// Issues one repository mutation. A remove of an absent link already
    /// reached the desired end state and counts as done.
    fn apply(&self, owner: &OwnerId, change: &Change) -> StoreResult<()> {
        match change {
            Change::Remove(member) => match self.repository.remove_association(owner, member) {
                Err(StoreError::NotFound { .. }) => {
                    debug!(%member, "link already absent, counted as removed");
                    Ok(())
                }
                other => other,
            },
            Change::Add(member) => self.repository.add_association(owner, member),
        }
    }

    fn cancelled(&self, caller: &CallerIdentity, outcome: ReconciliationOutcome) -> ReconcileError {
        info!(
            applied = outcome.change_count(),
            "cancellation observed, stopping"
        );
        self.audit(
            caller,
            &outcome,
            AuditDecision::Cancelled,
            format!("cancelled after {} change(s)", outcome.change_count()),
        );
        ReconcileError::Cancelled { partial: outcome }
    }

    fn audit(
        &self,
        caller: &CallerIdentity,
        outcome: &ReconciliationOutcome,
        decision: AuditDecision,
        detail: String,
    ) {
        let Some(sink) = &self.audit else {
            return;
        };
        let entry = AuditEntry {
            reconcile_id: outcome.reconcile_id,
            caller: caller.clone(),
            owner: outcome.owner.clone(),
            decision,
            added: outcome.added.clone(),
            removed: outcome.removed.clone(),
            detail,
            timestamp: SystemTime::now(),
        };
        if let Err(e) = sink.record(&entry) {
            warn!(error = %e, "failed to record audit entry");
        }
    }
}

fn is_cancelled(cancel: Option<&CancellationFlag>) -> bool {
    cancel.is_some_and(CancellationFlag::is_cancelled)
}

fn delta_target<A, R, S>(
    validator: &IdentifierValidator,
    assign: A,
    remove: R,
) -> ValidationResult<Target>
where
    A: IntoIterator<Item = S>,
    R: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let assign = assign
        .into_iter()
        .map(|id| validator.validate_member_id(id.as_ref()))
        .collect::<ValidationResult<AssociationSet>>()?;
    let remove = remove
        .into_iter()
        .map(|id| validator.validate_member_id(id.as_ref()))
        .collect::<ValidationResult<AssociationSet>>()?;
    if let Some(conflict) = assign.intersection(&remove).into_iter().next() {
        return Err(ValidationError::ConflictingChange(conflict));
    }
    Ok(Target::Delta { assign, remove })
}
