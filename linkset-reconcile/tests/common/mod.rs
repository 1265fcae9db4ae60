//! Shared helpers for reconciliation tests.

#![allow(dead_code)]

use linkset_store::{
    AssociationRepository, InMemoryAssociationStore, StoreError, StoreResult,
};
use linkset_types::{AssociationSet, CallerIdentity, MemberId, OwnerId};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn owner(s: &str) -> OwnerId {
    OwnerId::parse(s).unwrap()
}

pub fn member(s: &str) -> MemberId {
    MemberId::parse(s).unwrap()
}

pub fn set(ids: &[&str]) -> AssociationSet {
    ids.iter().map(|s| member(s)).collect()
}

pub fn admin() -> CallerIdentity {
    CallerIdentity::new("admin")
}

/// Routes test logs through the libtest writer. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A repository call as observed by [`RecordingRepository`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Get(String),
    Add(String, String),
    Remove(String, String),
}

impl Call {
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Self::Get(_))
    }
}

/// Wraps an in-memory store, records every call, and injects failures.
#[derive(Default)]
pub struct RecordingRepository {
    pub inner: InMemoryAssociationStore,
    calls: Mutex<Vec<Call>>,
    mutations: AtomicUsize,
    fail_get: bool,
    fail_on_mutation: Option<usize>,
    report_missing_on_remove: bool,
}

impl RecordingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(inner: InMemoryAssociationStore) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    /// Reads fail with [`StoreError::Unavailable`].
    pub fn failing_get(mut self) -> Self {
        self.fail_get = true;
        self
    }

    /// The `n`th mutation (1-based) fails with [`StoreError::Unavailable`]
    /// without touching the inner store.
    pub fn failing_on_mutation(mut self, n: usize) -> Self {
        self.fail_on_mutation = Some(n);
        self
    }

    /// Removes report [`StoreError::NotFound`] without touching the inner
    /// store, as if another writer got there first.
    pub fn reporting_missing_on_remove(mut self) -> Self {
        self.report_missing_on_remove = true;
        self
    }

    pub fn seed(&self, owner_id: &str, members: &[&str]) {
        self.inner
            .seed(&owner(owner_id), members.iter().map(|m| member(m)))
            .unwrap();
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutation).collect()
    }

    pub fn current(&self, owner_id: &str) -> AssociationSet {
        self.inner.get_associations(&owner(owner_id)).unwrap()
    }

    fn log(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_mutation_fails(&self) -> bool {
        let n = self.mutations.fetch_add(1, Ordering::SeqCst) + 1;
        self.fail_on_mutation == Some(n)
    }
}

impl AssociationRepository for RecordingRepository {
    fn get_associations(&self, owner: &OwnerId) -> StoreResult<AssociationSet> {
        self.log(Call::Get(owner.to_string()));
        if self.fail_get {
            return Err(StoreError::Unavailable("injected read failure".into()));
        }
        self.inner.get_associations(owner)
    }

    fn add_association(&self, owner: &OwnerId, member: &MemberId) -> StoreResult<()> {
        self.log(Call::Add(owner.to_string(), member.to_string()));
        if self.next_mutation_fails() {
            return Err(StoreError::Unavailable("injected write failure".into()));
        }
        self.inner.add_association(owner, member)
    }

    fn remove_association(&self, owner: &OwnerId, member: &MemberId) -> StoreResult<()> {
        self.log(Call::Remove(owner.to_string(), member.to_string()));
        if self.next_mutation_fails() {
            return Err(StoreError::Unavailable("injected write failure".into()));
        }
        if self.report_missing_on_remove {
            return Err(StoreError::NotFound {
                owner: owner.clone(),
                member: member.clone(),
            });
        }
        self.inner.remove_association(owner, member)
    }
}
