//! Reference access policy. Reads a `policy.toml` and decides which callers
//! may modify which owners.

use crate::{AuthzError, AuthzResult, Authorizer, DenyReason};
use linkset_types::{CallerIdentity, OwnerId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Access policy mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyMode {
    #[default]
    /// Any caller that is not denied may modify any unrestricted owner.
    Open,
    /// Only explicitly allowed callers may modify unrestricted owners.
    Allowlist,
    /// Nobody may modify anything.
    Locked,
}

/// Policy rules evaluated by [`PolicyAuthorizer`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessPolicy {
    #[serde(default)]
    pub mode: PolicyMode,
    #[serde(default)]
    pub allowed_callers: HashSet<String>,
    #[serde(default)]
    pub denied_callers: HashSet<String>,
    /// Owner ID → the only callers allowed to modify that owner.
    #[serde(default)]
    pub restricted_owners: HashMap<String, HashSet<String>>,
}

impl AccessPolicy {
    /// A policy that refuses every caller.
    pub fn locked() -> Self {
        Self {
            mode: PolicyMode::Locked,
            ..Default::default()
        }
    }

    /// Restricts `owner` to the given callers.
    #[must_use]
    pub fn restrict_owner<I, S>(mut self, owner: &str, callers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.restricted_owners
            .insert(owner.to_string(), callers.into_iter().map(Into::into).collect());
        self
    }

    /// Evaluates the rules; `None` means granted.
    fn deny_reason(&self, caller: &str, owner: &str) -> Option<DenyReason> {
        if self.mode == PolicyMode::Locked {
            return Some(DenyReason::Locked);
        }
        if self.denied_callers.contains(caller) {
            return Some(DenyReason::CallerDenied);
        }
        if let Some(privileged) = self.restricted_owners.get(owner) {
            return (!privileged.contains(caller)).then_some(DenyReason::OwnerRestricted);
        }
        match self.mode {
            PolicyMode::Allowlist if !self.allowed_callers.contains(caller) => {
                Some(DenyReason::NotAllowlisted)
            }
            _ => None,
        }
    }
}

/// Errors from strict policy parsing.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("failed to read policy file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid policy file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Enforces an [`AccessPolicy`].
pub struct PolicyAuthorizer {
    policy: AccessPolicy,
    policy_path: Option<PathBuf>,
}

impl PolicyAuthorizer {
    /// Loads policy from an explicit path.
    ///
    /// A missing file yields the default open policy. A file that exists but
    /// cannot be read or parsed yields a locked policy.
    pub fn load_from(policy_path: impl AsRef<Path>) -> Self {
        let policy_path = policy_path.as_ref().to_path_buf();
        if !policy_path.exists() {
            info!("No access policy found at {:?}, running open", policy_path);
            return Self {
                policy: AccessPolicy::default(),
                policy_path: None,
            };
        }

        match Self::read(&policy_path) {
            Ok(policy) => {
                info!("Loaded access policy from {:?}", policy_path);
                Self {
                    policy,
                    policy_path: Some(policy_path),
                }
            }
            Err(e) => {
                warn!("{}. Falling back to locked policy.", e);
                Self {
                    policy: AccessPolicy::locked(),
                    policy_path: Some(policy_path),
                }
            }
        }
    }

    /// Reads and parses a policy file, failing on any error.
    pub fn read(path: &Path) -> Result<AccessPolicy, PolicyError> {
        let contents = std::fs::read_to_string(path).map_err(|source| PolicyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Parses policy TOML.
    pub fn parse(contents: &str) -> Result<AccessPolicy, PolicyError> {
        let file: PolicyFile = toml::from_str(contents)?;
        Ok(file.into_policy())
    }

    /// Creates an authorizer with an explicit policy.
    pub fn with_policy(policy: AccessPolicy) -> Self {
        Self {
            policy,
            policy_path: None,
        }
    }

    /// Returns whether the policy came from a file.
    pub fn has_policy_file(&self) -> bool {
        self.policy_path.is_some()
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }
}

impl Authorizer for PolicyAuthorizer {
    fn authorize(&self, caller: &CallerIdentity, owner: &OwnerId) -> AuthzResult<()> {
        match self.policy.deny_reason(caller.as_str(), owner.as_str()) {
            None => Ok(()),
            Some(reason) => {
                debug!(%caller, %owner, %reason, "access denied");
                Err(AuthzError::not_authorized(caller, owner, reason))
            }
        }
    }
}

/// Raw TOML structure matching the policy.toml format.
#[derive(Deserialize)]
struct PolicyFile {
    #[serde(default)]
    policy: PolicySection,
}

#[derive(Deserialize, Default)]
struct PolicySection {
    #[serde(default)]
    mode: PolicyMode,
    #[serde(default)]
    callers: CallerLists,
    #[serde(default)]
    owners: HashMap<String, Vec<String>>,
}

#[derive(Deserialize, Default)]
struct CallerLists {
    #[serde(default)]
    allowed: Vec<String>,
    #[serde(default)]
    denied: Vec<String>,
}

impl PolicyFile {
    fn into_policy(self) -> AccessPolicy {
        AccessPolicy {
            mode: self.policy.mode,
            allowed_callers: self.policy.callers.allowed.into_iter().collect(),
            denied_callers: self.policy.callers.denied.into_iter().collect(),
            restricted_owners: self
                .policy
                .owners
                .into_iter()
                .map(|(owner, callers)| (owner, callers.into_iter().collect()))
                .collect(),
        }
    }
}
