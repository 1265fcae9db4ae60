//! Service configuration, optionally read from a TOML file:
//!
//! ```toml
//! [identifiers]
//! max_length = 64
//! pattern = "[PS][0-9]+"
//!
//! [limits]
//! max_members_per_owner = 10
//! ```

use crate::error::ConfigError;
use linkset_types::{
    DEFAULT_MAX_LENGTH, IdentifierRules, IdentifierValidator, MAX_IDENTIFIER_LENGTH,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Identifier format settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierConfig {
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    /// Extra pattern every identifier must match in full.
    #[serde(default)]
    pub pattern: Option<String>,
}

fn default_max_length() -> usize {
    DEFAULT_MAX_LENGTH
}

impl Default for IdentifierConfig {
    fn default() -> Self {
        Self {
            max_length: default_max_length(),
            pattern: None,
        }
    }
}

/// Request size limits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Largest target set a single call may ask for.
    #[serde(default)]
    pub max_members_per_owner: Option<usize>,
}

/// Configuration for [`Reconciler`](crate::Reconciler).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcilerConfig {
    #[serde(default)]
    pub identifiers: IdentifierConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

impl ReconcilerConfig {
    /// Loads config from `path`. A missing file yields the defaults.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            info!("No reconciler config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        info!("Loaded reconciler config from {:?}", path);
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Builds the identifier validator these settings describe.
    pub fn validator(&self) -> Result<IdentifierValidator, ConfigError> {
        let max_length = self.identifiers.max_length;
        if !(1..=MAX_IDENTIFIER_LENGTH).contains(&max_length) {
            return Err(ConfigError::MaxLength {
                value: max_length,
                max: MAX_IDENTIFIER_LENGTH,
            });
        }
        let mut rules = IdentifierRules::new(max_length);
        if let Some(pattern) = &self.identifiers.pattern {
            rules = rules.with_pattern(pattern)?;
        }
        let validator = IdentifierValidator::new(rules);
        Ok(match self.limits.max_members_per_owner {
            Some(max) => validator.with_max_members(max),
            None => validator,
        })
    }
}
