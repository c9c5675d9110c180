//! Configuration carriers
//!
//! A carrier is the raw object the declaration points at, holding the
//! configuration before resolution. Two shapes are supported: config maps
//! (string entries) and secrets (byte entries). Any other shape is rejected
//! at resolution time.

use crate::error::ConfigResolutionError;
use crate::tree::ConfigTree;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A config-map shaped carrier with string entries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigMapCarrier {
    /// Object name the declaration referenced
    pub name: String,

    /// Entry name to entry contents
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

impl ConfigMapCarrier {
    /// Create an empty config-map carrier
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: BTreeMap::new(),
        }
    }

    /// Add an entry
    pub fn with_entry(mut self, entry: impl Into<String>, contents: impl Into<String>) -> Self {
        self.data.insert(entry.into(), contents.into());
        self
    }
}

/// A secret shaped carrier with byte entries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecretCarrier {
    /// Object name the declaration referenced
    pub name: String,

    /// Entry name to entry bytes
    #[serde(default)]
    pub data: BTreeMap<String, Vec<u8>>,
}

impl SecretCarrier {
    /// Create an empty secret carrier
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: BTreeMap::new(),
        }
    }

    /// Add an entry
    pub fn with_entry(mut self, entry: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.data.insert(entry.into(), bytes.into());
        self
    }
}

/// Reference to a carrier object whose shape resolution does not support
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectReference {
    /// Reported object kind
    pub kind: String,

    /// Reported object name
    pub name: String,
}

impl ObjectReference {
    /// Create a reference
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
        }
    }
}

/// The carrier a declaration resolved to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfigCarrier {
    /// Configuration held in a config map
    ConfigMap(ConfigMapCarrier),

    /// Configuration held in a secret
    Secret(SecretCarrier),

    /// Some other object the pipeline cannot read configuration from
    External(ObjectReference),
}

impl ConfigCarrier {
    /// Name of the underlying object
    pub fn name(&self) -> &str {
        match self {
            Self::ConfigMap(c) => &c.name,
            Self::Secret(s) => &s.name,
            Self::External(r) => &r.name,
        }
    }

    /// Resolve this carrier into a normalized configuration tree
    pub fn resolve(&self) -> Result<ConfigTree, ConfigResolutionError> {
        match self {
            Self::ConfigMap(carrier) => ConfigTree::from_config_map(carrier),
            Self::Secret(carrier) => ConfigTree::from_secret(carrier),
            Self::External(reference) => Err(ConfigResolutionError::UnsupportedCarrier {
                kind: reference.kind.clone(),
                name: reference.name.clone(),
            }),
        }
    }
}
