//! The normalized configuration tree
//!
//! A [`ConfigTree`] holds the primary configuration document as a JSON value
//! tree plus any supplementary profile files carried alongside it. Scalar
//! properties are addressed by dotted path (`providers.kubernetes.enabled`).
//! The tree is mutable: the forward transformer pass edits it in place before
//! manifest generation.

use crate::carrier::{ConfigMapCarrier, SecretCarrier};
use crate::error::{ConfigResolutionError, PropertyError};
use serde_json::Value;
use std::collections::BTreeMap;

/// Carrier entry parsed as the primary configuration document
pub const PRIMARY_ENTRY: &str = "config";

/// Normalized, transformer-ready configuration for one service
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigTree {
    root: Value,
    files: BTreeMap<String, String>,
}

impl ConfigTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self {
            root: Value::Object(serde_json::Map::new()),
            files: BTreeMap::new(),
        }
    }

    /// Resolve a config-map carrier
    ///
    /// The `config` entry becomes the primary document; every other entry is
    /// retained as a profile file. A carrier without a `config` entry
    /// resolves to an empty tree.
    pub fn from_config_map(carrier: &ConfigMapCarrier) -> Result<Self, ConfigResolutionError> {
        let mut tree = Self::new();
        for (entry, contents) in &carrier.data {
            tree.load_entry(entry, contents)?;
        }
        Ok(tree)
    }

    /// Resolve a secret carrier
    ///
    /// Entries must decode as UTF-8; otherwise they're treated the same as
    /// config-map entries.
    pub fn from_secret(carrier: &SecretCarrier) -> Result<Self, ConfigResolutionError> {
        let mut tree = Self::new();
        for (entry, bytes) in &carrier.data {
            let contents = String::from_utf8(bytes.clone()).map_err(|source| {
                ConfigResolutionError::UndecodableEntry {
                    entry: entry.clone(),
                    source,
                }
            })?;
            tree.load_entry(entry, &contents)?;
        }
        Ok(tree)
    }

    fn load_entry(&mut self, entry: &str, contents: &str) -> Result<(), ConfigResolutionError> {
        if entry == PRIMARY_ENTRY {
            let parsed: Value = serde_yaml::from_str(contents).map_err(|source| {
                ConfigResolutionError::MalformedDocument {
                    entry: entry.into(),
                    source,
                }
            })?;
            if !parsed.is_object() {
                return Err(ConfigResolutionError::NotAMapping { entry: entry.into() });
            }
            self.root = parsed;
        } else {
            self.files.insert(entry.into(), contents.into());
        }
        Ok(())
    }

    /// Read the property at a dotted path
    pub fn get_prop(&self, path: &str) -> Result<&Value, PropertyError> {
        let mut node = &self.root;
        for segment in path.split('.') {
            let map = node
                .as_object()
                .ok_or_else(|| PropertyError::wrong_kind(path, "mapping"))?;
            node = map.get(segment).ok_or_else(|| PropertyError::missing(path))?;
        }
        Ok(node)
    }

    /// Read the string property at a dotted path
    pub fn get_string(&self, path: &str) -> Result<String, PropertyError> {
        match self.get_prop(path)? {
            Value::String(s) => Ok(s.clone()),
            _ => Err(PropertyError::wrong_kind(path, "string")),
        }
    }

    /// True if the path resolves to any property
    pub fn has_prop(&self, path: &str) -> bool {
        self.get_prop(path).is_ok()
    }

    /// Write the property at a dotted path, creating intermediate mappings
    ///
    /// Fails if an intermediate segment already holds a non-mapping value.
    pub fn set_prop(&mut self, path: &str, value: Value) -> Result<(), PropertyError> {
        let segments: Vec<&str> = path.split('.').collect();
        let mut node = &mut self.root;
        for segment in &segments[..segments.len() - 1] {
            let map = node
                .as_object_mut()
                .ok_or_else(|| PropertyError::wrong_kind(path, "mapping"))?;
            node = map
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(serde_json::Map::new()));
        }
        let map = node
            .as_object_mut()
            .ok_or_else(|| PropertyError::wrong_kind(path, "mapping"))?;
        map.insert(segments[segments.len() - 1].to_string(), value);
        Ok(())
    }

    /// The primary configuration document
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Contents of a profile file
    pub fn file(&self, name: &str) -> Option<&str> {
        self.files.get(name).map(String::as_str)
    }

    /// Add or replace a profile file
    pub fn put_file(&mut self, name: impl Into<String>, contents: impl Into<String>) {
        self.files.insert(name.into(), contents.into());
    }

    /// Names of all profile files
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }
}
