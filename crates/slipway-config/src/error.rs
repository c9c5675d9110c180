//! Configuration error types

use thiserror::Error;

/// Errors resolving a carrier into a normalized configuration
#[derive(Debug, Error)]
pub enum ConfigResolutionError {
    #[error("Carrier {name:?} of kind {kind:?} does not hold configuration; expected a config map or secret")]
    UnsupportedCarrier { kind: String, name: String },

    #[error("Carrier entry {entry:?} is not valid UTF-8")]
    UndecodableEntry {
        entry: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("Carrier entry {entry:?} is not a valid configuration document")]
    MalformedDocument {
        entry: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Carrier entry {entry:?} must be a mapping document")]
    NotAMapping { entry: String },
}

/// Errors reading or writing a dotted-path property
#[derive(Debug, Error)]
pub enum PropertyError {
    #[error("Property {path:?} not found")]
    Missing { path: String },

    #[error("Property {path:?} is not a {expected}")]
    WrongKind { path: String, expected: &'static str },
}

impl PropertyError {
    pub(crate) fn missing(path: &str) -> Self {
        PropertyError::Missing { path: path.into() }
    }

    pub(crate) fn wrong_kind(path: &str, expected: &'static str) -> Self {
        PropertyError::WrongKind {
            path: path.into(),
            expected,
        }
    }
}
