//! Slipway Config - configuration carriers and the normalized config tree
//!
//! A service's raw configuration lives in a *carrier*: a persisted object of
//! one of a small set of mutually exclusive shapes. This crate resolves a
//! carrier into a [`ConfigTree`], the normalized, transformer-ready
//! configuration the rest of the pipeline works on.
//!
//! ## Key Concepts
//!
//! - **Carrier**: config-map or secret object holding configuration entries
//! - **Primary entry**: the carrier entry named `config`, parsed as the main
//!   configuration document
//! - **Profile files**: every other carrier entry, retained verbatim
//! - **Dotted paths**: scalar properties are addressed as `a.b.c`

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod carrier;
pub mod error;
pub mod tree;

// Re-export main types
pub use carrier::{ConfigCarrier, ConfigMapCarrier, ObjectReference, SecretCarrier};
pub use error::{ConfigResolutionError, PropertyError};
pub use tree::{ConfigTree, PRIMARY_ENTRY};
