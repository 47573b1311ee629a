//! Core type definitions for Canopy.
//!
//! This crate holds the store-agnostic data model and the typed
//! string/value translation layer everything else is built on:
//!
//! - [`Key`] — hierarchical entity keys and their two string grammars
//! - [`PropertyValue`] and [`ValueKind`] — native property values and the
//!   closed registry that classifies, encodes, and decodes them
//! - [`Entity`] — a key plus an ordered bag of named properties
//! - [`Row`] — the flat transport projection of an entity
//!
//! Nothing in this crate performs I/O; store backends and the HTTP
//! surface live in their own crates.

mod entity;
mod key;
mod kind;
mod row;
mod value;

pub use entity::{Entity, KEY_PROPERTY};
pub use key::{Identifier, Key};
pub use kind::ValueKind;
pub use row::{Row, RowValue, MAX_VALUE_LENGTH};
pub use value::{EmbeddedEntity, GeoPoint, ImHandle, PropertyValue, Rating, UserIdentity};

use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while translating between strings and typed values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A standalone key string matched neither grammar form.
    #[error("unable to parse key `{0}`: expected `Kind(<id>)` or `Kind(\"<name>\")`")]
    KeyFormat(String),

    /// A key path (or one of its segments) was malformed.
    #[error("malformed key path `{0}`: expected `[<parent>/]Kind(<id>)`")]
    KeyPathFormat(String),

    /// The path grammar only understands numeric identifiers.
    #[error("string key names not supported yet: {0}")]
    NamedKeyUnsupported(String),

    /// A kind tag that is not part of the registry.
    #[error("unknown value kind `{0}`")]
    UnknownKind(String),

    /// Some kinds carry payloads no string form can express.
    #[error("{kind} values cannot be constructed from a string")]
    UnsupportedDecode { kind: ValueKind },

    /// A value string failed to parse for its declared kind.
    #[error("invalid {kind} value `{input}`: {reason}")]
    ValueFormat {
        kind: ValueKind,
        input: String,
        reason: String,
    },
}

impl Error {
    pub(crate) fn value_format(
        kind: ValueKind,
        input: impl Into<String>,
        reason: impl fmt::Display,
    ) -> Self {
        Self::ValueFormat {
            kind,
            input: input.into(),
            reason: reason.to_string(),
        }
    }
}
