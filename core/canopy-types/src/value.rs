//! Native property values and their display forms.
//!
//! [`PropertyValue`] covers every kind the store can hold. `Display` is
//! the canonical human-readable rendering used by row projection; for
//! the payload-free kinds (blobs, raw values) it is a placeholder that
//! names the kind and the payload size.

use std::fmt;

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::{Deserialize, Serialize};

use crate::{Error, Key, Result, ValueKind};

/// A geographic point, latitude and longitude in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    lat: f32,
    lon: f32,
}

impl GeoPoint {
    /// Latitude must lie in -90..=90 and longitude in -180..=180.
    pub fn new(lat: f32, lon: f32) -> Result<Self> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(Error::value_format(
                ValueKind::Geo,
                format!("{lat},{lon}"),
                "latitude must lie in -90..=90 and longitude in -180..=180",
            ));
        }
        Ok(Self { lat, lon })
    }

    pub fn lat(&self) -> f32 {
        self.lat
    }

    pub fn lon(&self) -> f32 {
        self.lon
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

/// A store user identity. The string form is colon-separated:
/// `email:auth_domain[:user_id[:federated_identity]]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub email: String,
    pub auth_domain: String,
    pub user_id: Option<String>,
    pub federated_identity: Option<String>,
}

impl UserIdentity {
    pub fn new(email: impl Into<String>, auth_domain: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            auth_domain: auth_domain.into(),
            user_id: None,
            federated_identity: None,
        }
    }
}

impl fmt::Display for UserIdentity {
    /// Identities display as their email alone.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.email)
    }
}

/// An instant-messaging handle: a protocol plus an address on it.
///
/// The protocol is either one of the well-known scheme names or a full
/// `scheme://...` URL for anything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImHandle {
    pub protocol: String,
    pub handle: String,
}

impl ImHandle {
    /// Scheme names accepted without a URL form.
    pub const KNOWN_SCHEMES: [&'static str; 3] = ["sip", "xmpp", "unknown"];

    pub fn new(protocol: impl Into<String>, handle: impl Into<String>) -> Self {
        Self {
            protocol: protocol.into(),
            handle: handle.into(),
        }
    }
}

impl fmt::Display for ImHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.protocol, self.handle)
    }
}

/// A quality rating on the store's fixed 0..=100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Rating(i32);

impl Rating {
    pub const MIN: i32 = 0;
    pub const MAX: i32 = 100;

    pub fn new(value: i32) -> Result<Self> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(Error::value_format(
                ValueKind::Rating,
                value.to_string(),
                "ratings range from 0 to 100",
            ));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A nested bag of properties stored as a single value.
///
/// Property order is preserved; setting an existing name replaces its
/// value in place.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EmbeddedEntity {
    properties: Vec<(String, PropertyValue)>,
}

impl EmbeddedEntity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_property(
        mut self,
        name: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Self {
        self.set_property(name, value);
        self
    }

    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<PropertyValue>) {
        let name = name.into();
        let value = value.into();
        match self.properties.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.properties.push((name, value)),
        }
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.properties.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl fmt::Display for EmbeddedEntity {
    /// One `name: value` line per property between the `<EmbeddedEntity:`
    /// header and the closing `>`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<EmbeddedEntity:")?;
        for (name, value) in &self.properties {
            writeln!(f, "{name}: {value}")?;
        }
        write!(f, ">")
    }
}

/// A native property value, one variant per registry kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Null,
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(String),
    /// Unindexed long-form text.
    Text(String),
    ShortBlob(Vec<u8>),
    Blob(Vec<u8>),
    Timestamp(DateTime<FixedOffset>),
    Geo(GeoPoint),
    PostalAddress(String),
    PhoneNumber(String),
    Email(String),
    User(UserIdentity),
    ImHandle(ImHandle),
    Link(String),
    Category(String),
    Rating(Rating),
    Key(Key),
    /// Reference into an external blob service, by opaque handle.
    BlobKey(String),
    Embedded(EmbeddedEntity),
    /// A value whose on-disk representation was never interpreted.
    RawValue(Vec<u8>),
}

impl PropertyValue {
    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) | PropertyValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PropertyValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_key(&self) -> Option<&Key> {
        match self {
            PropertyValue::Key(k) => Some(k),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Null => f.write_str("null"),
            PropertyValue::Integer(v) => write!(f, "{v}"),
            PropertyValue::Float(v) => write!(f, "{v}"),
            PropertyValue::Boolean(v) => write!(f, "{v}"),
            PropertyValue::String(s)
            | PropertyValue::Text(s)
            | PropertyValue::PostalAddress(s)
            | PropertyValue::PhoneNumber(s)
            | PropertyValue::Email(s)
            | PropertyValue::Link(s)
            | PropertyValue::Category(s) => f.write_str(s),
            PropertyValue::ShortBlob(bytes) => write!(f, "<ShortBlob: {} bytes>", bytes.len()),
            PropertyValue::Blob(bytes) => write!(f, "<Blob: {} bytes>", bytes.len()),
            PropertyValue::Timestamp(t) => {
                f.write_str(&t.to_rfc3339_opts(SecondsFormat::Millis, false))
            }
            PropertyValue::Geo(point) => write!(f, "{point}"),
            PropertyValue::User(user) => write!(f, "{user}"),
            PropertyValue::ImHandle(handle) => write!(f, "{handle}"),
            PropertyValue::Rating(rating) => write!(f, "{rating}"),
            PropertyValue::Key(key) => write!(f, "{key}"),
            PropertyValue::BlobKey(name) => write!(f, "<BlobKey: {name}>"),
            PropertyValue::Embedded(entity) => write!(f, "{entity}"),
            PropertyValue::RawValue(bytes) => write!(f, "<RawValue: {} bytes>", bytes.len()),
        }
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Integer(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Float(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Boolean(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<Key> for PropertyValue {
    fn from(value: Key) -> Self {
        PropertyValue::Key(value)
    }
}

impl From<DateTime<FixedOffset>> for PropertyValue {
    fn from(value: DateTime<FixedOffset>) -> Self {
        PropertyValue::Timestamp(value)
    }
}
