//! The value kind registry.
//!
//! [`ValueKind`] is the closed set of kinds a property value can have.
//! The registry does three jobs: classify a native value into its kind,
//! resolve a kind tag from its string spelling, and decode a raw string
//! into a native value of a given kind. Encoding (value to bounded
//! display string) lives with [`crate::RowValue`].
//!
//! Decoding is deliberately partial: blobs, embedded entities, and raw
//! values carry payloads no string form can express, and requests for
//! them fail with a stable error rather than guessing.

use std::fmt;

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::value::{GeoPoint, ImHandle, Rating, UserIdentity};
use crate::{Error, Key, PropertyValue, Result};

/// Every kind the store distinguishes. Serialized as the upper
/// snake-case tag (`SHORT_BLOB`, `IM_HANDLE`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueKind {
    Integer,
    Floating,
    Boolean,
    String,
    Text,
    ShortBlob,
    Blob,
    Datetime,
    Geo,
    PostalAddress,
    PhoneNumber,
    Email,
    User,
    ImHandle,
    Link,
    Category,
    Rating,
    Key,
    BlobKey,
    EmbeddedEntity,
    Null,
    RawValue,
}

impl ValueKind {
    pub const ALL: [ValueKind; 22] = [
        ValueKind::Integer,
        ValueKind::Floating,
        ValueKind::Boolean,
        ValueKind::String,
        ValueKind::Text,
        ValueKind::ShortBlob,
        ValueKind::Blob,
        ValueKind::Datetime,
        ValueKind::Geo,
        ValueKind::PostalAddress,
        ValueKind::PhoneNumber,
        ValueKind::Email,
        ValueKind::User,
        ValueKind::ImHandle,
        ValueKind::Link,
        ValueKind::Category,
        ValueKind::Rating,
        ValueKind::Key,
        ValueKind::BlobKey,
        ValueKind::EmbeddedEntity,
        ValueKind::Null,
        ValueKind::RawValue,
    ];

    /// The canonical tag, as it appears in serialized rows.
    pub fn tag(self) -> &'static str {
        match self {
            ValueKind::Integer => "INTEGER",
            ValueKind::Floating => "FLOATING",
            ValueKind::Boolean => "BOOLEAN",
            ValueKind::String => "STRING",
            ValueKind::Text => "TEXT",
            ValueKind::ShortBlob => "SHORT_BLOB",
            ValueKind::Blob => "BLOB",
            ValueKind::Datetime => "DATETIME",
            ValueKind::Geo => "GEO",
            ValueKind::PostalAddress => "POSTAL_ADDRESS",
            ValueKind::PhoneNumber => "PHONE_NUMBER",
            ValueKind::Email => "EMAIL",
            ValueKind::User => "USER",
            ValueKind::ImHandle => "IM_HANDLE",
            ValueKind::Link => "LINK",
            ValueKind::Category => "CATEGORY",
            ValueKind::Rating => "RATING",
            ValueKind::Key => "KEY",
            ValueKind::BlobKey => "BLOB_KEY",
            ValueKind::EmbeddedEntity => "EMBEDDED_ENTITY",
            ValueKind::Null => "NULL",
            ValueKind::RawValue => "RAW_VALUE",
        }
    }

    /// Resolve a tag, ignoring case. `long` is accepted as an alias for
    /// [`ValueKind::Integer`], matching the filter grammar's spelling.
    pub fn from_tag(tag: &str) -> Result<Self> {
        if tag.eq_ignore_ascii_case("long") {
            return Ok(ValueKind::Integer);
        }
        ValueKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.tag().eq_ignore_ascii_case(tag))
            .ok_or_else(|| Error::UnknownKind(tag.to_string()))
    }

    /// Parse a raw string into a native value of this kind.
    ///
    /// String-like kinds accept anything; the structured kinds validate
    /// their formats and the payload kinds always fail.
    pub fn decode(self, raw: &str) -> Result<PropertyValue> {
        match self {
            ValueKind::Integer => raw
                .parse::<i64>()
                .map(PropertyValue::Integer)
                .map_err(|e| Error::value_format(self, raw, e)),
            ValueKind::Floating => raw
                .parse::<f64>()
                .map(PropertyValue::Float)
                .map_err(|e| Error::value_format(self, raw, e)),
            ValueKind::Boolean => decode_boolean(raw),
            ValueKind::String => Ok(PropertyValue::String(raw.to_string())),
            ValueKind::Text => Ok(PropertyValue::Text(raw.to_string())),
            ValueKind::Datetime => DateTime::parse_from_rfc3339(raw)
                .map(PropertyValue::Timestamp)
                .map_err(|e| Error::value_format(self, raw, e)),
            ValueKind::Geo => decode_geo(raw),
            ValueKind::PostalAddress => Ok(PropertyValue::PostalAddress(raw.to_string())),
            ValueKind::PhoneNumber => Ok(PropertyValue::PhoneNumber(raw.to_string())),
            ValueKind::Email => Ok(PropertyValue::Email(raw.to_string())),
            ValueKind::User => decode_user(raw),
            ValueKind::ImHandle => decode_im_handle(raw),
            ValueKind::Link => Ok(PropertyValue::Link(raw.to_string())),
            ValueKind::Category => Ok(PropertyValue::Category(raw.to_string())),
            ValueKind::Rating => {
                let value: i32 = raw
                    .parse()
                    .map_err(|e| Error::value_format(self, raw, e))?;
                Rating::new(value).map(PropertyValue::Rating)
            }
            ValueKind::Key => Key::parse_path(raw).map(PropertyValue::Key),
            ValueKind::Null => {
                if raw.is_empty() {
                    Ok(PropertyValue::Null)
                } else {
                    Err(Error::value_format(self, raw, "expected an empty value"))
                }
            }
            ValueKind::ShortBlob
            | ValueKind::Blob
            | ValueKind::BlobKey
            | ValueKind::EmbeddedEntity
            | ValueKind::RawValue => Err(Error::UnsupportedDecode { kind: self }),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl PropertyValue {
    /// The registry kind this value belongs to.
    pub fn kind(&self) -> ValueKind {
        match self {
            PropertyValue::Null => ValueKind::Null,
            PropertyValue::Integer(_) => ValueKind::Integer,
            PropertyValue::Float(_) => ValueKind::Floating,
            PropertyValue::Boolean(_) => ValueKind::Boolean,
            PropertyValue::String(_) => ValueKind::String,
            PropertyValue::Text(_) => ValueKind::Text,
            PropertyValue::ShortBlob(_) => ValueKind::ShortBlob,
            PropertyValue::Blob(_) => ValueKind::Blob,
            PropertyValue::Timestamp(_) => ValueKind::Datetime,
            PropertyValue::Geo(_) => ValueKind::Geo,
            PropertyValue::PostalAddress(_) => ValueKind::PostalAddress,
            PropertyValue::PhoneNumber(_) => ValueKind::PhoneNumber,
            PropertyValue::Email(_) => ValueKind::Email,
            PropertyValue::User(_) => ValueKind::User,
            PropertyValue::ImHandle(_) => ValueKind::ImHandle,
            PropertyValue::Link(_) => ValueKind::Link,
            PropertyValue::Category(_) => ValueKind::Category,
            PropertyValue::Rating(_) => ValueKind::Rating,
            PropertyValue::Key(_) => ValueKind::Key,
            PropertyValue::BlobKey(_) => ValueKind::BlobKey,
            PropertyValue::Embedded(_) => ValueKind::EmbeddedEntity,
            PropertyValue::RawValue(_) => ValueKind::RawValue,
        }
    }
}

fn decode_boolean(raw: &str) -> Result<PropertyValue> {
    if raw.eq_ignore_ascii_case("true") {
        Ok(PropertyValue::Boolean(true))
    } else if raw.eq_ignore_ascii_case("false") {
        Ok(PropertyValue::Boolean(false))
    } else {
        Err(Error::value_format(
            ValueKind::Boolean,
            raw,
            "expected `true` or `false`",
        ))
    }
}

/// `lat,lon` split on the first comma; both halves required.
fn decode_geo(raw: &str) -> Result<PropertyValue> {
    let invalid = || Error::value_format(ValueKind::Geo, raw, "expected `<latitude>,<longitude>`");
    let comma = raw.find(',').ok_or_else(invalid)?;
    if comma == 0 || comma == raw.len() - 1 {
        return Err(invalid());
    }
    let lat: f32 = raw[..comma]
        .parse()
        .map_err(|e| Error::value_format(ValueKind::Geo, raw, e))?;
    let lon: f32 = raw[comma + 1..]
        .parse()
        .map_err(|e| Error::value_format(ValueKind::Geo, raw, e))?;
    GeoPoint::new(lat, lon).map(PropertyValue::Geo)
}

/// Two to four colon-separated fields: email, auth domain, and the
/// optional user id and federated identity.
fn decode_user(raw: &str) -> Result<PropertyValue> {
    let fields: Vec<&str> = raw.split(':').collect();
    if !(2..=4).contains(&fields.len()) {
        return Err(Error::value_format(
            ValueKind::User,
            raw,
            "expected `email:auth_domain[:user_id[:federated_identity]]`",
        ));
    }
    Ok(PropertyValue::User(UserIdentity {
        email: fields[0].to_string(),
        auth_domain: fields[1].to_string(),
        user_id: fields.get(2).map(|s| s.to_string()),
        federated_identity: fields.get(3).map(|s| s.to_string()),
    }))
}

/// Exactly two space-separated tokens: a protocol and a handle. The
/// protocol is either a known scheme name or a `scheme://...` URL.
fn decode_im_handle(raw: &str) -> Result<PropertyValue> {
    let tokens: Vec<&str> = raw.split(' ').collect();
    if tokens.len() != 2 {
        return Err(Error::value_format(
            ValueKind::ImHandle,
            raw,
            "expected `<protocol> <handle>`",
        ));
    }
    let protocol = tokens[0];
    let known = ImHandle::KNOWN_SCHEMES.contains(&protocol);
    if !known && !is_protocol_url(protocol) {
        return Err(Error::value_format(
            ValueKind::ImHandle,
            raw,
            "protocol must be a known scheme or a URL",
        ));
    }
    Ok(PropertyValue::ImHandle(ImHandle::new(protocol, tokens[1])))
}

fn is_protocol_url(token: &str) -> bool {
    let Some((scheme, rest)) = token.split_once("://") else {
        return false;
    };
    if rest.is_empty() || scheme.is_empty() {
        return false;
    }
    let mut chars = scheme.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
