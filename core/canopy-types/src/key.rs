//! Hierarchical entity keys and their two string grammars.
//!
//! Keys carry a kind, an identifier (numeric id or string name), and an
//! optional parent, forming a path from a root ancestor down to the
//! entity. Two deliberately separate grammars exist:
//!
//! - the *standalone* form, `Kind(42)` or `Kind("name")`, used where a
//!   single parent-less key is expected (the `ancestor` parameter);
//! - the *path* form, `Grandparent(1)/Parent(2)/Kind(3)`, used where a
//!   full key is rendered or re-read (`__key__` columns and filters).
//!
//! The path parser only understands numeric identifiers; a named segment
//! is reported as unsupported rather than silently misread.

use std::cmp::Ordering;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

static ID_FORM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^(\w+)\((\d+)\)$"#).expect("valid pattern"));
static NAME_FORM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^(\w+)\("([^"]+)"\)$"#).expect("valid pattern"));
static PATH_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([0-9]+)\)$").expect("valid pattern"));

/// The identifier half of a key: either a numeric id or a string name.
///
/// Ids order before names, matching the store's key ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Identifier {
    Id(i64),
    Name(String),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Id(id) => write!(f, "{id}"),
            Identifier::Name(name) => f.write_str(name),
        }
    }
}

/// A hierarchical entity key.
///
/// The kind is always non-empty; both parsers and the typed constructors
/// enforce that, so no separate validation step exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key {
    kind: String,
    id: Identifier,
    parent: Option<Box<Key>>,
}

impl Key {
    /// Root key with a numeric id.
    pub fn with_id(kind: impl Into<String>, id: i64) -> Self {
        let kind = kind.into();
        debug_assert!(!kind.is_empty());
        Self {
            kind,
            id: Identifier::Id(id),
            parent: None,
        }
    }

    /// Root key with a string name.
    pub fn with_name(kind: impl Into<String>, name: impl Into<String>) -> Self {
        let kind = kind.into();
        debug_assert!(!kind.is_empty());
        Self {
            kind,
            id: Identifier::Name(name.into()),
            parent: None,
        }
    }

    /// Child of `self` with a numeric id.
    pub fn child_with_id(self, kind: impl Into<String>, id: i64) -> Self {
        let kind = kind.into();
        debug_assert!(!kind.is_empty());
        Self {
            kind,
            id: Identifier::Id(id),
            parent: Some(Box::new(self)),
        }
    }

    /// Child of `self` with a string name.
    pub fn child_with_name(self, kind: impl Into<String>, name: impl Into<String>) -> Self {
        let kind = kind.into();
        debug_assert!(!kind.is_empty());
        Self {
            kind,
            id: Identifier::Name(name.into()),
            parent: Some(Box::new(self)),
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn id(&self) -> &Identifier {
        &self.id
    }

    pub fn parent(&self) -> Option<&Key> {
        self.parent.as_deref()
    }

    /// Whether `ancestor` appears anywhere on this key's path, the key
    /// itself included.
    pub fn has_ancestor(&self, ancestor: &Key) -> bool {
        let mut current = Some(self);
        while let Some(key) = current {
            if key == ancestor {
                return true;
            }
            current = key.parent.as_deref();
        }
        false
    }

    /// Parse a single parent-less key: `Kind(42)` or `Kind("name")`.
    ///
    /// Surrounding whitespace is ignored. The kind must be word
    /// characters only and the name must be non-empty and quote-free.
    pub fn parse_standalone(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if let Some(caps) = ID_FORM.captures(trimmed) {
            let id: i64 = caps[2]
                .parse()
                .map_err(|_| Error::KeyFormat(trimmed.to_string()))?;
            return Ok(Self::with_id(&caps[1], id));
        }
        if let Some(caps) = NAME_FORM.captures(trimmed) {
            return Ok(Self::with_name(&caps[1], &caps[2]));
        }
        Err(Error::KeyFormat(trimmed.to_string()))
    }

    /// Parse a full key path: `Grandparent(1)/Parent(2)/Kind(3)`.
    ///
    /// This is the inverse of [`Key`]'s `Display` impl for id-only paths.
    /// Segments with string names are rejected as unsupported; the
    /// standalone name form never appears inside a path.
    pub fn parse_path(input: &str) -> Result<Self> {
        if !input.ends_with(')') {
            return Err(Error::KeyPathFormat(input.to_string()));
        }
        let Some(caps) = PATH_ID.captures(input) else {
            // Ends with ')' but not with '(digits)' -- a named segment.
            return Err(Error::NamedKeyUnsupported(input.to_string()));
        };
        let (Some(tail), Some(digits)) = (caps.get(0), caps.get(1)) else {
            return Err(Error::KeyPathFormat(input.to_string()));
        };
        let id: i64 = digits
            .as_str()
            .parse()
            .map_err(|_| Error::KeyPathFormat(input.to_string()))?;

        // The segment's kind is everything between the last '/' and the
        // '(' that opens the identifier.
        let head = &input[..tail.start()];
        match head.rfind('/') {
            None => {
                if head.is_empty() {
                    return Err(Error::KeyPathFormat(input.to_string()));
                }
                Ok(Self::with_id(head, id))
            }
            Some(slash) => {
                let kind = &head[slash + 1..];
                if kind.is_empty() {
                    return Err(Error::KeyPathFormat(input.to_string()));
                }
                let parent = Self::parse_path(&input[..slash])?;
                Ok(parent.child_with_id(kind, id))
            }
        }
    }

    /// Keys on the path from the root ancestor down to `self`.
    fn chain(&self) -> Vec<&Key> {
        let mut chain = Vec::new();
        let mut current = Some(self);
        while let Some(key) = current {
            chain.push(key);
            current = key.parent.as_deref();
        }
        chain.reverse();
        chain
    }
}

impl fmt::Display for Key {
    /// Renders the path form. Named segments render as `Kind("name")`
    /// even though the path parser cannot read them back yet.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(parent) = &self.parent {
            write!(f, "{parent}/")?;
        }
        match &self.id {
            Identifier::Id(id) => write!(f, "{}({})", self.kind, id),
            Identifier::Name(name) => write!(f, "{}(\"{}\")", self.kind, name),
        }
    }
}

impl Ord for Key {
    /// Path order: compare segment by segment from the root, each
    /// segment by kind then identifier, with an ancestor ordering before
    /// its descendants.
    fn cmp(&self, other: &Self) -> Ordering {
        let left = self.chain();
        let right = other.chain();
        for (a, b) in left.iter().zip(right.iter()) {
            let segment = a.kind.cmp(&b.kind).then_with(|| a.id.cmp(&b.id));
            if segment != Ordering::Equal {
                return segment;
            }
        }
        left.len().cmp(&right.len())
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
