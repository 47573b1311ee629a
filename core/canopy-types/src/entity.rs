//! Entities: a key plus an ordered bag of named property values.

use serde::{Deserialize, Serialize};

use crate::{Key, PropertyValue};

/// Reserved field name under which an entity's key is projected.
///
/// Property names never collide with it; a filter on this field compares
/// against the key instead of a property.
pub const KEY_PROPERTY: &str = "__key__";

/// A stored record. Properties keep their insertion order, and setting
/// an existing name replaces the value without moving it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    key: Key,
    properties: Vec<(String, PropertyValue)>,
}

impl Entity {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            properties: Vec::new(),
        }
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

    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.properties.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn into_key(self) -> Key {
        self.key
    }
}
