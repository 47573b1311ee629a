//! Row projection: the flat transport form of an entity.
//!
//! A [`Row`] maps field names to [`RowValue`]s, each a bounded display
//! string paired with the kind tag a client needs to interpret (or
//! re-submit) it. Serialization preserves field order, with the
//! entity's key first under [`KEY_PROPERTY`].

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::entity::KEY_PROPERTY;
use crate::{Entity, PropertyValue, ValueKind};

/// Display strings longer than this are cut off at projection time.
pub const MAX_VALUE_LENGTH: usize = 2048;

/// One projected value: its display string plus its kind tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowValue {
    pub value: String,
    #[serde(rename = "type")]
    pub kind: ValueKind,
}

impl RowValue {
    /// Encode a native value: render its display form, truncate it to
    /// [`MAX_VALUE_LENGTH`] characters, and attach the kind tag.
    pub fn encode(value: &PropertyValue) -> Self {
        let mut display = value.to_string();
        if let Some((cut, _)) = display.char_indices().nth(MAX_VALUE_LENGTH) {
            display.truncate(cut);
        }
        Self {
            value: display,
            kind: value.kind(),
        }
    }
}

/// An ordered field-to-value mapping, serialized as a JSON object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    fields: Vec<(String, RowValue)>,
}

impl Row {
    /// Project an entity: the key first under [`KEY_PROPERTY`], then
    /// every property in the entity's own order.
    pub fn project(entity: &Entity) -> Self {
        let mut row = Row::default();
        row.push(
            KEY_PROPERTY,
            RowValue::encode(&PropertyValue::Key(entity.key().clone())),
        );
        for (name, value) in entity.properties() {
            row.push(name, RowValue::encode(value));
        }
        row
    }

    fn push(&mut self, name: &str, value: RowValue) {
        self.fields.push((name.to_string(), value));
    }

    pub fn get(&self, name: &str) -> Option<&RowValue> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &RowValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Row {
    // serde maps do not keep insertion order on their own, so rows
    // serialize through SerializeMap by hand.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
