//! Normalized records
//!
//! A `Record` is a flat bag of field values keyed by storage key. Values are
//! either scalars (kept verbatim as JSON), a single reference to another record,
//! or an ordered list of references whose entries may be null.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// Identifier of a record in a `RecordSource`.
pub type DataId = String;

/// Reserved key holding a record's id in its serialized form.
pub const ID_KEY: &str = "__id";

/// Reserved key holding a record's concrete type name.
pub const TYPENAME_KEY: &str = "__typename";

/// Id of the synthetic root record operations are normalized under.
pub const ROOT_ID: &str = "client:root";

/// Type name of the synthetic root record.
pub const ROOT_TYPE: &str = "__Root";

/// A value stored under one storage key of a record.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    /// Scalar payload value, including explicit `null` and arbitrary JSON
    Scalar(JsonValue),
    /// Reference to a single record, or a null reference
    Linked(Option<DataId>),
    /// Ordered references; `None` marks a null entry in the payload list
    LinkedList(Vec<Option<DataId>>),
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Scalar(value) => value.serialize(serializer),
            FieldValue::Linked(None) => serializer.serialize_none(),
            FieldValue::Linked(Some(id)) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("__ref", id)?;
                map.end()
            }
            FieldValue::LinkedList(ids) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("__refs", ids)?;
                map.end()
            }
        }
    }
}

/// One normalized entity.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    id: DataId,
    typename: String,
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    /// Create an empty record of the given concrete type
    pub fn new(id: impl Into<DataId>, typename: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            typename: typename.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Create the synthetic root record
    pub fn root() -> Self {
        Self::new(ROOT_ID, ROOT_TYPE)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn typename(&self) -> &str {
        &self.typename
    }

    pub fn set_typename(&mut self, typename: impl Into<String>) {
        self.typename = typename.into();
    }

    /// Get the value stored under a storage key
    pub fn get(&self, storage_key: &str) -> Option<&FieldValue> {
        self.fields.get(storage_key)
    }

    /// Check whether a storage key has been written at all
    pub fn has(&self, storage_key: &str) -> bool {
        self.fields.contains_key(storage_key)
    }

    /// Write a scalar value
    ///
    /// Writing `__typename` updates the record's type rather than adding a field.
    pub fn set_value(&mut self, storage_key: impl Into<String>, value: JsonValue) {
        let storage_key = storage_key.into();
        if storage_key == TYPENAME_KEY {
            if let JsonValue::String(typename) = value {
                self.typename = typename;
            }
            return;
        }
        self.fields.insert(storage_key, FieldValue::Scalar(value));
    }

    pub fn set_linked(&mut self, storage_key: impl Into<String>, id: Option<DataId>) {
        self.fields.insert(storage_key.into(), FieldValue::Linked(id));
    }

    pub fn set_linked_list(&mut self, storage_key: impl Into<String>, ids: Vec<Option<DataId>>) {
        self.fields.insert(storage_key.into(), FieldValue::LinkedList(ids));
    }

    /// Scalar value under a storage key, if the key holds a scalar
    pub fn value(&self, storage_key: &str) -> Option<&JsonValue> {
        match self.fields.get(storage_key) {
            Some(FieldValue::Scalar(value)) => Some(value),
            _ => None,
        }
    }

    /// Referenced id under a storage key
    ///
    /// Returns `Some(None)` for a stored null reference and `None` when the key
    /// is absent or does not hold a single reference.
    pub fn linked_id(&self, storage_key: &str) -> Option<Option<&str>> {
        match self.fields.get(storage_key) {
            Some(FieldValue::Linked(id)) => Some(id.as_deref()),
            _ => None,
        }
    }

    /// Referenced ids under a storage key holding a reference list
    pub fn linked_ids(&self, storage_key: &str) -> Option<&[Option<DataId>]> {
        match self.fields.get(storage_key) {
            Some(FieldValue::LinkedList(ids)) => Some(ids),
            _ => None,
        }
    }

    /// Iterate over stored fields in storage key order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 2))?;
        map.serialize_entry(ID_KEY, &self.id)?;
        map.serialize_entry(TYPENAME_KEY, &self.typename)?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
