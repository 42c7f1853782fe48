//! RecordSource trait and the in-memory store
//!
//! The normalizer writes through this trait so callers can keep records in
//! whatever structure they own across many normalization calls. Creation of
//! missing records is the writer's job; a source only stores what it is given.

use crate::record::{DataId, Record};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;

/// Mutable id -> record store
pub trait RecordSource {
    /// Get a record by id
    fn get(&self, id: &str) -> Option<&Record>;

    /// Get a record by id for in-place writes
    fn get_mut(&mut self, id: &str) -> Option<&mut Record>;

    /// Insert or replace a record under its own id
    fn set(&mut self, record: Record);

    /// Remove a record, returning it if present
    fn remove(&mut self, id: &str) -> Option<Record>;

    /// Number of records held
    fn len(&self) -> usize;

    /// All record ids
    fn ids(&self) -> Vec<DataId>;

    fn has(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A `RecordSource` backed by an ordered map
///
/// Ordered storage gives a deterministic serialized form, so two stores built
/// from the same writes serialize to identical bytes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InMemoryRecordSource {
    records: BTreeMap<DataId, Record>,
}

impl InMemoryRecordSource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source seeded with the synthetic root record
    pub fn with_root() -> Self {
        let mut source = Self::new();
        source.set(Record::root());
        source
    }

    /// Iterate over records in id order
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }
}

impl RecordSource for InMemoryRecordSource {
    fn get(&self, id: &str) -> Option<&Record> {
        self.records.get(id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Record> {
        self.records.get_mut(id)
    }

    fn set(&mut self, record: Record) {
        self.records.insert(record.id().to_string(), record);
    }

    fn remove(&mut self, id: &str) -> Option<Record> {
        self.records.remove(id)
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn ids(&self) -> Vec<DataId> {
        self.records.keys().cloned().collect()
    }
}

impl Serialize for InMemoryRecordSource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.records.len()))?;
        for (id, record) in &self.records {
            map.serialize_entry(id, record)?;
        }
        map.end()
    }
}
