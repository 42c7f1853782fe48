//! Client id allocation.

use gqlstore_ir::{client_id, DataId};

/// Allocates ids for records reached without a global id.
pub trait ClientIdGenerator {
    /// Id for the record under `storage_key` of `parent_id`, at `index` for plural fields
    fn client_id(&mut self, parent_id: &str, storage_key: &str, index: Option<usize>) -> DataId;
}

impl<T: ClientIdGenerator + ?Sized> ClientIdGenerator for &mut T {
    fn client_id(&mut self, parent_id: &str, storage_key: &str, index: Option<usize>) -> DataId {
        (**self).client_id(parent_id, storage_key, index)
    }
}

/// Default generator: ids derived from parent id, storage key and index.
///
/// Normalizing the same subtree twice addresses the same records.
#[derive(Debug, Clone, Copy, Default)]
pub struct DerivedClientIds;

impl ClientIdGenerator for DerivedClientIds {
    fn client_id(&mut self, parent_id: &str, storage_key: &str, index: Option<usize>) -> DataId {
        client_id(parent_id, storage_key, index)
    }
}

/// Generator handing out `client:local:<n>` in allocation order.
#[derive(Debug, Clone, Default)]
pub struct SequentialClientIds {
    next: u64,
}

impl SequentialClientIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ids allocated so far
    pub fn allocated(&self) -> u64 {
        self.next
    }
}

impl ClientIdGenerator for SequentialClientIds {
    fn client_id(&mut self, _parent_id: &str, _storage_key: &str, _index: Option<usize>) -> DataId {
        let id = format!("client:local:{}", self.next);
        self.next += 1;
        id
    }
}
