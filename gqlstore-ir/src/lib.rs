//! Record store and compiled selection tree for normalized GraphQL data
//!
//! This crate holds the data side of normalization: the flat, reference-linked
//! record store a response is merged into, the compiled selection tree that
//! describes the response shape, and the key derivation both sides agree on.
//!
//! # Key Design Principles
//!
//! 1. **One key derivation** - Storage keys, handle keys and client ids are
//!    produced only by [`storage_key`], so writers and readers cannot drift.
//!
//! 2. **Canonical argument rendering** - Argument values are rendered with
//!    sorted object keys at every level, making keys independent of argument
//!    insertion order.
//!
//! 3. **Deterministic ids** - Records without a global id get a client id
//!    derived from parent id, storage key and list index.
//!
//! # Example
//!
//! ```
//! use gqlstore_ir::{client_id, format_storage_key, InMemoryRecordSource, Record, RecordSource};
//! use serde_json::json;
//!
//! let args = json!({"first": 3}).as_object().cloned().unwrap();
//! let key = format_storage_key("friends", &args);
//! assert_eq!(key, "friends(first:3)");
//!
//! let mut source = InMemoryRecordSource::with_root();
//! let id = client_id("1", &key, None);
//! source.set(Record::new(id, "FriendsConnection"));
//! assert!(source.has("client:1:friends(first:3)"));
//! ```

pub mod canonical;
mod record;
pub mod selection;
mod source;
pub mod storage_key;

pub use canonical::to_canonical_string;
pub use record::{DataId, FieldValue, Record, ID_KEY, ROOT_ID, ROOT_TYPE, TYPENAME_KEY};
pub use selection::{
    Argument, Defer, HandleField, HandledField, IfCondition, InlineFragment, LinkedField,
    MatchCandidate, MatchField, ScalarField, Selection, SelectionSet, Stream, Variables,
    SUPPORTED_ARG,
};
pub use source::{InMemoryRecordSource, RecordSource};
pub use storage_key::{
    argument_values, client_id, format_storage_key, handle_key, is_client_id, storage_key,
    CLIENT_ID_PREFIX,
};
