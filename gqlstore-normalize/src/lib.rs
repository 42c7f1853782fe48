//! GraphQL response normalization
//!
//! Merges a JSON response payload, shaped by a compiled selection tree, into a
//! flat record store (see `gqlstore-ir`). Besides the store writes, each call
//! reports three lists for collaborators that act after normalization:
//!
//! - **Field payloads** for handle-decorated fields, consumed by handler providers
//! - **Match payloads** for resolved polymorphic fields, consumed by module loaders
//! - **Incremental placeholders** for deferred fragments and streamed lists,
//!   consumed by whatever delivers later incremental payloads
//!
//! Payload shapes that contradict the tree (an object where a list is
//! expected, or the reverse) abort the call with a [`NormalizeError`].
//! Data-quality problems are reported as [`Diagnostic`]s and never abort.
//!
//! # Example
//!
//! ```
//! use gqlstore_ir::{InMemoryRecordSource, RecordSource, Selection, ROOT_ID};
//! use gqlstore_normalize::{normalize, NormalizationSelector, NormalizerConfig};
//! use serde_json::json;
//!
//! let node: Vec<Selection> = serde_json::from_value(json!([{
//!     "kind": "LinkedField",
//!     "name": "me",
//!     "concreteType": "User",
//!     "selections": [
//!         {"kind": "ScalarField", "name": "id"},
//!         {"kind": "ScalarField", "name": "name"}
//!     ]
//! }]))
//! .unwrap();
//! let selector = NormalizationSelector::new(ROOT_ID, node.into(), Default::default());
//!
//! let mut store = InMemoryRecordSource::with_root();
//! let payload = json!({"me": {"id": "4", "name": "Zuck"}});
//! normalize(&mut store, &selector, &payload, NormalizerConfig::default()).unwrap();
//!
//! assert_eq!(store.get(ROOT_ID).unwrap().linked_id("me"), Some(Some("4")));
//! assert_eq!(store.get("4").unwrap().value("name"), Some(&json!("Zuck")));
//! ```

pub mod config;
pub mod diag;
pub mod error;
mod handle;
mod ids;
mod incremental;
mod matching;
mod normalizer;
pub mod payload;
mod validate;

pub use config::NormalizerConfig;
pub use diag::{CollectingSink, Diagnostic, DiagnosticSink, TracingSink};
pub use error::{NormalizeError, Result};
pub use ids::{ClientIdGenerator, DerivedClientIds, SequentialClientIds};
pub use normalizer::Normalizer;
pub use payload::{
    FieldPayload, IncrementalKind, IncrementalPlaceholder, MatchPayload, NormalizationResult,
    NormalizationSelector,
};
pub use validate::ConsistencyValidator;

use gqlstore_ir::RecordSource;
use serde_json::Value as JsonValue;

/// Normalize `payload` into `store` starting at `selector`.
///
/// Client ids are derived from parent id and storage key. Development builds
/// log data-quality diagnostics through [`TracingSink`]; release builds skip
/// the checks. Use [`Normalizer`] to inject a sink, an id generator or a
/// parent path.
pub fn normalize<S: RecordSource + ?Sized>(
    store: &mut S,
    selector: &NormalizationSelector,
    payload: &JsonValue,
    config: NormalizerConfig,
) -> Result<NormalizationResult> {
    let normalizer = Normalizer::new(store, config);
    #[cfg(debug_assertions)]
    let normalizer = normalizer.with_sink(TracingSink);
    normalizer.normalize(selector, payload)
}
