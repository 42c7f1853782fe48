//! Normalization inputs and outputs handed to external collaborators.

use gqlstore_ir::{DataId, SelectionSet, Variables};
use serde::Serialize;
use serde_json::Value as JsonValue;

/// Where to start normalizing: a record, the tree to apply, and its bindings
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizationSelector {
    #[serde(rename = "dataID")]
    pub data_id: DataId,
    pub node: SelectionSet,
    pub variables: Variables,
}

impl NormalizationSelector {
    pub fn new(data_id: impl Into<DataId>, node: SelectionSet, variables: Variables) -> Self {
        Self {
            data_id: data_id.into(),
            node,
            variables,
        }
    }
}

/// One occurrence of a handle-decorated field, for a handler to post-process
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPayload {
    #[serde(rename = "dataID")]
    pub data_id: DataId,
    pub field_key: String,
    pub args: Variables,
    pub handle: String,
    pub handle_key: String,
}

/// A resolved polymorphic fragment whose deep normalization is left to a module loader
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchPayload {
    #[serde(rename = "dataID")]
    pub data_id: DataId,
    pub type_name: String,
    pub data: JsonValue,
    pub operation_reference: String,
    pub variables: Variables,
    pub path: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IncrementalKind {
    Defer,
    Stream,
}

/// A subtree whose normalization waits for a later incremental payload
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncrementalPlaceholder {
    pub kind: IncrementalKind,
    pub label: String,
    pub path: Vec<String>,
    pub selector: NormalizationSelector,
    pub type_name: String,
}

/// Everything a normalize call reports besides its store writes
///
/// All three lists are in traversal order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizationResult {
    pub field_payloads: Vec<FieldPayload>,
    pub match_payloads: Vec<MatchPayload>,
    pub incremental_placeholders: Vec<IncrementalPlaceholder>,
}
