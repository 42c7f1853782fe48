//! Recursive descent over the selection tree in lockstep with the payload.

use crate::config::NormalizerConfig;
use crate::diag::DiagnosticSink;
use crate::error::{NormalizeError, Result};
use crate::ids::{ClientIdGenerator, DerivedClientIds};
use crate::payload::{
    FieldPayload, IncrementalPlaceholder, MatchPayload, NormalizationResult,
    NormalizationSelector,
};
use crate::validate::ConsistencyValidator;
use gqlstore_ir::{
    DataId, InlineFragment, LinkedField, Record, RecordSource, ScalarField, Selection, Stream,
    Variables, ROOT_ID, TYPENAME_KEY,
};
use serde_json::{Map, Value as JsonValue};

type JsonObject = Map<String, JsonValue>;

/// Merges one response payload into a record store.
///
/// A normalizer is built per call and consumed by [`Normalizer::normalize`].
///
/// # Example
///
/// ```
/// use gqlstore_ir::{InMemoryRecordSource, RecordSource, Selection, ROOT_ID};
/// use gqlstore_normalize::{CollectingSink, NormalizationSelector, Normalizer, NormalizerConfig};
/// use serde_json::json;
///
/// let node: Vec<Selection> = serde_json::from_value(json!([
///     {"kind": "ScalarField", "name": "viewerName"}
/// ])).unwrap();
/// let selector = NormalizationSelector::new(ROOT_ID, node.into(), Default::default());
///
/// let mut store = InMemoryRecordSource::with_root();
/// let mut sink = CollectingSink::new();
/// let result = Normalizer::new(&mut store, NormalizerConfig::default())
///     .with_sink(&mut sink)
///     .normalize(&selector, &json!({"viewerName": "Zuck"}))
///     .unwrap();
///
/// assert!(result.field_payloads.is_empty());
/// assert!(sink.is_empty());
/// assert_eq!(
///     store.get(ROOT_ID).unwrap().value("viewerName"),
///     Some(&json!("Zuck"))
/// );
/// ```
pub struct Normalizer<'a, S: RecordSource + ?Sized> {
    pub(crate) store: &'a mut S,
    pub(crate) config: NormalizerConfig,
    pub(crate) ids: Box<dyn ClientIdGenerator + 'a>,
    pub(crate) validator: ConsistencyValidator<'a>,
    parent_path: Vec<String>,
    pub(crate) variables: Variables,
    pub(crate) path: Vec<String>,
    unmatched_abstract_type: bool,
    pub(crate) field_payloads: Vec<FieldPayload>,
    pub(crate) match_payloads: Vec<MatchPayload>,
    pub(crate) incremental_placeholders: Vec<IncrementalPlaceholder>,
}

impl<'a, S: RecordSource + ?Sized> Normalizer<'a, S> {
    /// Create a normalizer with derived client ids and no diagnostic sink
    pub fn new(store: &'a mut S, config: NormalizerConfig) -> Self {
        Self {
            store,
            config,
            ids: Box::new(DerivedClientIds),
            validator: ConsistencyValidator::disabled(),
            parent_path: Vec::new(),
            variables: Variables::new(),
            path: Vec::new(),
            unmatched_abstract_type: false,
            field_payloads: Vec::new(),
            match_payloads: Vec::new(),
            incremental_placeholders: Vec::new(),
        }
    }

    /// Report data-quality diagnostics to `sink`
    pub fn with_sink(mut self, sink: impl DiagnosticSink + 'a) -> Self {
        self.validator = ConsistencyValidator::with_sink(sink);
        self
    }

    /// Allocate client ids with `ids` instead of the derived scheme
    pub fn with_id_generator(mut self, ids: impl ClientIdGenerator + 'a) -> Self {
        self.ids = Box::new(ids);
        self
    }

    /// Prefix every emitted path with `path`
    ///
    /// Used when normalizing an incremental payload, so nested placeholders
    /// and match payloads address back to the operation root.
    pub fn with_parent_path(mut self, path: Vec<String>) -> Self {
        self.parent_path = path;
        self
    }

    /// Normalize `payload` into the store starting at `selector`
    pub fn normalize(
        mut self,
        selector: &NormalizationSelector,
        payload: &JsonValue,
    ) -> Result<NormalizationResult> {
        let span = tracing::debug_span!("normalize", data_id = %selector.data_id);
        let _enter = span.enter();

        let data = payload.as_object().ok_or_else(|| self.expected_object())?;
        if !self.store.has(&selector.data_id) {
            if selector.data_id != ROOT_ID {
                return Err(NormalizeError::RecordNotFound {
                    data_id: selector.data_id.clone(),
                });
            }
            self.store.set(Record::root());
        }

        self.variables = selector.variables.clone();
        self.traverse_selections(&selector.node, &selector.data_id, data)?;

        tracing::debug!(
            field_payloads = self.field_payloads.len(),
            match_payloads = self.match_payloads.len(),
            incremental_placeholders = self.incremental_placeholders.len(),
            "normalized payload"
        );

        Ok(NormalizationResult {
            field_payloads: self.field_payloads,
            match_payloads: self.match_payloads,
            incremental_placeholders: self.incremental_placeholders,
        })
    }

    pub(crate) fn traverse_selections(
        &mut self,
        selections: &[Selection],
        data_id: &str,
        data: &JsonObject,
    ) -> Result<()> {
        for selection in selections {
            match selection {
                Selection::ScalarField(field) => self.normalize_scalar(field, data_id, data)?,
                Selection::LinkedField(field) => self.normalize_linked(field, data_id, data, None)?,
                Selection::InlineFragment(fragment) => {
                    self.normalize_inline_fragment(fragment, data_id, data)?
                }
                Selection::Handle(handle) => self.normalize_handle(handle, data_id, data)?,
                Selection::Match(field) => self.normalize_match(field, data_id, data)?,
                Selection::Defer(defer) => self.normalize_defer(defer, data_id, data)?,
                Selection::Stream(stream) => self.normalize_stream(stream, data_id, data)?,
            }
        }
        Ok(())
    }

    pub(crate) fn normalize_scalar(
        &mut self,
        field: &ScalarField,
        data_id: &str,
        data: &JsonObject,
    ) -> Result<()> {
        let response_key = field.response_key();
        let value = match data.get(response_key) {
            Some(value) => value.clone(),
            None if self.write_missing_as_null(data_id, response_key) => JsonValue::Null,
            None => return Ok(()),
        };
        let storage_key = field.storage_key(&self.variables);
        // A selected `__typename` is an upsert of the record's type
        if let (TYPENAME_KEY, JsonValue::String(typename)) = (storage_key.as_str(), &value) {
            self.record_mut(data_id)?;
            self.validator.upsert_typename(&mut *self.store, data_id, typename);
            return Ok(());
        }
        self.record_mut(data_id)?.set_value(storage_key, value);
        Ok(())
    }

    /// Normalize a linked field; `stream` is set when the field is streamed
    /// with a true condition and placeholders should be emitted per element
    pub(crate) fn normalize_linked(
        &mut self,
        field: &LinkedField,
        data_id: &str,
        data: &JsonObject,
        stream: Option<&Stream>,
    ) -> Result<()> {
        let response_key = field.response_key();
        let storage_key = field.storage_key(&self.variables);
        let value = match data.get(response_key) {
            Some(JsonValue::Null) => {
                self.record_mut(data_id)?.set_linked(storage_key, None);
                return Ok(());
            }
            Some(value) => value,
            None => {
                if self.write_missing_as_null(data_id, response_key) {
                    self.record_mut(data_id)?.set_linked(storage_key, None);
                }
                return Ok(());
            }
        };

        self.path.push(response_key.to_string());
        if field.plural {
            self.normalize_plural(field, data_id, storage_key, value, stream)?;
        } else {
            self.normalize_singular(field, data_id, storage_key, value)?;
        }
        self.path.pop();
        Ok(())
    }

    fn normalize_singular(
        &mut self,
        field: &LinkedField,
        data_id: &str,
        storage_key: String,
        value: &JsonValue,
    ) -> Result<()> {
        let object = value.as_object().ok_or_else(|| self.expected_object())?;
        let typename = self.resolve_typename(field.concrete_type.as_deref(), object)?;
        let next_id = match global_id(object) {
            Some(id) => id,
            None => self.ids.client_id(data_id, &storage_key, None),
        };

        self.validator.upsert_typename(&mut *self.store, &next_id, &typename);
        self.record_mut(data_id)?.set_linked(storage_key, Some(next_id.clone()));
        self.traverse_selections(&field.selections, &next_id, object)
    }

    fn normalize_plural(
        &mut self,
        field: &LinkedField,
        data_id: &str,
        storage_key: String,
        value: &JsonValue,
        stream: Option<&Stream>,
    ) -> Result<()> {
        let items = value.as_array().ok_or_else(|| self.expected_list())?;
        let mut next_ids: Vec<Option<DataId>> = Vec::with_capacity(items.len());

        for (index, item) in items.iter().enumerate() {
            if item.is_null() {
                next_ids.push(None);
                continue;
            }

            self.path.push(index.to_string());
            let object = item.as_object().ok_or_else(|| self.expected_object())?;
            let typename = self.resolve_typename(field.concrete_type.as_deref(), object)?;
            let next_id = match global_id(object) {
                Some(id) => id,
                None => self.ids.client_id(data_id, &storage_key, Some(index)),
            };

            self.validator.upsert_typename(&mut *self.store, &next_id, &typename);
            self.traverse_selections(&field.selections, &next_id, object)?;
            if let Some(stream) = stream {
                self.push_stream_placeholder(stream, &next_id, &typename);
            }
            self.path.pop();

            next_ids.push(Some(next_id));
        }

        self.record_mut(data_id)?.set_linked_list(storage_key, next_ids);
        Ok(())
    }

    fn normalize_inline_fragment(
        &mut self,
        fragment: &InlineFragment,
        data_id: &str,
        data: &JsonObject,
    ) -> Result<()> {
        let typename = self.record_typename(data_id)?;
        if !fragment.is_abstract() {
            if fragment.type_name == typename {
                self.traverse_selections(&fragment.selections, data_id, data)?;
            }
            return Ok(());
        }

        // Abstract conditions are always traversed; fields the resolved type
        // does not implement may be absent without a warning.
        let outer = self.unmatched_abstract_type;
        self.unmatched_abstract_type = outer || !fragment.admits(&typename);
        let result = self.traverse_selections(&fragment.selections, data_id, data);
        self.unmatched_abstract_type = outer;
        result
    }

    /// Apply the missing-field policy; returns whether to write `null`
    pub(crate) fn write_missing_as_null(&mut self, data_id: &str, response_key: &str) -> bool {
        if !self.config.treat_missing_fields_as_null {
            return false;
        }
        if !self.unmatched_abstract_type {
            self.validator.missing_field(data_id, response_key);
        }
        true
    }

    pub(crate) fn resolve_typename(
        &self,
        concrete_type: Option<&str>,
        object: &JsonObject,
    ) -> Result<String> {
        concrete_type
            .or_else(|| object.get(TYPENAME_KEY).and_then(JsonValue::as_str))
            .map(str::to_string)
            .ok_or_else(|| NormalizeError::MissingTypename {
                path: self.error_path(),
            })
    }

    pub(crate) fn record_mut(&mut self, data_id: &str) -> Result<&mut Record> {
        self.store
            .get_mut(data_id)
            .ok_or_else(|| NormalizeError::RecordNotFound {
                data_id: data_id.to_string(),
            })
    }

    pub(crate) fn record_typename(&self, data_id: &str) -> Result<String> {
        self.store
            .get(data_id)
            .map(|record| record.typename().to_string())
            .ok_or_else(|| NormalizeError::RecordNotFound {
                data_id: data_id.to_string(),
            })
    }

    /// Current location, prefixed with the caller's parent path
    pub(crate) fn full_path(&self) -> Vec<String> {
        self.parent_path
            .iter()
            .chain(self.path.iter())
            .cloned()
            .collect()
    }

    pub(crate) fn error_path(&self) -> String {
        self.full_path().join(".")
    }

    pub(crate) fn expected_object(&self) -> NormalizeError {
        NormalizeError::ExpectedObject {
            path: self.error_path(),
        }
    }

    fn expected_list(&self) -> NormalizeError {
        NormalizeError::ExpectedList {
            path: self.error_path(),
        }
    }
}

/// Global id sent by the server, if any
fn global_id(object: &JsonObject) -> Option<DataId> {
    object
        .get("id")
        .and_then(JsonValue::as_str)
        .map(str::to_string)
}
