//! Defer and stream
//!
//! A deferred fragment with a true condition is skipped entirely and replaced
//! by one placeholder addressing the current record. A streamed list is always
//! written in full; with a true condition each element also gets a placeholder
//! carrying the list's selections, so later payloads can append to it.

use crate::error::{NormalizeError, Result};
use crate::normalizer::Normalizer;
use crate::payload::{IncrementalKind, IncrementalPlaceholder, NormalizationSelector};
use gqlstore_ir::{Defer, RecordSource, Stream};
use serde_json::{Map, Value as JsonValue};

impl<S: RecordSource + ?Sized> Normalizer<'_, S> {
    pub(crate) fn normalize_defer(
        &mut self,
        defer: &Defer,
        data_id: &str,
        data: &Map<String, JsonValue>,
    ) -> Result<()> {
        if !defer.if_cond.evaluate(&self.variables) {
            return self.traverse_selections(&defer.selections, data_id, data);
        }

        let type_name = self.record_typename(data_id)?;
        self.incremental_placeholders.push(IncrementalPlaceholder {
            kind: IncrementalKind::Defer,
            label: defer.label.clone(),
            path: self.full_path(),
            selector: NormalizationSelector::new(
                data_id,
                defer.selections.clone(),
                self.variables.clone(),
            ),
            type_name,
        });
        Ok(())
    }

    pub(crate) fn normalize_stream(
        &mut self,
        stream: &Stream,
        data_id: &str,
        data: &Map<String, JsonValue>,
    ) -> Result<()> {
        if !stream.field.plural {
            return Err(NormalizeError::InvalidSelection {
                message: format!("@stream on singular field '{}'", stream.field.name),
            });
        }
        let emit = stream.if_cond.evaluate(&self.variables);
        self.normalize_linked(&stream.field, data_id, data, emit.then_some(stream))
    }

    /// Record the placeholder for one streamed element at the current path
    pub(crate) fn push_stream_placeholder(
        &mut self,
        stream: &Stream,
        data_id: &str,
        type_name: &str,
    ) {
        self.incremental_placeholders.push(IncrementalPlaceholder {
            kind: IncrementalKind::Stream,
            label: stream.label.clone(),
            path: self.full_path(),
            selector: NormalizationSelector::new(
                data_id,
                stream.field.selections.clone(),
                self.variables.clone(),
            ),
            type_name: type_name.to_string(),
        });
    }
}
