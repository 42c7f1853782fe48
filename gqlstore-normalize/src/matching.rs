//! Match fields
//!
//! A match field resolves to the one candidate module registered for the
//! payload's `__typename`. The field gets a wrapper record and a reference to
//! it; the candidate's own selections are not normalized here. Instead a
//! [`MatchPayload`] is recorded so a module loader can fetch the candidate's
//! tree and normalize `data` into the wrapper record later.

use crate::error::{NormalizeError, Result};
use crate::normalizer::Normalizer;
use crate::payload::MatchPayload;
use gqlstore_ir::{MatchField, RecordSource, SUPPORTED_ARG, TYPENAME_KEY};
use serde_json::{Map, Value as JsonValue};

impl<S: RecordSource + ?Sized> Normalizer<'_, S> {
    pub(crate) fn normalize_match(
        &mut self,
        field: &MatchField,
        data_id: &str,
        data: &Map<String, JsonValue>,
    ) -> Result<()> {
        if field.args.iter().any(|arg| arg.name() == SUPPORTED_ARG) {
            return Err(NormalizeError::InvalidSelection {
                message: format!(
                    "match field '{}' has an argument named '{}'",
                    field.name, SUPPORTED_ARG
                ),
            });
        }

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
        let object = value.as_object().ok_or_else(|| self.expected_object())?;
        let resolved = object
            .get(TYPENAME_KEY)
            .and_then(JsonValue::as_str)
            .and_then(|typename| field.candidates.get_key_value(typename));

        match resolved {
            // Untyped, or a variant this client was not built with
            None => self.record_mut(data_id)?.set_linked(storage_key, None),
            Some((typename, candidate)) => {
                let next_id = self.ids.client_id(data_id, &storage_key, None);
                self.validator.upsert_typename(&mut *self.store, &next_id, typename);
                self.record_mut(data_id)?.set_linked(storage_key, Some(next_id.clone()));

                self.match_payloads.push(MatchPayload {
                    data_id: next_id,
                    type_name: typename.to_string(),
                    data: value.clone(),
                    operation_reference: candidate.operation.clone(),
                    variables: self.variables.clone(),
                    path: self.full_path(),
                });
            }
        }
        self.path.pop();
        Ok(())
    }
}
