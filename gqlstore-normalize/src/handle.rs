//! Handle-decorated fields
//!
//! The decorated field is normalized like any other field; afterwards one
//! [`FieldPayload`] is recorded for the handler provider. Because nested
//! fields are visited before the payload is recorded, handles inside a
//! handled linked field come out ahead of it.

use crate::error::Result;
use crate::normalizer::Normalizer;
use crate::payload::FieldPayload;
use gqlstore_ir::{argument_values, handle_key, HandleField, HandledField, RecordSource, Variables};
use serde_json::{Map, Value as JsonValue};

impl<S: RecordSource + ?Sized> Normalizer<'_, S> {
    pub(crate) fn normalize_handle(
        &mut self,
        handle: &HandleField,
        data_id: &str,
        data: &Map<String, JsonValue>,
    ) -> Result<()> {
        match &handle.field {
            HandledField::ScalarField(field) => self.normalize_scalar(field, data_id, data)?,
            HandledField::LinkedField(field) => self.normalize_linked(field, data_id, data, None)?,
        }
        let payload = field_payload(handle, data_id, &self.variables);
        self.field_payloads.push(payload);
        Ok(())
    }
}

/// Describe one occurrence of a handled field on record `data_id`
pub(crate) fn field_payload(
    handle: &HandleField,
    data_id: &str,
    variables: &Variables,
) -> FieldPayload {
    let field_args = argument_values(handle.field.args(), variables);
    let args: Variables = match &handle.filters {
        Some(filters) => field_args
            .into_iter()
            .filter(|(name, _)| filters.contains(name))
            .collect(),
        None => field_args,
    };

    FieldPayload {
        data_id: data_id.to_string(),
        field_key: handle.field.storage_key(variables),
        handle_key: handle_key(&handle.handle, handle.key.as_deref(), handle.field.name(), &args),
        handle: handle.handle.clone(),
        args,
    }
}
