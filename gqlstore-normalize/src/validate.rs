//! Consistency checks run while records are written
//!
//! Checks only report; they never block a write. Without a sink the validator
//! does no work beyond the upsert itself.

use crate::diag::{Diagnostic, DiagnosticSink};
use gqlstore_ir::{Record, RecordSource};

pub struct ConsistencyValidator<'a> {
    sink: Option<Box<dyn DiagnosticSink + 'a>>,
}

impl<'a> ConsistencyValidator<'a> {
    /// A validator that reports nothing
    pub fn disabled() -> Self {
        Self { sink: None }
    }

    pub fn with_sink(sink: impl DiagnosticSink + 'a) -> Self {
        Self {
            sink: Some(Box::new(sink)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Create the record or update its concrete type
    ///
    /// A type differing from the stored one is reported and then overwritten.
    pub fn upsert_typename<S: RecordSource + ?Sized>(
        &mut self,
        store: &mut S,
        data_id: &str,
        typename: &str,
    ) {
        match store.get_mut(data_id) {
            Some(record) => {
                if record.typename() != typename {
                    if let Some(sink) = self.sink.as_mut() {
                        sink.report(Diagnostic::TypenameMismatch {
                            data_id: data_id.to_string(),
                            previous: record.typename().to_string(),
                            incoming: typename.to_string(),
                        });
                    }
                    record.set_typename(typename);
                }
            }
            None => store.set(Record::new(data_id, typename)),
        }
    }

    /// Report a field absent from the payload
    pub fn missing_field(&mut self, data_id: &str, field: &str) {
        if let Some(sink) = self.sink.as_mut() {
            sink.report(Diagnostic::MissingField {
                data_id: data_id.to_string(),
                field: field.to_string(),
            });
        }
    }
}
