//! Data-quality diagnostics
//!
//! Diagnostics never abort normalization and never change its output. They are
//! handed to a [`DiagnosticSink`], which is only installed in development
//! builds by [`crate::normalize`].

use serde::Serialize;
use std::fmt;

/// A recoverable data-quality warning.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "code")]
pub enum Diagnostic {
    /// The same id was written with two different concrete types
    #[serde(rename = "W001", rename_all = "camelCase")]
    TypenameMismatch {
        data_id: String,
        previous: String,
        incoming: String,
    },

    /// A field expected on a concrete type was absent from the payload
    #[serde(rename = "W002", rename_all = "camelCase")]
    MissingField { data_id: String, field: String },
}

impl Diagnostic {
    /// Stable code for programmatic handling
    pub fn code(&self) -> &'static str {
        match self {
            Diagnostic::TypenameMismatch { .. } => "W001",
            Diagnostic::MissingField { .. } => "W002",
        }
    }

    /// Id of the record the diagnostic is about
    pub fn data_id(&self) -> &str {
        match self {
            Diagnostic::TypenameMismatch { data_id, .. }
            | Diagnostic::MissingField { data_id, .. } => data_id,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::TypenameMismatch {
                data_id,
                previous,
                incoming,
            } => write!(
                f,
                "Expected id '{}' to consistently have type '{}' but got '{}'; ids must be globally unique",
                data_id, previous, incoming
            ),
            Diagnostic::MissingField { data_id, field } => write!(
                f,
                "Expected the payload for record '{}' to have field '{}'",
                data_id, field
            ),
        }
    }
}

/// Receiver of diagnostics.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl<T: DiagnosticSink + ?Sized> DiagnosticSink for &mut T {
    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic);
    }
}

/// Sink that logs each diagnostic as a `tracing` warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(
            code = diagnostic.code(),
            data_id = diagnostic.data_id(),
            "{}",
            diagnostic
        );
    }
}

/// Sink that keeps diagnostics in memory, in report order.
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    diagnostics: Vec<Diagnostic>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}
