//! Normalizer configuration.

use serde::{Deserialize, Serialize};

/// Options recognized by the normalizer.
///
/// Loadable from JSON with camelCase keys; absent keys take their defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NormalizerConfig {
    /// Write `null` for fields absent from the payload instead of leaving them unwritten.
    pub treat_missing_fields_as_null: bool,
}

impl NormalizerConfig {
    pub fn treat_missing_fields_as_null() -> Self {
        Self {
            treat_missing_fields_as_null: true,
        }
    }
}
