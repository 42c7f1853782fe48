//! Compiled selection tree
//!
//! The tree arrives pre-compiled (fragment spreads already inlined) and is
//! deserialized from the compiler's JSON artifacts. Every node kind is one
//! variant of [`Selection`], tagged by `"kind"`.

use crate::storage_key::{argument_values, format_storage_key};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Variable bindings for one operation
pub type Variables = Map<String, JsonValue>;

/// Shared list of selections
///
/// Defer and stream placeholders hand these out as continuation nodes, so they
/// are reference counted instead of cloned per placeholder.
pub type SelectionSet = Arc<[Selection]>;

/// Storage-key argument naming the modules a match field supports
pub const SUPPORTED_ARG: &str = "supported";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Selection {
    ScalarField(ScalarField),
    LinkedField(LinkedField),
    InlineFragment(InlineFragment),
    Handle(HandleField),
    Match(MatchField),
    Defer(Defer),
    Stream(Stream),
}

/// A field argument, either a literal or a reference to an operation variable
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Argument {
    Literal {
        name: String,
        value: JsonValue,
    },
    Variable {
        name: String,
        #[serde(rename = "variableName")]
        variable_name: String,
    },
}

impl Argument {
    pub fn name(&self) -> &str {
        match self {
            Argument::Literal { name, .. } | Argument::Variable { name, .. } => name,
        }
    }

    /// Resolve the argument's value
    ///
    /// Returns `None` for a variable with no binding; such arguments are left
    /// out of storage keys entirely.
    pub fn resolve(&self, variables: &Variables) -> Option<JsonValue> {
        match self {
            Argument::Literal { value, .. } => Some(value.clone()),
            Argument::Variable { variable_name, .. } => variables.get(variable_name).cloned(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalarField {
    pub name: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub args: Vec<Argument>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedField {
    pub name: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub args: Vec<Argument>,
    #[serde(default)]
    pub plural: bool,
    /// Concrete type of the field's values; `None` when the field's type is abstract
    #[serde(default)]
    pub concrete_type: Option<String>,
    pub selections: SelectionSet,
}

/// Inline fragment with a type condition
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineFragment {
    #[serde(rename = "type")]
    pub type_name: String,
    /// Concrete types known to satisfy an abstract condition
    ///
    /// Present only for interface or union conditions.
    #[serde(default)]
    pub possible_types: Option<Vec<String>>,
    pub selections: Vec<Selection>,
}

impl InlineFragment {
    pub fn is_abstract(&self) -> bool {
        self.possible_types.is_some()
    }

    /// Whether a record of `typename` satisfies this fragment's condition
    pub fn admits(&self, typename: &str) -> bool {
        match &self.possible_types {
            Some(types) => types.iter().any(|t| t == typename),
            None => self.type_name == typename,
        }
    }
}

/// A field decorated with a handle for post-normalization processing
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandleField {
    pub handle: String,
    #[serde(default)]
    pub key: Option<String>,
    /// Names of the field arguments passed on to the handler
    #[serde(default)]
    pub filters: Option<Vec<String>>,
    pub field: HandledField,
}

/// The field underneath a handle decoration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum HandledField {
    ScalarField(ScalarField),
    LinkedField(LinkedField),
}

impl HandledField {
    pub fn name(&self) -> &str {
        match self {
            HandledField::ScalarField(f) => &f.name,
            HandledField::LinkedField(f) => &f.name,
        }
    }

    pub fn args(&self) -> &[Argument] {
        match self {
            HandledField::ScalarField(f) => &f.args,
            HandledField::LinkedField(f) => &f.args,
        }
    }
}

/// Polymorphic field resolved to one of several statically known modules
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchField {
    pub name: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub args: Vec<Argument>,
    /// Concrete type name -> module resolved for it
    pub candidates: BTreeMap<String, MatchCandidate>,
}

impl MatchField {
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    /// Storage key covering every candidate
    ///
    /// The candidate mapping is folded into the key as a `supported` argument,
    /// so the key does not depend on which candidate a payload resolves to. A
    /// field argument of the same name would be shadowed; the normalizer
    /// rejects such fields.
    pub fn storage_key(&self, variables: &Variables) -> String {
        let mut args = argument_values(&self.args, variables);
        let supported: Map<String, JsonValue> = self
            .candidates
            .iter()
            .map(|(type_name, candidate)| {
                (type_name.clone(), JsonValue::String(candidate.module.clone()))
            })
            .collect();
        args.insert(SUPPORTED_ARG.to_string(), JsonValue::Object(supported));
        format_storage_key(&self.name, &args)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchCandidate {
    /// Component module rendering this variant
    pub module: String,
    /// Reference to the compiled normalization tree for this variant
    pub operation: String,
}

/// `if` argument of `@defer` / `@stream`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IfCondition {
    Literal(bool),
    Variable(String),
}

impl Default for IfCondition {
    fn default() -> Self {
        IfCondition::Literal(true)
    }
}

impl IfCondition {
    /// Evaluate against the current bindings
    ///
    /// An unbound variable takes the directive's default of `true`.
    pub fn evaluate(&self, variables: &Variables) -> bool {
        match self {
            IfCondition::Literal(value) => *value,
            IfCondition::Variable(name) => variables
                .get(name)
                .and_then(JsonValue::as_bool)
                .unwrap_or(true),
        }
    }
}

/// Deferred fragment spread
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Defer {
    pub label: String,
    #[serde(rename = "if", default)]
    pub if_cond: IfCondition,
    pub selections: SelectionSet,
}

/// Streamed plural linked field
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stream {
    pub label: String,
    #[serde(rename = "if", default)]
    pub if_cond: IfCondition,
    pub field: LinkedField,
}

macro_rules! field_keys {
    ($($ty:ty),*) => {
        $(
            impl $ty {
                /// Key of this field in the response payload
                pub fn response_key(&self) -> &str {
                    self.alias.as_deref().unwrap_or(&self.name)
                }

                /// Key of this field inside its parent record
                pub fn storage_key(&self, variables: &Variables) -> String {
                    format_storage_key(&self.name, &argument_values(&self.args, variables))
                }
            }
        )*
    };
}

field_keys!(ScalarField, LinkedField);

impl HandledField {
    pub fn response_key(&self) -> &str {
        match self {
            HandledField::ScalarField(f) => f.response_key(),
            HandledField::LinkedField(f) => f.response_key(),
        }
    }

    pub fn storage_key(&self, variables: &Variables) -> String {
        match self {
            HandledField::ScalarField(f) => f.storage_key(variables),
            HandledField::LinkedField(f) => f.storage_key(variables),
        }
    }
}
