//! Storage keys and client ids
//!
//! A field's storage key is its name, followed by its defined arguments in
//! parentheses when it has any: `name(arg1:<json>,arg2:<json>)`. Arguments are
//! sorted by name and values are rendered canonically, so the same field with
//! the same argument values always lands on the same key.

use crate::canonical::{compare_keys, to_canonical_string};
use crate::record::DataId;
use crate::selection::{Argument, Variables};

/// Prefix marking ids synthesized by the store
pub const CLIENT_ID_PREFIX: &str = "client:";

/// Resolve field arguments against variable bindings
///
/// Arguments bound to an unset variable are dropped.
pub fn argument_values(args: &[Argument], variables: &Variables) -> Variables {
    args.iter()
        .filter_map(|arg| arg.resolve(variables).map(|v| (arg.name().to_string(), v)))
        .collect()
}

/// Format a storage key from a field name and resolved argument values
pub fn format_storage_key(name: &str, args: &Variables) -> String {
    if args.is_empty() {
        return name.to_string();
    }

    let mut pairs: Vec<_> = args.iter().collect();
    pairs.sort_by(|a, b| compare_keys(a.0, b.0));

    let rendered: Vec<String> = pairs
        .into_iter()
        .map(|(k, v)| format!("{}:{}", k, to_canonical_string(v)))
        .collect();
    format!("{}({})", name, rendered.join(","))
}

/// Storage key of a field given its declared arguments
pub fn storage_key(name: &str, args: &[Argument], variables: &Variables) -> String {
    format_storage_key(name, &argument_values(args, variables))
}

/// Key under which a handler stores its processed value
///
/// `__<key or field name>_<handle>`, with the filtered arguments appended the
/// same way a storage key renders them.
pub fn handle_key(handle: &str, key: Option<&str>, field_name: &str, args: &Variables) -> String {
    let base = format!("__{}_{}", key.unwrap_or(field_name), handle);
    format_storage_key(&base, args)
}

/// Derive the client id of a record reached from `parent_id` without a global id
///
/// `index` is the element position for plural fields. The `client:` prefix is
/// added only once, so ids nested under other client ids stay readable.
pub fn client_id(parent_id: &str, storage_key: &str, index: Option<usize>) -> DataId {
    let mut id = format!("{}:{}", parent_id, storage_key);
    if let Some(index) = index {
        id.push(':');
        id.push_str(&index.to_string());
    }
    if id.starts_with(CLIENT_ID_PREFIX) {
        id
    } else {
        format!("{}{}", CLIENT_ID_PREFIX, id)
    }
}

/// Whether an id was synthesized by the store rather than sent by the server
pub fn is_client_id(id: &str) -> bool {
    id.starts_with(CLIENT_ID_PREFIX)
}
