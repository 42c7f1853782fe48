//! Match fields resolved to one module per concrete type

mod support;

use gqlstore_ir::{InMemoryRecordSource, RecordSource, ROOT_ID};
use gqlstore_normalize::{normalize, MatchPayload, NormalizeError, Normalizer, NormalizerConfig};
use pretty_assertions::assert_eq;
use serde_json::json;
use support::{path, root_selector, vars};

const NAME_RENDERER_KEY: &str = r#"nameRenderer(supported:{"MarkdownUserNameRenderer":"MarkdownUserNameRenderer.react","PlainUserNameRenderer":"PlainUserNameRenderer.react"})"#;

fn name_renderer_query() -> serde_json::Value {
    json!([{
        "kind": "LinkedField",
        "name": "node",
        "args": [{"kind": "Literal", "name": "id", "value": "1"}],
        "selections": [
            {"kind": "ScalarField", "name": "id"},
            {
                "kind": "Match",
                "name": "nameRenderer",
                "candidates": {
                    "PlainUserNameRenderer": {
                        "module": "PlainUserNameRenderer.react",
                        "operation": "PlainUserNameRenderer_name$normalization.graphql"
                    },
                    "MarkdownUserNameRenderer": {
                        "module": "MarkdownUserNameRenderer.react",
                        "operation": "MarkdownUserNameRenderer_name$normalization.graphql"
                    }
                }
            }
        ]
    }])
}

#[test]
fn test_resolved_candidate_emits_payload() {
    let mut store = InMemoryRecordSource::with_root();
    let selector = root_selector(name_renderer_query(), json!({"scale": 2}));
    let renderer = json!({
        "__typename": "MarkdownUserNameRenderer",
        "markdown": "**Alice**",
        "data": {"markup": "<b>Alice</b>"}
    });
    let payload = json!({"node": {"__typename": "User", "id": "1", "nameRenderer": renderer}});

    let result = normalize(&mut store, &selector, &payload, NormalizerConfig::default()).unwrap();

    let wrapper_id = format!("client:1:{}", NAME_RENDERER_KEY);
    assert_eq!(
        store.get("1").unwrap().linked_id(NAME_RENDERER_KEY),
        Some(Some(wrapper_id.as_str()))
    );

    // The candidate's own fields wait for the module loader
    let wrapper = store.get(&wrapper_id).unwrap();
    assert_eq!(wrapper.typename(), "MarkdownUserNameRenderer");
    assert_eq!(wrapper.fields().count(), 0);

    assert_eq!(
        result.match_payloads,
        vec![MatchPayload {
            data_id: wrapper_id.clone(),
            type_name: "MarkdownUserNameRenderer".to_string(),
            data: renderer,
            operation_reference: "MarkdownUserNameRenderer_name$normalization.graphql".to_string(),
            variables: vars(json!({"scale": 2})),
            path: path(&["node", "nameRenderer"]),
        }]
    );
}

#[test]
fn test_unknown_typename_writes_null() {
    let mut store = InMemoryRecordSource::with_root();
    let selector = root_selector(name_renderer_query(), json!({}));
    let payload = json!({
        "node": {
            "__typename": "User",
            "id": "1",
            "nameRenderer": {"__typename": "CustomNameRenderer", "customField": true}
        }
    });

    let result = normalize(&mut store, &selector, &payload, NormalizerConfig::default()).unwrap();

    assert!(result.match_payloads.is_empty());
    assert_eq!(store.get("1").unwrap().linked_id(NAME_RENDERER_KEY), Some(None));
    assert_eq!(store.len(), 2);
}

#[test]
fn test_untyped_match_writes_null() {
    let mut store = InMemoryRecordSource::with_root();
    let selector = root_selector(name_renderer_query(), json!({}));
    let payload = json!({
        "node": {"__typename": "User", "id": "1", "nameRenderer": {"plain": "Alice"}}
    });

    let result = normalize(&mut store, &selector, &payload, NormalizerConfig::default()).unwrap();

    assert!(result.match_payloads.is_empty());
    assert_eq!(store.get("1").unwrap().linked_id(NAME_RENDERER_KEY), Some(None));
    assert_eq!(store.len(), 2);
}

#[test]
fn test_match_argument_named_supported_is_rejected() {
    let mut store = InMemoryRecordSource::with_root();
    let query = json!([{
        "kind": "Match",
        "name": "renderer",
        "args": [{"kind": "Literal", "name": "supported", "value": "Plain"}],
        "candidates": {
            "Plain": {"module": "Plain.react", "operation": "Plain$normalization.graphql"}
        }
    }]);
    let selector = root_selector(query, json!({}));
    let payload = json!({"renderer": {"__typename": "Plain"}});

    let err = normalize(&mut store, &selector, &payload, NormalizerConfig::default()).unwrap_err();

    assert!(matches!(err, NormalizeError::InvalidSelection { .. }));
    assert_eq!(store.get(ROOT_ID).unwrap().fields().count(), 0);
}

#[test]
fn test_null_match_writes_null() {
    let mut store = InMemoryRecordSource::with_root();
    let selector = root_selector(name_renderer_query(), json!({}));
    let payload = json!({"node": {"__typename": "User", "id": "1", "nameRenderer": null}});

    let result = normalize(&mut store, &selector, &payload, NormalizerConfig::default()).unwrap();

    assert!(result.match_payloads.is_empty());
    assert_eq!(store.get("1").unwrap().linked_id(NAME_RENDERER_KEY), Some(None));
}

#[test]
fn test_match_path_is_prefixed_with_parent_path() {
    let mut store = InMemoryRecordSource::with_root();
    let selector = root_selector(name_renderer_query(), json!({}));
    let payload = json!({
        "node": {
            "__typename": "User",
            "id": "1",
            "nameRenderer": {"__typename": "PlainUserNameRenderer", "plaintext": "Alice"}
        }
    });

    let result = Normalizer::new(&mut store, NormalizerConfig::default())
        .with_parent_path(path(&["viewer", "actor"]))
        .normalize(&selector, &payload)
        .unwrap();

    assert_eq!(result.match_payloads.len(), 1);
    assert_eq!(
        result.match_payloads[0].path,
        path(&["viewer", "actor", "node", "nameRenderer"])
    );
    assert_eq!(
        result.match_payloads[0].operation_reference,
        "PlainUserNameRenderer_name$normalization.graphql"
    );
}
