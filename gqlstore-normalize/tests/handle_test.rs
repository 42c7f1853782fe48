//! Handle-decorated fields

mod support;

use gqlstore_ir::{InMemoryRecordSource, RecordSource};
use gqlstore_normalize::{normalize, FieldPayload, NormalizerConfig};
use pretty_assertions::assert_eq;
use serde_json::json;
use support::{root_selector, vars};

fn best_friends_query() -> serde_json::Value {
    json!([{
        "kind": "LinkedField",
        "name": "me",
        "concreteType": "User",
        "selections": [
            {"kind": "ScalarField", "name": "id"},
            {
                "kind": "Handle",
                "handle": "bestFriends",
                "field": {
                    "kind": "LinkedField",
                    "name": "friends",
                    "plural": true,
                    "concreteType": "User",
                    "selections": [
                        {"kind": "ScalarField", "name": "id"},
                        {
                            "kind": "Handle",
                            "handle": "friendsName",
                            "field": {"kind": "ScalarField", "name": "name"}
                        }
                    ]
                }
            }
        ]
    }])
}

#[test]
fn test_child_handles_precede_parent() {
    let mut store = InMemoryRecordSource::with_root();
    let selector = root_selector(best_friends_query(), json!({}));
    let payload = json!({"me": {"id": "1", "friends": [{"id": "2", "name": "Alice"}]}});

    let result = normalize(&mut store, &selector, &payload, NormalizerConfig::default()).unwrap();

    assert_eq!(
        result.field_payloads,
        vec![
            FieldPayload {
                data_id: "2".to_string(),
                field_key: "name".to_string(),
                args: vars(json!({})),
                handle: "friendsName".to_string(),
                handle_key: "__name_friendsName".to_string(),
            },
            FieldPayload {
                data_id: "1".to_string(),
                field_key: "friends".to_string(),
                args: vars(json!({})),
                handle: "bestFriends".to_string(),
                handle_key: "__friends_bestFriends".to_string(),
            },
        ]
    );

    // The underlying fields are written as usual
    assert_eq!(store.get("2").unwrap().value("name"), Some(&json!("Alice")));
    assert_eq!(
        serde_json::to_value(store.get("1").unwrap()).unwrap()["friends"],
        json!({"__refs": ["2"]})
    );
}

#[test]
fn test_one_payload_per_record_visited() {
    let mut store = InMemoryRecordSource::with_root();
    let selector = root_selector(best_friends_query(), json!({}));
    let payload = json!({
        "me": {
            "id": "1",
            "friends": [{"id": "2", "name": "Alice"}, null, {"id": "3", "name": "Bob"}]
        }
    });

    let result = normalize(&mut store, &selector, &payload, NormalizerConfig::default()).unwrap();

    let owners: Vec<(&str, &str)> = result
        .field_payloads
        .iter()
        .map(|p| (p.data_id.as_str(), p.handle.as_str()))
        .collect();
    assert_eq!(
        owners,
        vec![("2", "friendsName"), ("3", "friendsName"), ("1", "bestFriends")]
    );
}

#[test]
fn test_connection_handle_with_filters() {
    let mut store = InMemoryRecordSource::with_root();
    let selector = root_selector(
        json!([{
            "kind": "LinkedField",
            "name": "node",
            "args": [{"kind": "Literal", "name": "id", "value": "4"}],
            "selections": [{
                "kind": "Handle",
                "handle": "connection",
                "key": "UserFriends_friends",
                "filters": ["orderby"],
                "field": {
                    "kind": "LinkedField",
                    "name": "friends",
                    "args": [
                        {"kind": "Variable", "name": "first", "variableName": "count"},
                        {"kind": "Variable", "name": "orderby", "variableName": "order"}
                    ],
                    "concreteType": "FriendsConnection",
                    "selections": [{"kind": "ScalarField", "name": "count"}]
                }
            }]
        }]),
        json!({"count": 10, "order": ["name"]}),
    );
    let payload = json!({"node": {"__typename": "User", "id": "4", "friends": {"count": 2}}});

    let result = normalize(&mut store, &selector, &payload, NormalizerConfig::default()).unwrap();

    assert_eq!(
        result.field_payloads,
        vec![FieldPayload {
            data_id: "4".to_string(),
            field_key: r#"friends(first:10,orderby:["name"])"#.to_string(),
            args: vars(json!({"orderby": ["name"]})),
            handle: "connection".to_string(),
            handle_key: r#"__UserFriends_friends_connection(orderby:["name"])"#.to_string(),
        }]
    );
    assert_eq!(
        store
            .get(r#"client:4:friends(first:10,orderby:["name"])"#)
            .unwrap()
            .value("count"),
        Some(&json!(2))
    );
}
