//! Shared fixtures: selection trees are written the way the compiler emits them.

#![allow(dead_code)]

use gqlstore_ir::{Selection, SelectionSet, Variables, ROOT_ID};
use gqlstore_normalize::NormalizationSelector;
use serde_json::{json, Value};

pub fn selections(value: Value) -> SelectionSet {
    let selections: Vec<Selection> =
        serde_json::from_value(value).expect("selection tree should deserialize");
    selections.into()
}

pub fn vars(value: Value) -> Variables {
    value.as_object().cloned().expect("variables must be an object")
}

pub fn root_selector(node: Value, variables: Value) -> NormalizationSelector {
    NormalizationSelector::new(ROOT_ID, selections(node), vars(variables))
}

pub fn path(segments: &[&str]) -> Vec<String> {
    segments.iter().map(|s| s.to_string()).collect()
}

/// `node(id: "1") { id __typename ... on User { friends(first: 3) { edges { cursor node { id firstName } } } } }`
pub fn friends_query() -> Value {
    json!([{
        "kind": "LinkedField",
        "name": "node",
        "args": [{"kind": "Literal", "name": "id", "value": "1"}],
        "selections": [
            {"kind": "ScalarField", "name": "id"},
            {"kind": "ScalarField", "name": "__typename"},
            {
                "kind": "InlineFragment",
                "type": "User",
                "selections": [{
                    "kind": "LinkedField",
                    "name": "friends",
                    "args": [{"kind": "Literal", "name": "first", "value": 3}],
                    "concreteType": "FriendsConnection",
                    "selections": [{
                        "kind": "LinkedField",
                        "name": "edges",
                        "plural": true,
                        "concreteType": "FriendsEdge",
                        "selections": [
                            {"kind": "ScalarField", "name": "cursor"},
                            {
                                "kind": "LinkedField",
                                "name": "node",
                                "concreteType": "User",
                                "selections": [
                                    {"kind": "ScalarField", "name": "id"},
                                    {"kind": "ScalarField", "name": "firstName"}
                                ]
                            }
                        ]
                    }]
                }]
            }
        ]
    }])
}

pub fn friends_payload() -> Value {
    json!({
        "node": {
            "id": "1",
            "__typename": "User",
            "friends": {
                "edges": [
                    {"cursor": "cursor:2", "node": {"id": "2", "firstName": "Alice"}},
                    null,
                    {"cursor": "cursor:3", "node": {"id": "3", "firstName": "Bob"}}
                ]
            }
        }
    })
}
