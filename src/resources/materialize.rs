//
//  bitbucket-client
//  resources/materialize.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/14.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Materialization Engine
//!
//! The recursive transformer from raw JSON documents to the materialized
//! object graph. Applied per field of the source document:
//!
//! 1. A nested mapping carrying a recognizable self-link is classified via
//!    the [registry](crate::resources::registry) and promoted to a fully
//!    populated typed [`Resource`], itself materialized recursively.
//! 2. Any other nested mapping is promoted to an untyped [`Document`].
//! 3. A sequence is promoted element-wise under the same rules, preserving
//!    source order.
//! 4. A scalar is attached unchanged.
//!
//! Two self-link shapes exist in the wild, a top-level `self` key and a
//! nested `links.self` key; which ones are honored is governed by the
//! configured [`SelfLinkRule`](crate::config::SelfLinkRule).
//!
//! Materialization is a pure transform of one already-retrieved document:
//! promoted resources are built directly from their nested mappings and no
//! network call is ever issued. The input is a JSON tree, so the recursion
//! terminates with its finite nesting depth and needs no cycle detection.

use serde_json::{Map, Value};

use crate::config::SelfLinkRule;
use crate::resources::base::Resource;
use crate::resources::document::{Document, Materialized};
use crate::resources::registry::classify;
use crate::session::Session;

/// Materializes a raw JSON object into an ordered field document.
///
/// Every key of `raw` is attached: nested structures as promoted values,
/// scalars unchanged.
pub(crate) fn materialize(raw: &Map<String, Value>, session: &Session) -> Document {
    let mut document = Document::new();
    for (key, value) in raw {
        document.insert(key.clone(), materialize_value(value, session));
    }
    document
}

fn materialize_value(value: &Value, session: &Session) -> Materialized {
    match value {
        Value::Object(map) => match self_link(map, session.options().self_link_rule) {
            Some(link) => {
                let kind = classify(link);
                Materialized::Resource(Box::new(Resource::from_nested(kind, session, map)))
            }
            None => Materialized::Document(materialize(map, session)),
        },
        Value::Array(items) => Materialized::List(
            items
                .iter()
                .map(|item| materialize_value(item, session))
                .collect(),
        ),
        scalar => Materialized::Scalar(scalar.clone()),
    }
}

/// Finds the self-link of a mapping under the configured detection rule.
fn self_link(map: &Map<String, Value>, rule: SelfLinkRule) -> Option<&Value> {
    let flat = || map.get("self");
    let nested = || map.get("links").and_then(|links| links.get("self"));
    match rule {
        SelfLinkRule::Flat => flat(),
        SelfLinkRule::Nested => nested(),
        SelfLinkRule::Both => flat().or_else(nested),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Options, SelfLinkRule};
    use crate::resources::base::ResourceKind;
    use serde_json::json;

    fn session_with_rule(rule: SelfLinkRule) -> Session {
        let mut options = Options::new("http://localhost:7990");
        options.self_link_rule = rule;
        Session::new(options).unwrap()
    }

    fn test_session() -> Session {
        session_with_rule(SelfLinkRule::Both)
    }

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn test_registered_self_link_promotes_typed_resource() {
        let raw = as_map(json!({
            "project": {
                "key": "PROJ",
                "name": "widgets",
                "self": [{"href": "https://bitbucket.example.com/projects/PROJ"}]
            }
        }));

        let document = materialize(&raw, &test_session());
        let project = document
            .get("project")
            .and_then(Materialized::as_resource)
            .expect("project was not promoted");

        assert_eq!(project.kind(), ResourceKind::Project);
        // Fully populated from the nested mapping, no fetch performed.
        assert_eq!(project.get_field("name").unwrap().as_str(), Some("widgets"));
        assert!(project.raw().is_some());
    }

    #[test]
    fn test_unregistered_self_link_promotes_fallback_resource() {
        let raw = as_map(json!({
            "widget": {
                "color": "green",
                "self": [{"href": "https://bitbucket.example.com/widgets/9"}]
            }
        }));

        let document = materialize(&raw, &test_session());
        let widget = document
            .get("widget")
            .and_then(Materialized::as_resource)
            .expect("widget was not promoted");

        assert_eq!(widget.kind(), ResourceKind::Unknown);
        // Raw-field access still succeeds on the fallback type.
        assert_eq!(widget.get_field("color").unwrap().as_str(), Some("green"));
    }

    #[test]
    fn test_plain_mapping_promotes_untyped_document() {
        let raw = as_map(json!({
            "properties": {"mergeResult": {"outcome": "CLEAN"}}
        }));

        let document = materialize(&raw, &test_session());
        let properties = document
            .get("properties")
            .and_then(Materialized::as_document)
            .expect("properties was not promoted to a document");

        assert_eq!(
            properties
                .get("mergeResult")
                .and_then(|v| v.get("outcome"))
                .and_then(Materialized::as_str),
            Some("CLEAN")
        );
    }

    #[test]
    fn test_sequence_preserves_order_and_promotes_elementwise() {
        let raw = as_map(json!({
            "mixed": [
                "plain",
                {"anonymous": true},
                {
                    "slug": "widget",
                    "self": [{"href": "https://bitbucket.example.com/projects/PROJ/repos/widget/browse"}]
                }
            ]
        }));

        let document = materialize(&raw, &test_session());
        let items = document
            .get("mixed")
            .and_then(Materialized::as_list)
            .expect("mixed was not a list");

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].as_str(), Some("plain"));
        assert!(items[1].as_document().is_some());
        let repo = items[2].as_resource().expect("third element not promoted");
        assert_eq!(repo.kind(), ResourceKind::Repo);
    }

    #[test]
    fn test_nested_links_self_shape_detected() {
        let raw = as_map(json!({
            "repository": {
                "slug": "widget",
                "links": {
                    "self": [{"href": "https://bitbucket.example.com/projects/PROJ/repos/widget/browse"}]
                }
            }
        }));

        let document = materialize(&raw, &test_session());
        let repo = document
            .get("repository")
            .and_then(Materialized::as_resource)
            .expect("repository was not promoted via links.self");
        assert_eq!(repo.kind(), ResourceKind::Repo);
    }

    #[test]
    fn test_flat_rule_ignores_nested_shape() {
        let raw = as_map(json!({
            "repository": {
                "slug": "widget",
                "links": {
                    "self": [{"href": "https://bitbucket.example.com/projects/PROJ/repos/widget/browse"}]
                }
            }
        }));

        let session = session_with_rule(SelfLinkRule::Flat);
        let document = materialize(&raw, &session);
        assert!(document
            .get("repository")
            .and_then(Materialized::as_document)
            .is_some());
    }

    #[test]
    fn test_nested_rule_ignores_flat_shape() {
        let raw = as_map(json!({
            "project": {
                "key": "PROJ",
                "self": [{"href": "https://bitbucket.example.com/projects/PROJ"}]
            }
        }));

        let session = session_with_rule(SelfLinkRule::Nested);
        let document = materialize(&raw, &session);
        assert!(document
            .get("project")
            .and_then(Materialized::as_document)
            .is_some());
    }

    #[test]
    fn test_scalars_attach_unchanged() {
        let raw = as_map(json!({"state": "OPEN", "id": 7, "locked": false, "note": null}));

        let document = materialize(&raw, &test_session());
        assert_eq!(document.get("state").and_then(Materialized::as_str), Some("OPEN"));
        assert_eq!(document.get("id").and_then(Materialized::as_u64), Some(7));
        assert_eq!(document.get("locked").and_then(Materialized::as_bool), Some(false));
        assert_eq!(
            document.get("note").and_then(Materialized::as_scalar),
            Some(&Value::Null)
        );
    }
}
