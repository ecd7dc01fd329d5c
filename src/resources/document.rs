//
//  bitbucket-client
//  resources/document.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/14.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Materialized Documents
//!
//! This module provides the two value types the materialization engine
//! produces: [`Document`], an insertion-ordered field container standing in
//! for anonymous nested objects, and [`Materialized`], the tagged value
//! attached under each field name.
//!
//! A materialized field is exactly one of:
//!
//! - a **promoted typed sub-resource** (the nested object carried a
//!   recognizable self-link),
//! - a **promoted untyped sub-document** (nested object, no self-link),
//! - a **list** of independently promoted elements, source order preserved,
//! - a **scalar**, unchanged from the raw document.

use serde_json::Value;

use crate::resources::base::Resource;

/// A value produced by the materialization engine.
///
/// # Example
///
/// ```rust,ignore
/// match pr.get_field("author")? {
///     Materialized::Resource(user) => println!("{}", user.kind()),
///     Materialized::Document(doc) => println!("{} fields", doc.len()),
///     Materialized::List(items) => println!("{} items", items.len()),
///     Materialized::Scalar(value) => println!("{}", value),
/// }
/// ```
#[derive(Debug, Clone)]
pub enum Materialized {
    /// A nested object promoted to a typed resource via its self-link.
    Resource(Box<Resource>),
    /// A nested object promoted to an untyped document.
    Document(Document),
    /// A sequence, each element promoted independently.
    List(Vec<Materialized>),
    /// A scalar value, unchanged.
    Scalar(Value),
}

impl Materialized {
    /// The promoted resource, if this is a typed sub-resource.
    pub fn as_resource(&self) -> Option<&Resource> {
        match self {
            Self::Resource(resource) => Some(resource),
            _ => None,
        }
    }

    /// The promoted document, if this is an untyped sub-document.
    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Self::Document(document) => Some(document),
            _ => None,
        }
    }

    /// The elements, if this is a list.
    pub fn as_list(&self) -> Option<&[Materialized]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// The raw value, if this is a scalar.
    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            Self::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// The string content, if this is a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(Value::as_str)
    }

    /// The integer content, if this is a numeric scalar.
    pub fn as_u64(&self) -> Option<u64> {
        self.as_scalar().and_then(Value::as_u64)
    }

    /// The boolean content, if this is a boolean scalar.
    pub fn as_bool(&self) -> Option<bool> {
        self.as_scalar().and_then(Value::as_bool)
    }

    /// Looks up a named field on a promoted resource or document.
    ///
    /// Returns `None` for lists and scalars, which have no named fields.
    pub fn get(&self, name: &str) -> Option<&Materialized> {
        match self {
            Self::Resource(resource) => resource.fields().get(name),
            Self::Document(document) => document.get(name),
            _ => None,
        }
    }
}

/// An insertion-ordered field container for anonymous nested objects.
///
/// Used as the materialization target both for resource field sets and for
/// nested objects that are not themselves resource-linked. Field order
/// follows the source document.
#[derive(Debug, Clone, Default)]
pub struct Document {
    fields: Vec<(String, Materialized)>,
}

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a field by name.
    pub fn get(&self, name: &str) -> Option<&Materialized> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Whether a field with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the document has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates fields in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Materialized)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub(crate) fn insert(&mut self, name: String, value: Materialized) {
        self.fields.push((name, value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_preserves_insertion_order() {
        let mut document = Document::new();
        document.insert("zeta".to_string(), Materialized::Scalar(json!(1)));
        document.insert("alpha".to_string(), Materialized::Scalar(json!(2)));

        let keys: Vec<&str> = document.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_scalar_accessors() {
        let value = Materialized::Scalar(json!("OPEN"));
        assert_eq!(value.as_str(), Some("OPEN"));
        assert_eq!(value.as_u64(), None);
        assert!(value.as_document().is_none());
    }

    #[test]
    fn test_get_on_scalar_is_none() {
        let value = Materialized::Scalar(json!(42));
        assert!(value.get("anything").is_none());
    }
}
