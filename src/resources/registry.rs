//
//  bitbucket-client
//  resources/registry.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/14.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Resource Type Registry
//!
//! Classifies an embedded self-link into a concrete resource type.
//!
//! The registry is an ordered table of `(pattern, kind)` entries. A
//! self-link is a sequence of link objects each bearing an `href`; only the
//! `href` of the first element is inspected. Patterns are matched by
//! substring search (not full-anchor) in registration order, so the first
//! matching entry wins; patterns ending in `$` anchor at the end of the
//! href. Adding a resource type is a one-line registration.
//!
//! Classification never fails: an href matching no entry, or a self-link
//! with no usable href at all, resolves to [`ResourceKind::Unknown`], which
//! supports raw-field access but no resource-specific fetch paths.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::resources::base::ResourceKind;

static REGISTRY: Lazy<Vec<(Regex, ResourceKind)>> = Lazy::new(|| {
    [
        (r"projects/[^/]+$", ResourceKind::Project),
        (r"projects/[^/]+/repos/[^/]+/browse$", ResourceKind::Repo),
        (
            r"projects/[^/]+/repos/[^/]+/pull-requests/[^/]+$",
            ResourceKind::PullRequest,
        ),
        (
            r"projects/[^/]+/repos/[^/]+/commits/[^/]+$",
            ResourceKind::Commit,
        ),
        (r"users/[^/]+$", ResourceKind::User),
    ]
    .into_iter()
    .map(|(pattern, kind)| (Regex::new(pattern).expect("invalid registry pattern"), kind))
    .collect()
});

/// Resolves a self-link value to a resource type.
///
/// `link` is the self-link field as delivered by the server: an array of
/// link objects with `href` fields. Only the first element is inspected.
pub(crate) fn classify(link: &Value) -> ResourceKind {
    let href = link
        .get(0)
        .and_then(|first| first.get("href"))
        .and_then(Value::as_str);

    let Some(href) = href else {
        return ResourceKind::Unknown;
    };

    for (pattern, kind) in REGISTRY.iter() {
        if pattern.is_match(href) {
            return *kind;
        }
    }
    ResourceKind::Unknown
}
