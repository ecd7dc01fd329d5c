//
//  bitbucket-client
//  resources/base.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/14.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Resource Base Contract
//!
//! This module defines how any typed resource fetches itself from a path
//! template, parses a raw JSON body and exposes its fields.
//!
//! ## Lifecycle
//!
//! A [`Resource`] is created empty, populated exactly once by a successful
//! load (fetch + parse), and is thereafter immutable. Nested promotion only
//! happens during that initial parse, never on repeated access. A raw
//! document is never re-validated after parsing: a document lacking
//! expected fields simply yields [`Error::MissingField`] at use time.
//!
//! ## Field Resolution
//!
//! [`Resource::get_field`] is the single lookup capability. Values promoted
//! by the materialization engine take precedence; scalars the engine left
//! unpromoted are attached unchanged from the raw document, so lookup falls
//! through to them in the same map. A name matching neither fails with a
//! typed error naming the resource kind and the field.

use std::fmt;

use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::resources::document::{Document, Materialized};
use crate::resources::materialize::materialize;
use crate::session::Session;

/// The closed set of resource types the client understands.
///
/// Every materialized node carries one of these tags. `Unknown` is the
/// guaranteed classification fallback: it supports raw-field access but
/// its path template is an innocuous placeholder never intended to be
/// fetched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// A project, the container grouping repositories.
    Project,
    /// A repository within a project.
    Repo,
    /// A pull request within a repository.
    PullRequest,
    /// A commit within a repository.
    Commit,
    /// A user account.
    User,
    /// Fallback for self-links matching no registered pattern.
    Unknown,
}

impl ResourceKind {
    /// The path template for this resource type, with positional `{}`
    /// placeholders for ids.
    pub fn template(&self) -> &'static str {
        match self {
            Self::Project => "projects/{}",
            Self::Repo => "projects/{}/repos/{}",
            Self::PullRequest => "projects/{}/repos/{}/pull-requests/{}",
            Self::Commit => "projects/{}/repos/{}/commits/{}",
            Self::User => "users/{}",
            Self::Unknown => "unknown/{}",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Project => "Project",
            Self::Repo => "Repo",
            Self::PullRequest => "PullRequest",
            Self::Commit => "Commit",
            Self::User => "User",
            Self::Unknown => "UnknownResource",
        };
        f.write_str(name)
    }
}

/// A materialized node of the resource graph.
///
/// Owns its raw document and the promoted field set built from it. A
/// resource has no identity beyond its raw document: two resources built
/// from structurally identical documents are semantically equal without
/// being the same allocation.
///
/// Each resource carries its own session handle so typed operations on the
/// graph can issue further requests; building the graph itself never does.
#[derive(Debug, Clone)]
pub struct Resource {
    kind: ResourceKind,
    template: String,
    session: Session,
    raw: Option<Value>,
    fields: Document,
}

impl Resource {
    /// Creates an empty, not-yet-loaded resource of the given kind.
    pub(crate) fn new(kind: ResourceKind, session: Session) -> Self {
        Self {
            kind,
            template: kind.template().to_string(),
            session,
            raw: None,
            fields: Document::new(),
        }
    }

    /// Creates an empty resource with a caller-supplied path template.
    ///
    /// Used by the universal locator for addressable resources outside the
    /// registered set; the node is tagged [`ResourceKind::Unknown`].
    pub(crate) fn with_template(template: &str, session: Session) -> Self {
        Self {
            kind: ResourceKind::Unknown,
            template: template.to_string(),
            session,
            raw: None,
            fields: Document::new(),
        }
    }

    /// Builds a loaded resource directly from an already-fetched nested
    /// mapping. No fetch is performed; the mapping is non-empty by
    /// construction (it carried a self-link).
    pub(crate) fn from_nested(
        kind: ResourceKind,
        session: &Session,
        map: &serde_json::Map<String, Value>,
    ) -> Self {
        let mut resource = Self::new(kind, session.clone());
        resource.fields = materialize(map, session);
        resource.raw = Some(Value::Object(map.clone()));
        resource
    }

    /// The resource type tag.
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// The raw document this node was built from, if loaded.
    pub fn raw(&self) -> Option<&Value> {
        self.raw.as_ref()
    }

    /// The promoted field set.
    pub fn fields(&self) -> &Document {
        &self.fields
    }

    pub(crate) fn session(&self) -> &Session {
        &self.session
    }

    /// Looks up a field by name.
    ///
    /// Promoted values take precedence over raw ones; unpromoted scalars
    /// were attached from the raw document during parsing, so they resolve
    /// here too. Fails with [`Error::MissingField`] naming this resource's
    /// kind and the field — lookup never silently returns a default.
    pub fn get_field(&self, name: &str) -> Result<&Materialized> {
        self.fields.get(name).ok_or_else(|| Error::MissingField {
            kind: self.kind,
            field: name.to_string(),
        })
    }

    /// Navigates a chain of nested fields.
    ///
    /// Each step must resolve on the value reached so far (a promoted
    /// resource or document); a step that does not fails like
    /// [`Resource::get_field`] does.
    pub fn field_path(&self, path: &[&str]) -> Result<&Materialized> {
        let (first, rest) = path.split_first().ok_or_else(|| Error::MissingField {
            kind: self.kind,
            field: String::new(),
        })?;
        let mut current = self.get_field(first)?;
        for name in rest {
            current = current.get(name).ok_or_else(|| Error::MissingField {
                kind: self.kind,
                field: (*name).to_string(),
            })?;
        }
        Ok(current)
    }

    /// Navigates to a string scalar; fails when absent or not a string.
    pub fn string_at(&self, path: &[&str]) -> Result<&str> {
        self.field_path(path)?
            .as_str()
            .ok_or_else(|| self.missing(path))
    }

    /// Navigates to an integer scalar; fails when absent or not a number.
    pub fn u64_at(&self, path: &[&str]) -> Result<u64> {
        self.field_path(path)?
            .as_u64()
            .ok_or_else(|| self.missing(path))
    }

    fn missing(&self, path: &[&str]) -> Error {
        Error::MissingField {
            kind: self.kind,
            field: path.join("."),
        }
    }

    /// Builds a full request URL for a resource path.
    pub(crate) fn build_url(&self, path: &str) -> String {
        self.session.options().build_url(path)
    }

    /// Fetches this resource by substituting `ids` into its path template
    /// and parsing the response body.
    ///
    /// Transport and HTTP errors propagate unchanged from the session;
    /// retry is the session's responsibility, never this layer's.
    pub(crate) async fn find(&mut self, ids: &[&str], params: &[(&str, String)]) -> Result<()> {
        let path = expand_template(&self.template, ids)?;
        let url = self.build_url(&path);
        debug!(kind = %self.kind, url, "loading resource");
        let response = self.session.get(&url, params).await?;
        self.parse(response.json()?)
    }

    /// Parses a raw body into this resource.
    ///
    /// An empty or absent body is a construction-time fatal error: a
    /// resource must never be live with no data, since downstream field
    /// access would have no sane fallback.
    pub(crate) fn parse(&mut self, raw: Value) -> Result<()> {
        let fields = match raw.as_object() {
            Some(map) if !map.is_empty() => materialize(map, &self.session),
            _ => return Err(Error::EmptyResource { kind: self.kind }),
        };
        self.fields = fields;
        self.raw = Some(raw);
        Ok(())
    }
}

/// Fetches a resource of the given kind by id(s).
///
/// Errors — transport, HTTP, malformed or empty bodies — propagate
/// unchanged; no partially attributed resource ever escapes.
pub(crate) async fn find_resource(
    kind: ResourceKind,
    session: &Session,
    ids: &[&str],
    params: &[(&str, String)],
) -> Result<Resource> {
    let mut resource = Resource::new(kind, session.clone());
    resource.find(ids, params).await?;
    Ok(resource)
}

/// Substitutes ids positionally into a `{}`-placeholder path template.
///
/// Surplus ids are ignored; missing ids are a configuration error.
pub(crate) fn expand_template(template: &str, ids: &[&str]) -> Result<String> {
    let mut path = String::with_capacity(template.len());
    let mut remaining = template;
    let mut ids_iter = ids.iter();

    while let Some(pos) = remaining.find("{}") {
        path.push_str(&remaining[..pos]);
        let id = ids_iter.next().ok_or_else(|| {
            Error::Config(format!(
                "resource template {template:?} expects more than {} ids",
                ids.len()
            ))
        })?;
        path.push_str(id);
        remaining = &remaining[pos + 2..];
    }
    path.push_str(remaining);
    Ok(path)
}
