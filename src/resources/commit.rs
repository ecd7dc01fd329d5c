//
//  bitbucket-client
//  resources/commit.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/14.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Commit resources.

use std::ops::Deref;

use serde_json::Value;

use crate::error::Result;
use crate::resources::base::{find_resource, Resource, ResourceKind};
use crate::session::Session;

/// A commit resource.
///
/// Dereferences to [`Resource`] for field access.
#[derive(Debug, Clone)]
pub struct Commit {
    inner: Resource,
}

impl Commit {
    /// Wraps a materialized node, if it is tagged as a commit.
    pub fn from_resource(resource: Resource) -> Option<Self> {
        (resource.kind() == ResourceKind::Commit).then_some(Self { inner: resource })
    }

    /// Builds a commit from an already-fetched raw document.
    pub fn from_raw(session: &Session, raw: Value) -> Result<Self> {
        let mut inner = Resource::new(ResourceKind::Commit, session.clone());
        inner.parse(raw)?;
        Ok(Self { inner })
    }

    /// Fetches a commit by `[project, repo, commit id]`.
    pub async fn find(session: &Session, ids: &[&str], params: &[(&str, String)]) -> Result<Self> {
        let inner = find_resource(ResourceKind::Commit, session, ids, params).await?;
        Ok(Self { inner })
    }
}

impl Deref for Commit {
    type Target = Resource;

    fn deref(&self) -> &Resource {
        &self.inner
    }
}
