//
//  bitbucket-client
//  resources/project.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/14.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Projects
//!
//! Typed operations on projects, the containers grouping repositories.
//!
//! ## API Endpoints
//!
//! ```text
//! GET /rest/api/1.0/projects/{projectKey}
//! GET /rest/api/1.0/projects/{projectKey}/repos
//! ```

use std::ops::Deref;

use serde_json::Value;

use crate::error::Result;
use crate::resources::base::{find_resource, Resource, ResourceKind};
use crate::resources::page::Page;
use crate::resources::repo::Repo;
use crate::session::Session;

/// A project resource.
///
/// Obtained from [`Bitbucket::project`](crate::Bitbucket::project) /
/// [`Bitbucket::projects`](crate::Bitbucket::projects), or wrapped around
/// a promoted graph node with [`Project::from_resource`]. Dereferences to
/// [`Resource`] for field access.
#[derive(Debug, Clone)]
pub struct Project {
    inner: Resource,
}

impl Project {
    /// Wraps a materialized node, if it is tagged as a project.
    pub fn from_resource(resource: Resource) -> Option<Self> {
        (resource.kind() == ResourceKind::Project).then_some(Self { inner: resource })
    }

    /// Builds a project from an already-fetched raw document.
    pub fn from_raw(session: &Session, raw: Value) -> Result<Self> {
        let mut inner = Resource::new(ResourceKind::Project, session.clone());
        inner.parse(raw)?;
        Ok(Self { inner })
    }

    /// Fetches a project by key.
    pub async fn find(session: &Session, key: &str, params: &[(&str, String)]) -> Result<Self> {
        let inner = find_resource(ResourceKind::Project, session, &[key], params).await?;
        Ok(Self { inner })
    }

    /// Lists the repositories of this project.
    ///
    /// Single page, bounded by whatever limit the server applies; pass a
    /// `limit` parameter through [`Repo::find`] style calls for more.
    pub async fn repos(&self) -> Result<Vec<Repo>> {
        let name = self.inner.string_at(&["name"])?;
        let url = self.inner.build_url(&format!("projects/{name}/repos"));
        let response = self.inner.session().get(&url, &[]).await?;
        let page = Page::parse(&response)?;
        page.values
            .into_iter()
            .map(|raw| Repo::from_raw(self.inner.session(), raw))
            .collect()
    }

    /// Fetches one repository of this project by slug.
    pub async fn repo(&self, slug: &str) -> Result<Repo> {
        let name = self.inner.string_at(&["name"])?;
        Repo::find(self.inner.session(), &[name, slug], &[]).await
    }
}

impl Deref for Project {
    type Target = Resource;

    fn deref(&self) -> &Resource {
        &self.inner
    }
}
