//
//  bitbucket-client
//  resources/user.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/14.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! User resources.

use std::ops::Deref;

use serde_json::Value;

use crate::error::Result;
use crate::resources::base::{find_resource, Resource, ResourceKind};
use crate::session::Session;

/// A user resource.
///
/// Dereferences to [`Resource`] for field access.
#[derive(Debug, Clone)]
pub struct User {
    inner: Resource,
}

impl User {
    /// Wraps a materialized node, if it is tagged as a user.
    pub fn from_resource(resource: Resource) -> Option<Self> {
        (resource.kind() == ResourceKind::User).then_some(Self { inner: resource })
    }

    /// Builds a user from an already-fetched raw document.
    pub fn from_raw(session: &Session, raw: Value) -> Result<Self> {
        let mut inner = Resource::new(ResourceKind::User, session.clone());
        inner.parse(raw)?;
        Ok(Self { inner })
    }

    /// Fetches a user by slug.
    pub async fn find(session: &Session, slug: &str, params: &[(&str, String)]) -> Result<Self> {
        let inner = find_resource(ResourceKind::User, session, &[slug], params).await?;
        Ok(Self { inner })
    }
}

impl Deref for User {
    type Target = Resource;

    fn deref(&self) -> &Resource {
        &self.inner
    }
}
