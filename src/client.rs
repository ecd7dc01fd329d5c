//
//  bitbucket-client
//  client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/14.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Top-Level Client
//!
//! This module provides [`Bitbucket`], the entry point for talking to a
//! Bitbucket Server/Data Center instance. It owns the configured session
//! and exposes the root lookups from which the typed resource graph is
//! reached.
//!
//! ## Creating a Client
//!
//! ```rust,no_run
//! use bitbucket_client::{AuthCredential, Bitbucket};
//!
//! let client = Bitbucket::new("https://bitbucket.example.com")?
//!     .with_auth(AuthCredential::basic("jdoe", "secret"));
//! # Ok::<(), bitbucket_client::Error>(())
//! ```
//!
//! ## Navigating
//!
//! ```rust,ignore
//! let project = client.project("PROJ").await?;
//! let repo = project.repo("widget").await?;
//! let pr = repo.pull_request(101).await?;
//! println!("{}", pr.get_field("title")?.as_str().unwrap_or(""));
//! ```

use tracing::debug;

use crate::config::Options;
use crate::error::Result;
use crate::resources::base::Resource;
use crate::resources::page::Page;
use crate::resources::project::Project;
use crate::session::{AuthCredential, Session};

/// Client for a Bitbucket Server/Data Center instance.
///
/// Construct with [`Bitbucket::new`] for default options or
/// [`Bitbucket::with_options`] for full control, then attach credentials
/// with [`Bitbucket::with_auth`]. All resource objects obtained through
/// the client share its session, so further navigation needs no extra
/// setup.
#[derive(Debug, Clone)]
pub struct Bitbucket {
    session: Session,
}

impl Bitbucket {
    /// Creates a client for the given server URL with default options.
    pub fn new(server: &str) -> Result<Self> {
        Self::with_options(Options::new(server))
    }

    /// Creates a client from full options.
    pub fn with_options(options: Options) -> Result<Self> {
        debug!(server = %options.server, "creating client");
        Ok(Self {
            session: Session::new(options)?,
        })
    }

    /// Sets the authentication credentials.
    pub fn with_auth(mut self, auth: AuthCredential) -> Self {
        self.session = self.session.with_auth(auth);
        self
    }

    /// The session this client issues requests through.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Fetches a project by key.
    pub async fn project(&self, key: &str) -> Result<Project> {
        Project::find(&self.session, key, &[]).await
    }

    /// Lists all projects visible to the authenticated user.
    ///
    /// Single page; pass a larger limit through [`Bitbucket::find`] style
    /// calls when the instance holds more projects than the server's
    /// default page size.
    pub async fn projects(&self) -> Result<Vec<Project>> {
        let url = self.session.options().build_url("projects");
        let response = self.session.get(&url, &[]).await?;
        let page = Page::parse(&response)?;
        page.values
            .into_iter()
            .map(|raw| Project::from_raw(&self.session, raw))
            .collect()
    }

    /// Fetches any addressable resource on the server.
    ///
    /// A universal locator: `resource_format` is a path template of the
    /// form `resource`, `resource/{}`, `resource/{}/sub/{}`, etc., with
    /// the placeholders populated from `ids`. The returned node is
    /// untyped — it supports field access but no resource-specific
    /// operations — which makes this the escape hatch for endpoints
    /// outside the registered resource set.
    pub async fn find(&self, resource_format: &str, ids: &[&str]) -> Result<Resource> {
        let mut resource = Resource::with_template(resource_format, self.session.clone());
        resource.find(ids, &[]).await?;
        Ok(resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::resources::base::ResourceKind;
    use serde_json::json;

    fn client_for(server: &mockito::ServerGuard) -> Bitbucket {
        let mut options = Options::new(&server.url());
        options.max_retries = 0;
        Bitbucket::with_options(options).unwrap()
    }

    #[tokio::test]
    async fn test_projects_parses_values_envelope() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/api/1.0/projects")
            .with_body(
                json!({
                    "values": [
                        {"key": "PROJ", "name": "PROJ"},
                        {"key": "OPS", "name": "OPS"}
                    ],
                    "isLastPage": true
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = client_for(&server);
        let projects = client.projects().await.unwrap();

        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].get_field("key").unwrap().as_str(), Some("PROJ"));
    }

    #[tokio::test]
    async fn test_project_lookup_fetches_by_key() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/api/1.0/projects/PROJ")
            .with_body(json!({"key": "PROJ", "name": "PROJ", "id": 1}).to_string())
            .create_async()
            .await;

        let client = client_for(&server);
        let project = client.project("PROJ").await.unwrap();

        assert_eq!(project.kind(), ResourceKind::Project);
        assert_eq!(project.get_field("id").unwrap().as_u64(), Some(1));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_body_fails_resource_construction() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/api/1.0/projects/GHOST")
            .with_status(200)
            .with_body("")
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.project("GHOST").await.unwrap_err();

        assert!(matches!(
            err,
            Error::EmptyResource {
                kind: ResourceKind::Project
            }
        ));
    }

    #[tokio::test]
    async fn test_universal_find_returns_untyped_resource() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/api/1.0/admin/groups/more-members")
            .with_body(json!({"name": "stash-users", "deletable": true}).to_string())
            .create_async()
            .await;

        let client = client_for(&server);
        let resource = client
            .find("admin/groups/{}", &["more-members"])
            .await
            .unwrap();

        assert_eq!(resource.kind(), ResourceKind::Unknown);
        assert_eq!(
            resource.get_field("name").unwrap().as_str(),
            Some("stash-users")
        );
    }
}
