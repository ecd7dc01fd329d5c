//
//  bitbucket-client
//  resources/repo.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/14.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Repositories
//!
//! Typed operations on repositories: listing pull requests and walking
//! commit history.
//!
//! ## API Endpoints
//!
//! ```text
//! GET /rest/api/1.0/projects/{projectKey}/repos/{repoSlug}
//! GET /rest/api/1.0/projects/{projectKey}/repos/{repoSlug}/pull-requests
//! GET /rest/api/1.0/projects/{projectKey}/repos/{repoSlug}/commits
//! ```

use std::ops::Deref;

use serde_json::Value;

use crate::error::Result;
use crate::resources::base::{find_resource, Resource, ResourceKind};
use crate::resources::commit::Commit;
use crate::resources::page::Page;
use crate::resources::pull_request::PullRequest;
use crate::session::Session;

/// A repository resource.
///
/// Dereferences to [`Resource`] for field access.
#[derive(Debug, Clone)]
pub struct Repo {
    inner: Resource,
}

impl Repo {
    /// Wraps a materialized node, if it is tagged as a repository.
    pub fn from_resource(resource: Resource) -> Option<Self> {
        (resource.kind() == ResourceKind::Repo).then_some(Self { inner: resource })
    }

    /// Builds a repository from an already-fetched raw document.
    pub fn from_raw(session: &Session, raw: Value) -> Result<Self> {
        let mut inner = Resource::new(ResourceKind::Repo, session.clone());
        inner.parse(raw)?;
        Ok(Self { inner })
    }

    /// Fetches a repository by `[project, slug]`.
    pub async fn find(session: &Session, ids: &[&str], params: &[(&str, String)]) -> Result<Self> {
        let inner = find_resource(ResourceKind::Repo, session, ids, params).await?;
        Ok(Self { inner })
    }

    /// Lists pull requests of this repository.
    ///
    /// With no parameters the merged-state filter is applied; pass an
    /// explicit `state` parameter to list other states.
    pub async fn pull_requests(&self, params: &[(&str, String)]) -> Result<Vec<PullRequest>> {
        let path = format!(
            "projects/{}/repos/{}/pull-requests",
            self.inner.string_at(&["project", "name"])?,
            self.inner.string_at(&["name"])?
        );
        let url = self.inner.build_url(&path);

        let default_params = [("state", "merged".to_string())];
        let params = if params.is_empty() {
            &default_params[..]
        } else {
            params
        };

        let response = self.inner.session().get(&url, params).await?;
        let page = Page::parse(&response)?;
        page.values
            .into_iter()
            .map(|raw| PullRequest::from_raw(self.inner.session(), raw))
            .collect()
    }

    /// Fetches one pull request of this repository by id.
    pub async fn pull_request(&self, id: u64) -> Result<PullRequest> {
        let project = self.inner.string_at(&["project", "name"])?;
        let name = self.inner.string_at(&["name"])?;
        let id = id.to_string();
        PullRequest::find(self.inner.session(), &[project, name, &id], &[]).await
    }

    /// Lists commits of this repository.
    ///
    /// Accepts the endpoint's filter parameters (`merges`, `limit`,
    /// `until`, ...); a single page is fetched.
    pub async fn commits(&self, params: &[(&str, String)]) -> Result<Vec<Commit>> {
        let path = format!(
            "projects/{}/repos/{}/commits",
            self.inner.string_at(&["project", "name"])?,
            self.inner.string_at(&["name"])?
        );
        let url = self.inner.build_url(&path);
        let response = self.inner.session().get(&url, params).await?;
        let page = Page::parse(&response)?;
        page.values
            .into_iter()
            .map(|raw| Commit::from_raw(self.inner.session(), raw))
            .collect()
    }
}

impl Deref for Repo {
    type Target = Resource;

    fn deref(&self) -> &Resource {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Options;
    use serde_json::json;

    fn repo_raw() -> Value {
        json!({
            "slug": "widget",
            "name": "widget",
            "project": {"key": "PROJ", "name": "PROJ"}
        })
    }

    #[tokio::test]
    async fn test_pull_requests_defaults_to_merged_state() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock(
                "GET",
                "/rest/api/1.0/projects/PROJ/repos/widget/pull-requests",
            )
            .match_query(mockito::Matcher::UrlEncoded(
                "state".into(),
                "merged".into(),
            ))
            .with_body(
                json!({
                    "values": [{"id": 7, "state": "MERGED", "title": "done"}],
                    "isLastPage": true
                })
                .to_string(),
            )
            .create_async()
            .await;

        let session = Session::new(Options::new(&server.url())).unwrap();
        let repo = Repo::from_raw(&session, repo_raw()).unwrap();
        let pull_requests = repo.pull_requests(&[]).await.unwrap();

        assert_eq!(pull_requests.len(), 1);
        assert_eq!(pull_requests[0].get_field("id").unwrap().as_u64(), Some(7));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_commits_passes_filter_params() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/api/1.0/projects/PROJ/repos/widget/commits")
            .match_query(mockito::Matcher::UrlEncoded("merges".into(), "only".into()))
            .with_body(
                json!({
                    "values": [{"id": "0a943a29376f", "message": "Merge branch"}],
                    "isLastPage": true
                })
                .to_string(),
            )
            .create_async()
            .await;

        let session = Session::new(Options::new(&server.url())).unwrap();
        let repo = Repo::from_raw(&session, repo_raw()).unwrap();
        let commits = repo.commits(&[("merges", "only".to_string())]).await.unwrap();

        assert_eq!(commits.len(), 1);
        assert_eq!(
            commits[0].get_field("id").unwrap().as_str(),
            Some("0a943a29376f")
        );
        mock.assert_async().await;
    }
}
