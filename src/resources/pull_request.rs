//
//  bitbucket-client
//  resources/pull_request.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/14.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Pull Requests
//!
//! Typed operations on pull requests, including merge eligibility
//! evaluation and the merge itself.
//!
//! ## API Endpoints
//!
//! ```text
//! GET  /rest/api/1.0/projects/{projectKey}/repos/{repoSlug}/pull-requests/{id}
//! GET  /rest/api/1.0/projects/{projectKey}/repos/{repoSlug}/pull-requests/{id}/merge
//! POST /rest/api/1.0/projects/{projectKey}/repos/{repoSlug}/pull-requests/{id}/merge
//! ```
//!
//! ## Merge Eligibility
//!
//! [`PullRequest::can_merge`] reports eligibility as a structured
//! [`MergeCheck`], never as an error — already-merged, incomplete review,
//! conflicts and reviewer vetoes are expected business states callers
//! branch on, not exceptional conditions:
//!
//! - state `MERGED` blocks the merge and triggers a best-effort lookup of
//!   the actual merge commit in the source repository's merge-only
//!   history, matched by the `Merge pull request #<id>` message prefix;
//! - any reviewer whose status is not `APPROVED` blocks the merge without
//!   a network call;
//! - otherwise the server-side mergeability endpoint decides: a
//!   `CONFLICTED` outcome or reviewer veto errors block, anything else
//!   allows.

use std::fmt;
use std::ops::Deref;

use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::resources::base::{find_resource, Resource, ResourceKind};
use crate::resources::commit::Commit;
use crate::resources::document::Materialized;
use crate::resources::page::Page;
use crate::session::Session;

/// Why a pull request cannot be merged right now.
#[derive(Debug, Clone, PartialEq)]
pub enum MergeVeto {
    /// The pull request is already merged.
    AlreadyMerged {
        /// Id of the resolved merge commit, when the history scan found
        /// one within the configured page limit.
        merge_commit: Option<String>,
    },
    /// At least one reviewer has not approved.
    ReviewIncomplete,
    /// The server reported a conflicted merge outcome.
    Conflicted,
    /// The server reported validation errors, passed through verbatim.
    Vetoed {
        /// The error values exactly as the server delivered them.
        errors: Vec<Value>,
    },
}

impl fmt::Display for MergeVeto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyMerged { .. } => f.write_str("Already merged"),
            Self::ReviewIncomplete => f.write_str("Review incomplete"),
            Self::Conflicted => f.write_str("Merge conflicts"),
            Self::Vetoed { errors } => {
                let rendered: Vec<String> = errors
                    .iter()
                    .map(|error| {
                        error
                            .get("message")
                            .and_then(Value::as_str)
                            .map(str::to_string)
                            .unwrap_or_else(|| error.to_string())
                    })
                    .collect();
                f.write_str(&rendered.join(", "))
            }
        }
    }
}

/// Outcome of a merge eligibility evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeCheck {
    /// Whether the pull request can be merged.
    pub can_merge: bool,
    /// The blocking condition, absent when mergeable.
    pub veto: Option<MergeVeto>,
}

impl MergeCheck {
    fn allowed() -> Self {
        Self {
            can_merge: true,
            veto: None,
        }
    }

    fn blocked(veto: MergeVeto) -> Self {
        Self {
            can_merge: false,
            veto: Some(veto),
        }
    }

    /// Human-readable reason for the veto, if any.
    pub fn reason(&self) -> Option<String> {
        self.veto.as_ref().map(MergeVeto::to_string)
    }
}

/// A pull request resource.
///
/// Dereferences to [`Resource`] for field access.
#[derive(Debug, Clone)]
pub struct PullRequest {
    inner: Resource,
}

impl PullRequest {
    /// Wraps a materialized node, if it is tagged as a pull request.
    pub fn from_resource(resource: Resource) -> Option<Self> {
        (resource.kind() == ResourceKind::PullRequest).then_some(Self { inner: resource })
    }

    /// Builds a pull request from an already-fetched raw document.
    pub fn from_raw(session: &Session, raw: Value) -> Result<Self> {
        let mut inner = Resource::new(ResourceKind::PullRequest, session.clone());
        inner.parse(raw)?;
        Ok(Self { inner })
    }

    /// Fetches a pull request by `[project, repo, id]`.
    pub async fn find(session: &Session, ids: &[&str], params: &[(&str, String)]) -> Result<Self> {
        let inner = find_resource(ResourceKind::PullRequest, session, ids, params).await?;
        Ok(Self { inner })
    }

    /// Evaluates whether this pull request can be merged.
    ///
    /// Expected business states come back as a [`MergeCheck`]; only
    /// transport failures and documents missing the fields this evaluation
    /// reads surface as errors.
    pub async fn can_merge(&self, params: &[(&str, String)]) -> Result<MergeCheck> {
        if self.inner.string_at(&["state"])? == "MERGED" {
            // Best effort: a failed history scan leaves the commit
            // unresolved rather than failing the whole evaluation.
            let merge_commit = self.resolve_merge_commit().await.unwrap_or_default();
            return Ok(MergeCheck::blocked(MergeVeto::AlreadyMerged { merge_commit }));
        }

        let reviewers = self
            .inner
            .get_field("reviewers")?
            .as_list()
            .unwrap_or_default();
        let review_complete = !reviewers.is_empty()
            && reviewers
                .iter()
                .all(|reviewer| reviewer.get("status").and_then(Materialized::as_str) == Some("APPROVED"));
        if !review_complete {
            return Ok(MergeCheck::blocked(MergeVeto::ReviewIncomplete));
        }

        let url = self.inner.build_url(&self.merge_path()?);
        let response = self.inner.session().get(&url, params).await?;
        let body = response.json()?;

        if body.get("canMerge").and_then(Value::as_bool) == Some(false)
            && body.get("outcome").and_then(Value::as_str) == Some("CONFLICTED")
        {
            return Ok(MergeCheck::blocked(MergeVeto::Conflicted));
        }

        if let Some(errors) = body.get("errors") {
            let errors = match errors {
                Value::Array(items) => items.clone(),
                other => vec![other.clone()],
            };
            return Ok(MergeCheck::blocked(MergeVeto::Vetoed { errors }));
        }

        Ok(MergeCheck::allowed())
    }

    /// Merges this pull request, submitting its current version token.
    ///
    /// Never retried: a stale version token must surface as the server's
    /// error.
    pub async fn merge(&self) -> Result<Commit> {
        let version = self.inner.u64_at(&["version"])?;
        let url = self.inner.build_url(&self.merge_path()?);
        let params = [("version", version.to_string())];
        let response = self.inner.session().post(&url, &params, None).await?;
        Commit::from_raw(self.inner.session(), response.json()?)
    }

    /// Scans the source repository's merge-only history for this pull
    /// request's merge commit.
    ///
    /// Bounded by the configured `merge_commit_limit`; an exhausted page
    /// resolves to `None`.
    async fn resolve_merge_commit(&self) -> Result<Option<String>> {
        let id = self.inner.u64_at(&["id"])?;
        let path = format!(
            "projects/{}/repos/{}/commits",
            self.inner
                .string_at(&["fromRef", "repository", "project", "name"])?,
            self.inner.string_at(&["fromRef", "repository", "slug"])?
        );
        let url = self.inner.build_url(&path);
        let limit = self.inner.session().options().merge_commit_limit;
        let params = [
            ("merges", "only".to_string()),
            ("limit", limit.to_string()),
        ];

        let response = self.inner.session().get(&url, &params).await?;
        let page = Page::parse(&response)?;

        let prefix = format!("Merge pull request #{id}");
        for value in &page.values {
            let message = value.get("message").and_then(Value::as_str);
            if message.is_some_and(|m| m.starts_with(&prefix)) {
                let commit = value.get("id").and_then(Value::as_str).map(str::to_string);
                debug!(pull_request = id, commit = ?commit, "resolved merge commit");
                return Ok(commit);
            }
        }
        Ok(None)
    }

    fn merge_path(&self) -> Result<String> {
        Ok(format!(
            "projects/{}/repos/{}/pull-requests/{}/merge",
            self.inner
                .string_at(&["fromRef", "repository", "project", "name"])?,
            self.inner.string_at(&["fromRef", "repository", "slug"])?,
            self.inner.u64_at(&["id"])?
        ))
    }
}

impl Deref for PullRequest {
    type Target = Resource;

    fn deref(&self) -> &Resource {
        &self.inner
    }
}
