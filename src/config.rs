//
//  bitbucket-client
//  config.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/14.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Client Configuration
//!
//! This module provides the [`Options`] struct holding everything needed to
//! build request URLs against a Bitbucket Server/Data Center instance: the
//! server base URL, the REST path segment, the REST API version and the
//! default headers sent with every request.
//!
//! Options are consumed by the session and the resource layer to build
//! URLs; the materialization engine itself never inspects them beyond the
//! self-link detection rule.
//!
//! # URL Layout
//!
//! Request URLs are assembled from the configured parts:
//!
//! ```text
//! {server}/rest/{rest_path}/{rest_api_version}/{path}
//! ```
//!
//! With the defaults, a path of `projects/PROJ` becomes
//! `http://localhost:7990/rest/api/1.0/projects/PROJ`.
//!
//! # Example
//!
//! ```rust
//! use bitbucket_client::Options;
//!
//! let options = Options::new("https://bitbucket.example.com/");
//!
//! // Trailing slashes are stripped so path joins stay predictable
//! assert_eq!(options.server, "https://bitbucket.example.com");
//! assert_eq!(
//!     options.build_url("projects/PROJ"),
//!     "https://bitbucket.example.com/rest/api/1.0/projects/PROJ"
//! );
//! ```

use serde::{Deserialize, Serialize};

/// Strategy for recognizing the self-link field inside a nested mapping.
///
/// The server emits either shape depending on endpoint and API version: a
/// top-level `self` key (newer endpoints) or a `links` sub-mapping with a
/// `self` key (older ones). Which shapes the materialization engine
/// accepts is configurable; the default accepts both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelfLinkRule {
    /// Only a top-level `self` key marks a linked resource.
    Flat,
    /// Only a `links.self` nested key marks a linked resource.
    Nested,
    /// Either shape marks a linked resource; `self` is checked first.
    #[default]
    Both,
}

/// Configuration for a Bitbucket Server/Data Center client.
///
/// Holds the URL-building parts, the default header set, the self-link
/// detection rule and the session retry budget. Construct with
/// [`Options::new`] for sensible defaults and adjust fields directly —
/// every field is public.
///
/// # Fields
///
/// | Field | Default | Description |
/// |-------|---------|-------------|
/// | `server` | `http://localhost:7990` | Base URL of the instance |
/// | `rest_path` | `api` | REST path segment |
/// | `rest_api_version` | `1.0` | REST API version segment |
/// | `headers` | see below | Default headers sent with every request |
/// | `self_link_rule` | `Both` | Self-link detection strategy |
/// | `max_retries` | `3` | Retry budget for idempotent requests |
/// | `merge_commit_limit` | `100` | Page size for merge-commit resolution |
///
/// The default headers are `Cache-Control: no-cache`,
/// `Content-Type: application/json` and `X-Atlassian-Token: no-check`.
///
/// # Notes
///
/// - The server URL has any trailing slash stripped at construction
/// - `merge_commit_limit` bounds the single history page scanned when
///   resolving the merge commit of an already-merged pull request; callers
///   needing a deeper scan must raise it explicitly, pagination is never
///   followed automatically
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Options {
    /// Base URL of the Bitbucket instance, without a trailing slash.
    pub server: String,

    /// REST path segment of request URLs.
    pub rest_path: String,

    /// REST API version segment of request URLs.
    pub rest_api_version: String,

    /// Default headers applied to every request.
    pub headers: Vec<(String, String)>,

    /// How the materialization engine recognizes self-links.
    pub self_link_rule: SelfLinkRule,

    /// How many times the session retries an idempotent request on
    /// transient failures (429, 5xx, transport errors).
    pub max_retries: u32,

    /// Page size used when scanning merge-only commit history to resolve
    /// the merge commit of an already-merged pull request.
    pub merge_commit_limit: u32,
}

impl Options {
    /// Creates options for the given server URL with default settings.
    ///
    /// Any trailing slash on the server URL is stripped since all request
    /// URLs are built by joining path segments onto it.
    pub fn new(server: &str) -> Self {
        Self {
            server: server.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    /// Builds a full request URL for a resource path.
    ///
    /// Pure function of the configured parts and the path; performs no
    /// I/O and no validation of the path itself.
    pub fn build_url(&self, path: &str) -> String {
        format!(
            "{}/rest/{}/{}/{}",
            self.server, self.rest_path, self.rest_api_version, path
        )
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            server: "http://localhost:7990".to_string(),
            rest_path: "api".to_string(),
            rest_api_version: "1.0".to_string(),
            headers: vec![
                ("Cache-Control".to_string(), "no-cache".to_string()),
                ("Content-Type".to_string(), "application/json".to_string()),
                ("X-Atlassian-Token".to_string(), "no-check".to_string()),
            ],
            self_link_rule: SelfLinkRule::default(),
            max_retries: 3,
            merge_commit_limit: 100,
        }
    }
}
