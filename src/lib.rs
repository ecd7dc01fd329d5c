//
//  bitbucket-client
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/14.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Bitbucket Client Library
//!
//! A client library for the Bitbucket Server/Data Center REST API that
//! turns JSON responses into navigable in-memory objects.
//!
//! ## Overview
//!
//! Fetching a resource materializes its whole document at once: nested
//! objects carrying a recognizable self-link are promoted to fully
//! populated typed resources (projects, repositories, pull requests,
//! commits, users — with a generic fallback for everything else), other
//! nested objects become ordered untyped documents, and scalars stay
//! untouched. Typed nodes expose further operations — listing a project's
//! repositories, evaluating a pull request's merge eligibility, merging —
//! which recurse through the same pipeline.
//!
//! ## Features
//!
//! - **Schema-less materialization**: no declared schema; unrecognized
//!   link shapes still produce usable nodes
//! - **Typed navigation**: `client.project("PROJ")` →
//!   `project.repo("widget")` → `repo.pull_request(101)`
//! - **Structured merge outcomes**: already-merged, incomplete review and
//!   conflicts are returned values, not errors
//! - **Resilient transport**: automatic retry with backoff on idempotent
//!   requests, authentication header injection
//!
//! ## Module Structure
//!
//! - [`client`]: top-level [`Bitbucket`] entry point
//! - [`config`]: URL-building options and the self-link detection rule
//! - [`session`]: resilient HTTP session and response wrapper
//! - [`resources`]: the materialization engine, type registry and typed
//!   resources
//! - [`error`]: unified error type
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use bitbucket_client::{AuthCredential, Bitbucket};
//!
//! let client = Bitbucket::new("https://bitbucket.example.com")?
//!     .with_auth(AuthCredential::basic("jdoe", "secret"));
//!
//! let repo = client.project("PROJ").await?.repo("widget").await?;
//! for pr in repo.pull_requests(&[("state", "OPEN".to_string())]).await? {
//!     let check = pr.can_merge(&[]).await?;
//!     println!("#{}: {:?}", pr.get_field("id")?.as_u64().unwrap_or(0), check.reason());
//! }
//! ```

/// Top-level client entry point.
///
/// Provides [`Bitbucket`], which owns the configured session and exposes
/// the root lookups (`project`, `projects`, the universal `find`).
pub mod client;

/// Client configuration.
///
/// URL-building parts (server, REST path, API version), default headers,
/// the self-link detection rule and the session retry budget.
pub mod config;

/// Unified error type and `Result` alias.
pub mod error;

/// Materialization engine, resource type registry and typed resources.
pub mod resources;

/// Resilient HTTP session: retry with backoff, authentication, API error
/// message extraction.
pub mod session;

pub use client::Bitbucket;
pub use config::{Options, SelfLinkRule};
pub use error::{Error, Result};
pub use resources::{
    Commit, Document, Materialized, MergeCheck, MergeVeto, Page, Project, PullRequest, Repo,
    Resource, ResourceKind, User,
};
pub use session::{AuthCredential, Response, Session};

/// Library version, sourced from the crate manifest.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
