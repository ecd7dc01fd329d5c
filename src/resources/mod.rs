//
//  bitbucket-client
//  resources/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/14.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Resource Layer
//!
//! This module turns raw JSON documents from the REST API into navigable
//! typed objects.
//!
//! ## Architecture
//!
//! The layer is organized as follows:
//!
//! - [`base`]: the resource base contract — fetching by path template,
//!   parsing, and field lookup
//! - [`document`]: the materialized value types ([`Document`],
//!   [`Materialized`])
//! - [`materialize`]: the recursive raw-JSON → object-graph transformer
//! - [`registry`]: self-link classification into concrete resource types
//! - [`page`]: the `values` list envelope of collection endpoints
//! - [`project`], [`repo`], [`pull_request`], [`commit`], [`user`]: typed
//!   resources with their domain operations
//!
//! ## Materialization
//!
//! Fetching a resource parses its body once and recursively promotes
//! nested objects: anything carrying a recognizable self-link becomes a
//! fully populated typed [`Resource`] (classified through the registry,
//! falling back to [`ResourceKind::Unknown`]), any other nested object
//! becomes an untyped [`Document`], sequences are promoted element-wise in
//! source order, and scalars are attached unchanged. No network call is
//! ever made while materializing — promoted resources are built from the
//! already-fetched nested mappings.
//!
//! ## Example
//!
//! ```rust,ignore
//! let repo = client.project("PROJ").await?.repo("widget").await?;
//!
//! for pr in repo.pull_requests(&[("state", "OPEN".to_string())]).await? {
//!     let check = pr.can_merge(&[]).await?;
//!     if check.can_merge {
//!         pr.merge().await?;
//!     } else if let Some(reason) = check.reason() {
//!         println!("PR #{}: {}", pr.get_field("id")?.as_u64().unwrap_or(0), reason);
//!     }
//! }
//! ```

/// Resource base contract: fetch, parse, field lookup.
pub mod base;

/// Commit resources.
pub mod commit;

/// Materialized value containers.
pub mod document;

/// The raw-JSON → object-graph transformer.
pub mod materialize;

/// The `values` list envelope of collection endpoints.
pub mod page;

/// Project resources and operations.
pub mod project;

/// Pull request resources, merge eligibility and merging.
pub mod pull_request;

/// Self-link classification registry.
pub mod registry;

/// Repository resources and operations.
pub mod repo;

/// User resources.
pub mod user;

pub use base::{Resource, ResourceKind};
pub use commit::Commit;
pub use document::{Document, Materialized};
pub use page::Page;
pub use project::Project;
pub use pull_request::{MergeCheck, MergeVeto, PullRequest};
pub use repo::Repo;
pub use user::User;
