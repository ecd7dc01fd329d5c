//
//  bitbucket-client
//  error.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/14.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Error Types
//!
//! This module provides the unified error type for all Bitbucket client
//! operations, from transport failures up to domain-level lookup errors.
//!
//! # Overview
//!
//! | Variant | Raised by | Meaning |
//! |---------|-----------|---------|
//! | `Http` | session | Non-success HTTP status with an extracted message |
//! | `Network` | session | Transport failure (connect, timeout, DNS) |
//! | `MalformedBody` | response | Successful response whose body is not valid JSON |
//! | `EmptyResource` | resource parse | Successful fetch with an empty or absent body |
//! | `MissingField` | field lookup | Field absent from a materialized resource |
//! | `Config` | construction | Invalid options (headers, resource templates) |
//!
//! Domain-level merge-eligibility outcomes (already merged, review
//! incomplete, conflicts) are **not** errors — they are returned as a
//! structured [`MergeCheck`](crate::resources::MergeCheck) value so callers
//! can branch on policy without exception handling.
//!
//! # Example
//!
//! ```rust,ignore
//! match repo.pull_request(42).await {
//!     Ok(pr) => println!("PR: {}", pr.get_field("title")?.as_str().unwrap_or("")),
//!     Err(Error::Http { status: 404, .. }) => println!("no such pull request"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

use crate::resources::ResourceKind;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for all Bitbucket client operations.
///
/// Implements the standard `Error` trait via `thiserror` for ergonomic
/// propagation with the `?` operator.
///
/// # Notes
///
/// - The `Network` variant automatically converts from `reqwest::Error`
/// - HTTP errors carry the message extracted from the server's error body
///   (see [`session`](crate::session) for the extraction rules)
/// - `MalformedBody` keeps the offending text for debugging
#[derive(Error, Debug)]
pub enum Error {
    /// The server answered with a non-success status code.
    ///
    /// The message is extracted from the error body where possible
    /// (`message`, `errorMessages`, `errors`) and falls back to the raw
    /// body text.
    #[error("API error ({status}): {message}")]
    Http {
        /// The HTTP status code of the response.
        status: u16,
        /// Human-readable message extracted from the error body.
        message: String,
        /// The effective URL of the failed request.
        url: String,
    },

    /// A network-level error occurred during the request.
    ///
    /// Covers connection failures, timeouts, DNS resolution errors and
    /// other transport-layer issues.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A successful response carried a body that is not valid JSON.
    ///
    /// The offending text is preserved so callers can log or inspect it.
    #[error("Malformed response body: {source}")]
    MalformedBody {
        /// The raw body text that failed to parse.
        text: String,
        /// The underlying JSON parse error.
        #[source]
        source: serde_json::Error,
    },

    /// A successful fetch produced an empty or absent body.
    ///
    /// A resource must never exist in a loaded-but-contentless state, so
    /// this is fatal at construction time. Callers wanting the resource
    /// must re-fetch or retry a higher-level lookup themselves.
    #[error("Cannot instantiate an empty {kind}")]
    EmptyResource {
        /// The resource type that was being constructed.
        kind: ResourceKind,
    },

    /// A field was requested that exists neither in the promoted graph nor
    /// in the raw document.
    ///
    /// This is the primary contract callers rely on for "does this
    /// document have field X" — lookup never silently returns a default.
    #[error("{kind} has no field {field:?}")]
    MissingField {
        /// The resource type the lookup ran against.
        kind: ResourceKind,
        /// The name of the missing field.
        field: String,
    },

    /// The client was constructed with invalid options.
    ///
    /// Covers unparseable default headers and resource templates given
    /// fewer ids than they have placeholders.
    #[error("Invalid configuration: {0}")]
    Config(String),
}
