//
//  bitbucket-client
//  resources/page.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/14.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # List Envelope
//!
//! Collections returned by list endpoints are wrapped in an envelope
//! exposing a `values` array of raw documents plus offset-based paging
//! metadata. This module parses exactly that shape.
//!
//! The client has no cursor-follow loop: a list call makes a single
//! request bounded by the `limit` parameter. The paging metadata is
//! exposed so callers can loop themselves, but callers needing complete
//! result sets are responsible for supplying a sufficiently large limit.
//!
//! # Example
//!
//! ```rust
//! use bitbucket_client::Page;
//!
//! let json = r#"{
//!     "values": [{"key": "PROJ", "name": "My Project"}],
//!     "size": 1,
//!     "limit": 25,
//!     "isLastPage": false,
//!     "nextPageStart": 25,
//!     "start": 0
//! }"#;
//!
//! let page: Page = serde_json::from_str(json).unwrap();
//! assert_eq!(page.values.len(), 1);
//! assert!(page.has_next());
//! assert_eq!(page.next_start(), Some(25));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::session::Response;

/// A single page of results from a list endpoint.
///
/// # Fields
///
/// | Field | Description |
/// |-------|-------------|
/// | `values` | Raw documents in the current page |
/// | `size` | Number of items in the current page |
/// | `limit` | Maximum items per page, as requested |
/// | `is_last_page` | Whether this is the final page |
/// | `next_page_start` | Start index for the next page |
/// | `start` | Start index of the current page (0-indexed) |
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Raw documents in the current page, in server order.
    pub values: Vec<Value>,

    /// Number of items in the current page.
    #[serde(default)]
    pub size: u32,

    /// Maximum items per page, as requested.
    #[serde(default)]
    pub limit: u32,

    /// Whether this is the last page of results.
    #[serde(default, rename = "isLastPage")]
    pub is_last_page: bool,

    /// Start index for the next page, absent on the last page.
    #[serde(default, rename = "nextPageStart")]
    pub next_page_start: Option<u32>,

    /// Start index of the current page (0-indexed).
    #[serde(default)]
    pub start: u32,
}

impl Page {
    /// Whether more pages of results are available.
    pub fn has_next(&self) -> bool {
        !self.is_last_page
    }

    /// The start index for the next page, if any.
    pub fn next_start(&self) -> Option<u32> {
        self.next_page_start
    }

    /// Parses a response body as a list envelope.
    pub(crate) fn parse(response: &Response) -> Result<Self> {
        let body = response.json()?;
        serde_json::from_value(body).map_err(|source| Error::MalformedBody {
            text: response.text().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_envelope() {
        let page: Page = serde_json::from_value(json!({
            "values": [{"slug": "widget"}, {"slug": "gadget"}],
            "size": 2,
            "limit": 25,
            "isLastPage": true,
            "start": 0
        }))
        .unwrap();

        assert_eq!(page.values.len(), 2);
        assert!(!page.has_next());
        assert_eq!(page.next_start(), None);
    }

    #[test]
    fn test_paging_metadata_defaults() {
        let page: Page = serde_json::from_value(json!({"values": []})).unwrap();
        assert_eq!(page.size, 0);
        assert!(page.has_next());
        assert_eq!(page.next_start(), None);
    }
}
